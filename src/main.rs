//! homeprice - housing data preprocessing entry point

use clap::Parser;
use homeprice_prep::cli::{cmd_inspect, cmd_preprocess, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homeprice_prep=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess { train, test, out_dir, config, report } => {
            cmd_preprocess(&train, &test, &out_dir, config.as_deref(), report.as_deref())?;
        }
        Commands::Inspect { data } => {
            cmd_inspect(&data)?;
        }
    }

    Ok(())
}
