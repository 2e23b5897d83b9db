//! Command-line interface for preprocessing and inspecting housing data

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::preprocessing::{profile, ColumnType, HousingPreprocessor, PreprocessingConfig};
use crate::utils::DataLoader;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn caution(s: &str) -> ColoredString { s.truecolor(230, 190, 90) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn step_warn(msg: &str) {
    println!("  {} {}", caution("!"), msg);
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "homeprice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Preprocess residential sale records into model-ready matrices")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full preprocessing pipeline
    Preprocess {
        /// Training records (with sale price)
        #[arg(long)]
        train: PathBuf,

        /// Evaluation records (without sale price)
        #[arg(long)]
        test: PathBuf,

        /// Directory receiving the processed tables
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// JSON configuration overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the pipeline report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show a first-look summary of a data file
    Inspect {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_preprocess(
    train_path: &Path,
    test_path: &Path,
    out_dir: &Path,
    config_path: Option<&Path>,
    report_path: Option<&Path>,
) -> anyhow::Result<()> {
    section("Preprocess");

    let config = match config_path {
        Some(path) => {
            step_run(&format!("Reading config {}", path.display()));
            let config = PreprocessingConfig::from_json_file(path)?;
            step_done("");
            config
        }
        None => PreprocessingConfig::default(),
    };

    let loader = DataLoader::from_config(&config);
    step_run("Loading training data");
    let train = loader.load_csv(train_path)?;
    step_done(&format!("{} rows × {} cols", train.height(), train.width()));

    step_run("Loading evaluation data");
    let test = loader.load_csv(test_path)?;
    step_done(&format!("{} rows × {} cols", test.height(), test.width()));

    step_run("Processing");
    let start = Instant::now();
    let files = config.outputs.clone();
    let processed = HousingPreprocessor::with_config(config).run(&train, &test)?;
    step_done(&format!("{:?}", start.elapsed()));

    let report = &processed.report;
    for (field, labels) in &report.unknown_ordinal_labels {
        step_warn(&format!("{} has labels outside its scale: {:?}", field, labels));
    }
    for column in &report.log1p_unsafe_columns {
        step_warn(&format!(
            "{} is skewed ({:.2}) but holds values <= -1, left as is",
            column.name, column.skewness
        ));
    }

    step_run(&format!("Saving → {}", out_dir.display()));
    let written = processed.write_outputs(out_dir, &files)?;
    step_done(&format!("{} files", written.len()));

    if let Some(path) = report_path {
        step_run(&format!("Writing report → {}", path.display()));
        report.to_json_file(path)?;
        step_done("");
    }

    println!();
    line_box_top();
    line_box(&kv("Training rows  ", &format!(
        "{} ({} outliers removed)",
        report.train_rows, report.outliers_removed
    )));
    line_box(&kv("Eval rows      ", &report.eval_rows.to_string()));
    line_box(&kv("Features       ", &report.feature_count.to_string()));
    line_box(&kv("Indicators     ", &report.indicator_columns.to_string()));
    line_box(&kv("Skew corrected ", &report.skewed_columns.len().to_string()));
    line_box_bottom();
    println!();
    Ok(())
}

pub fn cmd_inspect(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let loader = DataLoader::from_config(&PreprocessingConfig::default());
    let info = loader.get_file_info(data_path)?;
    let df = loader.load_csv(data_path)?;

    println!("  {:<12} {}", muted("File"), info.path);
    println!("  {:<12} {:.2} KB", muted("Size"), info.file_size as f64 / 1024.0);
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!();

    println!(
        "  {:<16} {:<12} {:>6} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12}",
        muted("Column"),
        muted("Type"),
        muted("Nulls"),
        muted("Unique"),
        muted("Mean"),
        muted("Std"),
        muted("Min"),
        muted("Median"),
        muted("Max")
    );
    println!("  {}", dim(&"─".repeat(110)));

    let fmt = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string());
    for stats in profile(&df)? {
        let kind = match stats.dtype {
            ColumnType::Numeric => "numeric",
            ColumnType::Categorical => "categorical",
            ColumnType::Unknown => "other",
        };
        let nulls = if stats.null_count > 0 {
            caution(&stats.null_count.to_string())
        } else {
            dim("0")
        };
        println!(
            "  {:<16} {:<12} {:>6} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12}",
            stats.name,
            muted(kind),
            nulls,
            stats.unique_count,
            fmt(stats.mean),
            fmt(stats.std),
            fmt(stats.min),
            fmt(stats.median),
            fmt(stats.max)
        );
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        let styled = format!("{}", ok("done"));
        assert_eq!(strip_ansi(&styled), "done");
    }

    #[test]
    fn test_parse_preprocess_args() {
        let cli = Cli::try_parse_from([
            "homeprice", "preprocess", "--train", "train.csv", "--test", "test.csv",
            "--out-dir", "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Preprocess { train, out_dir, config, .. } => {
                assert_eq!(train, PathBuf::from("train.csv"));
                assert_eq!(out_dir, PathBuf::from("out"));
                assert!(config.is_none());
            }
            _ => panic!("expected preprocess"),
        }
    }
}
