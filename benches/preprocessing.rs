use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use homeprice_prep::preprocessing::{skewness, HousingPreprocessor, Imputer};
use polars::prelude::*;
use rand::prelude::*;

const ZONES: [&str; 4] = ["RL", "RM", "FV", "RH"];
const QUALITY: [&str; 5] = ["Po", "Fa", "TA", "Gd", "Ex"];
const NEIGHBORHOODS: [&str; 5] = ["CollgCr", "Veenker", "Crawfor", "NoRidge", "Mitchel"];

fn create_housing_data(n_rows: usize, with_target: bool, rng: &mut StdRng) -> DataFrame {
    let pick = |rng: &mut StdRng, options: &[&str]| {
        options[rng.gen_range(0..options.len())].to_string()
    };

    let mut zoning = Vec::with_capacity(n_rows);
    let mut frontage = Vec::with_capacity(n_rows);
    let mut neighborhood = Vec::with_capacity(n_rows);
    let mut lot_area = Vec::with_capacity(n_rows);
    let mut quality = Vec::with_capacity(n_rows);
    let mut pool = Vec::with_capacity(n_rows);
    let mut garage_area = Vec::with_capacity(n_rows);
    let mut living_area = Vec::with_capacity(n_rows);
    let mut price = Vec::with_capacity(n_rows);

    for _ in 0..n_rows {
        zoning.push(if rng.gen_bool(0.01) { None } else { Some(pick(rng, &ZONES)) });
        frontage.push(if rng.gen_bool(0.15) { None } else { Some(rng.gen_range(40.0..120.0)) });
        neighborhood.push(pick(rng, &NEIGHBORHOODS));
        lot_area.push(rng.gen::<f64>().powi(3) * 50_000.0 + 2_000.0);
        quality.push(pick(rng, &QUALITY));
        pool.push(if rng.gen_bool(0.99) { None } else { Some(pick(rng, &QUALITY)) });
        garage_area.push(if rng.gen_bool(0.05) { None } else { Some(rng.gen_range(0.0..900.0)) });
        let area: f64 = rng.gen_range(600.0..3500.0);
        living_area.push(area);
        price.push(area * 100.0 + rng.gen_range(0.0..50_000.0));
    }

    let mut df = df!(
        "MSZoning" => zoning,
        "LotFrontage" => frontage,
        "Neighborhood" => neighborhood,
        "LotArea" => lot_area,
        "ExterQual" => quality,
        "PoolQC" => pool,
        "GarageArea" => garage_area,
        "GrLivArea" => living_area,
    )
    .unwrap();
    if with_target {
        df.with_column(Series::new("SalePrice".into(), price)).unwrap();
    }
    df
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);
    let mut rng = StdRng::seed_from_u64(42);

    for n_rows in [1000, 5000, 20000].iter() {
        let train = create_housing_data(*n_rows, true, &mut rng);
        let eval = create_housing_data(*n_rows / 2, false, &mut rng);

        group.bench_with_input(
            BenchmarkId::new("run", n_rows),
            &(train, eval),
            |b, (train, eval)| {
                b.iter(|| {
                    HousingPreprocessor::new()
                        .run(black_box(train), black_box(eval))
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let mut rng = StdRng::seed_from_u64(7);
    let df = create_housing_data(10000, false, &mut rng);

    group.bench_function("impute", |b| {
        b.iter(|| Imputer::from_catalog().fit_transform(black_box(&df)).unwrap())
    });

    let values: Vec<f64> = (0..100_000).map(|_| rng.gen::<f64>().powi(2)).collect();
    group.bench_function("skewness", |b| b.iter(|| skewness(black_box(&values))));

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_stages);
criterion_main!(benches);
