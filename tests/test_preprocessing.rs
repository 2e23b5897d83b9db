//! Integration test: individual preprocessing stages

use homeprice_prep::preprocessing::{
    most_frequent_label, CategoricalEncoder, Imputer, IndicatorSkew, OutlierFilter, OutlierRule,
    SkewCorrector, TargetTransformer, UnifiedTable,
};
use homeprice_prep::PrepError;
use polars::prelude::*;

fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

#[test]
fn test_frontage_filled_with_neighborhood_median() {
    let df = df!(
        "Neighborhood" => &["NAmes", "NAmes", "NAmes"],
        "LotFrontage" => &[Some(60.0), None, Some(80.0)],
    )
    .unwrap();

    let (out, _) = Imputer::from_catalog().fit_transform(&df).unwrap();
    assert_eq!(f64_values(&out, "LotFrontage"), vec![Some(60.0), Some(70.0), Some(80.0)]);
}

#[test]
fn test_zoning_filled_with_mode() {
    assert_eq!(
        most_frequent_label(["RL", "RL", "FV"].iter().map(|s| s.to_string())),
        Some("RL".to_string())
    );

    let df = df!("MSZoning" => &[Some("RL"), Some("RL"), Some("FV"), None]).unwrap();
    let (out, summary) = Imputer::from_catalog().fit_transform(&df).unwrap();
    let zoning: Vec<Option<&str>> =
        out.column("MSZoning").unwrap().str().unwrap().into_iter().collect();
    assert_eq!(zoning[3], Some("RL"));
    assert_eq!(summary.filled.get("MSZoning"), Some(&1));
}

#[test]
fn test_basement_fields_absent_and_zero() {
    let df = df!(
        "BsmtQual" => &[Some("Gd"), None],
        "TotalBsmtSF" => &[Some(856.0), None],
    )
    .unwrap();

    let mut imputer = Imputer::from_catalog();
    let (out, _) = imputer.fit_transform(&df).unwrap();
    Imputer::ensure_complete(&out).unwrap();

    let quality: Vec<Option<&str>> =
        out.column("BsmtQual").unwrap().str().unwrap().into_iter().collect();
    assert_eq!(quality, vec![Some("Gd"), Some("None")]);
    assert_eq!(f64_values(&out, "TotalBsmtSF"), vec![Some(856.0), Some(0.0)]);
}

#[test]
fn test_quality_ranks_and_unknown() {
    let df = df!("ExterQual" => &["Ex", "Superb", "Fa"]).unwrap();
    let (out, summary) = CategoricalEncoder::new().fit_transform(&df).unwrap();
    assert_eq!(f64_values(&out, "ExterQual"), vec![Some(5.0), Some(0.0), Some(2.0)]);
    assert_eq!(summary.unknown_counts.get("ExterQual"), Some(&1));
}

#[test]
fn test_three_categories_become_three_indicators() {
    let df = df!("Foundation" => &["PConc", "CBlock", "BrkTil", "PConc"]).unwrap();
    let (out, summary) = CategoricalEncoder::new().fit_transform(&df).unwrap();

    assert_eq!(out.width(), 3);
    assert_eq!(
        summary.indicator_columns,
        vec!["Foundation_BrkTil", "Foundation_CBlock", "Foundation_PConc"]
    );
    for row in 0..out.height() {
        let set: f64 = summary
            .indicator_columns
            .iter()
            .map(|name| f64_values(&out, name)[row].unwrap())
            .sum();
        assert_eq!(set, 1.0, "row {} should have exactly one indicator set", row);
    }
}

#[test]
fn test_skew_threshold() {
    let corrector = SkewCorrector::new(0.75, IndicatorSkew::Transform);
    assert!(corrector.should_transform(0.9));
    assert!(!corrector.should_transform(0.5));
}

#[test]
fn test_outlier_filter_training_only_rule() {
    let df = df!(
        "GrLivArea" => &[5642.0, 4476.0, 1710.0],
        "SalePrice" => &[160_000.0, 745_000.0, 208_500.0],
    )
    .unwrap();

    let (kept, removed) = OutlierFilter::new(OutlierRule::default(), "SalePrice")
        .filter(&df)
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(f64_values(&kept, "GrLivArea"), vec![Some(4476.0), Some(1710.0)]);
}

#[test]
fn test_target_round_trip() {
    let prices = [34_900.0, 163_000.0, 755_000.0];
    let logged: Vec<f64> = prices.iter().map(|p| TargetTransformer::transform(*p)).collect();
    let back = TargetTransformer::invert_all(&logged);
    for (price, recovered) in prices.iter().zip(back) {
        assert!((price - recovered).abs() < 1e-6);
    }
}

#[test]
fn test_split_reproduces_partition_sizes() {
    let train = df!("GrLivArea" => &vec![1500.0; 1000]).unwrap();
    let eval = df!("GrLivArea" => &vec![1200.0; 500]).unwrap();

    let table = UnifiedTable::unify(&train, &eval).unwrap();
    assert_eq!(table.height(), 1500);
    let (x_train, x_eval) = table.split();
    assert_eq!(x_train.height(), 1000);
    assert_eq!(x_eval.height(), 500);
    assert_eq!(f64_values(&x_eval, "GrLivArea")[0], Some(1200.0));
}

#[test]
fn test_uncovered_missing_column_is_reported() {
    let df = df!("Heating" => &[Some("GasA"), None]).unwrap();
    let (out, _) = Imputer::from_catalog().fit_transform(&df).unwrap();
    let err = Imputer::ensure_complete(&out).unwrap_err();
    assert!(matches!(err, PrepError::UnhandledMissing(ref cols) if cols[0].0 == "Heating"));
}
