//! Integration tests for the cleaning and profiling pipeline.
//!
//! These tests exercise the public API end to end against a small customer
//! dataset with missing values in every semantic type and one spend outlier.

use datasmith_core::{
    Cleaner, CleaningConfig, DataProfiler, Dataset, InMemoryCatalog, SemanticType, StorageConfig,
    infer_column_types, io, validate_select_sql,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_customers() -> Dataset {
    io::load_csv(fixtures_path().join("customers.csv")).expect("Failed to read fixture")
}

fn scratch_storage(label: &str) -> StorageConfig {
    let root = std::env::temp_dir().join(format!(
        "datasmith-it-{label}-{}",
        datasmith_core::DatasetId::new()
    ));
    StorageConfig::rooted_at(root)
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_infer_fixture_types() {
    let dataset = load_customers();
    let types = infer_column_types(dataset.frame(), &CleaningConfig::default()).unwrap();

    assert_eq!(
        types,
        vec![
            ("name".to_string(), SemanticType::Categorical),
            ("age".to_string(), SemanticType::Numeric),
            ("city".to_string(), SemanticType::Categorical),
            ("email".to_string(), SemanticType::Email),
            ("joined".to_string(), SemanticType::Datetime),
            ("spend".to_string(), SemanticType::Numeric),
        ]
    );
}

#[test]
fn test_clean_fixture_report() {
    let raw = load_customers();
    let outcome = Cleaner::default().clean(&raw).unwrap();

    let report = serde_json::to_value(&outcome.report).unwrap();
    assert_eq!(
        report,
        json!({
            "missing_values_filled": {
                "age": {"filled_values": 1},
                "city": {"filled_values": 1},
                "email": {"filled_values": 1},
                "joined": {"filled_values": 1}
            },
            "outliers_removed": {"spend": 1}
        })
    );
    assert_eq!(outcome.rows_before, 6);
    assert_eq!(outcome.rows_after, 5);
}

#[test]
fn test_clean_fixture_values() {
    let outcome = Cleaner::default().clean(&load_customers()).unwrap();
    let df = outcome.dataset.frame();

    let ages: Vec<f64> = df
        .column("age")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    // Ed (row 4) is gone; Bo got the mean of the known ages
    assert_eq!(ages, vec![34.0, 34.6, 29.0, 41.0, 31.0]);

    assert_eq!(strings(df, "city")[3], Some("Oslo".to_string()));
    assert_eq!(strings(df, "joined")[2], Some("2024-01-09".to_string()));
    assert_eq!(strings(df, "email")[4], Some("ana@example.com".to_string()));

    let total_nulls: usize = df.get_columns().iter().map(|c| c.null_count()).sum();
    assert_eq!(total_nulls, 0);
}

#[test]
fn test_clean_leaves_raw_dataset_untouched() {
    let raw = load_customers();
    let nulls_before: usize = raw.frame().get_columns().iter().map(|c| c.null_count()).sum();

    let outcome = Cleaner::default().clean(&raw).unwrap();

    let nulls_after: usize = raw.frame().get_columns().iter().map(|c| c.null_count()).sum();
    assert_eq!(nulls_before, nulls_after);
    assert_eq!(raw.height(), 6);
    assert_eq!(outcome.dataset.source_dataset_id(), Some(raw.id()));
}

#[test]
fn test_cleaning_twice_fills_nothing_more() {
    let first = Cleaner::default().clean(&load_customers()).unwrap();
    let second = Cleaner::default().clean(&first.dataset).unwrap();
    assert!(second.report.missing_values_filled.is_empty());
}

#[test]
fn test_wider_fence_keeps_outlier() {
    let config = CleaningConfig::builder()
        .iqr_multiplier(500.0)
        .build()
        .unwrap();
    let outcome = Cleaner::new(config).clean(&load_customers()).unwrap();
    assert_eq!(outcome.rows_after, 6);
    assert!(outcome.report.outliers_removed.is_empty());
}

#[test]
fn test_clean_semicolon_separated_file() {
    let raw = io::load_table(fixtures_path().join("orders_semicolon.csv")).unwrap();
    assert_eq!(raw.column_names(), vec!["sku", "region", "units"]);

    let outcome = Cleaner::default().clean(&raw).unwrap();
    let report = serde_json::to_value(&outcome.report).unwrap();
    assert_eq!(
        report,
        json!({
            "missing_values_filled": {
                "region": {"filled_values": 1},
                "units": {"filled_values": 1}
            },
            "outliers_removed": {}
        })
    );
    assert_eq!(outcome.rows_after, 5);
    // (10 + 11 + 12 + 13) / 4
    let units = outcome.dataset.frame().column("units").unwrap();
    assert_eq!(units.f64().unwrap().get(1), Some(11.5));
    assert_eq!(strings(outcome.dataset.frame(), "region")[3], Some("north".to_string()));
}

// ============================================================================
// Catalog and Storage
// ============================================================================

#[test]
fn test_catalog_lineage_round_trip() {
    let catalog = InMemoryCatalog::new();
    let raw_id = catalog.register(load_customers());
    assert_eq!(catalog.resolve_best(raw_id).unwrap().id(), raw_id);

    let outcome = Cleaner::default().clean_by_id(&catalog, raw_id).unwrap();
    let cleaned_id = catalog.register_derived(outcome.dataset).unwrap();

    let best = catalog.resolve_best(raw_id).unwrap();
    assert_eq!(best.id(), cleaned_id);
    assert_eq!(best.source_dataset_id(), Some(raw_id));
    assert_eq!(catalog.list().len(), 2);
}

#[test]
fn test_cleaned_output_written_to_storage() {
    let storage = scratch_storage("clean");
    let outcome = Cleaner::default().clean(&load_customers()).unwrap();

    let csv_path = io::save_cleaned(&outcome.dataset, &storage).unwrap();
    let report_path = io::write_report(outcome.dataset.id(), &outcome.report, &storage).unwrap();

    let reloaded = io::load_csv(&csv_path).unwrap();
    assert_eq!(reloaded.height(), 5);
    assert_eq!(reloaded.column_names(), outcome.dataset.column_names());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["outliers_removed"]["spend"], json!(1));

    std::fs::remove_dir_all(&storage.root).ok();
}

// ============================================================================
// Profiling
// ============================================================================

#[test]
fn test_profile_raw_fixture() {
    let profile = DataProfiler::default().profile(&load_customers()).unwrap();

    assert_eq!(profile.num_rows, 6);
    assert_eq!(profile.overview.numeric_columns, vec!["age", "spend"]);
    assert_eq!(profile.overview.categorical_columns, vec!["name", "city"]);
    assert_eq!(profile.overview.missing_summary.len(), 4);
    assert_eq!(profile.overview.missing_summary["age"], 0.167);

    let corr = profile.correlations.as_ref().unwrap();
    assert_eq!(corr.get("age", "age"), Some(1.0));
    assert_eq!(corr.get("age", "spend"), corr.get("spend", "age"));

    let oslo_spend = profile.category_insights["city"]["spend"]["Oslo"];
    // (120.5 + 110.0 + 101.0) / 3
    assert_eq!(oslo_spend, 110.5);

    let json = serde_json::to_value(&profile).unwrap();
    assert!(json["numeric_summary"]["spend"].get("25%").is_some());
    assert_eq!(json["extremes"]["spend"]["top_5"][0], json!(5000.0));
}

#[test]
fn test_independent_datasets_clean_on_separate_threads() {
    let datasets = vec![load_customers(), load_customers(), load_customers()];

    let outcomes: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = datasets
            .iter()
            .map(|ds| scope.spawn(move || Cleaner::default().clean(ds).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for outcome in &outcomes {
        assert_eq!(outcome.rows_after, 5);
    }
}

// ============================================================================
// SQL Guard
// ============================================================================

#[test]
fn test_sql_guard_accepts_generated_select() {
    let generated = "```sql\nSELECT city, AVG(spend) FROM customers GROUP BY city;\n```";
    assert_eq!(
        validate_select_sql(generated).unwrap(),
        "SELECT city, AVG(spend) FROM customers GROUP BY city;"
    );
    assert!(validate_select_sql("DROP TABLE customers").is_err());
}
