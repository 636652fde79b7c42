//! Behavior-driven tests for the analysis pipeline
//!
//! These tests verify WHAT a user gets out of an analysis run, from CSV
//! bytes to the final report, focusing on observable behavior rather than
//! implementation details.

use cuprum_core::{
    build_report, AnalysisError, AnalysisReport, DateRange, ErrorKind, SettlementDate,
    WEIGHT_SUM_TOLERANCE,
};
use cuprum_tests::{csv_document, default_config, series_fixture, SIX_MONTHS, TWO_MONTH_BALANCED};

fn window(start: &str, end: &str) -> DateRange {
    DateRange::new(
        SettlementDate::parse(start).expect("valid start"),
        SettlementDate::parse(end).expect("valid end"),
    )
    .expect("valid range")
}

// =============================================================================
// Analysis: Full-Series Runs
// =============================================================================

#[test]
fn user_gets_a_complete_report_for_the_full_series() {
    // Given: Half a year of settlement prices
    let loaded = series_fixture(SIX_MONTHS);

    // When: The user analyzes the whole history
    let report = build_report(&loaded, None, &default_config()).expect("analysis should succeed");

    // Then: The period covers the observed span
    assert_eq!(report.period.start.format_iso(), "2024-01-02");
    assert_eq!(report.period.end.format_iso(), "2024-06-26");
    assert_eq!(report.period.total_days, 30, "every record should count");

    // And: Every analysis section is populated
    assert!(!report.strategies.is_empty(), "strategies should be scored");
    assert_eq!(report.groups.by_weekday.len(), 7);
    assert_eq!(report.groups.by_week_of_month.len(), 5);
    assert_eq!(report.groups.by_month.len(), 12);
    assert_eq!(report.month_details.len(), 6);
    assert!(!report.weekday_performance.is_empty());
    assert!(!report.week_performance.is_empty());
    assert!(report.overall_stats.mean > 9000.0);
    assert!(report.volatility.overall_volatility > 0.0);

    // And: Metadata reflects the loaded series
    assert_eq!(report.metadata.records_loaded, 30);
    assert_eq!(report.metadata.records_used, 30);
    assert_eq!(report.metadata.rows_dropped, 0);
    assert_eq!(report.metadata.duplicate_dates, 0);
}

#[test]
fn strategy_weights_always_sum_to_one() {
    let loaded = series_fixture(SIX_MONTHS);
    let report = build_report(&loaded, None, &default_config()).expect("analysis should succeed");

    for strategy in &report.strategies {
        let sum: f64 = strategy.weights.weights().iter().map(|w| w.weight).sum();
        assert!(
            (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
            "{} weights sum to {sum}",
            strategy.name
        );
    }
}

#[test]
fn strategies_come_back_ranked_best_first() {
    let loaded = series_fixture(SIX_MONTHS);
    let report = build_report(&loaded, None, &default_config()).expect("analysis should succeed");

    assert!(report.strategies.len() >= 2, "catalog should resolve");
    for pair in report.strategies.windows(2) {
        assert!(
            pair[0].avg_performance_vs_monthly >= pair[1].avg_performance_vs_monthly - 1e-9,
            "{} should not rank below {}",
            pair[0].name,
            pair[1].name
        );
    }

    // And: Every result carries evaluation evidence
    for strategy in &report.strategies {
        assert!(strategy.periods_evaluated >= 2);
        assert!((0.0..=100.0).contains(&strategy.success_rate));
    }
}

#[test]
fn a_split_matching_the_monthly_mean_scores_zero_with_full_success() {
    // Given: Two months where the Tuesday/Wednesday pair averages exactly to
    // each month's mean
    let loaded = series_fixture(TWO_MONTH_BALANCED);

    // When: The user analyzes them
    let report = build_report(&loaded, None, &default_config()).expect("analysis should succeed");

    // Then: The two-day split is a perfect baseline tracker
    let split = report
        .strategies
        .iter()
        .find(|s| s.name.starts_with("Two-Day Split Strategy"))
        .expect("split strategy should be scored");
    assert!(
        split.avg_performance_vs_monthly.abs() < 1e-9,
        "got {}",
        split.avg_performance_vs_monthly
    );
    assert_eq!(split.success_rate, 100.0);
    assert_eq!(split.periods_evaluated, 2);
    assert_eq!(format!("{}", split.risk_level), "Low");
}

// =============================================================================
// Analysis: Date Windows
// =============================================================================

#[test]
fn user_can_restrict_the_analysis_to_a_window() {
    let loaded = series_fixture(SIX_MONTHS);

    // When: The user asks for the first quarter only
    let report = build_report(
        &loaded,
        Some(window("2024-01-01", "2024-03-31")),
        &default_config(),
    )
    .expect("analysis should succeed");

    // Then: The requested bounds are echoed back
    assert_eq!(report.period.start.format_iso(), "2024-01-01");
    assert_eq!(report.period.end.format_iso(), "2024-03-31");
    assert_eq!(report.period.total_days, 15);
    assert_eq!(report.month_details.len(), 3);

    // And: Metadata still shows the full loaded span
    assert_eq!(report.metadata.data_range.start.format_iso(), "2024-01-02");
    assert_eq!(report.metadata.data_range.end.format_iso(), "2024-06-26");
    assert_eq!(report.metadata.records_used, 15);
    assert_eq!(report.metadata.records_loaded, 30);
}

#[test]
fn a_window_with_no_records_is_a_range_error() {
    let loaded = series_fixture(SIX_MONTHS);
    let err = build_report(
        &loaded,
        Some(window("2030-01-01", "2030-12-31")),
        &default_config(),
    )
    .expect_err("analysis should fail");
    assert!(matches!(err, AnalysisError::EmptyRange { .. }));
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn an_inverted_window_is_rejected_before_analysis() {
    let err = DateRange::new(
        SettlementDate::parse("2024-03-01").expect("valid"),
        SettlementDate::parse("2024-01-01").expect("valid"),
    )
    .expect_err("range should be invalid");
    assert!(matches!(err, AnalysisError::InvalidRange { .. }));
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn a_single_month_of_data_is_insufficient() {
    let loaded = series_fixture(&[("2024-01-02", "9000"), ("2024-01-03", "9100")]);
    let err = build_report(&loaded, None, &default_config()).expect_err("analysis should fail");
    assert!(matches!(
        err,
        AnalysisError::InsufficientData {
            months: 1,
            required: 2
        }
    ));
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

// =============================================================================
// Analysis: Input Quality
// =============================================================================

#[test]
fn malformed_prices_name_their_row_and_column() {
    let doc = csv_document(&[("2024-01-02", "9000"), ("2024-01-03", "n/a++")]);
    let err = cuprum_core::read_series(doc.as_bytes(), &cuprum_core::ColumnMap::default())
        .expect_err("load should fail");
    assert_eq!(err.kind(), ErrorKind::DataFormat);
    let message = err.to_string();
    assert!(message.contains("row 2"), "got: {message}");
    assert!(message.contains("lme_copper_cash_settlement"), "got: {message}");
}

#[test]
fn a_missing_settlement_column_is_reported_by_name() {
    let doc = "date,close\n2024-01-02,9000\n";
    let err = cuprum_core::read_series(doc.as_bytes(), &cuprum_core::ColumnMap::default())
        .expect_err("load should fail");
    assert!(matches!(
        err,
        AnalysisError::MissingColumn { ref column } if column == "lme_copper_cash_settlement"
    ));
}

#[test]
fn rows_without_prices_are_dropped_and_counted() {
    let loaded = series_fixture(&[
        ("2024-01-02", "9000"),
        ("2024-01-03", ""),
        ("2024-01-04", "-"),
        ("2024-02-06", "9200"),
        ("2024-02-07", "9300"),
    ]);
    assert_eq!(loaded.series.len(), 3);
    assert_eq!(loaded.rows_dropped, 2);

    let report = build_report(&loaded, None, &default_config()).expect("analysis should succeed");
    assert_eq!(report.metadata.rows_dropped, 2);
}

#[test]
fn duplicate_dates_resolve_to_the_last_row() {
    let loaded = series_fixture(&[
        ("2024-01-02", "9000"),
        ("2024-01-02", "9050"),
        ("2024-02-06", "9200"),
    ]);
    assert_eq!(loaded.series.len(), 2);
    assert_eq!(loaded.duplicate_dates, 1);
    assert_eq!(loaded.series.records()[0].settlement, 9050.0);
}

#[test]
fn mixed_date_formats_are_normalized() {
    let loaded = series_fixture(&[
        ("01/02/2024", "9000"),
        ("2024-01-03", "9100"),
        ("2/6/2024", "9200"),
    ]);
    let dates: Vec<String> = loaded
        .series
        .records()
        .iter()
        .map(|r| r.date.format_iso())
        .collect();
    assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-02-06"]);
}

// =============================================================================
// Analysis: Report Contract
// =============================================================================

#[test]
fn report_json_matches_the_dashboard_contract() {
    let loaded = series_fixture(SIX_MONTHS);
    let report = build_report(&loaded, None, &default_config()).expect("analysis should succeed");
    let value = serde_json::to_value(&report).expect("report should serialize");

    // Strategy entries expose weights as bucket/weight pairs
    let weights = value["strategies"][0]["weights"]
        .as_array()
        .expect("weights should be an array");
    assert!(weights
        .iter()
        .all(|w| w["bucket"].is_string() && w["weight"].is_number()));
    assert!(value["strategies"][0]["risk_level"].is_string());

    // Grouped stats sit at the top level with all buckets present
    let by_weekday = value["by_weekday"].as_array().expect("by_weekday array");
    assert_eq!(by_weekday.len(), 7);
    // Weekends never trade in the fixture, so their stats are null
    assert!(by_weekday
        .iter()
        .any(|g| g["count"] == 0 && g["mean"].is_null()));

    // Dates serialize as ISO strings
    assert_eq!(value["period"]["start"], "2024-01-02");
    assert!(value["metadata"]["generated_at"].is_string());
}

#[test]
fn a_report_survives_a_json_round_trip() {
    // Given: A report built from real CSV bytes
    let loaded = series_fixture(SIX_MONTHS);
    let report = build_report(&loaded, None, &default_config()).expect("analysis should succeed");

    // When: It is serialized and parsed back
    let json = serde_json::to_string(&report).expect("report should serialize");
    let parsed: AnalysisReport = serde_json::from_str(&json).expect("report should parse back");

    // Then: Every field comes back exactly, custom date and bucket
    // encodings included
    assert_eq!(parsed, report);
}

#[test]
fn reruns_produce_identical_reports_apart_from_the_timestamp() {
    let loaded = series_fixture(SIX_MONTHS);
    let first = build_report(&loaded, None, &default_config()).expect("analysis should succeed");
    let second = build_report(&loaded, None, &default_config()).expect("analysis should succeed");

    let mut a = serde_json::to_value(&first).expect("must serialize");
    let mut b = serde_json::to_value(&second).expect("must serialize");
    for value in [&mut a, &mut b] {
        value["metadata"]
            .as_object_mut()
            .expect("metadata object")
            .remove("generated_at");
    }
    assert_eq!(a, b, "analysis must be deterministic");
}
