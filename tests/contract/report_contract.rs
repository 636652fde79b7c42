use cuprum_core::{build_report, read_series, AnalyzerConfig, ColumnMap};
use serde_json::Value;

// Two months of Tuesday/Wednesday/Thursday settlements.
const FIXTURE: &str = "date,lme_copper_cash_settlement,lme_copper_3_month,lme_copper_stock\n\
                       2024-01-02,9000,9100,185000\n\
                       2024-01-03,9080,9180,184500\n\
                       2024-01-11,9150,9250,184000\n\
                       2024-02-06,9100,9200,183500\n\
                       2024-02-07,9180,9280,183000\n\
                       2024-02-15,9260,9360,182500\n";

fn report_value() -> Value {
    let loaded =
        read_series(FIXTURE.as_bytes(), &ColumnMap::default()).expect("fixture must load");
    let report =
        build_report(&loaded, None, &AnalyzerConfig::default()).expect("fixture must analyze");
    serde_json::to_value(&report).expect("report must serialize")
}

#[test]
fn report_exposes_every_dashboard_section() {
    let value = report_value();
    let object = value.as_object().expect("report is an object");

    for key in [
        "period",
        "overall_stats",
        "strategies",
        "by_weekday",
        "by_week_of_month",
        "by_month",
        "by_year",
        "weekday_performance",
        "week_performance",
        "month_details",
        "trends",
        "volatility",
        "metadata",
    ] {
        assert!(object.contains_key(key), "missing section '{key}'");
    }
}

#[test]
fn overall_stats_carry_the_six_summary_figures() {
    let value = report_value();
    let stats = value["overall_stats"]
        .as_object()
        .expect("overall_stats object");
    for key in ["mean", "median", "std_dev", "min", "max", "range"] {
        assert!(stats[key].is_number(), "'{key}' should be numeric");
    }
}

#[test]
fn strategy_entries_follow_the_result_schema() {
    let value = report_value();
    let strategies = value["strategies"].as_array().expect("strategies array");
    assert!(!strategies.is_empty());

    for strategy in strategies {
        assert!(strategy["name"].is_string());
        assert!(strategy["description"].is_string());
        assert!(strategy["avg_performance_vs_monthly"].is_number());
        assert!(strategy["success_rate"].is_number());
        assert!(strategy["performance_std"].is_number());
        assert!(strategy["periods_evaluated"].is_u64());
        assert!(matches!(
            strategy["risk_level"].as_str(),
            Some("Low" | "Medium" | "High")
        ));
        for entry in strategy["weights"].as_array().expect("weights array") {
            assert!(entry["bucket"].is_string());
            assert!(entry["weight"].is_number());
        }
    }
}

#[test]
fn group_stats_keep_empty_buckets_with_null_statistics() {
    let value = report_value();

    let by_weekday = value["by_weekday"].as_array().expect("by_weekday array");
    assert_eq!(by_weekday.len(), 7);
    let friday = by_weekday
        .iter()
        .find(|g| g["key"] == "Friday")
        .expect("Friday bucket present");
    assert_eq!(friday["count"], 0);
    assert!(friday["mean"].is_null());
    assert!(friday["std_dev"].is_null());

    let by_month = value["by_month"].as_array().expect("by_month array");
    assert_eq!(by_month.len(), 12);
    assert_eq!(by_month[0]["key"], "January");
    assert!(by_month[0]["mean"].is_number());
    assert!(by_month[11]["mean"].is_null());
}

#[test]
fn metadata_travels_with_the_report() {
    let value = report_value();
    let metadata = value["metadata"].as_object().expect("metadata object");

    assert!(metadata["generated_at"].is_string());
    assert_eq!(metadata["records_loaded"], 6);
    assert_eq!(metadata["records_used"], 6);
    assert_eq!(metadata["rows_dropped"], 0);
    assert_eq!(metadata["duplicate_dates"], 0);
    assert_eq!(metadata["data_range"]["start"], "2024-01-02");
    assert_eq!(metadata["data_range"]["end"], "2024-02-15");
}
