//! Core analysis engine for cuprum.
//!
//! This crate contains:
//! - Canonical domain model for the daily settlement series
//! - CSV ingestion and validation
//! - Calendar aggregation and descriptive statistics
//! - The pricing-strategy catalog and its historical evaluator
//! - Trend, cycle and volatility analysis
//! - Report assembly and atomic persistence with backups

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod report;
pub mod stats;
pub mod store;
pub mod strategy;
pub mod trend;
pub mod volatility;

pub use aggregate::{
    build_breakdown, month_slices, week_performance, weekday_performance, CalendarBreakdown,
    GroupStat, MonthSlice, WeekPerformance, WeekdayPerformance,
};
pub use config::{AnalyzerConfig, ColumnMap, RiskThresholds, MIN_STRATEGY_MONTHS};
pub use domain::{
    month_name, weekday_name, DateRange, PriceRecord, Series, SettlementDate, MONTH_ORDER,
    WEEKDAY_ORDER, WEEKS_PER_MONTH,
};
pub use error::{AnalysisError, DateParseError, ErrorKind};
pub use loader::{load_csv, read_series, LoadedSeries};
pub use report::{
    build_report, AnalysisReport, BestDay, MonthDetail, PeriodSummary, ReportMetadata, WorstDay,
};
pub use stats::SummaryStats;
pub use store::{PersistOutcome, ReportStore};
pub use strategy::{
    evaluate_allocation, evaluate_catalog, Allocation, AllocationPerformance, Bucket,
    BucketParseError, BucketWeight, RiskLevel, StrategyKind, StrategyPlan, StrategyResult,
    PERFORMANCE_TIE_EPSILON, WEIGHT_SUM_TOLERANCE,
};
pub use trend::{analyze_trends, CycleInfo, TrendDirection, TrendReport, YearGrowth};
pub use volatility::{analyze_volatility, ReturnStats, VolatilityReport};
