//! Report assembly: runs the full pipeline over a loaded series and shapes
//! the JSON artifact.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use crate::aggregate::{self, CalendarBreakdown, MonthSlice, WeekPerformance, WeekdayPerformance};
use crate::config::AnalyzerConfig;
use crate::domain::{DateRange, Series, SettlementDate};
use crate::error::AnalysisError;
use crate::loader::LoadedSeries;
use crate::stats::{self, SummaryStats};
use crate::strategy::{self, StrategyResult};
use crate::trend::{self, TrendReport};
use crate::volatility::{self, VolatilityReport};

/// Analyzed window boundaries. When the caller gave an explicit range those
/// bounds are echoed back; otherwise the series' own span is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start: SettlementDate,
    pub end: SettlementDate,
    pub total_days: usize,
}

/// Highest settlement day within a month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestDay {
    pub date: SettlementDate,
    pub value: f64,
    pub premium_to_avg: f64,
}

/// Lowest settlement day within a month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorstDay {
    pub date: SettlementDate,
    pub value: f64,
    pub discount_to_avg: f64,
}

/// Per-calendar-month detail block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthDetail {
    pub year: i32,
    pub month: u8,
    pub month_name: String,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub days_above_average: usize,
    pub days_below_average: usize,
    pub best_day: BestDay,
    pub worst_day: WorstDay,
}

/// Run bookkeeping persisted with the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// RFC3339 UTC timestamp of report generation.
    pub generated_at: String,
    pub source: String,
    pub records_loaded: usize,
    /// Records inside the analyzed window.
    pub records_used: usize,
    pub rows_dropped: usize,
    pub duplicate_dates: usize,
    /// Full span of the loaded series, before windowing.
    pub data_range: DateRange,
}

/// Complete analysis artifact, persisted as pretty-printed JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub period: PeriodSummary,
    pub overall_stats: SummaryStats,
    pub strategies: Vec<StrategyResult>,
    #[serde(flatten)]
    pub groups: CalendarBreakdown,
    pub weekday_performance: Vec<WeekdayPerformance>,
    pub week_performance: Vec<WeekPerformance>,
    pub month_details: Vec<MonthDetail>,
    pub trends: TrendReport,
    pub volatility: VolatilityReport,
    pub metadata: ReportMetadata,
}

/// Runs the full analysis over a loaded series.
///
/// The window, when given, restricts the series inclusively on both ends.
/// Fails with an insufficient-data error when fewer than the configured
/// minimum of calendar months remains.
pub fn build_report(
    loaded: &LoadedSeries,
    window: Option<DateRange>,
    config: &AnalyzerConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let filtered = loaded.series.window(window)?;
    let months = aggregate::month_slices(&filtered);
    if months.len() < config.min_months {
        return Err(AnalysisError::InsufficientData {
            months: months.len(),
            required: config.min_months,
        });
    }

    let values = filtered.settlements();
    let Some(overall_stats) = SummaryStats::from_values(&values) else {
        return Err(AnalysisError::InsufficientData {
            months: months.len(),
            required: config.min_months,
        });
    };
    let Some((series_start, series_end)) = filtered.date_span() else {
        return Err(AnalysisError::InsufficientData {
            months: months.len(),
            required: config.min_months,
        });
    };

    let period = match window {
        Some(range) => PeriodSummary {
            start: range.start,
            end: range.end,
            total_days: filtered.len(),
        },
        None => PeriodSummary {
            start: series_start,
            end: series_end,
            total_days: filtered.len(),
        },
    };

    let groups = aggregate::build_breakdown(&filtered);
    let strategies = strategy::evaluate_catalog(&filtered, &groups, &months, config)?;
    let weekday_performance = aggregate::weekday_performance(&filtered, &months);
    let week_performance = aggregate::week_performance(&filtered, &months);
    let month_details = month_details(&filtered, &months);
    let trends = trend::analyze_trends(&filtered, &months).ok_or(
        AnalysisError::InsufficientData {
            months: months.len(),
            required: config.min_months,
        },
    )?;
    let volatility = volatility::analyze_volatility(&filtered, &months);

    let (full_start, full_end) = loaded
        .series
        .date_span()
        .unwrap_or((series_start, series_end));

    let report = AnalysisReport {
        period,
        overall_stats,
        strategies,
        groups,
        weekday_performance,
        week_performance,
        month_details,
        trends,
        volatility,
        metadata: ReportMetadata {
            generated_at: now_rfc3339(),
            source: loaded.source.clone(),
            records_loaded: loaded.series.len(),
            records_used: filtered.len(),
            rows_dropped: loaded.rows_dropped,
            duplicate_dates: loaded.duplicate_dates,
            data_range: DateRange {
                start: full_start,
                end: full_end,
            },
        },
    };

    info!(
        months = months.len(),
        strategies = report.strategies.len(),
        "analysis complete"
    );
    Ok(report)
}

fn month_details(series: &Series, months: &[MonthSlice]) -> Vec<MonthDetail> {
    months
        .iter()
        .filter_map(|slice| {
            let records = slice.records(series);
            let first = records.first()?;
            let values: Vec<f64> = records.iter().map(|record| record.settlement).collect();
            let average = slice.mean;

            let mut best = first;
            let mut worst = first;
            for record in records {
                if record.settlement > best.settlement {
                    best = record;
                }
                if record.settlement < worst.settlement {
                    worst = record;
                }
            }
            // Days exactly at the average count as below.
            let days_above_average = values.iter().filter(|&&value| value > average).count();
            let days_below_average = values.len() - days_above_average;

            Some(MonthDetail {
                year: slice.year,
                month: slice.month,
                month_name: first.date.month_name().to_owned(),
                average,
                min: stats::min_value(&values),
                max: stats::max_value(&values),
                std_dev: stats::std_dev(&values),
                days_above_average,
                days_below_average,
                best_day: BestDay {
                    date: best.date,
                    value: best.settlement,
                    premium_to_avg: best.settlement - average,
                },
                worst_day: WorstDay {
                    date: worst.date,
                    value: worst.settlement,
                    discount_to_avg: average - worst.settlement,
                },
            })
        })
        .collect()
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("current time must be RFC3339 formattable")
}
