//! Calendar grouping and per-bucket summary statistics.

use serde::{Deserialize, Serialize};

use crate::domain::{
    month_name, weekday_name, PriceRecord, Series, MONTH_ORDER, WEEKDAY_ORDER, WEEKS_PER_MONTH,
};
use crate::stats::{self, SummaryStats};

/// Summary statistics for one calendar bucket. Buckets with no observations
/// keep their place with null statistics so consumers can tell sparse data
/// from absent buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStat {
    pub key: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl GroupStat {
    fn from_values(key: impl Into<String>, values: &[f64]) -> Self {
        let summary = SummaryStats::from_values(values);
        Self {
            key: key.into(),
            count: values.len(),
            mean: summary.map(|s| s.mean),
            median: summary.map(|s| s.median),
            std_dev: summary.map(|s| s.std_dev),
            min: summary.map(|s| s.min),
            max: summary.map(|s| s.max),
        }
    }
}

/// Grouped statistics across the fixed calendar dimensions.
///
/// `by_weekday` follows `WEEKDAY_ORDER`, `by_week_of_month` runs week 1
/// through 5 and `by_month` January through December, so positional pairing
/// with those sequences is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarBreakdown {
    pub by_weekday: Vec<GroupStat>,
    pub by_week_of_month: Vec<GroupStat>,
    pub by_month: Vec<GroupStat>,
    pub by_year: Vec<GroupStat>,
}

pub fn build_breakdown(series: &Series) -> CalendarBreakdown {
    let by_weekday = WEEKDAY_ORDER
        .iter()
        .map(|&weekday| {
            let values = collect_settlements(series, |record| record.date.weekday() == weekday);
            GroupStat::from_values(weekday_name(weekday), &values)
        })
        .collect();

    let by_week_of_month = (1..=WEEKS_PER_MONTH)
        .map(|week| {
            let values = collect_settlements(series, |record| record.date.week_of_month() == week);
            GroupStat::from_values(format!("Week {week}"), &values)
        })
        .collect();

    let by_month = MONTH_ORDER
        .iter()
        .map(|&month| {
            let values = collect_settlements(series, |record| record.date.month() == month);
            GroupStat::from_values(month_name(month), &values)
        })
        .collect();

    let by_year = match series.date_span() {
        Some((first, last)) => (first.year()..=last.year())
            .map(|year| {
                let values = collect_settlements(series, |record| record.date.year() == year);
                GroupStat::from_values(year.to_string(), &values)
            })
            .collect(),
        None => Vec::new(),
    };

    CalendarBreakdown {
        by_weekday,
        by_week_of_month,
        by_month,
        by_year,
    }
}

fn collect_settlements(series: &Series, keep: impl Fn(&PriceRecord) -> bool) -> Vec<f64> {
    series
        .records()
        .iter()
        .filter(|record| keep(record))
        .map(|record| record.settlement)
        .collect()
}

/// One calendar month of the sorted series: a contiguous index range plus
/// the monthly mean used as the pricing baseline. Slices are never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSlice {
    pub year: i32,
    pub month: u8,
    pub start: usize,
    /// Exclusive end index.
    pub end: usize,
    pub mean: f64,
}

impl MonthSlice {
    pub fn records<'a>(&self, series: &'a Series) -> &'a [PriceRecord] {
        &series.records()[self.start..self.end]
    }
}

/// Splits the series into contiguous calendar-month slices, in date order.
pub fn month_slices(series: &Series) -> Vec<MonthSlice> {
    let records = series.records();
    let mut slices = Vec::new();
    let mut start = 0usize;
    for index in 1..=records.len() {
        let boundary = index == records.len() || {
            let prev = &records[index - 1];
            let curr = &records[index];
            (curr.date.year(), curr.date.month_number())
                != (prev.date.year(), prev.date.month_number())
        };
        if boundary {
            let first = &records[start];
            let values: Vec<f64> = records[start..index]
                .iter()
                .map(|record| record.settlement)
                .collect();
            slices.push(MonthSlice {
                year: first.date.year(),
                month: first.date.month_number(),
                start,
                end: index,
                mean: stats::mean(&values),
            });
            start = index;
        }
    }
    slices
}

/// How often each weekday's settlements beat their month's mean, ranked by
/// that share descending. Weekdays with no observations are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayPerformance {
    pub weekday: String,
    pub avg_price: f64,
    pub count: usize,
    pub beats_monthly_avg_pct: f64,
}

pub fn weekday_performance(series: &Series, months: &[MonthSlice]) -> Vec<WeekdayPerformance> {
    let mut rows = Vec::new();
    for &weekday in &WEEKDAY_ORDER {
        let mut beats = 0usize;
        let mut prices = Vec::new();
        for slice in months {
            for record in slice.records(series) {
                if record.date.weekday() != weekday {
                    continue;
                }
                prices.push(record.settlement);
                if record.settlement > slice.mean {
                    beats += 1;
                }
            }
        }
        if prices.is_empty() {
            continue;
        }
        rows.push(WeekdayPerformance {
            weekday: weekday_name(weekday).to_owned(),
            avg_price: stats::mean(&prices),
            count: prices.len(),
            beats_monthly_avg_pct: beats as f64 / prices.len() as f64 * 100.0,
        });
    }
    rows.sort_by(|a, b| b.beats_monthly_avg_pct.total_cmp(&a.beats_monthly_avg_pct));
    rows
}

/// Average deviation of each week-of-month from its month's mean, ranked
/// best-first. Weeks with no observations are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPerformance {
    pub week: String,
    pub avg_price: f64,
    pub std_dev: f64,
    pub count: usize,
    pub avg_performance_vs_month: f64,
    pub best_performance: f64,
    pub worst_performance: f64,
}

pub fn week_performance(series: &Series, months: &[MonthSlice]) -> Vec<WeekPerformance> {
    let mut rows = Vec::new();
    for week in 1..=WEEKS_PER_MONTH {
        let mut performances = Vec::new();
        let mut prices = Vec::new();
        for slice in months {
            let week_values: Vec<f64> = slice
                .records(series)
                .iter()
                .filter(|record| record.date.week_of_month() == week)
                .map(|record| record.settlement)
                .collect();
            if week_values.is_empty() {
                continue;
            }
            performances.push((stats::mean(&week_values) / slice.mean - 1.0) * 100.0);
            prices.extend(week_values);
        }
        if prices.is_empty() {
            continue;
        }
        rows.push(WeekPerformance {
            week: format!("Week {week}"),
            avg_price: stats::mean(&prices),
            std_dev: stats::std_dev(&prices),
            count: prices.len(),
            avg_performance_vs_month: stats::mean(&performances),
            best_performance: stats::max_value(&performances),
            worst_performance: stats::min_value(&performances),
        });
    }
    rows.sort_by(|a, b| b.avg_performance_vs_month.total_cmp(&a.avg_performance_vs_month));
    rows
}
