//! Moving averages, growth and cycle detection over the settlement series.

use serde::{Deserialize, Serialize};

use crate::aggregate::MonthSlice;
use crate::domain::Series;
use crate::stats;

const SHORT_WINDOW: usize = 7;
const MEDIUM_WINDOW: usize = 30;
const LONG_WINDOW: usize = 90;

/// Minimum separation, in months, between detected cycle extremes.
const PEAK_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Upward,
    Downward,
}

/// Year-over-year growth of the mean settlement price. Only consecutive
/// year pairs are reported; a gap year breaks the chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearGrowth {
    pub year: i32,
    pub growth_pct: f64,
}

/// Cycle structure detected in the monthly mean sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleInfo {
    pub peaks_detected: usize,
    pub troughs_detected: usize,
    /// Mean distance between consecutive peaks, 0 when fewer than two.
    pub avg_cycle_months: f64,
}

/// Trend descriptors for the analyzed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub current_trend: TrendDirection,
    pub ma_7_current: f64,
    pub ma_30_current: f64,
    pub ma_90_current: f64,
    pub yoy_growth: Vec<YearGrowth>,
    pub cycles: CycleInfo,
}

/// `None` for an empty series.
pub fn analyze_trends(series: &Series, months: &[MonthSlice]) -> Option<TrendReport> {
    let prices = series.settlements();
    if prices.is_empty() {
        return None;
    }

    let ma_7 = rolling_mean(&prices, SHORT_WINDOW);
    let ma_30 = rolling_mean(&prices, MEDIUM_WINDOW);
    let ma_90 = rolling_mean(&prices, LONG_WINDOW);

    let last = prices.len() - 1;
    // Compare the medium average now against one medium window ago, clamped
    // to the series start for short histories.
    let lookback = prices.len().saturating_sub(MEDIUM_WINDOW);
    let current_trend = if ma_30[last] > ma_30[lookback] {
        TrendDirection::Upward
    } else {
        TrendDirection::Downward
    };

    let monthly_means: Vec<f64> = months.iter().map(|slice| slice.mean).collect();
    let peaks = find_peaks(&monthly_means, PEAK_DISTANCE);
    let negated: Vec<f64> = monthly_means.iter().map(|value| -value).collect();
    let troughs = find_peaks(&negated, PEAK_DISTANCE);
    let avg_cycle_months = if peaks.len() > 1 {
        let total: usize = peaks.windows(2).map(|pair| pair[1] - pair[0]).sum();
        total as f64 / (peaks.len() - 1) as f64
    } else {
        0.0
    };

    Some(TrendReport {
        current_trend,
        ma_7_current: ma_7[last],
        ma_30_current: ma_30[last],
        ma_90_current: ma_90[last],
        yoy_growth: year_over_year(series),
        cycles: CycleInfo {
            peaks_detected: peaks.len(),
            troughs_detected: troughs.len(),
            avg_cycle_months,
        },
    })
}

/// Rolling mean with the window clipped at the series start, so early
/// entries average whatever history exists.
fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (index, value) in values.iter().enumerate() {
        sum += value;
        if index >= window {
            sum -= values[index - window];
        }
        let span = (index + 1).min(window);
        out.push(sum / span as f64);
    }
    out
}

fn year_over_year(series: &Series) -> Vec<YearGrowth> {
    let mut by_year: Vec<(i32, Vec<f64>)> = Vec::new();
    for record in series.records() {
        let year = record.date.year();
        match by_year.last_mut() {
            Some((current, values)) if *current == year => values.push(record.settlement),
            _ => by_year.push((year, vec![record.settlement])),
        }
    }

    let mut growth = Vec::new();
    for pair in by_year.windows(2) {
        let (prev_year, prev_values) = &pair[0];
        let (year, values) = &pair[1];
        if *year == prev_year + 1 {
            growth.push(YearGrowth {
                year: *year,
                growth_pct: (stats::mean(values) / stats::mean(prev_values) - 1.0) * 100.0,
            });
        }
    }
    growth
}

/// Strict local maxima with a minimum index separation. When two candidates
/// sit closer than `distance`, the taller one wins.
fn find_peaks(values: &[f64], distance: usize) -> Vec<usize> {
    let mut candidates: Vec<usize> = (1..values.len().saturating_sub(1))
        .filter(|&i| values[i] > values[i - 1] && values[i] > values[i + 1])
        .collect();
    candidates.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut kept: Vec<usize> = Vec::new();
    for index in candidates {
        if kept.iter().all(|&peak| peak.abs_diff(index) >= distance) {
            kept.push(index);
        }
    }
    kept.sort_unstable();
    kept
}
