//! Volatility profile of the settlement series.

use serde::{Deserialize, Serialize};

use crate::aggregate::MonthSlice;
use crate::domain::{weekday_name, Series, WEEKDAY_ORDER, WEEKS_PER_MONTH};
use crate::stats;

/// Distribution of day-over-day returns, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    pub mean: f64,
    pub std_dev: f64,
    pub max: f64,
    pub min: f64,
}

/// Where the series is calm and where it swings. The extreme buckets are
/// null when the series has no observation to support them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityReport {
    /// Population std of the raw settlement prices.
    pub overall_volatility: f64,
    pub daily_returns: ReturnStats,
    /// Calendar month number (1-12) with the highest price dispersion.
    pub most_volatile_month: Option<u8>,
    pub least_volatile_month: Option<u8>,
    pub most_volatile_weekday: Option<String>,
    /// Week of month (1-5) with the highest price dispersion.
    pub most_volatile_week: Option<u8>,
}

pub fn analyze_volatility(series: &Series, months: &[MonthSlice]) -> VolatilityReport {
    let prices = series.settlements();
    let returns: Vec<f64> = prices
        .windows(2)
        .map(|pair| (pair[1] / pair[0] - 1.0) * 100.0)
        .collect();
    let daily_returns = if returns.is_empty() {
        ReturnStats {
            mean: 0.0,
            std_dev: 0.0,
            max: 0.0,
            min: 0.0,
        }
    } else {
        ReturnStats {
            mean: stats::mean(&returns),
            std_dev: stats::std_dev(&returns),
            max: stats::max_value(&returns),
            min: stats::min_value(&returns),
        }
    };

    let month_stds: Vec<(u8, f64)> = months
        .iter()
        .map(|slice| {
            let values: Vec<f64> = slice
                .records(series)
                .iter()
                .map(|record| record.settlement)
                .collect();
            (slice.month, stats::std_dev(&values))
        })
        .collect();

    let weekday_stds: Vec<(&'static str, f64)> = WEEKDAY_ORDER
        .iter()
        .filter_map(|&weekday| {
            let values: Vec<f64> = series
                .records()
                .iter()
                .filter(|record| record.date.weekday() == weekday)
                .map(|record| record.settlement)
                .collect();
            if values.is_empty() {
                None
            } else {
                Some((weekday_name(weekday), stats::std_dev(&values)))
            }
        })
        .collect();

    let week_stds: Vec<(u8, f64)> = (1..=WEEKS_PER_MONTH)
        .filter_map(|week| {
            let values: Vec<f64> = series
                .records()
                .iter()
                .filter(|record| record.date.week_of_month() == week)
                .map(|record| record.settlement)
                .collect();
            if values.is_empty() {
                None
            } else {
                Some((week, stats::std_dev(&values)))
            }
        })
        .collect();

    VolatilityReport {
        overall_volatility: stats::std_dev(&prices),
        daily_returns,
        most_volatile_month: highest(&month_stds),
        least_volatile_month: lowest(&month_stds),
        most_volatile_weekday: highest(&weekday_stds).map(str::to_owned),
        most_volatile_week: highest(&week_stds),
    }
}

/// Key with the highest value; the first occurrence wins on exact ties.
fn highest<K: Copy>(entries: &[(K, f64)]) -> Option<K> {
    let mut best: Option<(K, f64)> = None;
    for &(key, value) in entries {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((key, value)),
        }
    }
    best.map(|(key, _)| key)
}

fn lowest<K: Copy>(entries: &[(K, f64)]) -> Option<K> {
    let mut worst: Option<(K, f64)> = None;
    for &(key, value) in entries {
        match worst {
            Some((_, current)) if value >= current => {}
            _ => worst = Some((key, value)),
        }
    }
    worst.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::month_slices;
    use crate::domain::{PriceRecord, SettlementDate};

    fn series(rows: &[(&str, f64)]) -> Series {
        let records = rows
            .iter()
            .map(|(date, settlement)| PriceRecord {
                date: SettlementDate::parse(date).expect("must parse"),
                settlement: *settlement,
                three_month: None,
                stock: None,
            })
            .collect();
        Series::from_records(records).0
    }

    #[test]
    fn daily_returns_are_percent_changes() {
        let s = series(&[
            ("2024-01-02", 100.0),
            ("2024-01-03", 110.0),
            ("2024-01-04", 99.0),
        ]);
        let report = analyze_volatility(&s, &month_slices(&s));
        assert!((report.daily_returns.max - 10.0).abs() < 1e-9);
        assert!((report.daily_returns.min - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn volatile_month_and_calm_month_are_identified() {
        // January swings, February is flat.
        let s = series(&[
            ("2024-01-02", 9000.0),
            ("2024-01-03", 9500.0),
            ("2024-02-06", 9200.0),
            ("2024-02-07", 9200.0),
        ]);
        let report = analyze_volatility(&s, &month_slices(&s));
        assert_eq!(report.most_volatile_month, Some(1));
        assert_eq!(report.least_volatile_month, Some(2));
    }

    #[test]
    fn volatile_weekday_is_named() {
        // Tuesdays swing between 9000 and 9600, Wednesdays hold at 9100.
        let s = series(&[
            ("2024-01-02", 9000.0),
            ("2024-01-03", 9100.0),
            ("2024-01-09", 9600.0),
            ("2024-01-10", 9100.0),
        ]);
        let report = analyze_volatility(&s, &month_slices(&s));
        assert_eq!(report.most_volatile_weekday.as_deref(), Some("Tuesday"));
        assert_eq!(report.most_volatile_week, Some(2));
    }

    #[test]
    fn empty_series_reports_null_extremes() {
        let s = series(&[]);
        let report = analyze_volatility(&s, &[]);
        assert_eq!(report.overall_volatility, 0.0);
        assert_eq!(report.most_volatile_month, None);
        assert_eq!(report.most_volatile_weekday, None);
    }
}
