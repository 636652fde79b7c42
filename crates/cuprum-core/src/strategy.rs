//! Pricing-strategy catalog and historical evaluation.
//!
//! Each strategy is a named weight rule: given the calendar breakdown it
//! resolves to an [`Allocation`] of pricing weight across time buckets.
//! Evaluation replays an allocation against every calendar month and scores
//! it as percent deviation from that month's mean settlement price.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use time::Weekday;
use tracing::debug;

use crate::aggregate::{CalendarBreakdown, MonthSlice};
use crate::config::{AnalyzerConfig, RiskThresholds};
use crate::domain::{weekday_name, SettlementDate, Series, WEEKDAY_ORDER, WEEKS_PER_MONTH};
use crate::error::AnalysisError;
use crate::stats;

/// Allocation weights must land within this distance of 1.0. A violation is
/// a bug in a weight rule, not an input problem, so it panics.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Average performances closer than this count as tied when ordering
/// results; ties fall back to the success rate.
pub const PERFORMANCE_TIE_EPSILON: f64 = 1e-9;

/// Time bucket a strategy can allocate weight to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Weekday(Weekday),
    WeekOfMonth(u8),
}

impl Bucket {
    pub fn contains(self, date: SettlementDate) -> bool {
        match self {
            Self::Weekday(weekday) => date.weekday() == weekday,
            Self::WeekOfMonth(week) => date.week_of_month() == week,
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Weekday(weekday) => weekday_name(weekday).to_owned(),
            Self::WeekOfMonth(week) => format!("Week {week}"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown allocation bucket '{value}'")]
pub struct BucketParseError {
    pub value: String,
}

impl FromStr for Bucket {
    type Err = BucketParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Some(&weekday) = WEEKDAY_ORDER
            .iter()
            .find(|&&weekday| weekday_name(weekday) == input)
        {
            return Ok(Self::Weekday(weekday));
        }
        if let Some(week) = input.strip_prefix("Week ") {
            if let Ok(week) = week.parse::<u8>() {
                if (1..=WEEKS_PER_MONTH).contains(&week) {
                    return Ok(Self::WeekOfMonth(week));
                }
            }
        }
        Err(BucketParseError {
            value: input.to_owned(),
        })
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Bucket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for Bucket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(D::Error::custom)
    }
}

/// One bucket's share of the allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketWeight {
    pub bucket: Bucket,
    pub weight: f64,
}

/// Pricing weight distributed across buckets, summing to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation {
    weights: Vec<BucketWeight>,
}

impl Allocation {
    /// Panics unless the weights sum to 1.0 within `WEIGHT_SUM_TOLERANCE`.
    /// Weight rules are responsible for producing normalized weights.
    pub fn new(weights: Vec<BucketWeight>) -> Self {
        let sum: f64 = weights.iter().map(|entry| entry.weight).sum();
        assert!(
            (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
            "allocation weights sum to {sum}, expected 1.0"
        );
        Self { weights }
    }

    pub fn weights(&self) -> &[BucketWeight] {
        &self.weights
    }
}

/// A named heuristic resolved to a concrete allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyPlan {
    pub name: String,
    pub description: String,
    pub allocation: Allocation,
}

/// The built-in heuristics, evaluated in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Put the full quantity on the historically best weekday.
    SingleBestDay,
    /// Split 50/50 across the two best weekdays.
    TwoDaySplit,
    /// Put 70% in the best week of the month, 30% across the others.
    BestWeekFocus,
    /// Spread evenly across every weekday except the worst one.
    AvoidWorstDay,
}

impl StrategyKind {
    pub const CATALOG: [Self; 4] = [
        Self::SingleBestDay,
        Self::TwoDaySplit,
        Self::BestWeekFocus,
        Self::AvoidWorstDay,
    ];

    /// Resolves the concrete plan for this heuristic from grouped statistics.
    /// `None` when the series cannot support the rule, for example a split
    /// across more weekdays than were ever observed.
    pub fn plan(self, breakdown: &CalendarBreakdown) -> Option<StrategyPlan> {
        match self {
            Self::SingleBestDay => {
                let (best, _) = best_entry(&observed_weekday_means(breakdown))?;
                let name = weekday_name(best);
                Some(StrategyPlan {
                    name: format!("Single Day Strategy (All on {name})"),
                    description: format!("Price 100% of quantity on {name}"),
                    allocation: Allocation::new(vec![BucketWeight {
                        bucket: Bucket::Weekday(best),
                        weight: 1.0,
                    }]),
                })
            }
            Self::TwoDaySplit => {
                let mut entries = observed_weekday_means(breakdown);
                if entries.len() < 2 {
                    return None;
                }
                entries.sort_by(|a, b| b.1.total_cmp(&a.1));
                let first = entries[0].0;
                let second = entries[1].0;
                Some(StrategyPlan {
                    name: format!(
                        "Two-Day Split Strategy ({}, {})",
                        weekday_name(first),
                        weekday_name(second)
                    ),
                    description: format!(
                        "Price 50% each on {} and {}",
                        weekday_name(first),
                        weekday_name(second)
                    ),
                    allocation: Allocation::new(vec![
                        BucketWeight {
                            bucket: Bucket::Weekday(first),
                            weight: 0.5,
                        },
                        BucketWeight {
                            bucket: Bucket::Weekday(second),
                            weight: 0.5,
                        },
                    ]),
                })
            }
            Self::BestWeekFocus => {
                let weeks = observed_week_means(breakdown);
                let (best_week, _) = best_entry(&weeks)?;
                let others: Vec<u8> = weeks
                    .iter()
                    .map(|&(week, _)| week)
                    .filter(|&week| week != best_week)
                    .collect();
                if others.is_empty() {
                    return None;
                }
                let share = 0.3 / others.len() as f64;
                let mut weights = vec![BucketWeight {
                    bucket: Bucket::WeekOfMonth(best_week),
                    weight: 0.7,
                }];
                weights.extend(others.into_iter().map(|week| BucketWeight {
                    bucket: Bucket::WeekOfMonth(week),
                    weight: share,
                }));
                Some(StrategyPlan {
                    name: format!("Week {best_week} Focus Strategy"),
                    description: format!(
                        "Price 70% in Week {best_week}, 30% spread across other weeks"
                    ),
                    allocation: Allocation::new(weights),
                })
            }
            Self::AvoidWorstDay => {
                let entries = observed_weekday_means(breakdown);
                if entries.len() < 2 {
                    return None;
                }
                let (worst, _) = worst_entry(&entries)?;
                let kept: Vec<Weekday> = entries
                    .iter()
                    .map(|&(weekday, _)| weekday)
                    .filter(|&weekday| weekday != worst)
                    .collect();
                let share = 1.0 / kept.len() as f64;
                Some(StrategyPlan {
                    name: format!("Avoid {} Strategy", weekday_name(worst)),
                    description: format!(
                        "Spread pricing equally across all days except {}",
                        weekday_name(worst)
                    ),
                    allocation: Allocation::new(
                        kept.into_iter()
                            .map(|weekday| BucketWeight {
                                bucket: Bucket::Weekday(weekday),
                                weight: share,
                            })
                            .collect(),
                    ),
                })
            }
        }
    }
}

/// Weekdays that have at least one observation, with their mean settlement,
/// in `WEEKDAY_ORDER`.
fn observed_weekday_means(breakdown: &CalendarBreakdown) -> Vec<(Weekday, f64)> {
    WEEKDAY_ORDER
        .iter()
        .zip(breakdown.by_weekday.iter())
        .filter_map(|(&weekday, stat)| stat.mean.map(|mean| (weekday, mean)))
        .collect()
}

fn observed_week_means(breakdown: &CalendarBreakdown) -> Vec<(u8, f64)> {
    (1..=WEEKS_PER_MONTH)
        .zip(breakdown.by_week_of_month.iter())
        .filter_map(|(week, stat)| stat.mean.map(|mean| (week, mean)))
        .collect()
}

/// Entry with the highest mean; the first one wins on exact ties.
fn best_entry<K: Copy>(entries: &[(K, f64)]) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for &(key, mean) in entries {
        match best {
            Some((_, current)) if mean <= current => {}
            _ => best = Some((key, mean)),
        }
    }
    best
}

/// Entry with the lowest mean; the first one wins on exact ties.
fn worst_entry<K: Copy>(entries: &[(K, f64)]) -> Option<(K, f64)> {
    let mut worst: Option<(K, f64)> = None;
    for &(key, mean) in entries {
        match worst {
            Some((_, current)) if mean >= current => {}
            _ => worst = Some((key, mean)),
        }
    }
    worst
}

/// Per-month performance of one allocation, in percent vs the monthly mean.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPerformance {
    pub per_period: Vec<f64>,
}

impl AllocationPerformance {
    pub fn average(&self) -> f64 {
        stats::mean(&self.per_period)
    }

    /// Share of periods with non-negative performance, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.per_period.is_empty() {
            return 0.0;
        }
        let hits = self.per_period.iter().filter(|&&p| p >= 0.0).count();
        hits as f64 / self.per_period.len() as f64 * 100.0
    }

    pub fn std_dev(&self) -> f64 {
        stats::std_dev(&self.per_period)
    }
}

/// Replays an allocation against every month slice.
///
/// Within a month, each bucket contributes the mean settlement of its
/// matching days. Buckets with no observation that month are skipped and the
/// remaining weights are renormalized; a month covering none of the buckets
/// is excluded from the result.
pub fn evaluate_allocation(
    series: &Series,
    months: &[MonthSlice],
    allocation: &Allocation,
) -> AllocationPerformance {
    let mut per_period = Vec::with_capacity(months.len());
    for slice in months {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for entry in allocation.weights() {
            let values: Vec<f64> = slice
                .records(series)
                .iter()
                .filter(|record| entry.bucket.contains(record.date))
                .map(|record| record.settlement)
                .collect();
            if values.is_empty() {
                continue;
            }
            weighted_sum += entry.weight * stats::mean(&values);
            weight_total += entry.weight;
        }
        if weight_total == 0.0 {
            continue;
        }
        let achieved = weighted_sum / weight_total;
        per_period.push((achieved - slice.mean) / slice.mean * 100.0);
    }
    AllocationPerformance { per_period }
}

/// Qualitative risk tier for a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn risk_level(performance_std: f64, thresholds: &RiskThresholds) -> RiskLevel {
    if performance_std < thresholds.low_below_pct {
        RiskLevel::Low
    } else if performance_std < thresholds.medium_below_pct {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Scored outcome for one catalog strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub name: String,
    pub description: String,
    pub weights: Allocation,
    pub avg_performance_vs_monthly: f64,
    pub success_rate: f64,
    pub performance_std: f64,
    pub periods_evaluated: usize,
    pub risk_level: RiskLevel,
}

/// Scores every catalog strategy against the series, best-first.
///
/// Ordering is descending average performance; averages within
/// `PERFORMANCE_TIE_EPSILON` fall back to the higher success rate, and full
/// ties keep catalog order because the sort is stable.
pub fn evaluate_catalog(
    series: &Series,
    breakdown: &CalendarBreakdown,
    months: &[MonthSlice],
    config: &AnalyzerConfig,
) -> Result<Vec<StrategyResult>, AnalysisError> {
    if months.len() < config.min_months {
        return Err(AnalysisError::InsufficientData {
            months: months.len(),
            required: config.min_months,
        });
    }

    let mut results = Vec::with_capacity(StrategyKind::CATALOG.len());
    for kind in StrategyKind::CATALOG {
        let Some(plan) = kind.plan(breakdown) else {
            debug!(?kind, "strategy skipped, series cannot support its weight rule");
            continue;
        };
        let performance = evaluate_allocation(series, months, &plan.allocation);
        if performance.per_period.is_empty() {
            debug!(strategy = %plan.name, "strategy skipped, no month covers its buckets");
            continue;
        }
        let performance_std = performance.std_dev();
        results.push(StrategyResult {
            name: plan.name,
            description: plan.description,
            weights: plan.allocation,
            avg_performance_vs_monthly: performance.average(),
            success_rate: performance.success_rate(),
            performance_std,
            periods_evaluated: performance.per_period.len(),
            risk_level: risk_level(performance_std, &config.risk),
        });
    }

    rank_results(&mut results);
    Ok(results)
}

fn rank_results(results: &mut [StrategyResult]) {
    results.sort_by(|a, b| {
        let gap = a.avg_performance_vs_monthly - b.avg_performance_vs_monthly;
        if gap.abs() <= PERFORMANCE_TIE_EPSILON {
            b.success_rate.total_cmp(&a.success_rate)
        } else {
            b.avg_performance_vs_monthly
                .total_cmp(&a.avg_performance_vs_monthly)
        }
    });
}
