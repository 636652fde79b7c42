//! Analyzer configuration.

/// Strategy evaluation needs at least this many distinct calendar months.
pub const MIN_STRATEGY_MONTHS: usize = 2;

/// CSV column bindings. The settlement column name is configurable; the
/// companion columns are looked up only when the header carries them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: String,
    pub settlement: String,
    pub three_month: String,
    pub stock: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: String::from("date"),
            settlement: String::from("lme_copper_cash_settlement"),
            three_month: String::from("lme_copper_3_month"),
            stock: String::from("lme_copper_stock"),
        }
    }
}

/// Cutoffs (in percent) for mapping per-period performance dispersion to a
/// qualitative risk tier. Both bounds are exclusive upper limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    /// Performance std strictly below this is Low risk.
    pub low_below_pct: f64,
    /// Performance std strictly below this (and not Low) is Medium risk.
    pub medium_below_pct: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_below_pct: 1.0,
            medium_below_pct: 3.0,
        }
    }
}

/// Tunables for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub columns: ColumnMap,
    pub risk: RiskThresholds,
    /// Minimum distinct calendar months required for strategy evaluation.
    pub min_months: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            risk: RiskThresholds::default(),
            min_months: MIN_STRATEGY_MONTHS,
        }
    }
}
