use serde::{Deserialize, Serialize};

use crate::domain::SettlementDate;
use crate::error::AnalysisError;

/// One validated daily observation. Only the settlement price is mandatory;
/// the companion columns ride along when the input provides them.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: SettlementDate,
    pub settlement: f64,
    pub three_month: Option<f64>,
    pub stock: Option<f64>,
}

/// Inclusive analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: SettlementDate,
    pub end: SettlementDate,
}

impl DateRange {
    pub fn new(start: SettlementDate, end: SettlementDate) -> Result<Self, AnalysisError> {
        if start > end {
            return Err(AnalysisError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }
}

/// Date-sorted settlement series with unique dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    records: Vec<PriceRecord>,
}

impl Series {
    /// Builds a series from raw loader output: stable-sorts by date, then
    /// resolves duplicate dates last-write-wins (the record appearing later
    /// in the input replaces the earlier one). Returns the series and the
    /// number of records replaced that way.
    pub fn from_records(mut records: Vec<PriceRecord>) -> (Self, usize) {
        records.sort_by_key(|record| record.date);
        let mut deduped: Vec<PriceRecord> = Vec::with_capacity(records.len());
        let mut replaced = 0usize;
        for record in records {
            match deduped.last_mut() {
                Some(last) if last.date == record.date => {
                    *last = record;
                    replaced += 1;
                }
                _ => deduped.push(record),
            }
        }
        (Self { records: deduped }, replaced)
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last observation dates, `None` for an empty series.
    pub fn date_span(&self) -> Option<(SettlementDate, SettlementDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }

    pub fn settlements(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.settlement).collect()
    }

    /// Restricts the series to an inclusive window. `None` keeps the full
    /// series. Fails when the window selects no records.
    pub fn window(&self, range: Option<DateRange>) -> Result<Self, AnalysisError> {
        let Some(range) = range else {
            return Ok(self.clone());
        };
        let start = self
            .records
            .partition_point(|record| record.date < range.start);
        let end = self
            .records
            .partition_point(|record| record.date <= range.end);
        if start >= end {
            return Err(AnalysisError::EmptyRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok(Self {
            records: self.records[start..end].to_vec(),
        })
    }
}
