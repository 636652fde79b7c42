//! CSV ingestion and validation for the settlement series.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::config::ColumnMap;
use crate::domain::{PriceRecord, Series, SettlementDate};
use crate::error::AnalysisError;

/// Loader output: the validated series plus ingestion bookkeeping that
/// travels into the report metadata.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: Series,
    /// Where the series came from, as shown in the report.
    pub source: String,
    /// Rows skipped for a missing settlement price.
    pub rows_dropped: usize,
    /// Records replaced by a later row with the same date.
    pub duplicate_dates: usize,
}

/// Markers treated as an absent value rather than malformed data.
fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty()
        || trimmed == "-"
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
}

/// Reads and validates the settlement series from a CSV file.
pub fn load_csv(path: &Path, columns: &ColumnMap) -> Result<LoadedSeries, AnalysisError> {
    let file = File::open(path).map_err(|source| AnalysisError::Input {
        path: path.display().to_string(),
        source,
    })?;
    let mut loaded = read_series(file, columns)?;
    loaded.source = path.display().to_string();

    info!(
        records = loaded.series.len(),
        rows_dropped = loaded.rows_dropped,
        duplicate_dates = loaded.duplicate_dates,
        source = %path.display(),
        "loaded settlement series"
    );
    Ok(loaded)
}

/// Reads the series from any CSV byte stream. The first row must be a
/// header naming at least the date and settlement columns.
pub fn read_series(input: impl Read, columns: &ColumnMap) -> Result<LoadedSeries, AnalysisError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, &columns.date)?;
    let settlement_idx = find_column(&headers, &columns.settlement)?;
    let three_month_idx = headers.iter().position(|h| h.trim() == columns.three_month);
    let stock_idx = headers.iter().position(|h| h.trim() == columns.stock);

    let mut records = Vec::new();
    let mut rows_dropped = 0usize;

    for (index, row) in reader.records().enumerate() {
        // 1-based data row number, header excluded.
        let row_number = index + 1;
        let row = row?;

        let date_cell = row.get(date_idx).unwrap_or("");
        if is_missing(date_cell) {
            return Err(AnalysisError::DataFormat {
                row: row_number,
                column: columns.date.clone(),
                reason: String::from("missing date"),
            });
        }
        let date = SettlementDate::parse(date_cell).map_err(|error| AnalysisError::DataFormat {
            row: row_number,
            column: columns.date.clone(),
            reason: error.to_string(),
        })?;

        let settlement_cell = row.get(settlement_idx).unwrap_or("");
        if is_missing(settlement_cell) {
            rows_dropped += 1;
            debug!(row = row_number, "dropping row with missing settlement price");
            continue;
        }
        let settlement = parse_price(settlement_cell, row_number, &columns.settlement)?;

        let three_month = parse_optional(
            three_month_idx.and_then(|idx| row.get(idx)),
            row_number,
            &columns.three_month,
        )?;
        let stock = parse_optional(
            stock_idx.and_then(|idx| row.get(idx)),
            row_number,
            &columns.stock,
        )?;

        records.push(PriceRecord {
            date,
            settlement,
            three_month,
            stock,
        });
    }

    let (series, duplicate_dates) = Series::from_records(records);
    Ok(LoadedSeries {
        series,
        source: String::new(),
        rows_dropped,
        duplicate_dates,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize, AnalysisError> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| AnalysisError::MissingColumn {
            column: name.to_owned(),
        })
}

/// Mandatory settlement price: a finite, strictly positive number.
fn parse_price(cell: &str, row: usize, column: &str) -> Result<f64, AnalysisError> {
    let value = parse_number(cell, row, column)?;
    if value <= 0.0 {
        return Err(AnalysisError::DataFormat {
            row,
            column: column.to_owned(),
            reason: format!("settlement price must be positive, got '{}'", cell.trim()),
        });
    }
    Ok(value)
}

/// Companion columns: absent markers become `None`, anything else must be a
/// finite number.
fn parse_optional(
    cell: Option<&str>,
    row: usize,
    column: &str,
) -> Result<Option<f64>, AnalysisError> {
    match cell {
        None => Ok(None),
        Some(value) if is_missing(value) => Ok(None),
        Some(value) => parse_number(value, row, column).map(Some),
    }
}

fn parse_number(cell: &str, row: usize, column: &str) -> Result<f64, AnalysisError> {
    let trimmed = cell.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| AnalysisError::DataFormat {
            row,
            column: column.to_owned(),
            reason: format!("invalid numeric value '{trimmed}'"),
        })?;
    if !value.is_finite() {
        return Err(AnalysisError::DataFormat {
            row,
            column: column.to_owned(),
            reason: format!("non-finite numeric value '{trimmed}'"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(doc: &str) -> Result<LoadedSeries, AnalysisError> {
        read_series(doc.as_bytes(), &ColumnMap::default())
    }

    #[test]
    fn loads_a_valid_document() {
        let doc = "date,lme_copper_cash_settlement,lme_copper_3_month,lme_copper_stock\n\
                   2024-01-02,9000.5,9100.0,185000\n\
                   2024-01-03,9050.25,,\n";
        let loaded = load(doc).expect("must load");
        assert_eq!(loaded.series.len(), 2);
        assert_eq!(loaded.rows_dropped, 0);
        let first = &loaded.series.records()[0];
        assert_eq!(first.settlement, 9000.5);
        assert_eq!(first.three_month, Some(9100.0));
        assert_eq!(first.stock, Some(185000.0));
        let second = &loaded.series.records()[1];
        assert_eq!(second.three_month, None);
    }

    #[test]
    fn accepts_both_date_formats_in_one_file() {
        let doc = "date,lme_copper_cash_settlement\n\
                   01/02/2024,9000\n\
                   2024-01-03,9100\n\
                   1/4/2024,9200\n";
        let loaded = load(doc).expect("must load");
        let dates: Vec<String> = loaded
            .series
            .records()
            .iter()
            .map(|r| r.date.format_iso())
            .collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
    }

    #[test]
    fn missing_prices_drop_the_row_and_are_counted() {
        let doc = "date,lme_copper_cash_settlement\n\
                   2024-01-02,9000\n\
                   2024-01-03,\n\
                   2024-01-04,-\n\
                   2024-01-05,NaN\n\
                   2024-01-08,9100\n";
        let loaded = load(doc).expect("must load");
        assert_eq!(loaded.series.len(), 2);
        assert_eq!(loaded.rows_dropped, 3);
    }

    #[test]
    fn malformed_price_reports_row_and_column() {
        let doc = "date,lme_copper_cash_settlement\n\
                   2024-01-02,9000\n\
                   2024-01-03,abc\n";
        let err = load(doc).expect_err("must fail");
        assert!(matches!(
            err,
            AnalysisError::DataFormat { row: 2, .. }
        ));
        assert!(err.to_string().contains("lme_copper_cash_settlement"));
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let doc = "date,lme_copper_cash_settlement\n2024-01-02,-5.0\n";
        let err = load(doc).expect_err("must fail");
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let doc = "date,close\n2024-01-02,9000\n";
        let err = load(doc).expect_err("must fail");
        assert!(matches!(
            err,
            AnalysisError::MissingColumn { column } if column == "lme_copper_cash_settlement"
        ));
    }

    #[test]
    fn malformed_date_is_an_error_not_a_drop() {
        let doc = "date,lme_copper_cash_settlement\n02 Jan 2024,9000\n";
        let err = load(doc).expect_err("must fail");
        assert!(matches!(err, AnalysisError::DataFormat { row: 1, .. }));
    }

    #[test]
    fn duplicate_dates_keep_the_last_row() {
        let doc = "date,lme_copper_cash_settlement\n\
                   2024-01-02,9000\n\
                   2024-01-02,9500\n";
        let loaded = load(doc).expect("must load");
        assert_eq!(loaded.series.len(), 1);
        assert_eq!(loaded.duplicate_dates, 1);
        assert_eq!(loaded.series.records()[0].settlement, 9500.0);
    }

    #[test]
    fn header_whitespace_is_tolerated() {
        let doc = " date , lme_copper_cash_settlement \n2024-01-02,9000\n";
        let loaded = load(doc).expect("must load");
        assert_eq!(loaded.series.len(), 1);
    }
}
