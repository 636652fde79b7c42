mod date;
mod series;

pub use date::{
    month_name, weekday_name, SettlementDate, MONTH_ORDER, WEEKDAY_ORDER, WEEKS_PER_MONTH,
};
pub use series::{DateRange, PriceRecord, Series};
