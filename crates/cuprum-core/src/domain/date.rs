use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Month, Weekday};

use crate::error::DateParseError;

/// Weekdays in reporting order. Grouped statistics and weight rules iterate
/// buckets in this order, so result ordering is deterministic.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

/// Calendar months in reporting order.
pub const MONTH_ORDER: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Week-of-month buckets run 1 through this value.
pub const WEEKS_PER_MONTH: u8 = 5;

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
        Weekday::Sunday => "Sunday",
    }
}

pub fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "January",
        Month::February => "February",
        Month::March => "March",
        Month::April => "April",
        Month::May => "May",
        Month::June => "June",
        Month::July => "July",
        Month::August => "August",
        Month::September => "September",
        Month::October => "October",
        Month::November => "November",
        Month::December => "December",
    }
}

/// Calendar date of one settlement quote, normalized to ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SettlementDate(Date);

impl SettlementDate {
    /// Parses either ISO `YYYY-MM-DD` or US `MM/DD/YYYY`. Month and day may
    /// be unpadded in the slash form.
    pub fn parse(input: &str) -> Result<Self, DateParseError> {
        let trimmed = input.trim();
        Self::parse_iso(trimmed).or_else(|_| {
            Date::parse(
                trimmed,
                format_description!("[month padding:none]/[day padding:none]/[year]"),
            )
            .map(Self)
            .map_err(|_| DateParseError {
                value: input.to_owned(),
            })
        })
    }

    /// Parses strictly ISO `YYYY-MM-DD`, the CLI argument format.
    pub fn parse_iso(input: &str) -> Result<Self, DateParseError> {
        Date::parse(input.trim(), format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| DateParseError {
                value: input.to_owned(),
            })
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> Month {
        self.0.month()
    }

    pub fn month_number(self) -> u8 {
        u8::from(self.0.month())
    }

    pub fn month_name(self) -> &'static str {
        month_name(self.0.month())
    }

    pub fn day(self) -> u8 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Week of month, 1 through 5: `ceil(day / 7)`. Days 1-7 are week 1,
    /// 8-14 week 2, and so on, regardless of weekday alignment.
    pub fn week_of_month(self) -> u8 {
        (self.0.day() + 6) / 7
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(format_description!("[year]-[month]-[day]"))
            .expect("SettlementDate must be ISO formattable")
    }
}

impl From<Date> for SettlementDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Display for SettlementDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for SettlementDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for SettlementDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
