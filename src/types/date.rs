//! Calendar dates without a time component.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::failure::{ValidationFailure, codes};

/// The only accepted textual form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// chrono accepts unpadded fields and signed years, so the shape is
// checked separately.
static DATE_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// A date rendered and parsed as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn parse(text: &str) -> Result<Self, ValidationFailure> {
        if !DATE_SHAPE_RE.is_match(text) {
            return Err(ValidationFailure::new(codes::INVALID_DATE, text)
                .with_detail("expected YYYY-MM-DD"));
        }
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Self)
            .map_err(|e| ValidationFailure::new(codes::INVALID_DATE, text).with_detail(e.to_string()))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = ValidationFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = ValidationFailure;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_date() {
        let date = CalendarDate::parse("1990-05-17").unwrap();
        assert_eq!(date, CalendarDate::from_ymd(1990, 5, 17).unwrap());
        assert_eq!(date.to_string(), "1990-05-17");
    }

    #[test]
    fn leap_days() {
        assert!(CalendarDate::parse("2000-02-29").is_ok());
        assert!(CalendarDate::parse("1900-02-29").is_err());
        assert!(CalendarDate::parse("2023-02-29").is_err());
    }

    #[test]
    fn rejects_impossible_dates_with_diagnostic() {
        let err = CalendarDate::parse("1990-13-40").unwrap_err();
        assert_eq!(err.code, codes::INVALID_DATE);
        assert_eq!(err.value, "1990-13-40");
        assert!(err.detail.is_some());
    }

    #[test]
    fn rejects_other_formats() {
        for input in [
            "",
            "1990-5-17",
            "90-05-17",
            "17/05/1990",
            "1990/05/17",
            "19900517",
            "1990-05-17T00:00:00",
            " 1990-05-17",
            "+1990-05-17",
        ] {
            let err = CalendarDate::parse(input).unwrap_err();
            assert_eq!(err.code, codes::INVALID_DATE, "input {input:?}");
        }
    }

    #[test]
    fn renders_padded_years() {
        let date = CalendarDate::from_ymd(987, 1, 2).unwrap();
        assert_eq!(date.to_string(), "0987-01-02");
        assert_eq!(CalendarDate::parse(&date.to_string()).unwrap(), date);
    }

    #[test]
    fn serde_goes_through_parse() {
        let date = CalendarDate::parse("2001-12-31").unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2001-12-31\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);

        let err = serde_json::from_str::<CalendarDate>("\"2001-02-30\"").unwrap_err();
        assert!(err.to_string().contains("invalid_date"));
    }
}
