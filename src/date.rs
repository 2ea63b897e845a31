//! `MM/DD/YYYY` parsing and Unix-time conversion
//!
//! Dates map to midnight UTC. Malformed or impossible dates are errors, never
//! timestamp 0.

use chrono::format::ParseErrorKind;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Date input failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Input is not three `/`-separated integers
    #[error("expected MM/DD/YYYY, got {input:?}")]
    Format {
        /// Offending input
        input: String,
    },

    /// Fields parse but name no calendar day
    #[error("{input} is not a calendar date")]
    OutOfRange {
        /// Offending date
        input: String,
    },
}

/// Parse `MM/DD/YYYY` (single-digit fields and surrounding whitespace allowed).
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|err| match err.kind() {
        ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => DateError::OutOfRange {
            input: trimmed.to_string(),
        },
        _ => DateError::Format {
            input: input.to_string(),
        },
    })
}

/// Validate a month/day/year triple.
pub fn calendar_date(month: u32, day: u32, year: i32) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateError::OutOfRange {
        input: format!("{month:02}/{day:02}/{year}"),
    })
}

/// Seconds since the Unix epoch at midnight UTC of `date`.
pub fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Seconds since the Unix epoch at midnight UTC of month/day/year.
pub fn to_unix_timestamp(month: u32, day: u32, year: i32) -> Result<i64, DateError> {
    calendar_date(month, day, year).map(date_to_timestamp)
}

/// Parse `MM/DD/YYYY` straight to a timestamp.
pub fn parse_timestamp(input: &str) -> Result<i64, DateError> {
    parse_date(input).map(date_to_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_and_known_dates() {
        assert_eq!(to_unix_timestamp(1, 1, 1970), Ok(0));
        assert_eq!(to_unix_timestamp(11, 1, 2024), Ok(1_730_419_200));
        assert_eq!(to_unix_timestamp(12, 31, 1969), Ok(-86_400));
    }

    #[test]
    fn test_parse_accepts_loose_fields() {
        assert_eq!(parse_timestamp("11/01/2024"), Ok(1_730_419_200));
        assert_eq!(parse_timestamp(" 11/1/2024 \n"), Ok(1_730_419_200));
        assert_eq!(parse_timestamp("11/2/2024"), Ok(1_730_419_200 + 86_400));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "11/01", "11/01/2024/7", "Nov/01/2024", "11-01-2024", "11//2024"] {
            assert!(
                matches!(parse_date(input), Err(DateError::Format { .. })),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert_eq!(
            parse_date("02/30/2024"),
            Err(DateError::OutOfRange {
                input: "02/30/2024".to_string()
            })
        );
        assert!(matches!(parse_date("13/01/2024"), Err(DateError::OutOfRange { .. })));
        assert!(parse_date("00/10/2024").is_err());
        assert!(parse_date("02/29/2024").is_ok());
    }

    #[test]
    fn test_calendar_date_names_the_bad_day() {
        let err = calendar_date(2, 29, 2023).unwrap_err();
        assert_eq!(err.to_string(), "02/29/2023 is not a calendar date");
        assert!(calendar_date(11, u32::MAX, 2024).is_err());
    }
}
