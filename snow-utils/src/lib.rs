//! Shared utility functions for the snow report crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    /// Fallback shown when a timestamp is missing entirely.
    pub const MISSING_TIMESTAMP: &str = "\u{2014}";

    /// Parse a spreadsheet column label in "M/D/YYYY" format.
    ///
    /// Month and day may be one or two digits, the year must be four digits,
    /// and the result must be a real calendar date.
    pub fn parse_mdy(s: &str) -> anyhow::Result<NaiveDate> {
        let parts: Vec<&str> = s.split('/').collect();
        let well_formed = parts.len() == 3
            && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
            && parts[0].len() <= 2
            && parts[1].len() <= 2
            && parts[2].len() == 4;
        if !well_formed {
            return Err(DateError(format!("not an M/D/YYYY label: {:?}", s)).into());
        }
        let month: u32 = parts[0].parse()?;
        let day: u32 = parts[1].parse()?;
        let year: i32 = parts[2].parse()?;
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DateError(format!("no such calendar date: {:?}", s)).into())
    }

    /// True if `s` is an "M/D/YYYY" label naming a valid date.
    pub fn is_mdy(s: &str) -> bool {
        parse_mdy(s).is_ok()
    }

    /// Short weekday and "M/D" label for a forecast column header,
    /// e.g. ("Mon", "1/15").
    pub fn header_label(date: &NaiveDate) -> (String, String) {
        (
            date.format("%a").to_string(),
            format!("{}/{}", date.month(), date.day()),
        )
    }

    /// Format a "last updated" timestamp for display.
    ///
    /// Accepts "YYYY-MM-DD HH:MM[:SS]" or the same with a `T` separator and
    /// renders it as "Jan 5, 3:07 PM". Anything unparsable is returned as-is,
    /// and an empty value becomes an em-dash.
    pub fn format_updated(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return MISSING_TIMESTAMP.to_string();
        }
        let normalized = raw.replacen(' ', "T", 1);
        let parsed = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M"));
        match parsed {
            Ok(dt) => dt.format("%b %-d, %-I:%M %p").to_string(),
            Err(_) => raw.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_mdy() {
            let date = parse_mdy("1/5/2025").unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());

            let padded = parse_mdy("12/31/2024").unwrap();
            assert_eq!(padded, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        }

        #[test]
        fn test_parse_mdy_rejects_other_labels() {
            assert!(parse_mdy("Resort").is_err());
            assert!(parse_mdy("2025-01-05").is_err());
            assert!(parse_mdy("1/5/25").is_err());
            assert!(parse_mdy("13/1/2025").is_err());
            assert!(parse_mdy("2/30/2025").is_err());
            assert!(parse_mdy("1/5/2025/1").is_err());
            assert!(!is_mdy("Five-day total"));
        }

        #[test]
        fn test_header_label() {
            let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
            let (weekday, month_day) = header_label(&date);
            assert_eq!(weekday, "Mon");
            assert_eq!(month_day, "1/6");
        }

        #[test]
        fn test_format_updated() {
            assert_eq!(format_updated("2025-01-05 15:07"), "Jan 5, 3:07 PM");
            assert_eq!(format_updated("2025-01-05T09:30:12"), "Jan 5, 9:30 AM");
            assert_eq!(format_updated("yesterday"), "yesterday");
            assert_eq!(format_updated("  "), MISSING_TIMESTAMP);
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
