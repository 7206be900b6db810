//! Calendar-day normalization and the day key wire formats.
//!
//! All day arithmetic happens on `NaiveDate`s obtained by shifting the wall
//! clock into one configured fixed offset. Comparing raw timestamps is never
//! correct here: a quote at 23:55 and one at 00:05 must land on different
//! days regardless of the time-of-day either was recorded at.

use crate::core::error::{LedgerError, Result};
use chrono::{FixedOffset, NaiveDate, Utc};

/// Day-key format used as part of the sauda ledger's uniqueness key.
/// This is a wire contract: literally `DD-MM-YYYY`, not an ISO date.
const DAY_KEY_FORMAT: &str = "%d-%m-%Y";

/// Display format for dates in read views: `DD/MM/YYYY`.
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// The current calendar day in the given fixed offset.
pub fn today(tz: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

pub fn parse_day_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
        .map_err(|_| LedgerError::Validation(format!("date must be DD-MM-YYYY, got '{key}'")))
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    #[test]
    fn test_day_key_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let key = day_key(date);
        assert_eq!(key, "07-03-2025");
        assert_eq!(parse_day_key(&key).unwrap(), date);
    }

    #[test]
    fn test_parse_rejects_iso_dates() {
        let err = parse_day_key("2025-03-07").unwrap_err();
        assert!(err.to_string().contains("DD-MM-YYYY"));
    }

    #[test]
    fn test_display_format() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(display_date(date), "31/12/2025");
    }

    #[test]
    fn test_offset_shifts_the_day_at_midnight_boundary() {
        // 19:00 UTC is already the next day at +05:30.
        let instant: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 3, 7, 19, 0, 0).unwrap();
        let local_day = instant.with_timezone(&ist()).date_naive();
        assert_eq!(local_day, NaiveDate::from_ymd_opt(2025, 3, 8).unwrap());

        // 18:29 UTC is still the same day at +05:30.
        let instant: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 3, 7, 18, 29, 0).unwrap();
        let local_day = instant.with_timezone(&ist()).date_naive();
        assert_eq!(local_day, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    }
}
