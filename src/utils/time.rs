use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Datetime format used in prompts and printouts
pub const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Date format used for day schedules and file names
pub const DAY_FORMAT: &str = "%d.%m.%Y";

/// Parse a datetime in DD.MM.YYYY HH:MM format, seconds optional
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%d.%m.%Y %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT))
        .ok()?;
    Some(Utc.from_utc_datetime(&parsed))
}

/// Parse a calendar day in DD.MM.YYYY format
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DAY_FORMAT).ok()
}

/// Format a datetime for prompts and printouts
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

/// Format the clock time of an instant
pub fn format_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Format a calendar day
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        // Valid cases
        assert_eq!(
            parse_datetime("01.06.2030 10:30"),
            Some(Utc.with_ymd_and_hms(2030, 6, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_datetime("01.06.2030 10:30:45"),
            Some(Utc.with_ymd_and_hms(2030, 6, 1, 10, 30, 45).unwrap())
        );
        assert_eq!(
            parse_datetime("  01.06.2030 10:30  "),
            Some(Utc.with_ymd_and_hms(2030, 6, 1, 10, 30, 0).unwrap())
        );

        // Invalid cases
        assert_eq!(parse_datetime(""), None); // Empty input
        assert_eq!(parse_datetime("tomorrow"), None); // Not a date
        assert_eq!(parse_datetime("2030-06-01 10:30"), None); // Wrong format
        assert_eq!(parse_datetime("32.06.2030 10:30"), None); // Day out of range
        assert_eq!(parse_datetime("01.06.2030 25:00"), None); // Hour out of range
        assert_eq!(parse_datetime("01.06.2030"), None); // Missing time
    }

    #[test]
    fn test_parse_day() {
        // Valid cases
        assert_eq!(
            parse_day("01.06.2030"),
            Some(NaiveDate::from_ymd_opt(2030, 6, 1).unwrap())
        );
        assert_eq!(
            parse_day(" 24.12.2030 "),
            Some(NaiveDate::from_ymd_opt(2030, 12, 24).unwrap())
        );

        // Invalid cases
        assert_eq!(parse_day("2030-06-01"), None); // Wrong format
        assert_eq!(parse_day("31.02.2030"), None); // No such day
        assert_eq!(parse_day("01.06.2030 10:30"), None); // Trailing time
    }

    #[test]
    fn test_formatting() {
        let at = Utc.with_ymd_and_hms(2030, 6, 1, 9, 5, 7).unwrap();
        assert_eq!(format_datetime(at), "01.06.2030 09:05");
        assert_eq!(format_time(at), "09:05:07");
        assert_eq!(format_day(at.date_naive()), "01.06.2030");
    }
}
