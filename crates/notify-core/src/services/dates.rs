//! Timestamp formatting for subject lines, bodies, and receipts

use chrono::{DateTime, NaiveDateTime};

const DISPLAY_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// Format a stored ISO 8601 timestamp as e.g. `January 01, 2024 10:00 AM`.
/// Unparseable input is returned unchanged.
pub fn format_datetime(iso: &str) -> String {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(iso) {
        return datetime.format(DISPLAY_FORMAT).to_string();
    }

    // Rows written before timezones were enforced carry no offset
    if let Ok(datetime) = iso.parse::<NaiveDateTime>() {
        return datetime.format(DISPLAY_FORMAT).to_string();
    }

    iso.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_utc_timestamp() {
        assert_eq!(
            format_datetime("2024-01-01T10:00:00Z"),
            "January 01, 2024 10:00 AM"
        );
    }

    #[test]
    fn test_format_keeps_offset_local_time() {
        assert_eq!(
            format_datetime("2024-03-15T18:30:00+08:00"),
            "March 15, 2024 06:30 PM"
        );
    }

    #[test]
    fn test_format_naive_timestamp() {
        assert_eq!(
            format_datetime("2024-01-01T10:00:00"),
            "January 01, 2024 10:00 AM"
        );
    }

    #[test]
    fn test_malformed_input_passes_through() {
        assert_eq!(format_datetime("tomorrow-ish"), "tomorrow-ish");
        assert_eq!(format_datetime(""), "");
    }
}
