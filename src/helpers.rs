// 🧰 Helpers - date/time conversion and field coercion
//
// Source data is messy: empty strings, missing columns, odd date formats.
// Everything here turns a raw textual value into a typed value or a sentinel.
// Nothing here returns an error.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Calendar date format used by the close-approach data ("2020-Jan-01 12:30")
pub const CAD_DATETIME_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Output format: minute precision, no seconds, no timezone suffix
pub const OUTPUT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Fallback text for approaches whose time is unknown
pub const UNKNOWN_TIME: &str = "unknown time";

// ============================================================================
// DATE / TIME
// ============================================================================

/// Convert a calendar date from the CAD data into a UTC datetime.
///
/// The month is an English abbreviation ("Jan", "Feb", ...) that has to be
/// translated into a real calendar month. Returns `None` when the value is
/// empty or doesn't parse.
///
/// # Examples:
/// ```
/// use neo_explorer::helpers::cd_to_datetime;
/// let time = cd_to_datetime("1900-Jan-01 00:11").unwrap();
/// assert_eq!(time.to_string(), "1900-01-01 00:11:00 UTC");
/// ```
pub fn cd_to_datetime(calendar_date: &str) -> Option<DateTime<Utc>> {
    let trimmed = calendar_date.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(trimmed, CAD_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, OUTPUT_DATETIME_FORMAT))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format an approach time with minute precision.
///
/// Unknown times render as [`UNKNOWN_TIME`].
pub fn datetime_to_str(time: Option<&DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.format(OUTPUT_DATETIME_FORMAT).to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

// ============================================================================
// FIELD COERCION
// ============================================================================

/// Empty or whitespace-only text becomes `None`
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a float, falling back to `default` when missing or malformed
pub fn parse_f64_or(value: Option<&str>, default: f64) -> f64 {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

/// The hazard flag is affirmative only for the exact marker "Y".
/// No trimming here: the CSV reader already strips surrounding whitespace.
pub fn parse_hazard_flag(value: Option<&str>) -> bool {
    value == Some("Y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_cd_to_datetime_translates_month() {
        let time = cd_to_datetime("2020-Dec-31 23:59").unwrap();

        assert_eq!(time.year(), 2020);
        assert_eq!(time.month(), 12);
        assert_eq!(time.day(), 31);
        assert_eq!(time.hour(), 23);
        assert_eq!(time.minute(), 59);
        assert_eq!(time.second(), 0);
    }

    #[test]
    fn test_cd_to_datetime_rejects_garbage() {
        assert!(cd_to_datetime("").is_none());
        assert!(cd_to_datetime("   ").is_none());
        assert!(cd_to_datetime("not a date").is_none());
        assert!(cd_to_datetime("2020-Foo-01 00:00").is_none());
    }

    #[test]
    fn test_cd_to_datetime_accepts_output_format() {
        let time = cd_to_datetime("2020-01-01 12:30").unwrap();
        assert_eq!(datetime_to_str(Some(&time)), "2020-01-01 12:30");
    }

    #[test]
    fn test_datetime_to_str() {
        let time = cd_to_datetime("1900-Jan-01 00:11").unwrap();

        assert_eq!(datetime_to_str(Some(&time)), "1900-01-01 00:11");
        assert_eq!(datetime_to_str(None), UNKNOWN_TIME);
    }

    #[test]
    fn test_field_coercion() {
        assert_eq!(non_empty(Some("  Eros ")), Some("Eros".to_string()));
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);

        assert_eq!(parse_f64_or(Some("1.5"), 0.0), 1.5);
        assert_eq!(parse_f64_or(Some("abc"), 0.0), 0.0);
        assert_eq!(parse_f64_or(None, 0.0), 0.0);
        assert!(parse_f64_or(Some(""), f64::NAN).is_nan());

        assert!(parse_hazard_flag(Some("Y")));
        assert!(!parse_hazard_flag(Some("N")));
        assert!(!parse_hazard_flag(Some("y")));
        assert!(!parse_hazard_flag(Some(" Y")));
        assert!(!parse_hazard_flag(Some("Y ")));
        assert!(!parse_hazard_flag(Some("YES")));
        assert!(!parse_hazard_flag(Some("")));
        assert!(!parse_hazard_flag(None));
    }
}
