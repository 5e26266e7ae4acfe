//! Date helper functions
//!
//! Post dates are display strings. They are parsed only for machine-readable
//! output (`<time datetime>`, Atom timestamps), never for ordering.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Formats accepted for post dates, tried in order
const DISPLAY_FORMATS: [&str; 4] = ["%d-%m-%Y", "%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];

/// Parse a free-form post date
///
/// # Examples
/// ```ignore
/// parse_display_date("03-02-2025") // -> Some(2025-02-03)
/// ```
pub fn parse_display_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    DISPLAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
}

/// ISO 8601 date for a `<time datetime>` attribute
pub fn date_iso(date: &str) -> Option<String> {
    parse_display_date(date).map(|d| d.format("%Y-%m-%d").to_string())
}

/// RFC 3339 timestamp at midnight UTC, for Atom entries
pub fn date_xml(date: &NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt).to_rfc3339())
        .unwrap_or_default()
}

/// "Last updated" stamp like `Oct 16, 2026`
pub fn short_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%b %-d, %Y").to_string()
}

/// Today's short date in the configured IANA timezone (local time when empty or unknown)
pub fn today(timezone: &str) -> String {
    match timezone.parse::<chrono_tz::Tz>() {
        Ok(tz) => short_date(&Utc::now().with_timezone(&tz)),
        Err(_) => {
            if !timezone.is_empty() {
                tracing::warn!("Unknown timezone {:?}, using local time", timezone);
            }
            short_date(&chrono::Local::now())
        }
    }
}

/// Current year in the configured timezone
pub fn current_year(timezone: &str) -> String {
    match timezone.parse::<chrono_tz::Tz>() {
        Ok(tz) => Utc::now().with_timezone(&tz).format("%Y").to_string(),
        Err(_) => chrono::Local::now().format("%Y").to_string(),
    }
}
