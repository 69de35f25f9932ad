//! # Date normalisation
//!
//! The API is inconsistent about date shapes: some fields come back as plain
//! `YYYY-MM-DD`, others as full timestamps such as
//! `2022-10-27 13:45:35.000000 +00:00`, while date inputs in forms hold
//! `YYYY-MM-DD`. [`normalize_date`] reduces all of them to the calendar day so that
//! working copies can be compared with server copies.

use chrono::NaiveDate;

const ISO_DAY: &str = "%Y-%m-%d";
const FRENCH_DAY: &str = "%d/%m/%Y";

/// Reduce a date or timestamp string to `YYYY-MM-DD`.
///
/// Returns `None` for empty or unparsable input.
pub fn normalize_date(raw: &str) -> Option<String> {
    parse_day(raw).map(|day| day.format(ISO_DAY).to_string())
}

/// Same as [`normalize_date`] for optional values.
pub fn normalize_opt(raw: Option<&str>) -> Option<String> {
    raw.and_then(normalize_date)
}

/// Format a date or timestamp as `DD/MM/YYYY` for display.
pub fn display_date(raw: &str) -> Option<String> {
    parse_day(raw).map(|day| day.format(FRENCH_DAY).to_string())
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(day) = raw
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, ISO_DAY).ok())
    {
        return Some(day);
    }
    NaiveDate::parse_from_str(raw, FRENCH_DAY).ok()
}
