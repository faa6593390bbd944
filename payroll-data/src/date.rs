use chrono::{DateTime, NaiveDate};

/// Parses `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is used.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
