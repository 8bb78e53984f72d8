use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

/// Layout of textual query bounds, e.g. `2021-10-11 00:00:00`
pub const QUERY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a query bound as wall-clock time in `zone`
pub fn parse_query_time(text: &str, zone: &FixedOffset) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), QUERY_TIME_FORMAT)
        .with_context(|| format!("Invalid time '{}', expected YYYY-MM-DD HH:MM:SS", text))?;

    zone.from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .with_context(|| format!("Time '{}' does not exist in zone {}", text, zone))
}

/// Parse a fixed UTC offset written as `+HH:MM`, `-HHMM`, `Z` or `UTC`
pub fn parse_utc_offset(text: &str) -> Result<FixedOffset> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    text.parse::<FixedOffset>()
        .with_context(|| format!("Invalid UTC offset '{}', expected +HH:MM", text))
}
