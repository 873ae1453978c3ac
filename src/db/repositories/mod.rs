use chrono::{DateTime, Utc};

pub mod location;
pub mod resources;

/// Stored timestamps are RFC3339 text. A row with an unparseable timestamp is
/// treated as infinitely old so the next lookup refreshes it.
pub(crate) fn parse_created_at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
