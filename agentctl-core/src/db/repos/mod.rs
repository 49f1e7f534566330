//! Repository functions over the entity tables.
//!
//! One module per entity. All functions take an explicit
//! `&mut AnyConnection` (a pooled connection for single operations, or a
//! transaction, which derefs to the same type, when several writes must
//! commit together) and return plain records. Related rows are never
//! fetched implicitly; callers ask for them by id.

pub mod agent_logs;
pub mod agents;
pub mod companies;
pub mod departments;
pub mod executions;
pub mod holdings;
pub mod tasks;
pub mod users;

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamps are stored as fixed-width RFC 3339 UTC text (microsecond
/// precision) so lexicographic order equals chronological order on every
/// backend.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(raw: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_text_round_trips() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(parse_ts(&format_ts(ts)).unwrap(), ts);
    }

    #[test]
    fn timestamp_text_is_fixed_width() {
        let a = format_ts(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let b = format_ts(Utc::now());
        assert_eq!(a.len(), b.len());
    }
}
