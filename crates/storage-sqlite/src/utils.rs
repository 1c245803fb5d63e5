//! Shared helpers for SQLite storage operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a TEXT amount column back into a `Decimal`.
///
/// A row that fails to parse is data corruption, not a reason to fail the
/// whole query. Log it and fall back to zero.
pub(crate) fn parse_decimal_tolerant(value: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value) {
        Ok(d) => d,
        Err(e) => {
            log::error!("Failed to parse {} '{}' as Decimal: {}", field_name, value, e);
            Decimal::ZERO
        }
    }
}

/// Parses a TEXT timestamp column (RFC 3339) back into a `DateTime<Utc>`.
pub(crate) fn parse_datetime_tolerant(value: &str, field_name: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            log::error!("Failed to parse {} '{}': {}", field_name, value, e);
            Utc::now()
        })
}

/// Chunk size for `IN (...)` queries.
///
/// SQLite caps the number of bound parameters per statement (historically
/// 999). Queries that bind a caller-supplied id list go through
/// `chunk_for_sqlite` to stay under the cap with room to spare.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits a slice into chunks small enough for one `IN (...)` clause.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
