//! Mapping between domain models and remote documents.
//!
//! Reads are deliberately tolerant: remote documents are written by several
//! app versions across devices, so absent or malformed fields degrade to
//! defaults (strings to "", numbers to 0, timestamps to now) instead of
//! failing a whole fetch. A document without an id cannot be merged and is
//! the one case treated as unparseable.

use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;

use crate::deposits::Deposit;
use crate::goals::Goal;
use crate::sync::SyncStatus;

use super::Document;

pub const FIELD_ID: &str = "id";
pub const FIELD_OWNER_ID: &str = "ownerId";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_TARGET_AMOUNT: &str = "targetAmount";
pub const FIELD_CURRENT_AMOUNT: &str = "currentAmount";
pub const FIELD_CURRENCY_CODE: &str = "currencyCode";
pub const FIELD_CREATED_AT: &str = "createdAt";
pub const FIELD_UPDATED_AT: &str = "updatedAt";
pub const FIELD_GOAL_ID: &str = "goalId";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_NOTE: &str = "note";

/// Full goal document as stored remotely. Sync flags never leave the device.
pub fn goal_to_document(goal: &Goal) -> Document {
    let mut doc = Document::new();
    doc.insert(FIELD_ID.into(), Value::String(goal.id.clone()));
    doc.insert(FIELD_OWNER_ID.into(), Value::String(goal.owner_id.clone()));
    doc.insert(FIELD_TITLE.into(), Value::String(goal.title.clone()));
    doc.insert(FIELD_TARGET_AMOUNT.into(), decimal_value(goal.target_amount));
    doc.insert(
        FIELD_CURRENT_AMOUNT.into(),
        decimal_value(goal.current_amount),
    );
    doc.insert(
        FIELD_CURRENCY_CODE.into(),
        Value::String(goal.currency_code.clone()),
    );
    doc.insert(FIELD_CREATED_AT.into(), timestamp_value(goal.created_at));
    doc.insert(FIELD_UPDATED_AT.into(), timestamp_value(goal.updated_at));
    doc
}

/// Partial fields for pushing a local title change alongside an amount delta.
pub fn goal_touch_fields(goal: &Goal) -> Document {
    let mut fields = Document::new();
    fields.insert(FIELD_TITLE.into(), Value::String(goal.title.clone()));
    fields.insert(FIELD_UPDATED_AT.into(), timestamp_value(goal.updated_at));
    fields
}

/// Partial fields for pushing a currency conversion. A conversion rebases
/// both amounts multiplicatively, so these are absolute values.
pub fn goal_currency_fields(goal: &Goal) -> Document {
    let mut fields = Document::new();
    fields.insert(
        FIELD_CURRENCY_CODE.into(),
        Value::String(goal.currency_code.clone()),
    );
    fields.insert(
        FIELD_CURRENT_AMOUNT.into(),
        decimal_value(goal.current_amount),
    );
    fields.insert(FIELD_TARGET_AMOUNT.into(), decimal_value(goal.target_amount));
    fields.insert(FIELD_TITLE.into(), Value::String(goal.title.clone()));
    fields.insert(FIELD_UPDATED_AT.into(), timestamp_value(goal.updated_at));
    fields
}

/// Lenient goal parse. `None` only when the document has no usable id.
pub fn goal_from_document(doc: &Document) -> Option<Goal> {
    let id = read_string(doc, FIELD_ID);
    if id.is_empty() {
        warn!("Skipping remote goal document without id");
        return None;
    }
    Some(Goal {
        id,
        owner_id: read_string(doc, FIELD_OWNER_ID),
        title: read_string(doc, FIELD_TITLE),
        target_amount: read_decimal(doc, FIELD_TARGET_AMOUNT),
        current_amount: read_decimal(doc, FIELD_CURRENT_AMOUNT),
        currency_code: read_string(doc, FIELD_CURRENCY_CODE),
        created_at: read_timestamp(doc, FIELD_CREATED_AT),
        updated_at: read_timestamp(doc, FIELD_UPDATED_AT),
        // Anything read back from the remote store is by definition synced.
        sync_status: SyncStatus::Synced,
    })
}

/// Full deposit document as stored remotely.
pub fn deposit_to_document(deposit: &Deposit) -> Document {
    let mut doc = Document::new();
    doc.insert(FIELD_ID.into(), Value::String(deposit.id.clone()));
    doc.insert(FIELD_GOAL_ID.into(), Value::String(deposit.goal_id.clone()));
    doc.insert(
        FIELD_OWNER_ID.into(),
        Value::String(deposit.owner_id.clone()),
    );
    doc.insert(FIELD_AMOUNT.into(), decimal_value(deposit.amount));
    doc.insert(
        FIELD_NOTE.into(),
        Value::String(deposit.note.clone().unwrap_or_default()),
    );
    doc.insert(FIELD_CREATED_AT.into(), timestamp_value(deposit.created_at));
    doc
}

// ==================== Tolerant field readers ====================

fn read_string(doc: &Document, field: &str) -> String {
    match doc.get(field) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn read_decimal(doc: &Document, field: &str) -> Decimal {
    match doc.get(field) {
        Some(Value::Number(n)) => decimal_from_number(n).unwrap_or_else(|| {
            warn!("Malformed numeric field '{field}', defaulting to 0");
            Decimal::ZERO
        }),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).unwrap_or_else(|_| {
            warn!("Malformed numeric field '{field}', defaulting to 0");
            Decimal::ZERO
        }),
        _ => Decimal::ZERO,
    }
}

fn read_timestamp(doc: &Document, field: &str) -> DateTime<Utc> {
    match doc.get(field) {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| {
                warn!("Malformed timestamp field '{field}', defaulting to now");
                Utc::now()
            }),
        // Some writers stored epoch milliseconds.
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .unwrap_or_else(Utc::now),
        _ => Utc::now(),
    }
}

fn decimal_from_number(n: &Number) -> Option<Decimal> {
    // Going through the literal text preserves precision for integers and
    // short fractions; fall back to f64 for exotic encodings.
    Decimal::from_str(&n.to_string())
        .ok()
        .or_else(|| n.as_f64().and_then(Decimal::from_f64_retain))
}

fn decimal_value(d: Decimal) -> Value {
    Number::from_f64(d.to_f64().unwrap_or_default())
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn timestamp_value(ts: DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339())
}
