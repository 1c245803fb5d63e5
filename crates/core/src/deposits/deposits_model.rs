//! Deposits domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goals::Goal;
use crate::sync::SyncStatus;

/// An immutable contribution event against a goal.
///
/// After creation only `sync_status` ever changes. Deposits are never deleted
/// individually, only bulk-purged at logout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: String,
    pub goal_id: String,
    pub owner_id: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sync_status: SyncStatus,
}

/// Result of applying a deposit: the new record, the goal it moved, and any
/// milestone threshold the move crossed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositOutcome {
    pub deposit: Deposit,
    pub goal: Goal,
    pub milestone: Option<u32>,
}

/// Generates a fresh client-side deposit id.
pub fn new_deposit_id() -> String {
    Uuid::new_v4().to_string()
}
