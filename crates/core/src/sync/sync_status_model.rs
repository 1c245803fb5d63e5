//! Per-record sync state shared by locally cached entities.

use serde::{Deserialize, Serialize};

/// Sync flag carried by every locally cached record.
///
/// `PendingPush` marks a local change not yet confirmed by the remote store.
/// The flag is the durable push queue: the outbox reconstructs its work from
/// `query_unsynced` alone, so records flip to `Synced` only after a covering
/// remote call has succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Synced,
    #[default]
    PendingPush,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "SYNCED",
            SyncStatus::PendingPush => "PENDING_PUSH",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SyncStatus::PendingPush)
    }
}

impl From<&str> for SyncStatus {
    /// Unknown discriminants fall back to `PendingPush`: re-pushing a record
    /// is recoverable, silently treating it as synced is not.
    fn from(value: &str) -> Self {
        match value {
            "SYNCED" => SyncStatus::Synced,
            _ => SyncStatus::PendingPush,
        }
    }
}
