//! Offline-first synchronization: per-record sync flags, the merge policy,
//! the reconciler and the push outbox.

mod merge;
mod outbox;
mod reconciler;
mod sync_status_model;

pub use outbox::{spawn_outbox_worker, DrainReport, Outbox, OutboxHandle, OutboxWorkerConfig};
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use sync_status_model::SyncStatus;
