//! Brings the local store and the remote store into agreement for one owner.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use crate::errors::Result;
use crate::goals::{Goal, GoalRepositoryTrait};
use crate::remote::{RemoteError, RemoteGateway};
use crate::settings::SettingsServiceTrait;
use crate::sync::merge::merge_goals;
use crate::sync::outbox::OutboxHandle;

/// Result of one reconcile pass.
///
/// `remote_error` is set when the remote could not be read; the goals are
/// then the latest local state rather than a fresh merge. Callers decide
/// what, if anything, to surface: the intended policy is nothing, since the
/// pass retries later.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub goals: Vec<Goal>,
    pub remote_error: Option<RemoteError>,
}

impl ReconcileOutcome {
    /// True when the goals come from a completed merge against the remote.
    pub fn is_merged(&self) -> bool {
        self.remote_error.is_none()
    }
}

pub struct Reconciler {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    gateway: RemoteGateway,
    settings_service: Arc<dyn SettingsServiceTrait>,
    outbox: OutboxHandle,
}

impl Reconciler {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        gateway: RemoteGateway,
        settings_service: Arc<dyn SettingsServiceTrait>,
        outbox: OutboxHandle,
    ) -> Self {
        Reconciler {
            goal_repository,
            gateway,
            settings_service,
            outbox,
        }
    }

    /// Merges remote and local goals for `owner_id`, commits the merged set
    /// locally and nudges the outbox to push whatever is still pending.
    ///
    /// A failed remote read degrades to the current local state with no
    /// error surfaced through `Result`: reconciliation is silent and
    /// retryable, never fatal. Local storage failures do abort the pass.
    pub async fn reconcile(&self, owner_id: &str) -> Result<ReconcileOutcome> {
        let remote_goals = match self.gateway.fetch_goals(owner_id).await {
            Ok(goals) => goals,
            Err(e) => {
                warn!("Remote fetch failed during reconcile, serving local state: {e}");
                let goals = self.goal_repository.query_by_owner(owner_id)?;
                return Ok(ReconcileOutcome {
                    goals,
                    remote_error: Some(e),
                });
            }
        };
        let local_goals = self.goal_repository.query_by_owner(owner_id)?;

        let merged = merge_goals(local_goals, remote_goals);
        self.goal_repository.upsert_all(merged.clone()).await?;
        debug!("Reconciled {} goals for owner {owner_id}", merged.len());

        if let Some(first) = merged.first() {
            self.settings_service
                .set_preferred_currency(&first.currency_code)
                .await?;
        }
        self.settings_service
            .set_last_sync_time(Utc::now().timestamp_millis())
            .await?;

        self.outbox.nudge();
        Ok(ReconcileOutcome {
            goals: merged,
            remote_error: None,
        })
    }
}
