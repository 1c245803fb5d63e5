//! Durable push queue and its background drain worker.
//!
//! There is no separate queue table: the `PendingPush` flag on goals and
//! deposits is the queue, and a drain pass reconstructs its work from
//! `query_unsynced` alone. Mutations signal the worker through a small
//! coalescing channel; the worker drains, and anything that fails stays
//! pending and is retried with exponential backoff until connectivity
//! returns.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::deposits::{Deposit, DepositRepositoryTrait};
use crate::errors::Result;
use crate::goals::{Goal, GoalRepositoryTrait};
use crate::remote::{RemoteGateway, RemoteResult};

/// Summary of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub goals_pushed: usize,
    pub deposits_pushed: usize,
    pub failures: usize,
}

impl DrainReport {
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

pub struct Outbox {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    deposit_repository: Arc<dyn DepositRepositoryTrait>,
    gateway: RemoteGateway,
}

impl Outbox {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        deposit_repository: Arc<dyn DepositRepositoryTrait>,
        gateway: RemoteGateway,
    ) -> Self {
        Outbox {
            goal_repository,
            deposit_repository,
            gateway,
        }
    }

    /// One pass over every pending record.
    ///
    /// Remote failures are counted and left pending for the next pass; only
    /// local storage errors abort the drain. Records flip to `Synced` strictly
    /// after the covering remote call succeeded, so a cancelled or crashed
    /// pass leaves the queue intact.
    pub async fn drain_once(&self) -> Result<DrainReport> {
        let mut report = DrainReport::default();
        let pending_goals = self.goal_repository.query_unsynced()?;
        let mut pending_deposits = group_by_goal(self.deposit_repository.query_unsynced()?);
        if !pending_goals.is_empty() || !pending_deposits.is_empty() {
            debug!(
                "Draining outbox: {} pending goals, {} goals with pending deposits",
                pending_goals.len(),
                pending_deposits.len()
            );
        }

        for goal in pending_goals {
            let deposits = pending_deposits.remove(&goal.id).unwrap_or_default();
            match self.push_goal(&goal, &deposits).await {
                Ok(()) => {
                    // Goal first: if marking deposits fails below, the next
                    // pass only re-uploads their documents, which is
                    // idempotent, instead of re-applying the increment.
                    let marked = self
                        .goal_repository
                        .mark_synced_if_unchanged(&goal.id, goal.updated_at)
                        .await?;
                    if !marked {
                        debug!("Goal {} changed during push, leaving it pending", goal.id);
                    }
                    report.goals_pushed += 1;
                    if !deposits.is_empty() {
                        self.deposit_repository
                            .mark_synced(&deposit_ids(&deposits))
                            .await?;
                        report.deposits_pushed += deposits.len();
                    }
                }
                Err(e) => {
                    warn!("Pushing goal {} failed: {e}", goal.id);
                    report.failures += 1;
                }
            }
        }

        // Deposits whose goal is already settled remotely: the goal's
        // synced flag guarantees their amounts are reflected in the remote
        // total, so only the documents themselves need uploading.
        for (goal_id, deposits) in pending_deposits {
            match self.gateway.push_deposits(&deposits).await {
                Ok(()) => {
                    self.deposit_repository
                        .mark_synced(&deposit_ids(&deposits))
                        .await?;
                    report.deposits_pushed += deposits.len();
                }
                Err(e) => {
                    warn!("Pushing deposits for goal {goal_id} failed: {e}");
                    report.failures += 1;
                }
            }
        }
        Ok(report)
    }

    /// Picks the push shape for one goal from the remote's current view of it.
    async fn push_goal(&self, goal: &Goal, deposits: &[Deposit]) -> RemoteResult<()> {
        match self.gateway.fetch_goal(&goal.id).await? {
            None => self.gateway.push_new_goal(goal, deposits).await,
            Some(remote_goal) if remote_goal.currency_code != goal.currency_code => {
                self.gateway.push_currency_rebase(goal, deposits).await
            }
            Some(_) => {
                let delta: Decimal = deposits.iter().map(|d| d.amount).sum();
                self.gateway.push_goal_delta(goal, delta, deposits).await
            }
        }
    }
}

fn group_by_goal(deposits: Vec<Deposit>) -> BTreeMap<String, Vec<Deposit>> {
    let mut grouped: BTreeMap<String, Vec<Deposit>> = BTreeMap::new();
    for deposit in deposits {
        grouped.entry(deposit.goal_id.clone()).or_default().push(deposit);
    }
    grouped
}

fn deposit_ids(deposits: &[Deposit]) -> Vec<String> {
    deposits.iter().map(|d| d.id.clone()).collect()
}

/// Handle for signalling the outbox worker that new pending work exists.
#[derive(Clone)]
pub struct OutboxHandle {
    tx: mpsc::Sender<()>,
}

impl OutboxHandle {
    /// Wakes the worker. Signals coalesce: nudging an already-signalled
    /// worker is a no-op, and nudging without a worker attached is harmless.
    pub fn nudge(&self) {
        let _ = self.tx.try_send(());
    }

    /// A handle with no worker behind it, for contexts that never push.
    pub fn detached() -> Self {
        let (tx, _rx) = mpsc::channel(1);
        OutboxHandle { tx }
    }
}

/// Retry pacing for the outbox worker.
#[derive(Debug, Clone)]
pub struct OutboxWorkerConfig {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for OutboxWorkerConfig {
    fn default() -> Self {
        OutboxWorkerConfig {
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(300),
        }
    }
}

/// Spawns the background task that drains the outbox whenever it is nudged,
/// retrying with exponential backoff while pushes keep failing.
///
/// The task terminates once every [`OutboxHandle`] clone has been dropped.
pub fn spawn_outbox_worker(outbox: Arc<Outbox>, config: OutboxWorkerConfig) -> OutboxHandle {
    let (tx, mut rx) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        let mut backoff = config.initial_backoff;
        let mut retry_pending = false;
        loop {
            if retry_pending {
                // Wait out the backoff, but let a fresh nudge cut it short.
                tokio::select! {
                    received = rx.recv() => {
                        if received.is_none() {
                            break;
                        }
                    }
                    _ = tokio::time::sleep(backoff) => {}
                }
            } else if rx.recv().await.is_none() {
                // All handles dropped, the worker can terminate.
                break;
            }

            match outbox.drain_once().await {
                Ok(report) if report.is_clean() => {
                    backoff = config.initial_backoff;
                    retry_pending = false;
                }
                Ok(report) => {
                    warn!(
                        "Outbox drain left {} failed pushes, retrying in {:?}",
                        report.failures, backoff
                    );
                    retry_pending = true;
                    backoff = (backoff * 2).min(config.max_backoff);
                }
                Err(e) => {
                    error!("Outbox drain hit a storage error: {e}");
                    retry_pending = true;
                    backoff = (backoff * 2).min(config.max_backoff);
                }
            }
        }
        debug!("Outbox worker stopped");
    });

    OutboxHandle { tx }
}
