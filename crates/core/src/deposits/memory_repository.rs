//! In-memory deposit repository for tests.
//!
//! Shares the goal map with an [`InMemoryGoalRepository`] so the compound
//! deposit write lands in both stores through one call, mirroring how the
//! durable implementation commits both rows in a single transaction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::deposits::deposits_model::Deposit;
use crate::deposits::deposits_traits::DepositRepositoryTrait;
use crate::errors::{DatabaseError, Result};
use crate::goals::{Goal, GoalRepositoryTrait, InMemoryGoalRepository};
use crate::observe::{Subscription, WatchRegistry};
use crate::sync::SyncStatus;

pub struct InMemoryDepositRepository {
    deposits: Mutex<HashMap<String, Deposit>>,
    registry: WatchRegistry<Deposit>,
    goal_repository: Arc<InMemoryGoalRepository>,
}

impl InMemoryDepositRepository {
    pub fn new(goal_repository: Arc<InMemoryGoalRepository>) -> Self {
        InMemoryDepositRepository {
            deposits: Mutex::new(HashMap::new()),
            registry: WatchRegistry::new(),
            goal_repository,
        }
    }

    fn sorted<F>(&self, keep: F) -> Vec<Deposit>
    where
        F: Fn(&Deposit) -> bool,
    {
        let deposits = self.deposits.lock().unwrap();
        let mut matched: Vec<Deposit> = deposits.values().filter(|d| keep(d)).cloned().collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        matched
    }

    fn emit_for(&self, owner_id: &str) {
        self.registry
            .emit(owner_id, self.sorted(|d| d.owner_id == owner_id));
    }
}

#[async_trait]
impl DepositRepositoryTrait for InMemoryDepositRepository {
    fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Deposit>> {
        Ok(self.sorted(|d| d.owner_id == owner_id))
    }

    fn query_by_goal(&self, goal_id: &str) -> Result<Vec<Deposit>> {
        Ok(self.sorted(|d| d.goal_id == goal_id))
    }

    fn query_unsynced(&self) -> Result<Vec<Deposit>> {
        Ok(self.sorted(|d| d.sync_status.is_pending()))
    }

    fn observe_by_owner(&self, owner_id: &str) -> Result<Subscription<Deposit>> {
        Ok(self
            .registry
            .subscribe(owner_id, self.sorted(|d| d.owner_id == owner_id)))
    }

    async fn apply_deposit(&self, deposit: Deposit, updated_goal: Goal) -> Result<Deposit> {
        let owner_id = deposit.owner_id.clone();
        self.deposits
            .lock()
            .unwrap()
            .insert(deposit.id.clone(), deposit.clone());
        self.goal_repository.upsert(updated_goal).await?;
        self.emit_for(&owner_id);
        Ok(deposit)
    }

    async fn mark_synced(&self, deposit_ids: &[String]) -> Result<()> {
        let mut owners = Vec::new();
        {
            let mut deposits = self.deposits.lock().unwrap();
            for deposit_id in deposit_ids {
                let deposit = deposits.get_mut(deposit_id).ok_or_else(|| {
                    DatabaseError::NotFound(format!("Deposit with id {deposit_id} not found"))
                })?;
                deposit.sync_status = SyncStatus::Synced;
                if !owners.contains(&deposit.owner_id) {
                    owners.push(deposit.owner_id.clone());
                }
            }
        }
        for owner_id in owners {
            self.emit_for(&owner_id);
        }
        Ok(())
    }

    async fn delete_all_for_owner(&self, owner_id: &str) -> Result<usize> {
        let removed = {
            let mut deposits = self.deposits.lock().unwrap();
            let before = deposits.len();
            deposits.retain(|_, d| d.owner_id != owner_id);
            before - deposits.len()
        };
        self.emit_for(owner_id);
        Ok(removed)
    }
}
