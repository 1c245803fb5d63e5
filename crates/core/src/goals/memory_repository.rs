//! In-memory goal repository for tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::{DatabaseError, Result};
use crate::goals::goals_model::Goal;
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::observe::{Subscription, WatchRegistry};
use crate::sync::SyncStatus;

#[derive(Default)]
pub struct InMemoryGoalRepository {
    goals: Mutex<HashMap<String, Goal>>,
    registry: WatchRegistry<Goal>,
}

impl InMemoryGoalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_by_owner(&self, owner_id: &str) -> Vec<Goal> {
        let goals = self.goals.lock().unwrap();
        let mut owned: Vec<Goal> = goals
            .values()
            .filter(|g| g.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        owned
    }

    fn emit_for(&self, owner_id: &str) {
        self.registry.emit(owner_id, self.sorted_by_owner(owner_id));
    }
}

#[async_trait]
impl GoalRepositoryTrait for InMemoryGoalRepository {
    fn get_by_id(&self, goal_id: &str) -> Result<Goal> {
        self.goals
            .lock()
            .unwrap()
            .get(goal_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("Goal with id {goal_id} not found")).into())
    }

    fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Goal>> {
        Ok(self.sorted_by_owner(owner_id))
    }

    fn query_unsynced(&self) -> Result<Vec<Goal>> {
        let goals = self.goals.lock().unwrap();
        let mut pending: Vec<Goal> = goals
            .values()
            .filter(|g| g.sync_status.is_pending())
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(pending)
    }

    fn observe_by_owner(&self, owner_id: &str) -> Result<Subscription<Goal>> {
        Ok(self.registry.subscribe(owner_id, self.sorted_by_owner(owner_id)))
    }

    async fn upsert(&self, goal: Goal) -> Result<Goal> {
        let owner_id = goal.owner_id.clone();
        self.goals
            .lock()
            .unwrap()
            .insert(goal.id.clone(), goal.clone());
        self.emit_for(&owner_id);
        Ok(goal)
    }

    async fn upsert_all(&self, goals: Vec<Goal>) -> Result<usize> {
        let count = goals.len();
        let mut owners = BTreeSet::new();
        {
            let mut stored = self.goals.lock().unwrap();
            for goal in goals {
                owners.insert(goal.owner_id.clone());
                stored.insert(goal.id.clone(), goal);
            }
        }
        for owner_id in owners {
            self.emit_for(&owner_id);
        }
        Ok(count)
    }

    async fn mark_synced(&self, goal_id: &str) -> Result<()> {
        let owner_id = {
            let mut goals = self.goals.lock().unwrap();
            let goal = goals.get_mut(goal_id).ok_or_else(|| {
                DatabaseError::NotFound(format!("Goal with id {goal_id} not found"))
            })?;
            goal.sync_status = SyncStatus::Synced;
            goal.owner_id.clone()
        };
        self.emit_for(&owner_id);
        Ok(())
    }

    async fn mark_synced_if_unchanged(
        &self,
        goal_id: &str,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let marked_owner = {
            let mut goals = self.goals.lock().unwrap();
            match goals.get_mut(goal_id) {
                Some(goal) if goal.updated_at == expected_updated_at => {
                    goal.sync_status = SyncStatus::Synced;
                    Some(goal.owner_id.clone())
                }
                _ => None,
            }
        };
        match marked_owner {
            Some(owner_id) => {
                self.emit_for(&owner_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_for_owner(&self, owner_id: &str) -> Result<usize> {
        let removed = {
            let mut goals = self.goals.lock().unwrap();
            let before = goals.len();
            goals.retain(|_, g| g.owner_id != owner_id);
            before - goals.len()
        };
        self.emit_for(owner_id);
        Ok(removed)
    }
}
