use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::goals::goals_model::{Goal, NewGoal};
use crate::observe::Subscription;
use async_trait::async_trait;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_by_id(&self, goal_id: &str) -> Result<Goal>;
    fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Goal>>;
    fn query_unsynced(&self) -> Result<Vec<Goal>>;
    fn observe_by_owner(&self, owner_id: &str) -> Result<Subscription<Goal>>;
    async fn upsert(&self, goal: Goal) -> Result<Goal>;
    async fn upsert_all(&self, goals: Vec<Goal>) -> Result<usize>;
    async fn mark_synced(&self, goal_id: &str) -> Result<()>;

    /// Flips the goal to `Synced` only when it is still exactly the version
    /// a push read, identified by `updated_at`. Returns false when a newer
    /// local write moved the goal on in the meantime, so the pending flag
    /// stays in place and the next drain picks up the fresh change.
    async fn mark_synced_if_unchanged(
        &self,
        goal_id: &str,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    async fn delete_all_for_owner(&self, owner_id: &str) -> Result<usize>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, owner_id: &str) -> Result<Vec<Goal>>;
    fn observe_goals(&self, owner_id: &str) -> Result<Subscription<Goal>>;
    async fn create_goal(&self, owner_id: &str, new_goal: NewGoal) -> Result<Goal>;
    async fn rename_goal(&self, goal_id: &str, new_title: &str) -> Result<Goal>;
    async fn change_currency(&self, owner_id: &str, target_currency: &str) -> Result<Vec<Goal>>;
}
