use crate::deposits::deposits_model::{Deposit, DepositOutcome};
use crate::errors::Result;
use crate::goals::Goal;
use crate::observe::Subscription;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for deposit repository operations
#[async_trait]
pub trait DepositRepositoryTrait: Send + Sync {
    fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Deposit>>;
    fn query_by_goal(&self, goal_id: &str) -> Result<Vec<Deposit>>;
    fn query_unsynced(&self) -> Result<Vec<Deposit>>;
    fn observe_by_owner(&self, owner_id: &str) -> Result<Subscription<Deposit>>;

    /// Stores the deposit and the goal it advances as one atomic unit: a
    /// concurrent reader sees either neither write or both, never one.
    async fn apply_deposit(&self, deposit: Deposit, updated_goal: Goal) -> Result<Deposit>;

    async fn mark_synced(&self, deposit_ids: &[String]) -> Result<()>;
    async fn delete_all_for_owner(&self, owner_id: &str) -> Result<usize>;
}

/// Trait for deposit service operations
#[async_trait]
pub trait DepositServiceTrait: Send + Sync {
    fn get_deposits(&self, goal_id: &str) -> Result<Vec<Deposit>>;
    fn observe_deposits(&self, owner_id: &str) -> Result<Subscription<Deposit>>;
    async fn add_deposit(
        &self,
        goal_id: &str,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<DepositOutcome>;
}
