use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::constants::MAX_DEPOSIT_AMOUNT;
use crate::deposits::deposits_model::{new_deposit_id, Deposit, DepositOutcome};
use crate::deposits::deposits_traits::{DepositRepositoryTrait, DepositServiceTrait};
use crate::errors::{Result, ValidationError};
use crate::goals::GoalRepositoryTrait;
use crate::milestones::crossed_milestone;
use crate::notifications::{Notification, Notifier};
use crate::observe::Subscription;
use crate::sync::{OutboxHandle, SyncStatus};

pub struct DepositService {
    deposit_repository: Arc<dyn DepositRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    notifier: Arc<dyn Notifier>,
    outbox: OutboxHandle,
}

impl DepositService {
    pub fn new(
        deposit_repository: Arc<dyn DepositRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        notifier: Arc<dyn Notifier>,
        outbox: OutboxHandle,
    ) -> Self {
        DepositService {
            deposit_repository,
            goal_repository,
            notifier,
            outbox,
        }
    }
}

#[async_trait]
impl DepositServiceTrait for DepositService {
    fn get_deposits(&self, goal_id: &str) -> Result<Vec<Deposit>> {
        self.deposit_repository.query_by_goal(goal_id)
    }

    fn observe_deposits(&self, owner_id: &str) -> Result<Subscription<Deposit>> {
        self.deposit_repository.observe_by_owner(owner_id)
    }

    async fn add_deposit(
        &self,
        goal_id: &str,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<DepositOutcome> {
        validate_amount(amount)?;
        let goal = self.goal_repository.get_by_id(goal_id)?;
        let previous_amount = goal.current_amount;

        let now = Utc::now();
        let deposit = Deposit {
            id: new_deposit_id(),
            goal_id: goal.id.clone(),
            owner_id: goal.owner_id.clone(),
            amount,
            note: note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_at: now,
            sync_status: SyncStatus::PendingPush,
        };
        let mut updated_goal = goal;
        updated_goal.current_amount += amount;
        updated_goal.updated_at = now;
        updated_goal.sync_status = SyncStatus::PendingPush;

        let deposit = self
            .deposit_repository
            .apply_deposit(deposit, updated_goal.clone())
            .await?;

        // The milestone signal fires from the committed local state, before
        // any remote push is attempted.
        let milestone = crossed_milestone(
            updated_goal.target_amount,
            previous_amount,
            updated_goal.current_amount,
        );
        if let Some(percentage) = milestone {
            self.notifier.notify(Notification::milestone_reached(
                &updated_goal.title,
                percentage,
                updated_goal.current_amount,
                updated_goal.target_amount,
                &updated_goal.currency_code,
            ));
        }

        self.outbox.nudge();
        Ok(DepositOutcome {
            deposit,
            goal: updated_goal,
            milestone,
        })
    }
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(
            ValidationError::InvalidInput("Deposit amount must be positive".to_string()).into(),
        );
    }
    if amount > MAX_DEPOSIT_AMOUNT {
        return Err(ValidationError::InvalidInput(format!(
            "Deposit amount cannot exceed {MAX_DEPOSIT_AMOUNT}"
        ))
        .into());
    }
    Ok(())
}
