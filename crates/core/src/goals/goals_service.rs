use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;

use crate::constants::{MAX_GOAL_TARGET_AMOUNT, MIN_GOAL_TITLE_CHARS};
use crate::errors::{Error, Result, ValidationError};
use crate::fx::RateProviderTrait;
use crate::goals::goals_model::{new_goal_id, Goal, NewGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::observe::Subscription;
use crate::settings::SettingsServiceTrait;
use crate::sync::{OutboxHandle, SyncStatus};

pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
    rate_provider: Arc<dyn RateProviderTrait>,
    outbox: OutboxHandle,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
        rate_provider: Arc<dyn RateProviderTrait>,
        outbox: OutboxHandle,
    ) -> Self {
        GoalService {
            goal_repository,
            settings_service,
            rate_provider,
            outbox,
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self, owner_id: &str) -> Result<Vec<Goal>> {
        self.goal_repository.query_by_owner(owner_id)
    }

    fn observe_goals(&self, owner_id: &str) -> Result<Subscription<Goal>> {
        self.goal_repository.observe_by_owner(owner_id)
    }

    async fn create_goal(&self, owner_id: &str, new_goal: NewGoal) -> Result<Goal> {
        let title = validated_title(&new_goal.title)?;
        validate_amounts(new_goal.target_amount, new_goal.starting_amount)?;
        let currency_code = normalized_currency(&new_goal.currency_code)?;

        let now = Utc::now();
        let goal = Goal {
            id: new_goal_id(),
            owner_id: owner_id.to_string(),
            title,
            target_amount: new_goal.target_amount,
            current_amount: new_goal.starting_amount,
            currency_code,
            created_at: now,
            updated_at: now,
            sync_status: SyncStatus::PendingPush,
        };

        let created = self.goal_repository.upsert(goal).await?;
        self.outbox.nudge();
        Ok(created)
    }

    async fn rename_goal(&self, goal_id: &str, new_title: &str) -> Result<Goal> {
        let title = validated_title(new_title)?;
        let mut goal = self.goal_repository.get_by_id(goal_id)?;
        if goal.title == title {
            return Ok(goal);
        }

        goal.title = title;
        goal.updated_at = Utc::now();
        goal.sync_status = SyncStatus::PendingPush;

        let renamed = self.goal_repository.upsert(goal).await?;
        self.outbox.nudge();
        Ok(renamed)
    }

    async fn change_currency(&self, owner_id: &str, target_currency: &str) -> Result<Vec<Goal>> {
        let target = normalized_currency(target_currency)?;
        let goals = self.goal_repository.query_by_owner(owner_id)?;

        let current = match goals.first() {
            Some(goal) => goal.currency_code.clone(),
            None => {
                self.settings_service.set_preferred_currency(&target).await?;
                return Ok(goals);
            }
        };
        if current == target {
            return Ok(goals);
        }

        // The rate lookup is the all-or-nothing part: nothing is mutated
        // until a usable factor is in hand.
        let rates = self
            .rate_provider
            .fetch_unit_rates(&current, &target)
            .await?;
        let factor = rates.rate_for(&target).ok_or_else(|| {
            Error::CurrencyConversionFailed(format!("No unit rate from {current} to {target}"))
        })?;
        debug!(
            "Converting {} goals from {} to {} at rate {}",
            goals.len(),
            current,
            target,
            factor
        );

        let now = Utc::now();
        let converted: Vec<Goal> = goals
            .into_iter()
            .map(|mut goal| {
                goal.current_amount = (goal.current_amount * factor).round_dp(2);
                goal.target_amount = (goal.target_amount * factor).round_dp(2);
                goal.currency_code = target.clone();
                goal.updated_at = now;
                goal.sync_status = SyncStatus::PendingPush;
                goal
            })
            .collect();

        self.goal_repository.upsert_all(converted.clone()).await?;
        self.settings_service.set_preferred_currency(&target).await?;
        self.outbox.nudge();
        Ok(converted)
    }
}

fn validated_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.chars().count() < MIN_GOAL_TITLE_CHARS {
        return Err(ValidationError::InvalidInput(format!(
            "Goal title must be at least {MIN_GOAL_TITLE_CHARS} characters long"
        ))
        .into());
    }
    Ok(trimmed.to_string())
}

fn validate_amounts(target_amount: Decimal, starting_amount: Decimal) -> Result<()> {
    if target_amount <= Decimal::ZERO {
        return Err(
            ValidationError::InvalidInput("Target amount must be positive".to_string()).into(),
        );
    }
    if target_amount > MAX_GOAL_TARGET_AMOUNT {
        return Err(ValidationError::InvalidInput(format!(
            "Target amount cannot exceed {MAX_GOAL_TARGET_AMOUNT}"
        ))
        .into());
    }
    if starting_amount < Decimal::ZERO {
        return Err(
            ValidationError::InvalidInput("Starting amount cannot be negative".to_string()).into(),
        );
    }
    if starting_amount > target_amount {
        return Err(ValidationError::InvalidInput(
            "Starting amount cannot exceed the target amount".to_string(),
        )
        .into());
    }
    Ok(())
}

fn normalized_currency(currency_code: &str) -> Result<String> {
    let normalized = currency_code.trim().to_ascii_uppercase();
    if normalized.len() != 3 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::UnsupportedCurrency(currency_code.to_string()));
    }
    Ok(normalized)
}
