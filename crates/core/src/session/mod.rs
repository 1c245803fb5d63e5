//! Account session teardown.

use std::sync::Arc;

use log::{error, info};

use crate::deposits::DepositRepositoryTrait;
use crate::errors::Result;
use crate::goals::GoalRepositoryTrait;
use crate::settings::SettingsServiceTrait;

pub struct SessionService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    deposit_repository: Arc<dyn DepositRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl SessionService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        deposit_repository: Arc<dyn DepositRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        SessionService {
            goal_repository,
            deposit_repository,
            settings_service,
        }
    }

    /// Removes every local trace of `owner_id`: goals, deposits and
    /// preferences. Remote documents are intentionally retained. Every step
    /// is attempted even when an earlier one fails; the first failure is
    /// returned so the caller can record it, but logout proceeds regardless.
    pub async fn purge(&self, owner_id: &str) -> Result<()> {
        let mut first_error = None;

        // Deposits before goals, following the reference direction.
        let mut deposits_removed = 0;
        match self.deposit_repository.delete_all_for_owner(owner_id).await {
            Ok(count) => deposits_removed = count,
            Err(e) => {
                error!("Purging deposits for {owner_id} failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        let mut goals_removed = 0;
        match self.goal_repository.delete_all_for_owner(owner_id).await {
            Ok(count) => goals_removed = count,
            Err(e) => {
                error!("Purging goals for {owner_id} failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        if let Err(e) = self.settings_service.clear_all().await {
            error!("Clearing preferences for {owner_id} failed: {e}");
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Purged {goals_removed} goals and {deposits_removed} deposits for {owner_id}");
                Ok(())
            }
        }
    }
}
