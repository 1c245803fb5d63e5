//! Goals domain models.

use chrono::{DateTime, Utc};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sync::SyncStatus;

/// Domain model representing a savings goal.
///
/// `current_amount` is only ever derived: starting amount plus applied
/// deposits, or a currency conversion of that sum. It is never user-set after
/// creation. `sync_status` is a device-local attribute and is stripped before
/// anything is sent to the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub currency_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sync_status: SyncStatus,
}

impl Goal {
    /// Progress toward the target as a percentage, clamped to 0..=100.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount <= Decimal::ZERO {
            return 0.0;
        }
        let pct = (self.current_amount / self.target_amount * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0);
        pct.clamp(0.0, 100.0)
    }

    /// Amount still missing, never negative.
    pub fn remaining_amount(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

/// Input model for creating a new goal.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub target_amount: Decimal,
    pub starting_amount: Decimal,
    pub currency_code: String,
}

/// Generates a fresh client-side goal id.
pub fn new_goal_id() -> String {
    format!("goal_{}", Uuid::new_v4())
}
