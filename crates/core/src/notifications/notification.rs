//! Notification payloads emitted by the mutation pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user-facing notification request.
///
/// Serialized with a `type` tag so runtime adapters can dispatch on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A goal crossed a progress milestone.
    MilestoneReached {
        goal_title: String,
        percentage: u32,
        current_amount: Decimal,
        target_amount: Decimal,
        currency_code: String,
    },
    /// Periodic nudge to keep saving.
    WeeklyReminder,
}

impl Notification {
    pub fn milestone_reached(
        goal_title: impl Into<String>,
        percentage: u32,
        current_amount: Decimal,
        target_amount: Decimal,
        currency_code: impl Into<String>,
    ) -> Self {
        Notification::MilestoneReached {
            goal_title: goal_title.into(),
            percentage,
            current_amount,
            target_amount,
            currency_code: currency_code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_milestone_serializes_with_type_tag() {
        let notification =
            Notification::milestone_reached("Holiday fund", 50, dec!(100), dec!(200), "GBP");
        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value["type"], "milestone_reached");
        assert_eq!(value["percentage"], 50);
    }

    #[test]
    fn test_weekly_reminder_round_trips() {
        let json = serde_json::to_string(&Notification::WeeklyReminder).unwrap();
        let back: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Notification::WeeklyReminder);
    }
}
