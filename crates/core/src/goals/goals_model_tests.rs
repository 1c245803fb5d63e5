//! Tests for goal domain models.

#[cfg(test)]
mod tests {
    use crate::goals::{new_goal_id, Goal};
    use crate::sync::SyncStatus;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn sample_goal() -> Goal {
        Goal {
            id: "goal_1".to_string(),
            owner_id: "owner_1".to_string(),
            title: "Holiday fund".to_string(),
            target_amount: dec!(200),
            current_amount: dec!(50),
            currency_code: "GBP".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
            sync_status: SyncStatus::PendingPush,
        }
    }

    // ==================== Progress Helpers ====================

    #[test]
    fn test_progress_percentage() {
        let goal = sample_goal();
        assert_eq!(goal.progress_percentage(), 25.0);
    }

    #[test]
    fn test_progress_percentage_clamped_at_hundred() {
        let mut goal = sample_goal();
        goal.current_amount = dec!(500);
        assert_eq!(goal.progress_percentage(), 100.0);
    }

    #[test]
    fn test_progress_percentage_zero_target() {
        let mut goal = sample_goal();
        goal.target_amount = dec!(0);
        assert_eq!(goal.progress_percentage(), 0.0);
    }

    #[test]
    fn test_remaining_amount_never_negative() {
        let mut goal = sample_goal();
        assert_eq!(goal.remaining_amount(), dec!(150));
        goal.current_amount = dec!(250);
        assert_eq!(goal.remaining_amount(), dec!(0));
    }

    #[test]
    fn test_is_completed() {
        let mut goal = sample_goal();
        assert!(!goal.is_completed());
        goal.current_amount = dec!(200);
        assert!(goal.is_completed());
    }

    // ==================== Serialization ====================

    #[test]
    fn test_goal_serializes_camel_case() {
        let value = serde_json::to_value(sample_goal()).unwrap();
        assert!(value.get("ownerId").is_some());
        assert!(value.get("targetAmount").is_some());
        assert_eq!(value["syncStatus"], "PENDING_PUSH");
    }

    #[test]
    fn test_sync_status_defaults_to_pending_on_missing_field() {
        let json = r#"{
            "id": "goal_9",
            "ownerId": "owner_1",
            "title": "Bike",
            "targetAmount": 100.0,
            "currentAmount": 0.0,
            "currencyCode": "GBP",
            "createdAt": "2026-01-10T09:00:00Z",
            "updatedAt": "2026-01-10T09:00:00Z"
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.sync_status, SyncStatus::PendingPush);
    }

    // ==================== Id Generation ====================

    #[test]
    fn test_new_goal_id_prefix_and_uniqueness() {
        let a = new_goal_id();
        let b = new_goal_id();
        assert!(a.starts_with("goal_"));
        assert_ne!(a, b);
    }
}
