#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::deposits::{
        DepositRepositoryTrait, DepositService, DepositServiceTrait, InMemoryDepositRepository,
    };
    use crate::errors::{DatabaseError, Error};
    use crate::goals::{Goal, GoalRepositoryTrait, InMemoryGoalRepository};
    use crate::notifications::{MockNotifier, Notification};
    use crate::sync::{OutboxHandle, SyncStatus};

    const OWNER: &str = "user-1";

    struct Fixture {
        goal_repository: Arc<InMemoryGoalRepository>,
        deposit_repository: Arc<InMemoryDepositRepository>,
        notifier: Arc<MockNotifier>,
        service: DepositService,
    }

    fn fixture() -> Fixture {
        let goal_repository = Arc::new(InMemoryGoalRepository::new());
        let deposit_repository =
            Arc::new(InMemoryDepositRepository::new(goal_repository.clone()));
        let notifier = Arc::new(MockNotifier::new());
        let service = DepositService::new(
            deposit_repository.clone(),
            goal_repository.clone(),
            notifier.clone(),
            OutboxHandle::detached(),
        );
        Fixture {
            goal_repository,
            deposit_repository,
            notifier,
            service,
        }
    }

    fn goal(id: &str, target: Decimal, current: Decimal) -> Goal {
        let now = Utc::now();
        Goal {
            id: id.to_string(),
            owner_id: OWNER.to_string(),
            title: "Holiday".to_string(),
            target_amount: target,
            current_amount: current,
            currency_code: "GBP".to_string(),
            created_at: now,
            updated_at: now,
            sync_status: SyncStatus::Synced,
        }
    }

    // ==================== Applying deposits ====================

    #[tokio::test]
    async fn test_add_deposit_advances_goal_and_flags_both_pending() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(1000), dec!(100)))
            .await
            .unwrap();

        let outcome = f
            .service
            .add_deposit("goal_1", dec!(50), Some("birthday money".to_string()))
            .await
            .unwrap();

        assert_eq!(outcome.goal.current_amount, dec!(150));
        assert_eq!(outcome.goal.sync_status, SyncStatus::PendingPush);
        assert_eq!(outcome.deposit.amount, dec!(50));
        assert_eq!(outcome.deposit.sync_status, SyncStatus::PendingPush);
        assert_eq!(outcome.deposit.note.as_deref(), Some("birthday money"));

        let stored = f.goal_repository.get_by_id("goal_1").unwrap();
        assert_eq!(stored.current_amount, dec!(150));
        assert_eq!(f.service.get_deposits("goal_1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_deposit_sequence_accumulates_locally() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(10_000), dec!(25)))
            .await
            .unwrap();

        for amount in [dec!(10), dec!(20), dec!(30.50)] {
            f.service.add_deposit("goal_1", amount, None).await.unwrap();
        }

        let stored = f.goal_repository.get_by_id("goal_1").unwrap();
        assert_eq!(stored.current_amount, dec!(85.50));

        let pending = f.deposit_repository.query_unsynced().unwrap();
        assert_eq!(pending.len(), 3);
        assert!(pending.iter().all(|d| d.sync_status.is_pending()));
    }

    #[tokio::test]
    async fn test_add_deposit_is_visible_to_both_observers() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(1000), dec!(0)))
            .await
            .unwrap();
        let mut goal_sub = f.goal_repository.observe_by_owner(OWNER).unwrap();
        let mut deposit_sub = f.deposit_repository.observe_by_owner(OWNER).unwrap();

        f.service.add_deposit("goal_1", dec!(75), None).await.unwrap();

        let goals = goal_sub.next().await.unwrap();
        assert_eq!(goals[0].current_amount, dec!(75));
        let deposits = deposit_sub.next().await.unwrap();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].amount, dec!(75));
    }

    #[tokio::test]
    async fn test_blank_note_is_stored_as_none() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(1000), dec!(0)))
            .await
            .unwrap();
        let outcome = f
            .service
            .add_deposit("goal_1", dec!(5), Some("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome.deposit.note, None);
    }

    // ==================== Validation ====================

    #[tokio::test]
    async fn test_add_deposit_rejects_non_positive_and_oversized_amounts() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(1000), dec!(0)))
            .await
            .unwrap();

        for amount in [dec!(0), dec!(-5), dec!(1_000_001)] {
            assert!(matches!(
                f.service.add_deposit("goal_1", amount, None).await,
                Err(Error::Validation(_))
            ));
        }
        assert!(f.service.get_deposits("goal_1").unwrap().is_empty());
        assert_eq!(
            f.goal_repository.get_by_id("goal_1").unwrap().current_amount,
            dec!(0)
        );
    }

    #[tokio::test]
    async fn test_add_deposit_to_missing_goal_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.service.add_deposit("goal_missing", dec!(10), None).await,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
    }

    // ==================== Milestones ====================

    #[tokio::test]
    async fn test_milestone_fires_once_per_first_crossing() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(100), dec!(20)))
            .await
            .unwrap();

        // 20 -> 30 crosses 25.
        let first = f.service.add_deposit("goal_1", dec!(10), None).await.unwrap();
        assert_eq!(first.milestone, Some(25));

        // 30 -> 80 crosses 50 and 75 but only the first is reported.
        let second = f.service.add_deposit("goal_1", dec!(50), None).await.unwrap();
        assert_eq!(second.milestone, Some(50));

        let notifications = f.notifier.notifications();
        assert_eq!(notifications.len(), 2);
        assert!(matches!(
            notifications[0],
            Notification::MilestoneReached { percentage: 25, .. }
        ));
        assert!(matches!(
            notifications[1],
            Notification::MilestoneReached { percentage: 50, .. }
        ));
    }

    #[tokio::test]
    async fn test_no_milestone_when_no_threshold_crossed() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(100), dec!(0)))
            .await
            .unwrap();
        let outcome = f.service.add_deposit("goal_1", dec!(10), None).await.unwrap();
        assert_eq!(outcome.milestone, None);
        assert!(f.notifier.is_empty());
    }
}
