#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use nestegg_core::deposits::{Deposit, DepositRepositoryTrait};
    use nestegg_core::errors::{DatabaseError, Error};
    use nestegg_core::goals::{Goal, GoalRepositoryTrait};
    use nestegg_core::observe::WatchRegistry;
    use nestegg_core::sync::SyncStatus;

    use crate::deposits::DepositRepository;
    use crate::goals::GoalRepository;
    use crate::test_db::{self, TestDb};

    const OWNER: &str = "user-1";

    struct Fixture {
        goal_repository: GoalRepository,
        deposit_repository: DepositRepository,
        _db: TestDb,
    }

    fn fixture() -> Fixture {
        let db = test_db::setup();
        let goal_watchers = Arc::new(WatchRegistry::new());
        let deposit_watchers = Arc::new(WatchRegistry::new());
        let goal_repository = GoalRepository::new(
            db.pool.clone(),
            db.writer.clone(),
            goal_watchers.clone(),
        );
        let deposit_repository = DepositRepository::new(
            db.pool.clone(),
            db.writer.clone(),
            deposit_watchers,
            goal_watchers,
        );
        Fixture {
            goal_repository,
            deposit_repository,
            _db: db,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("valid timestamp")
    }

    fn goal(goal_id: &str, current: Decimal) -> Goal {
        Goal {
            id: goal_id.to_string(),
            owner_id: OWNER.to_string(),
            title: format!("Goal {goal_id}"),
            target_amount: dec!(1000),
            current_amount: current,
            currency_code: "GBP".to_string(),
            created_at: at(100),
            updated_at: at(100),
            sync_status: SyncStatus::PendingPush,
        }
    }

    fn deposit(deposit_id: &str, for_goal: &str, amount: Decimal, created_secs: i64) -> Deposit {
        Deposit {
            id: deposit_id.to_string(),
            goal_id: for_goal.to_string(),
            owner_id: OWNER.to_string(),
            amount,
            note: None,
            created_at: at(created_secs),
            sync_status: SyncStatus::PendingPush,
        }
    }

    // ==================== Compound Write ====================

    #[tokio::test]
    async fn test_apply_deposit_writes_deposit_and_goal_together() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(100)))
            .await
            .unwrap();

        let stored = f
            .deposit_repository
            .apply_deposit(
                deposit("dep_1", "goal_1", dec!(25.50), 200),
                goal("goal_1", dec!(125.50)),
            )
            .await
            .unwrap();

        assert_eq!(stored.amount, dec!(25.50));
        let fetched_goal = f.goal_repository.get_by_id("goal_1").unwrap();
        assert_eq!(fetched_goal.current_amount, dec!(125.50));
        let by_goal = f.deposit_repository.query_by_goal("goal_1").unwrap();
        assert_eq!(by_goal.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_apply_deposit_rolls_back_the_goal_write() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(100)))
            .await
            .unwrap();

        // The deposit references a goal row that the transaction does not
        // create, so its foreign key fails after the goal update ran.
        let result = f
            .deposit_repository
            .apply_deposit(
                deposit("dep_1", "goal_missing", dec!(25), 200),
                goal("goal_1", dec!(125)),
            )
            .await;

        assert!(result.is_err());
        let fetched_goal = f.goal_repository.get_by_id("goal_1").unwrap();
        assert_eq!(fetched_goal.current_amount, dec!(100));
        assert!(f.deposit_repository.query_by_goal("goal_1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_note_round_trips_including_absent() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(100)))
            .await
            .unwrap();

        let mut with_note = deposit("dep_1", "goal_1", dec!(10), 200);
        with_note.note = Some("birthday money".to_string());
        f.deposit_repository
            .apply_deposit(with_note, goal("goal_1", dec!(110)))
            .await
            .unwrap();
        f.deposit_repository
            .apply_deposit(
                deposit("dep_2", "goal_1", dec!(5), 300),
                goal("goal_1", dec!(115)),
            )
            .await
            .unwrap();

        let stored = f.deposit_repository.query_by_goal("goal_1").unwrap();
        assert_eq!(stored[0].note, None);
        assert_eq!(stored[1].note, Some("birthday money".to_string()));
    }

    // ==================== Queries ====================

    #[tokio::test]
    async fn test_query_by_goal_is_scoped_and_newest_first() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(0)))
            .await
            .unwrap();
        f.goal_repository
            .upsert(goal("goal_2", dec!(0)))
            .await
            .unwrap();

        f.deposit_repository
            .apply_deposit(
                deposit("dep_old", "goal_1", dec!(10), 200),
                goal("goal_1", dec!(10)),
            )
            .await
            .unwrap();
        f.deposit_repository
            .apply_deposit(
                deposit("dep_new", "goal_1", dec!(20), 300),
                goal("goal_1", dec!(30)),
            )
            .await
            .unwrap();
        f.deposit_repository
            .apply_deposit(
                deposit("dep_other", "goal_2", dec!(5), 400),
                goal("goal_2", dec!(5)),
            )
            .await
            .unwrap();

        let by_goal = f.deposit_repository.query_by_goal("goal_1").unwrap();
        let ids: Vec<&str> = by_goal.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["dep_new", "dep_old"]);
    }

    // ==================== Sync Flags ====================

    #[tokio::test]
    async fn test_mark_synced_flips_only_the_listed_deposits() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(0)))
            .await
            .unwrap();
        f.deposit_repository
            .apply_deposit(
                deposit("dep_1", "goal_1", dec!(10), 200),
                goal("goal_1", dec!(10)),
            )
            .await
            .unwrap();
        f.deposit_repository
            .apply_deposit(
                deposit("dep_2", "goal_1", dec!(20), 300),
                goal("goal_1", dec!(30)),
            )
            .await
            .unwrap();

        f.deposit_repository
            .mark_synced(&["dep_1".to_string()])
            .await
            .unwrap();

        let pending = f.deposit_repository.query_unsynced().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "dep_2");
    }

    #[tokio::test]
    async fn test_mark_synced_unknown_id_fails_and_marks_nothing() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(0)))
            .await
            .unwrap();
        f.deposit_repository
            .apply_deposit(
                deposit("dep_1", "goal_1", dec!(10), 200),
                goal("goal_1", dec!(10)),
            )
            .await
            .unwrap();

        let err = f
            .deposit_repository
            .mark_synced(&["dep_1".to_string(), "dep_missing".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Database(DatabaseError::NotFound(_))
        ));
        // The update rolled back with the error.
        assert_eq!(f.deposit_repository.query_unsynced().unwrap().len(), 1);
    }

    // ==================== Observation ====================

    #[tokio::test]
    async fn test_both_observers_see_the_compound_write() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(100)))
            .await
            .unwrap();
        let mut goal_sub = f.goal_repository.observe_by_owner(OWNER).unwrap();
        let mut deposit_sub = f.deposit_repository.observe_by_owner(OWNER).unwrap();

        f.deposit_repository
            .apply_deposit(
                deposit("dep_1", "goal_1", dec!(25), 200),
                goal("goal_1", dec!(125)),
            )
            .await
            .unwrap();

        let deposits_seen = deposit_sub.next().await.expect("registry still alive");
        assert_eq!(deposits_seen.len(), 1);
        let goals_seen = goal_sub.next().await.expect("registry still alive");
        assert_eq!(goals_seen[0].current_amount, dec!(125));
    }

    // ==================== Purge ====================

    #[tokio::test]
    async fn test_delete_all_for_owner_is_scoped() {
        let f = fixture();
        f.goal_repository
            .upsert(goal("goal_1", dec!(0)))
            .await
            .unwrap();
        f.deposit_repository
            .apply_deposit(
                deposit("dep_1", "goal_1", dec!(10), 200),
                goal("goal_1", dec!(10)),
            )
            .await
            .unwrap();

        let mut foreign_goal = goal("goal_other", dec!(0));
        foreign_goal.owner_id = "user-2".to_string();
        f.goal_repository.upsert(foreign_goal.clone()).await.unwrap();
        let mut foreign_deposit = deposit("dep_other", "goal_other", dec!(5), 300);
        foreign_deposit.owner_id = "user-2".to_string();
        foreign_goal.current_amount = dec!(5);
        f.deposit_repository
            .apply_deposit(foreign_deposit, foreign_goal)
            .await
            .unwrap();

        let removed = f.deposit_repository.delete_all_for_owner(OWNER).await.unwrap();

        assert_eq!(removed, 1);
        assert!(f.deposit_repository.query_by_owner(OWNER).unwrap().is_empty());
        assert_eq!(
            f.deposit_repository.query_by_owner("user-2").unwrap().len(),
            1
        );
    }
}
