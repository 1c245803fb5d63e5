#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    use nestegg_core::errors::{DatabaseError, Error};
    use nestegg_core::goals::{Goal, GoalRepositoryTrait};
    use nestegg_core::observe::WatchRegistry;
    use nestegg_core::sync::SyncStatus;

    use crate::goals::GoalRepository;
    use crate::test_db::{self, TestDb};

    const OWNER: &str = "user-1";

    struct Fixture {
        repository: GoalRepository,
        _db: TestDb,
    }

    fn fixture() -> Fixture {
        let db = test_db::setup();
        let repository = GoalRepository::new(
            db.pool.clone(),
            db.writer.clone(),
            Arc::new(WatchRegistry::new()),
        );
        Fixture {
            repository,
            _db: db,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("valid timestamp")
    }

    fn goal(goal_id: &str, created_secs: i64, status: SyncStatus) -> Goal {
        Goal {
            id: goal_id.to_string(),
            owner_id: OWNER.to_string(),
            title: format!("Goal {goal_id}"),
            target_amount: dec!(1000),
            current_amount: dec!(100.25),
            currency_code: "GBP".to_string(),
            created_at: at(created_secs),
            updated_at: at(created_secs),
            sync_status: status,
        }
    }

    // ==================== Round Trips ====================

    #[tokio::test]
    async fn test_upsert_then_get_preserves_every_field() {
        let f = fixture();
        let stored = f
            .repository
            .upsert(goal("goal_1", 100, SyncStatus::PendingPush))
            .await
            .unwrap();
        assert_eq!(stored.current_amount, dec!(100.25));

        let fetched = f.repository.get_by_id("goal_1").unwrap();
        assert_eq!(fetched, goal("goal_1", 100, SyncStatus::PendingPush));
    }

    #[tokio::test]
    async fn test_upsert_existing_id_updates_in_place() {
        let f = fixture();
        f.repository
            .upsert(goal("goal_1", 100, SyncStatus::Synced))
            .await
            .unwrap();

        let mut renamed = goal("goal_1", 100, SyncStatus::PendingPush);
        renamed.title = "Emergency fund".to_string();
        f.repository.upsert(renamed).await.unwrap();

        let owned = f.repository.query_by_owner(OWNER).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].title, "Emergency fund");
        assert_eq!(owned[0].sync_status, SyncStatus::PendingPush);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let f = fixture();
        let err = f.repository.get_by_id("goal_missing").unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::NotFound(_))
        ));
    }

    // ==================== Queries ====================

    #[tokio::test]
    async fn test_query_by_owner_is_scoped_and_newest_first() {
        let f = fixture();
        f.repository
            .upsert(goal("goal_old", 100, SyncStatus::Synced))
            .await
            .unwrap();
        f.repository
            .upsert(goal("goal_new", 200, SyncStatus::Synced))
            .await
            .unwrap();
        let mut foreign = goal("goal_other", 300, SyncStatus::Synced);
        foreign.owner_id = "user-2".to_string();
        f.repository.upsert(foreign).await.unwrap();

        let owned = f.repository.query_by_owner(OWNER).unwrap();
        let ids: Vec<&str> = owned.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["goal_new", "goal_old"]);
    }

    #[tokio::test]
    async fn test_query_unsynced_returns_only_pending_rows() {
        let f = fixture();
        f.repository
            .upsert(goal("goal_synced", 100, SyncStatus::Synced))
            .await
            .unwrap();
        f.repository
            .upsert(goal("goal_pending", 200, SyncStatus::PendingPush))
            .await
            .unwrap();

        let pending = f.repository.query_unsynced().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "goal_pending");
    }

    // ==================== Sync Flags ====================

    #[tokio::test]
    async fn test_mark_synced_flips_the_flag() {
        let f = fixture();
        f.repository
            .upsert(goal("goal_1", 100, SyncStatus::PendingPush))
            .await
            .unwrap();

        f.repository.mark_synced("goal_1").await.unwrap();

        let fetched = f.repository.get_by_id("goal_1").unwrap();
        assert_eq!(fetched.sync_status, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn test_mark_synced_missing_goal_is_not_found() {
        let f = fixture();
        let err = f.repository.mark_synced("goal_missing").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_synced_if_unchanged_matches_full_precision_timestamp() {
        let f = fixture();
        let mut fresh = goal("goal_1", 100, SyncStatus::PendingPush);
        fresh.updated_at = Utc::now();
        let expected = fresh.updated_at;
        f.repository.upsert(fresh).await.unwrap();

        let marked = f
            .repository
            .mark_synced_if_unchanged("goal_1", expected)
            .await
            .unwrap();

        assert!(marked);
        let fetched = f.repository.get_by_id("goal_1").unwrap();
        assert_eq!(fetched.sync_status, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn test_mark_synced_if_unchanged_leaves_moved_goal_pending() {
        let f = fixture();
        f.repository
            .upsert(goal("goal_1", 100, SyncStatus::PendingPush))
            .await
            .unwrap();

        // A later local write moved updated_at past what the caller read.
        let marked = f
            .repository
            .mark_synced_if_unchanged("goal_1", at(50))
            .await
            .unwrap();

        assert!(!marked);
        let fetched = f.repository.get_by_id("goal_1").unwrap();
        assert_eq!(fetched.sync_status, SyncStatus::PendingPush);
    }

    // ==================== Observation ====================

    #[tokio::test]
    async fn test_observer_sees_upsert() {
        let f = fixture();
        let mut sub = f.repository.observe_by_owner(OWNER).unwrap();
        assert!(sub.current().is_empty());

        f.repository
            .upsert(goal("goal_1", 100, SyncStatus::PendingPush))
            .await
            .unwrap();

        let seen = sub.next().await.expect("registry still alive");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, "goal_1");
    }

    // ==================== Purge ====================

    #[tokio::test]
    async fn test_delete_all_for_owner_is_scoped() {
        let f = fixture();
        f.repository
            .upsert(goal("goal_1", 100, SyncStatus::Synced))
            .await
            .unwrap();
        f.repository
            .upsert(goal("goal_2", 200, SyncStatus::Synced))
            .await
            .unwrap();
        let mut foreign = goal("goal_other", 300, SyncStatus::Synced);
        foreign.owner_id = "user-2".to_string();
        f.repository.upsert(foreign).await.unwrap();

        let removed = f.repository.delete_all_for_owner(OWNER).await.unwrap();

        assert_eq!(removed, 2);
        assert!(f.repository.query_by_owner(OWNER).unwrap().is_empty());
        assert_eq!(f.repository.query_by_owner("user-2").unwrap().len(), 1);
    }
}
