use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;

use nestegg_core::errors::DatabaseError;
use nestegg_core::goals::{Goal, GoalRepositoryTrait};
use nestegg_core::observe::{Subscription, WatchRegistry};
use nestegg_core::sync::SyncStatus;
use nestegg_core::Result;

use super::model::GoalDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::goals;
use crate::schema::goals::dsl::*;

/// Loads one owner's goals newest first. Shared with the deposit repository,
/// which re-emits the goal list after its compound write.
pub(crate) fn load_goals_for_owner(
    conn: &mut SqliteConnection,
    owner_id_param: &str,
) -> Result<Vec<Goal>> {
    let rows = goals
        .filter(owner_id.eq(owner_id_param))
        .order(created_at.desc())
        .then_order_by(id.asc())
        .load::<GoalDB>(conn)
        .map_err(StorageError::from)?;
    Ok(rows.into_iter().map(Goal::from).collect())
}

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    watchers: Arc<WatchRegistry<Goal>>,
}

impl GoalRepository {
    pub fn new(
        pool: Arc<DbPool>,
        writer: WriteHandle,
        watchers: Arc<WatchRegistry<Goal>>,
    ) -> Self {
        GoalRepository {
            pool,
            writer,
            watchers,
        }
    }

    fn emit_for(&self, owner_id_param: &str) -> Result<()> {
        let records = self.query_by_owner(owner_id_param)?;
        self.watchers.emit(owner_id_param, records);
        Ok(())
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn get_by_id(&self, goal_id_param: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        let row = goals
            .find(goal_id_param)
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Goal::from).ok_or_else(|| {
            DatabaseError::NotFound(format!("Goal with id {goal_id_param} not found")).into()
        })
    }

    fn query_by_owner(&self, owner_id_param: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        load_goals_for_owner(&mut conn, owner_id_param)
    }

    fn query_unsynced(&self) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals
            .filter(sync_status.eq(SyncStatus::PendingPush.as_str()))
            .order(created_at.desc())
            .then_order_by(id.asc())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn observe_by_owner(&self, owner_id_param: &str) -> Result<Subscription<Goal>> {
        let snapshot = self.query_by_owner(owner_id_param)?;
        Ok(self.watchers.subscribe(owner_id_param, snapshot))
    }

    async fn upsert(&self, goal: Goal) -> Result<Goal> {
        let goal_db = GoalDB::from(goal);
        let goal_id_owned = goal_db.id.clone();
        let stored = self
            .writer
            .exec(move |conn| {
                diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .on_conflict(goals::id)
                    .do_update()
                    .set(&goal_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let row = goals
                    .find(goal_id_owned)
                    .first::<GoalDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::from(row))
            })
            .await?;
        self.emit_for(&stored.owner_id)?;
        Ok(stored)
    }

    async fn upsert_all(&self, goals_to_store: Vec<Goal>) -> Result<usize> {
        let mut owners: Vec<String> = Vec::new();
        for goal in &goals_to_store {
            if !owners.contains(&goal.owner_id) {
                owners.push(goal.owner_id.clone());
            }
        }

        let affected = self
            .writer
            .exec(move |conn| {
                let mut affected_rows = 0;
                for goal in goals_to_store {
                    let goal_db = GoalDB::from(goal);
                    affected_rows += diesel::insert_into(goals::table)
                        .values(&goal_db)
                        .on_conflict(goals::id)
                        .do_update()
                        .set(&goal_db)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await?;

        for owner in &owners {
            self.emit_for(owner)?;
        }
        Ok(affected)
    }

    async fn mark_synced(&self, goal_id_param: &str) -> Result<()> {
        let goal_id_owned = goal_id_param.to_string();
        let owner = self
            .writer
            .exec(move |conn| {
                let affected = diesel::update(goals.find(goal_id_owned.clone()))
                    .set(sync_status.eq(SyncStatus::Synced.as_str()))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(DatabaseError::NotFound(format!(
                        "Goal with id {goal_id_owned} not found"
                    ))
                    .into());
                }
                let row = goals
                    .find(goal_id_owned)
                    .first::<GoalDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(row.owner_id)
            })
            .await?;
        self.emit_for(&owner)?;
        Ok(())
    }

    async fn mark_synced_if_unchanged(
        &self,
        goal_id_param: &str,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let goal_id_owned = goal_id_param.to_string();
        // updated_at round-trips through RFC 3339 verbatim, so string
        // equality is exact version equality.
        let expected = expected_updated_at.to_rfc3339();
        let marked_owner = self
            .writer
            .exec(move |conn| {
                let affected = diesel::update(
                    goals
                        .filter(id.eq(goal_id_owned.clone()))
                        .filter(updated_at.eq(expected)),
                )
                .set(sync_status.eq(SyncStatus::Synced.as_str()))
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected == 0 {
                    return Ok(None);
                }
                let row = goals
                    .find(goal_id_owned)
                    .first::<GoalDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Some(row.owner_id))
            })
            .await?;

        match marked_owner {
            Some(owner) => {
                self.emit_for(&owner)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_for_owner(&self, owner_id_param: &str) -> Result<usize> {
        let owner_owned = owner_id_param.to_string();
        let removed = self
            .writer
            .exec(move |conn| {
                Ok(diesel::delete(goals.filter(owner_id.eq(owner_owned)))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await?;
        self.emit_for(owner_id_param)?;
        Ok(removed)
    }
}
