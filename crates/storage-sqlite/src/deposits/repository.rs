use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use nestegg_core::deposits::{Deposit, DepositRepositoryTrait};
use nestegg_core::errors::DatabaseError;
use nestegg_core::goals::Goal;
use nestegg_core::observe::{Subscription, WatchRegistry};
use nestegg_core::sync::SyncStatus;
use nestegg_core::Result;

use super::model::DepositDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::goals::{load_goals_for_owner, GoalDB};
use crate::schema::deposits::dsl::*;
use crate::schema::{deposits, goals};
use crate::utils::chunk_for_sqlite;

/// Stores deposits together with the goal rows they advance. Holds both watch
/// registries so the compound write shows up in both live queries.
pub struct DepositRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    watchers: Arc<WatchRegistry<Deposit>>,
    goal_watchers: Arc<WatchRegistry<Goal>>,
}

impl DepositRepository {
    pub fn new(
        pool: Arc<DbPool>,
        writer: WriteHandle,
        watchers: Arc<WatchRegistry<Deposit>>,
        goal_watchers: Arc<WatchRegistry<Goal>>,
    ) -> Self {
        DepositRepository {
            pool,
            writer,
            watchers,
            goal_watchers,
        }
    }

    fn emit_for(&self, owner_id_param: &str) -> Result<()> {
        let records = self.query_by_owner(owner_id_param)?;
        self.watchers.emit(owner_id_param, records);
        Ok(())
    }

    fn emit_goals_for(&self, owner_id_param: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let records = load_goals_for_owner(&mut conn, owner_id_param)?;
        self.goal_watchers.emit(owner_id_param, records);
        Ok(())
    }
}

#[async_trait]
impl DepositRepositoryTrait for DepositRepository {
    fn query_by_owner(&self, owner_id_param: &str) -> Result<Vec<Deposit>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = deposits::table
            .filter(owner_id.eq(owner_id_param))
            .order(created_at.desc())
            .then_order_by(id.asc())
            .load::<DepositDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Deposit::from).collect())
    }

    fn query_by_goal(&self, goal_id_param: &str) -> Result<Vec<Deposit>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = deposits::table
            .filter(goal_id.eq(goal_id_param))
            .order(created_at.desc())
            .then_order_by(id.asc())
            .load::<DepositDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Deposit::from).collect())
    }

    fn query_unsynced(&self) -> Result<Vec<Deposit>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = deposits::table
            .filter(sync_status.eq(SyncStatus::PendingPush.as_str()))
            .order(created_at.desc())
            .then_order_by(id.asc())
            .load::<DepositDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Deposit::from).collect())
    }

    fn observe_by_owner(&self, owner_id_param: &str) -> Result<Subscription<Deposit>> {
        let snapshot = self.query_by_owner(owner_id_param)?;
        Ok(self.watchers.subscribe(owner_id_param, snapshot))
    }

    async fn apply_deposit(&self, deposit: Deposit, updated_goal: Goal) -> Result<Deposit> {
        let deposit_db = DepositDB::from(deposit);
        let goal_db = GoalDB::from(updated_goal);
        let deposit_id_owned = deposit_db.id.clone();

        let stored = self
            .writer
            .exec(move |conn| {
                // Goal row first so the deposit's foreign key always has a
                // target.
                diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .on_conflict(goals::id)
                    .do_update()
                    .set(&goal_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                diesel::insert_into(deposits::table)
                    .values(&deposit_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let row = deposits::table
                    .find(deposit_id_owned)
                    .first::<DepositDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Deposit::from(row))
            })
            .await?;

        self.emit_for(&stored.owner_id)?;
        self.emit_goals_for(&stored.owner_id)?;
        Ok(stored)
    }

    async fn mark_synced(&self, deposit_ids: &[String]) -> Result<()> {
        if deposit_ids.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = deposit_ids.to_vec();

        let owners = self
            .writer
            .exec(move |conn| {
                let mut affected = 0;
                let mut owners: Vec<String> = Vec::new();
                for chunk in chunk_for_sqlite(&ids) {
                    affected += diesel::update(deposits::table.filter(id.eq_any(chunk)))
                        .set(sync_status.eq(SyncStatus::Synced.as_str()))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                    let chunk_owners = deposits::table
                        .filter(id.eq_any(chunk))
                        .select(owner_id)
                        .distinct()
                        .load::<String>(conn)
                        .map_err(StorageError::from)?;
                    for owner in chunk_owners {
                        if !owners.contains(&owner) {
                            owners.push(owner);
                        }
                    }
                }
                if affected != ids.len() {
                    return Err(DatabaseError::NotFound(format!(
                        "Marked {affected} of {} deposits, at least one id is unknown",
                        ids.len()
                    ))
                    .into());
                }
                Ok(owners)
            })
            .await?;

        for owner in owners {
            self.emit_for(&owner)?;
        }
        Ok(())
    }

    async fn delete_all_for_owner(&self, owner_id_param: &str) -> Result<usize> {
        let owner_owned = owner_id_param.to_string();
        let removed = self
            .writer
            .exec(move |conn| {
                Ok(
                    diesel::delete(deposits::table.filter(owner_id.eq(owner_owned)))
                        .execute(conn)
                        .map_err(StorageError::from)?,
                )
            })
            .await?;
        self.emit_for(owner_id_param)?;
        Ok(removed)
    }
}
