//! Database model for goals.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use nestegg_core::goals::Goal;
use nestegg_core::sync::SyncStatus;

use crate::utils::{parse_datetime_tolerant, parse_decimal_tolerant};

/// Database model for goals. Amounts and timestamps are stored as TEXT so no
/// precision is lost going through SQLite.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GoalDB {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub target_amount: String,
    pub current_amount: String,
    pub currency_code: String,
    pub created_at: String,
    pub updated_at: String,
    pub sync_status: String,
}

impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            title: db.title,
            target_amount: parse_decimal_tolerant(&db.target_amount, "target_amount"),
            current_amount: parse_decimal_tolerant(&db.current_amount, "current_amount"),
            currency_code: db.currency_code,
            created_at: parse_datetime_tolerant(&db.created_at, "created_at"),
            updated_at: parse_datetime_tolerant(&db.updated_at, "updated_at"),
            sync_status: SyncStatus::from(db.sync_status.as_str()),
        }
    }
}

impl From<Goal> for GoalDB {
    fn from(domain: Goal) -> Self {
        Self {
            id: domain.id,
            owner_id: domain.owner_id,
            title: domain.title,
            target_amount: domain.target_amount.to_string(),
            current_amount: domain.current_amount.to_string(),
            currency_code: domain.currency_code,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
            sync_status: domain.sync_status.as_str().to_string(),
        }
    }
}
