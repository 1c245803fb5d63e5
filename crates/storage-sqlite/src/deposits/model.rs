//! Database model for deposits.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use nestegg_core::deposits::Deposit;
use nestegg_core::sync::SyncStatus;

use crate::utils::{parse_datetime_tolerant, parse_decimal_tolerant};

/// Database model for deposits. Rows are immutable after insert apart from
/// the sync flag.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::deposits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DepositDB {
    pub id: String,
    pub goal_id: String,
    pub owner_id: String,
    pub amount: String,
    pub note: Option<String>,
    pub created_at: String,
    pub sync_status: String,
}

impl From<DepositDB> for Deposit {
    fn from(db: DepositDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            owner_id: db.owner_id,
            amount: parse_decimal_tolerant(&db.amount, "amount"),
            note: db.note,
            created_at: parse_datetime_tolerant(&db.created_at, "created_at"),
            sync_status: SyncStatus::from(db.sync_status.as_str()),
        }
    }
}

impl From<Deposit> for DepositDB {
    fn from(domain: Deposit) -> Self {
        Self {
            id: domain.id,
            goal_id: domain.goal_id,
            owner_id: domain.owner_id,
            amount: domain.amount.to_string(),
            note: domain.note,
            created_at: domain.created_at.to_rfc3339(),
            sync_status: domain.sync_status.as_str().to_string(),
        }
    }
}
