//! Domain-level adapter over the raw document store.
//!
//! Everything the sync core says to the remote goes through here, expressed
//! in terms of goals and deposits instead of collections and JSON maps. The
//! push methods encode the convergence rules: a goal the remote has never
//! seen is written as a full snapshot, a goal the remote already knows is
//! advanced with a server-side increment so deposits made on other devices
//! are never overwritten, and a currency conversion rebases the amounts
//! absolutely because a multiplication cannot be expressed as an increment.

use std::sync::Arc;

use log::warn;
use rust_decimal::Decimal;

use crate::constants::{DEPOSITS_COLLECTION, GOALS_COLLECTION};
use crate::deposits::Deposit;
use crate::goals::Goal;

use super::documents::{
    deposit_to_document, goal_currency_fields, goal_from_document, goal_to_document,
    goal_touch_fields, FIELD_CURRENT_AMOUNT,
};
use super::{DocumentFilter, RemoteDocumentStore, RemoteResult, TxOp, WriteOp};

#[derive(Clone)]
pub struct RemoteGateway {
    store: Arc<dyn RemoteDocumentStore>,
}

impl RemoteGateway {
    pub fn new(store: Arc<dyn RemoteDocumentStore>) -> Self {
        Self { store }
    }

    /// Fetches every goal the remote holds for `owner_id`.
    ///
    /// Documents that cannot be read as a goal are skipped with a warning
    /// rather than failing the whole fetch.
    pub async fn fetch_goals(&self, owner_id: &str) -> RemoteResult<Vec<Goal>> {
        let documents = self
            .store
            .query(GOALS_COLLECTION, &DocumentFilter::OwnerId(owner_id.to_string()))
            .await?;
        let mut goals = Vec::with_capacity(documents.len());
        for document in documents {
            match goal_from_document(&document) {
                Some(goal) => goals.push(goal),
                None => warn!("Skipping remote goal document without an id"),
            }
        }
        Ok(goals)
    }

    /// Fetches a single goal document, `None` when the remote has no record.
    pub async fn fetch_goal(&self, goal_id: &str) -> RemoteResult<Option<Goal>> {
        let document = self.store.get(GOALS_COLLECTION, goal_id).await?;
        Ok(document.as_ref().and_then(goal_from_document))
    }

    /// Creates a goal the remote has never seen, together with any deposits
    /// recorded against it while offline. The snapshot is safe to write
    /// absolutely: no other device can have advanced a goal that does not
    /// exist remotely yet.
    pub async fn push_new_goal(&self, goal: &Goal, deposits: &[Deposit]) -> RemoteResult<()> {
        let mut ops = vec![TxOp::Set {
            collection: GOALS_COLLECTION.to_string(),
            id: goal.id.clone(),
            document: goal_to_document(goal),
        }];
        ops.extend(deposit_set_ops(deposits));
        self.store.run_transaction(ops).await
    }

    /// Advances an existing remote goal by the sum of locally unsynced
    /// deposits. The increment is applied to the remote's then-current value,
    /// so progress pushed by other devices in the meantime survives.
    pub async fn push_goal_delta(
        &self,
        goal: &Goal,
        delta: Decimal,
        deposits: &[Deposit],
    ) -> RemoteResult<()> {
        let mut ops = vec![
            TxOp::Increment {
                collection: GOALS_COLLECTION.to_string(),
                id: goal.id.clone(),
                field: FIELD_CURRENT_AMOUNT.to_string(),
                by: delta,
            },
            TxOp::Update {
                collection: GOALS_COLLECTION.to_string(),
                id: goal.id.clone(),
                fields: goal_touch_fields(goal),
            },
        ];
        ops.extend(deposit_set_ops(deposits));
        self.store.run_transaction(ops).await
    }

    /// Rewrites a remote goal after a currency conversion. Amounts were
    /// multiplied by a rate locally, which has no incremental form, so the
    /// converted values are pushed absolutely and last write wins.
    pub async fn push_currency_rebase(
        &self,
        goal: &Goal,
        deposits: &[Deposit],
    ) -> RemoteResult<()> {
        let mut ops = vec![TxOp::Update {
            collection: GOALS_COLLECTION.to_string(),
            id: goal.id.clone(),
            fields: goal_currency_fields(goal),
        }];
        ops.extend(deposit_set_ops(deposits));
        self.store.run_transaction(ops).await
    }

    /// Uploads deposit records whose goal is already settled remotely.
    pub async fn push_deposits(&self, deposits: &[Deposit]) -> RemoteResult<()> {
        if deposits.is_empty() {
            return Ok(());
        }
        let ops = deposits
            .iter()
            .map(|deposit| WriteOp::Set {
                collection: DEPOSITS_COLLECTION.to_string(),
                id: deposit.id.clone(),
                document: deposit_to_document(deposit),
            })
            .collect();
        self.store.run_batch(ops).await
    }
}

fn deposit_set_ops(deposits: &[Deposit]) -> Vec<TxOp> {
    deposits
        .iter()
        .map(|deposit| TxOp::Set {
            collection: DEPOSITS_COLLECTION.to_string(),
            id: deposit.id.clone(),
            document: deposit_to_document(deposit),
        })
        .collect()
}
