//! In-memory remote document store for tests.
//!
//! Behaves like the production store seen from the sync core: documents keyed
//! by (collection, id), atomic batches and transactions, and an offline
//! switch that makes every call fail with a connectivity error. Lives in the
//! crate proper (not behind `cfg(test)`) so downstream crates can use it in
//! their own tests.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{Number, Value};

use num_traits::ToPrimitive;

use super::{Document, DocumentFilter, RemoteDocumentStore, RemoteError, RemoteResult, TxOp, WriteOp};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<(String, String), Document>>,
    offline: AtomicBool,
    op_log: Mutex<Vec<String>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`RemoteError::Offline`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Seeds a document without going through the async API.
    pub fn seed(&self, collection: &str, id: &str, document: Document) {
        self.documents
            .lock()
            .unwrap()
            .insert((collection.to_string(), id.to_string()), document);
    }

    /// Snapshot of one document, for assertions.
    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.documents
            .lock()
            .unwrap()
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    /// All documents currently in `collection`.
    pub fn documents_in(&self, collection: &str) -> Vec<Document> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    /// Every operation attempted so far, in order.
    pub fn ops(&self) -> Vec<String> {
        self.op_log.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.op_log.lock().unwrap().clear();
    }

    fn record(&self, op: String) {
        self.op_log.lock().unwrap().push(op);
    }

    fn check_online(&self) -> RemoteResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RemoteError::offline("simulated offline"))
        } else {
            Ok(())
        }
    }
}

fn field_decimal(doc: &Document, field: &str) -> Decimal {
    match doc.get(field) {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64_retain))
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

fn decimal_field(d: Decimal) -> Value {
    Number::from_f64(d.to_f64().unwrap_or_default())
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Applies one transactional op to a staged copy of the document map.
fn apply_tx_op(staged: &mut HashMap<(String, String), Document>, op: TxOp) -> RemoteResult<()> {
    match op {
        TxOp::Set {
            collection,
            id,
            document,
        } => {
            staged.insert((collection, id), document);
            Ok(())
        }
        TxOp::Update {
            collection,
            id,
            fields,
        } => {
            let doc = staged
                .get_mut(&(collection.clone(), id.clone()))
                .ok_or_else(|| RemoteError::missing_document(collection, id))?;
            for (key, value) in fields {
                doc.insert(key, value);
            }
            Ok(())
        }
        TxOp::Increment {
            collection,
            id,
            field,
            by,
        } => {
            let doc = staged
                .get_mut(&(collection.clone(), id.clone()))
                .ok_or_else(|| RemoteError::missing_document(collection, id))?;
            let current = field_decimal(doc, &field);
            doc.insert(field, decimal_field(current + by));
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteDocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> RemoteResult<Option<Document>> {
        self.check_online()?;
        self.record(format!("get {collection}/{id}"));
        Ok(self.document(collection, id))
    }

    async fn query(&self, collection: &str, filter: &DocumentFilter) -> RemoteResult<Vec<Document>> {
        self.check_online()?;
        self.record(format!("query {collection}"));
        let DocumentFilter::OwnerId(owner_id) = filter;
        Ok(self
            .documents_in(collection)
            .into_iter()
            .filter(|doc| doc.get("ownerId").and_then(Value::as_str) == Some(owner_id.as_str()))
            .collect())
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> RemoteResult<()> {
        self.check_online()?;
        self.record(format!("set {collection}/{id}"));
        self.seed(collection, id, document);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> RemoteResult<()> {
        self.check_online()?;
        self.record(format!("update {collection}/{id}"));
        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .get_mut(&(collection.to_string(), id.to_string()))
            .ok_or_else(|| RemoteError::missing_document(collection, id))?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn run_batch(&self, ops: Vec<WriteOp>) -> RemoteResult<()> {
        self.check_online()?;
        self.record(format!("batch {} ops", ops.len()));
        let mut documents = self.documents.lock().unwrap();
        let mut staged = documents.clone();
        for op in ops {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    document,
                } => {
                    staged.insert((collection, id), document);
                }
                WriteOp::Update {
                    collection,
                    id,
                    fields,
                } => {
                    let doc = staged
                        .get_mut(&(collection.clone(), id.clone()))
                        .ok_or_else(|| RemoteError::missing_document(collection, id))?;
                    for (key, value) in fields {
                        doc.insert(key, value);
                    }
                }
            }
        }
        *documents = staged;
        Ok(())
    }

    async fn run_transaction(&self, ops: Vec<TxOp>) -> RemoteResult<()> {
        self.check_online()?;
        self.record(format!("txn {} ops", ops.len()));
        let mut documents = self.documents.lock().unwrap();
        // Stage on a copy so a failing op leaves the store untouched.
        let mut staged = documents.clone();
        for op in ops {
            apply_tx_op(&mut staged, op)?;
        }
        *documents = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn doc(json: &str) -> Document {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let store = InMemoryDocumentStore::new();
        store.set_offline(true);
        let err = store.get("goals", "goal_1").await.unwrap_err();
        assert!(err.is_offline());
    }

    #[tokio::test]
    async fn test_transaction_is_atomic() {
        let store = InMemoryDocumentStore::new();
        store.seed("goals", "goal_1", doc(r#"{"currentAmount": 100.0}"#));

        // Second op targets a missing document, so the increment must not
        // stick either.
        let result = store
            .run_transaction(vec![
                TxOp::Increment {
                    collection: "goals".into(),
                    id: "goal_1".into(),
                    field: "currentAmount".into(),
                    by: dec!(50),
                },
                TxOp::Update {
                    collection: "goals".into(),
                    id: "missing".into(),
                    fields: Document::new(),
                },
            ])
            .await;

        assert!(matches!(
            result,
            Err(RemoteError::MissingDocument { .. })
        ));
        let snapshot = store.document("goals", "goal_1").unwrap();
        assert_eq!(field_decimal(&snapshot, "currentAmount"), dec!(100));
    }

    #[tokio::test]
    async fn test_increment_adds_to_current_value() {
        let store = InMemoryDocumentStore::new();
        store.seed("goals", "goal_1", doc(r#"{"currentAmount": 100.0}"#));
        store
            .run_transaction(vec![TxOp::Increment {
                collection: "goals".into(),
                id: "goal_1".into(),
                field: "currentAmount".into(),
                by: dec!(25.5),
            }])
            .await
            .unwrap();
        let snapshot = store.document("goals", "goal_1").unwrap();
        assert_eq!(field_decimal(&snapshot, "currentAmount"), dec!(125.5));
    }

    #[tokio::test]
    async fn test_query_filters_by_owner() {
        let store = InMemoryDocumentStore::new();
        store.seed("goals", "a", doc(r#"{"id":"a","ownerId":"u1"}"#));
        store.seed("goals", "b", doc(r#"{"id":"b","ownerId":"u2"}"#));
        let hits = store
            .query("goals", &DocumentFilter::OwnerId("u1".into()))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["id"], "a");
    }
}
