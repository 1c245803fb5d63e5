//! The remote document store collaborator interface.
//!
//! The remote service is a black-box document store reached over the network.
//! This trait is the entire surface the sync core needs from it; production
//! code implements it over HTTP, tests implement it in memory.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::RemoteResult;

/// A schemaless remote document.
pub type Document = Map<String, Value>;

/// Server-side filter for [`RemoteDocumentStore::query`].
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentFilter {
    /// All documents whose `ownerId` field equals the given id.
    OwnerId(String),
}

/// A single write in a batch commit.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Create or replace the whole document.
    Set {
        collection: String,
        id: String,
        document: Document,
    },
    /// Merge the given fields into an existing document.
    Update {
        collection: String,
        id: String,
        fields: Document,
    },
}

/// A single operation inside an atomic read-modify-write transaction.
///
/// `Increment` is the reason transactions exist here: it adds a delta to the
/// document's then-current numeric field value on the server, so concurrent
/// writers converge on the sum instead of clobbering each other.
#[derive(Debug, Clone)]
pub enum TxOp {
    /// Create or replace the whole document.
    Set {
        collection: String,
        id: String,
        document: Document,
    },
    /// Merge the given fields into an existing document. Fails the
    /// transaction with [`super::RemoteError::MissingDocument`] when the
    /// document does not exist.
    Update {
        collection: String,
        id: String,
        fields: Document,
    },
    /// Read the document's current `field` value, add `by`, write it back.
    /// Fails the transaction when the document does not exist.
    Increment {
        collection: String,
        id: String,
        field: String,
        by: Decimal,
    },
}

/// Minimal collaborator interface over the remote store's network API.
///
/// Every method is a suspension point and may fail with a distinguishable
/// offline error; callers must tolerate arbitrary latency and outright
/// failure without blocking any local write path.
#[async_trait]
pub trait RemoteDocumentStore: Send + Sync {
    /// Fetch one document. `Ok(None)` when it does not exist.
    async fn get(&self, collection: &str, id: &str) -> RemoteResult<Option<Document>>;

    /// Fetch all documents in `collection` matching `filter`.
    async fn query(&self, collection: &str, filter: &DocumentFilter) -> RemoteResult<Vec<Document>>;

    /// Create or replace one document.
    async fn set(&self, collection: &str, id: &str, document: Document) -> RemoteResult<()>;

    /// Merge fields into an existing document.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> RemoteResult<()>;

    /// Commit several writes atomically (no server-side reads).
    async fn run_batch(&self, ops: Vec<WriteOp>) -> RemoteResult<()>;

    /// Run a read-modify-write transaction: all ops commit or none do.
    async fn run_transaction(&self, ops: Vec<TxOp>) -> RemoteResult<()>;
}
