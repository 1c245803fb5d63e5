//! Wire types for the document API requests and responses.

use serde::{Deserialize, Serialize};

use nestegg_core::remote::{Document, TxOp, WriteOp};
use rust_decimal::Decimal;

/// Error code the API attaches when an operation referenced a document that
/// does not exist.
pub const MISSING_DOCUMENT_CODE: &str = "MISSING_DOCUMENT";

// ─────────────────────────────────────────────────────────────────────────────
// Batch Writes
// ─────────────────────────────────────────────────────────────────────────────

/// One write inside a `POST /v1/batch` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum WireWriteOp {
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

impl From<WriteOp> for WireWriteOp {
    fn from(op: WriteOp) -> Self {
        match op {
            WriteOp::Set {
                collection,
                id,
                document,
            } => WireWriteOp::Set {
                collection,
                id,
                document,
            },
            WriteOp::Update {
                collection,
                id,
                fields,
            } => WireWriteOp::Update {
                collection,
                id,
                fields,
            },
        }
    }
}

/// Body of `POST /v1/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub ops: Vec<WireWriteOp>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

/// One operation inside a `POST /v1/transactions` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum WireTxOp {
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
    /// Server-side read-modify-write: add `by` to the document's `field`.
    Increment {
        collection: String,
        id: String,
        field: String,
        by: Decimal,
    },
}

impl From<TxOp> for WireTxOp {
    fn from(op: TxOp) -> Self {
        match op {
            TxOp::Set {
                collection,
                id,
                document,
            } => WireTxOp::Set {
                collection,
                id,
                document,
            },
            TxOp::Update {
                collection,
                id,
                fields,
            } => WireTxOp::Update {
                collection,
                id,
                fields,
            },
            TxOp::Increment {
                collection,
                id,
                field,
                by,
            } => WireTxOp::Increment {
                collection,
                id,
                field,
                by,
            },
        }
    }
}

/// Body of `POST /v1/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub ops: Vec<WireTxOp>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────────────

/// Response body of a collection query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub documents: Vec<Document>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Error envelope the API returns on non-2xx statuses. Every field is
/// optional so arbitrary gateway errors still parse.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}
