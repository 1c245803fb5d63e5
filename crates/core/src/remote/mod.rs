pub(crate) mod documents;
pub(crate) mod gateway;
pub(crate) mod memory_store;
pub(crate) mod remote_error;
pub(crate) mod store;

// Re-export the public interface
pub use documents::{deposit_to_document, goal_from_document, goal_to_document};
pub use gateway::RemoteGateway;
pub use memory_store::InMemoryDocumentStore;
pub use remote_error::{RemoteError, RemoteResult};
pub use store::{Document, DocumentFilter, RemoteDocumentStore, TxOp, WriteOp};
