//! Nestegg Core - Domain entities, services, and traits.
//!
//! This crate contains the offline-first sync core for Nestegg: goal and
//! deposit models, the mutation services, the reconciler and the push
//! outbox. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` and `remote-http` crates.

pub mod constants;
pub mod deposits;
pub mod errors;
pub mod fx;
pub mod goals;
pub mod milestones;
pub mod notifications;
pub mod observe;
pub mod remote;
pub mod session;
pub mod settings;
pub mod sync;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
