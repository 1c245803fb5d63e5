//! SQLite storage implementation for NestEgg.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in `nestegg-core`
//! and contains:
//! - Database connection pooling and the single-writer actor
//! - Diesel migrations
//! - Repository implementations for goals, deposits, and settings
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. Everything else is database-agnostic and works with the traits.
//!
//! ```text
//!       core (domain, sync)
//!               │
//!               ▼
//!    storage-sqlite (this crate)
//!               │
//!               ▼
//!           SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod deposits;
pub mod goals;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_db;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from nestegg-core for convenience
pub use nestegg_core::errors::{DatabaseError, Error, Result};
