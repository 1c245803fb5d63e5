//! NestEgg Remote HTTP - REST implementations of the remote collaborators.
//!
//! This crate provides the document store client the sync core pushes to and
//! pulls from, plus the Frankfurter-backed conversion-rate provider. It is
//! the only crate in the workspace that talks to the network.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nestegg_remote_http::HttpDocumentStore;
//!
//! let store = HttpDocumentStore::new("https://api.nestegg.app")
//!     .with_auth_token("access_token");
//! let document = store.get("goals", "goal_1").await?;
//! ```

mod client;
mod rates;
mod types;

pub use client::HttpDocumentStore;
pub use rates::{FrankfurterRateProvider, FRANKFURTER_BASE_URL};
pub use types::*;
