//! Notifications module.
//!
//! Provides notification payload types and the notifier trait the mutation
//! pipeline emits through. Runtime adapters implement the trait to deliver
//! platform notifications; delivery is always best-effort.

mod notification;
mod notifier;

pub use notification::*;
pub use notifier::*;
