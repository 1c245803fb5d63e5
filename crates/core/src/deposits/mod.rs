pub(crate) mod deposits_model;
pub(crate) mod deposits_service;
pub(crate) mod deposits_traits;
pub(crate) mod memory_repository;

#[cfg(test)]
mod deposits_service_tests;

// Re-export the public interface
pub use deposits_model::{new_deposit_id, Deposit, DepositOutcome};
pub use deposits_service::DepositService;
pub use deposits_traits::{DepositRepositoryTrait, DepositServiceTrait};
pub use memory_repository::InMemoryDepositRepository;
