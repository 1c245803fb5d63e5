pub(crate) mod memory_repository;
pub(crate) mod settings_model;
pub(crate) mod settings_service;
pub(crate) mod settings_traits;

#[cfg(test)]
mod settings_service_tests;

// Re-export the public interface
pub use memory_repository::InMemorySettingsRepository;
pub use settings_model::*;
pub use settings_service::{SettingsService, SettingsServiceTrait};
pub use settings_traits::SettingsRepositoryTrait;
