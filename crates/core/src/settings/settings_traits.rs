//! Repository trait for the preference store.

use async_trait::async_trait;

use crate::errors::Result;
use crate::settings::Settings;

/// Repository trait for durable scalar preferences.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get all settings, falling back to defaults for absent keys.
    fn get_settings(&self) -> Result<Settings>;

    /// Get a single setting value by key. Fails with a not-found database
    /// error when the key has never been written.
    fn get_setting(&self, setting_key: &str) -> Result<String>;

    /// Update a single setting.
    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;

    /// Remove every stored setting.
    async fn clear_all(&self) -> Result<()>;
}
