use super::settings_model::{
    SETTING_CURRENCY, SETTING_LAST_SYNC_TIME, SETTING_NOTIFICATIONS_ENABLED, SETTING_THEME,
    SETTING_USER_NAME,
};
use super::SettingsRepositoryTrait;
use crate::constants::{DEFAULT_CURRENCY, DEFAULT_THEME, DEFAULT_USER_NAME};
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use crate::settings::Settings;
use async_trait::async_trait;
use std::sync::Arc;

// Define the trait for SettingsService
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;

    fn get_preferred_currency(&self) -> Result<String>;

    async fn set_preferred_currency(&self, currency_code: &str) -> Result<()>;

    fn get_theme(&self) -> Result<String>;

    /// Flips the theme between light and dark, returning the new value.
    async fn toggle_theme(&self) -> Result<String>;

    fn get_user_name(&self) -> Result<String>;

    async fn update_user_name(&self, user_name: &str) -> Result<()>;

    fn notifications_enabled(&self) -> Result<bool>;

    async fn set_notifications_enabled(&self, enabled: bool) -> Result<()>;

    /// Epoch milliseconds of the last successful reconcile, 0 when never run.
    fn get_last_sync_time(&self) -> Result<i64>;

    async fn set_last_sync_time(&self, timestamp_millis: i64) -> Result<()>;

    /// Remove every stored preference, restoring defaults on next read.
    async fn clear_all(&self) -> Result<()>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

// Implement the trait for SettingsService
#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        self.settings_repository.get_settings()
    }

    fn get_preferred_currency(&self) -> Result<String> {
        self.get_string(SETTING_CURRENCY, DEFAULT_CURRENCY)
    }

    async fn set_preferred_currency(&self, currency_code: &str) -> Result<()> {
        self.settings_repository
            .update_setting(SETTING_CURRENCY, currency_code)
            .await
    }

    fn get_theme(&self) -> Result<String> {
        self.get_string(SETTING_THEME, DEFAULT_THEME)
    }

    async fn toggle_theme(&self) -> Result<String> {
        let new_theme = if self.get_theme()? == "light" {
            "dark"
        } else {
            "light"
        };
        self.settings_repository
            .update_setting(SETTING_THEME, new_theme)
            .await?;
        Ok(new_theme.to_string())
    }

    fn get_user_name(&self) -> Result<String> {
        self.get_string(SETTING_USER_NAME, DEFAULT_USER_NAME)
    }

    async fn update_user_name(&self, user_name: &str) -> Result<()> {
        let trimmed = user_name.trim();
        if trimmed.is_empty() {
            return Err(
                ValidationError::InvalidInput("User name cannot be blank".to_string()).into(),
            );
        }
        self.settings_repository
            .update_setting(SETTING_USER_NAME, trimmed)
            .await
    }

    fn notifications_enabled(&self) -> Result<bool> {
        match self.settings_repository.get_setting(SETTING_NOTIFICATIONS_ENABLED) {
            Ok(value) => Ok(value.parse().unwrap_or(true)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(true),
            Err(e) => Err(e),
        }
    }

    async fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.settings_repository
            .update_setting(SETTING_NOTIFICATIONS_ENABLED, &enabled.to_string())
            .await
    }

    fn get_last_sync_time(&self) -> Result<i64> {
        match self.settings_repository.get_setting(SETTING_LAST_SYNC_TIME) {
            Ok(value) => Ok(value.parse().unwrap_or(0)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(0),
            Err(e) => Err(e),
        }
    }

    async fn set_last_sync_time(&self, timestamp_millis: i64) -> Result<()> {
        self.settings_repository
            .update_setting(SETTING_LAST_SYNC_TIME, &timestamp_millis.to_string())
            .await
    }

    async fn clear_all(&self) -> Result<()> {
        self.settings_repository.clear_all().await
    }
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }

    fn get_string(&self, key: &str, default: &str) -> Result<String> {
        match self.settings_repository.get_setting(key) {
            Ok(value) => Ok(value),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(default.to_string()),
            Err(e) => Err(e),
        }
    }
}
