//! In-memory preference store for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{DatabaseError, Result};
use crate::settings::{Settings, SettingsRepositoryTrait};

#[derive(Default)]
pub struct InMemorySettingsRepository {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepositoryTrait for InMemorySettingsRepository {
    fn get_settings(&self) -> Result<Settings> {
        let values = self.values.lock().unwrap();
        Ok(Settings::from_entries(
            values.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ))
    }

    fn get_setting(&self, setting_key: &str) -> Result<String> {
        self.values
            .lock()
            .unwrap()
            .get(setting_key)
            .cloned()
            .ok_or_else(|| {
                DatabaseError::NotFound(format!("Setting '{setting_key}' not found")).into()
            })
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(setting_key.to_string(), setting_value.to_string());
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.values.lock().unwrap().clear();
        Ok(())
    }
}
