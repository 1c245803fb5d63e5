use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_THEME, DEFAULT_USER_NAME};

pub const SETTING_CURRENCY: &str = "currency";
pub const SETTING_THEME: &str = "theme";
pub const SETTING_NOTIFICATIONS_ENABLED: &str = "notificationsEnabled";
pub const SETTING_LAST_SYNC_TIME: &str = "lastSyncTime";
pub const SETTING_USER_NAME: &str = "userName";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub preferred_currency: String,
    pub theme: String,
    pub notifications_enabled: bool,
    pub user_name: String,
    /// Epoch milliseconds of the last successful reconcile, 0 when never run.
    pub last_sync_time: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preferred_currency: DEFAULT_CURRENCY.to_string(),
            theme: DEFAULT_THEME.to_string(),
            notifications_enabled: true,
            user_name: DEFAULT_USER_NAME.to_string(),
            last_sync_time: 0,
        }
    }
}

impl Settings {
    /// Folds raw key/value rows into a typed snapshot, keeping the default
    /// for any key that is absent or unparseable.
    pub fn from_entries<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
        let mut settings = Settings::default();
        for (key, value) in entries {
            match key {
                SETTING_CURRENCY => settings.preferred_currency = value.to_string(),
                SETTING_THEME => settings.theme = value.to_string(),
                SETTING_NOTIFICATIONS_ENABLED => {
                    settings.notifications_enabled = value.parse().unwrap_or(true)
                }
                SETTING_USER_NAME => settings.user_name = value.to_string(),
                SETTING_LAST_SYNC_TIME => settings.last_sync_time = value.parse().unwrap_or(0),
                _ => {}
            }
        }
        settings
    }
}
