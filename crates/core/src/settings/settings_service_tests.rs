#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::settings::{InMemorySettingsRepository, SettingsService, SettingsServiceTrait};

    fn service() -> SettingsService {
        SettingsService::new(Arc::new(InMemorySettingsRepository::new()))
    }

    // ==================== Defaults ====================

    #[test]
    fn test_defaults_when_nothing_stored() {
        let service = service();
        assert_eq!(service.get_preferred_currency().unwrap(), "GBP");
        assert_eq!(service.get_theme().unwrap(), "light");
        assert!(service.notifications_enabled().unwrap());
        assert_eq!(service.get_user_name().unwrap(), "User");
        assert_eq!(service.get_last_sync_time().unwrap(), 0);
    }

    #[test]
    fn test_get_settings_assembles_defaults() {
        let settings = service().get_settings().unwrap();
        assert_eq!(settings.preferred_currency, "GBP");
        assert_eq!(settings.theme, "light");
        assert!(settings.notifications_enabled);
    }

    // ==================== Writes ====================

    #[tokio::test]
    async fn test_set_and_get_preferred_currency() {
        let service = service();
        service.set_preferred_currency("EUR").await.unwrap();
        assert_eq!(service.get_preferred_currency().unwrap(), "EUR");
        assert_eq!(service.get_settings().unwrap().preferred_currency, "EUR");
    }

    #[tokio::test]
    async fn test_toggle_theme_flips_between_light_and_dark() {
        let service = service();
        assert_eq!(service.toggle_theme().await.unwrap(), "dark");
        assert_eq!(service.get_theme().unwrap(), "dark");
        assert_eq!(service.toggle_theme().await.unwrap(), "light");
    }

    #[tokio::test]
    async fn test_update_user_name_trims_whitespace() {
        let service = service();
        service.update_user_name("  Alex  ").await.unwrap();
        assert_eq!(service.get_user_name().unwrap(), "Alex");
    }

    #[tokio::test]
    async fn test_update_user_name_rejects_blank() {
        let service = service();
        assert!(service.update_user_name("   ").await.is_err());
        assert_eq!(service.get_user_name().unwrap(), "User");
    }

    #[tokio::test]
    async fn test_notifications_toggle_round_trip() {
        let service = service();
        service.set_notifications_enabled(false).await.unwrap();
        assert!(!service.notifications_enabled().unwrap());
    }

    #[tokio::test]
    async fn test_last_sync_time_round_trip() {
        let service = service();
        service.set_last_sync_time(1_700_000_000_000).await.unwrap();
        assert_eq!(service.get_last_sync_time().unwrap(), 1_700_000_000_000);
    }

    // ==================== Clearing ====================

    #[tokio::test]
    async fn test_clear_all_restores_defaults() {
        let service = service();
        service.set_preferred_currency("USD").await.unwrap();
        service.update_user_name("Alex").await.unwrap();
        service.set_last_sync_time(42).await.unwrap();

        service.clear_all().await.unwrap();

        assert_eq!(service.get_preferred_currency().unwrap(), "GBP");
        assert_eq!(service.get_user_name().unwrap(), "User");
        assert_eq!(service.get_last_sync_time().unwrap(), 0);
    }
}
