use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub whatsapp: WhatsAppSettings,
    pub notification: NotificationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WhatsAppSettings {
    pub base_url: String,
    pub api_key: String,
    /// Fixed pause between the message text and its payment follow-up.
    pub followup_pause_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    /// Queued entries picked up per drain cycle.
    pub drain_batch_size: u32,
    /// Randomized throttle between outbound messages, in seconds.
    pub throttle_min_secs: u64,
    pub throttle_max_secs: u64,
    /// Cron expressions for the two background jobs.
    pub scan_cron: String,
    pub drain_cron: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("COBRANCA"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "cobranca")?
            .set_default("whatsapp.base_url", "http://localhost:8080")?
            .set_default("whatsapp.api_key", "")?
            .set_default("whatsapp.followup_pause_secs", 3)?
            .set_default("notification.drain_batch_size", 1)?
            .set_default("notification.throttle_min_secs", 15)?
            .set_default("notification.throttle_max_secs", 30)?
            // Top of every hour / every minute.
            .set_default("notification.scan_cron", "0 0 * * * *")?
            .set_default("notification.drain_cron", "0 * * * * *")?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
