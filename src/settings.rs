use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub sheet_base_url: Url,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    pub cache_ttl_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(Environment::with_prefix("APP").separator("_"))
            .set_default(
                "sheet_base_url",
                "https://docs.google.com/spreadsheets/d/schedule",
            )?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("cache_ttl_secs", 600)?
            .build()?;

        config.try_deserialize()
    }
}
