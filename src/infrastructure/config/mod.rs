//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::services::visitor_service::SESSION_KEY;
use crate::infrastructure::geo::GEOJS_ENDPOINT;
use crate::infrastructure::llm::LLMConfig;

/// Site configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub site: SiteConfig,
    pub store: StoreConfig,
    pub geo: GeoConfig,
    pub llm: LLMConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SiteConfig {
    pub name: String,
    pub admin_passphrase: String,
    pub consent_delay_ms: u64,
    pub session_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StoreConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GeoConfig {
    pub ip_endpoint: String,
    pub device_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    pub prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Zetsu".to_string(),
            admin_passphrase: "admin".to_string(),
            consent_delay_ms: 3000,
            session_key: SESSION_KEY.to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://zetsu-4e871-default-rtdb.firebaseio.com".to_string(),
            auth_token: None,
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            ip_endpoint: GEOJS_ENDPOINT.to_string(),
            device_timeout_ms: 10_000,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prefix: "/".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables where set
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("ZETSU_STORE_URL") {
            self.store.base_url = url;
        }

        if let Ok(token) = std::env::var("ZETSU_STORE_AUTH") {
            self.store.auth_token = Some(token);
        }

        if let Ok(passphrase) = std::env::var("ZETSU_ADMIN_PASSPHRASE") {
            self.site.admin_passphrase = passphrase;
        }

        self.llm.apply_env();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("store.base-url".to_string()));
        }
        if !self.store.base_url.starts_with("http://") && !self.store.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(format!("store.base-url: {}", self.store.base_url)));
        }
        if self.site.admin_passphrase.is_empty() {
            return Err(ConfigError::MissingField("site.admin-passphrase".to_string()));
        }
        if self.console.prefix.is_empty() {
            return Err(ConfigError::MissingField("console.prefix".to_string()));
        }
        Ok(())
    }

    pub fn consent_delay(&self) -> Duration {
        Duration::from_millis(self.site.consent_delay_ms)
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_millis(self.geo.device_timeout_ms)
    }
}
