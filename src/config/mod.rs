mod database;
mod logging;
mod platforms;
mod server;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use platforms::{ChatwootConfig, CpanelConfig, MailcowConfig};
pub use server::ServerConfig;

/// Top-level application configuration, loaded from a TOML file.
///
/// Platform sections are optional; a missing or disabled section means the
/// corresponding provisioning step is reported as not configured when
/// requested, without affecting the rest of the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub mailcow: Option<MailcowConfig>,

    #[serde(default)]
    pub chatwoot: Option<ChatwootConfig>,

    #[serde(default)]
    pub cpanel: Option<CpanelConfig>,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;
        Self::from_str(&contents)
    }

    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        if let Some(mailcow) = self.mailcow.as_ref().filter(|c| c.enabled) {
            mailcow.validate()?;
        }
        if let Some(chatwoot) = self.chatwoot.as_ref().filter(|c| c.enabled) {
            chatwoot.validate()?;
        }
        if let Some(cpanel) = self.cpanel.as_ref().filter(|c| c.enabled) {
            cpanel.validate()?;
        }
        Ok(())
    }

    /// The mailcow section, if present and enabled.
    pub fn mailcow_enabled(&self) -> Option<&MailcowConfig> {
        self.mailcow.as_ref().filter(|c| c.enabled)
    }

    /// The chatwoot section, if present and enabled.
    pub fn chatwoot_enabled(&self) -> Option<&ChatwootConfig> {
        self.chatwoot.as_ref().filter(|c| c.enabled)
    }

    /// The cpanel section, if present and enabled.
    pub fn cpanel_enabled(&self) -> Option<&CpanelConfig> {
        self.cpanel.as_ref().filter(|c| c.enabled)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config = AppConfig::from_str(
            r#"
            [database]
            path = ":memory:"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8090);
        assert!(config.mailcow_enabled().is_none());
    }

    #[test]
    fn loads_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin-hub.toml");
        std::fs::write(&path, "[database]\npath = \"hub.db\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.database.path, "hub.db");

        let err = AppConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn disabled_platform_skips_validation_and_lookup() {
        let config = AppConfig::from_str(
            r#"
            [database]
            path = "hub.db"

            [mailcow]
            instance_url = ""
            api_key = ""
            domain = ""
            enabled = false
            "#,
        )
        .unwrap();
        assert!(config.mailcow_enabled().is_none());
    }

    #[test]
    fn rejects_empty_required_field() {
        let err = AppConfig::from_str(
            r#"
            [database]
            path = "hub.db"

            [chatwoot]
            instance_url = "https://chat.example.com"
            api_token = ""
            account_id = 1
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = AppConfig::from_str(
            r#"
            [database]
            path = "hub.db"
            flavour = "strawberry"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
