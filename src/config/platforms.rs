use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Mailcow mail server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailcowConfig {
    /// Base URL of the mailcow instance, e.g. `https://mail.example.com`.
    pub instance_url: String,

    /// Admin API key (`X-API-Key` header).
    pub api_key: String,

    /// Domain new mailboxes are created under.
    pub domain: String,

    /// Mailbox quota in megabytes.
    #[serde(default = "default_quota")]
    pub quota_mb: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Chatwoot chat platform connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatwootConfig {
    /// Base URL of the Chatwoot instance.
    pub instance_url: String,

    /// Account-scoped API access token (`api_access_token` header).
    pub api_token: String,

    /// Numeric Chatwoot account id.
    pub account_id: i64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// cPanel/WHM shared-hosting control panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpanelConfig {
    /// Server hostname. Scheme, port and path are tolerated and stripped.
    pub hostname: String,

    /// cPanel account username.
    pub username: String,

    /// API token (`Authorization: cpanel user:token`).
    pub api_token: String,

    /// Domain new mailboxes are created under.
    pub domain: String,

    /// Mailbox quota in megabytes.
    #[serde(default = "default_quota")]
    pub quota_mb: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl MailcowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require(&self.instance_url, "mailcow.instance_url")?;
        require(&self.api_key, "mailcow.api_key")?;
        require(&self.domain, "mailcow.domain")
    }
}

impl ChatwootConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require(&self.instance_url, "chatwoot.instance_url")?;
        require(&self.api_token, "chatwoot.api_token")
    }
}

impl CpanelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require(&self.hostname, "cpanel.hostname")?;
        require(&self.username, "cpanel.username")?;
        require(&self.api_token, "cpanel.api_token")?;
        require(&self.domain, "cpanel.domain")
    }
}

fn require(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Validation(format!("{field} cannot be empty")))
    } else {
        Ok(())
    }
}

fn default_quota() -> u32 {
    1024
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
