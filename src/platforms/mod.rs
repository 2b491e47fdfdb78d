//! Outbound clients for the integrated platforms.
//!
//! Each client builds the platform-specific request (headers, encoding,
//! endpoint path) and classifies non-success or malformed responses into a
//! `PlatformError` value, so the provisioning orchestrator can treat
//! remote failures as data instead of exceptions.

mod chatwoot;
mod cpanel;
mod mailcow;

pub use chatwoot::{ChatwootClient, CreatedAgent};
pub use cpanel::{CpanelClient, sanitize_hostname};
pub use mailcow::MailcowClient;

use async_trait::async_trait;
use thiserror::Error;

/// Error returned by a platform client.
///
/// `Rejected` means the platform processed the request and said no;
/// `UnexpectedHtml` means the response was not JSON at all, which almost
/// always indicates a misconfigured hostname or port pointing at a login
/// page rather than the API.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{platform} rejected the request: {message}")]
    Rejected {
        platform: &'static str,
        message: String,
    },

    #[error(
        "{platform} returned {content_type} instead of JSON; \
         check the configured instance URL and port"
    )]
    UnexpectedHtml {
        platform: &'static str,
        content_type: String,
    },

    #[error("{platform} returned an unparseable response: {message}")]
    InvalidResponse {
        platform: &'static str,
        message: String,
    },
}

/// Identity to create a remote account for.
#[derive(Debug, Clone)]
pub struct MailboxRequest {
    pub local_part: String,
    pub domain: String,
    pub password: String,
    pub display_name: String,
}

impl MailboxRequest {
    pub fn address(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }
}

/// A remote mailbox the platform confirmed it created.
#[derive(Debug, Clone)]
pub struct CreatedMailbox {
    /// Full address as returned (or confirmed) by the platform.
    pub email: String,
}

/// Client for a platform that hosts mailboxes.
///
/// Creation is not idempotent on any of the integrated platforms; callers
/// must avoid duplicate create calls.
#[async_trait]
pub trait MailboxClient: Send + Sync {
    async fn create_mailbox(&self, request: &MailboxRequest) -> Result<CreatedMailbox, PlatformError>;
    async fn delete_mailbox(&self, email: &str) -> Result<(), PlatformError>;
}

/// Mailbox host that can also suspend logins without deleting the
/// account. Only the shared-hosting platform supports this today.
#[async_trait]
pub trait HostedMailboxClient: MailboxClient {
    async fn suspend_mailbox(&self, email: &str) -> Result<(), PlatformError>;
}

/// Client for the chat/support platform.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn create_agent(&self, name: &str, email: &str) -> Result<CreatedAgent, PlatformError>;
    async fn add_agent_to_team(&self, agent_id: i64, team_id: i64) -> Result<(), PlatformError>;
    async fn delete_agent(&self, agent_id: i64) -> Result<(), PlatformError>;
}

/// Returns true when a response `content-type` is not JSON.
pub(crate) fn is_non_json(content_type: &str) -> bool {
    !content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .eq_ignore_ascii_case("application/json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_detection() {
        assert!(!is_non_json("application/json"));
        assert!(!is_non_json("application/json; charset=utf-8"));
        assert!(is_non_json("text/html"));
        assert!(is_non_json("text/html; charset=iso-8859-1"));
        assert!(is_non_json(""));
    }
}
