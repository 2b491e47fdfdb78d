//! cPanel/WHM shared-hosting control panel client.
//!
//! The UAPI answers with `{metadata: {result: 1|0, reason}}`. A
//! misconfigured hostname or port typically lands on the login page, so a
//! non-JSON body is detected via `content-type` and reported as its own
//! error variant rather than a parse failure.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{
    CreatedMailbox, HostedMailboxClient, MailboxClient, MailboxRequest, PlatformError, is_non_json,
};
use crate::config::CpanelConfig;

const PLATFORM: &str = "cpanel";

/// Strip scheme, port and path from a configured hostname.
///
/// Accepts `https://example.com:2083/`, `http://example.com/some/path`,
/// `example.com:2083` and plain hostnames, all yielding `example.com`.
pub fn sanitize_hostname(input: &str) -> String {
    let trimmed = input.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    Url::parse(&with_scheme)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| {
            trimmed
                .split(['/', ':'])
                .next()
                .unwrap_or(trimmed)
                .to_string()
        })
}

pub struct CpanelClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    api_token: String,
    quota_mb: u32,
    timeout: Duration,
}

impl CpanelClient {
    pub fn from_config(config: &CpanelConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: format!("https://{}:2087", sanitize_hostname(&config.hostname)),
            username: config.username.clone(),
            api_token: config.api_token.clone(),
            quota_mb: config.quota_mb,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Point the client at a mock server.
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn execute(
        &self,
        function: &str,
        form: &[(&str, String)],
    ) -> Result<Value, PlatformError> {
        let url = format!("{}/execute/Email/{}", self.base_url, function);
        let response = self
            .client
            .post(&url)
            .header(
                http::header::AUTHORIZATION,
                format!("cpanel {}:{}", self.username, self.api_token),
            )
            .timeout(self.timeout)
            .form(form)
            .send()
            .await?;

        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if is_non_json(&content_type) {
            return Err(PlatformError::UnexpectedHtml {
                platform: PLATFORM,
                content_type,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse {
                platform: PLATFORM,
                message: e.to_string(),
            })?;

        if body["metadata"]["result"].as_i64() != Some(1) {
            let message = body["metadata"]["reason"]
                .as_str()
                .unwrap_or("unknown failure")
                .to_string();
            return Err(PlatformError::Rejected {
                platform: PLATFORM,
                message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl HostedMailboxClient for CpanelClient {
    /// Suspend a mailbox's logins without deleting it.
    #[tracing::instrument(skip(self), fields(platform = PLATFORM, %email))]
    async fn suspend_mailbox(&self, email: &str) -> Result<(), PlatformError> {
        self.execute("suspendpop", &[("email", email.to_string())])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MailboxClient for CpanelClient {
    #[tracing::instrument(
        skip(self, request),
        fields(platform = PLATFORM, local_part = %request.local_part)
    )]
    async fn create_mailbox(
        &self,
        request: &MailboxRequest,
    ) -> Result<CreatedMailbox, PlatformError> {
        self.execute(
            "addpop",
            &[
                ("email", request.local_part.clone()),
                ("domain", request.domain.clone()),
                ("password", request.password.clone()),
                ("quota", self.quota_mb.to_string()),
            ],
        )
        .await?;

        Ok(CreatedMailbox {
            email: request.address(),
        })
    }

    #[tracing::instrument(skip(self), fields(platform = PLATFORM, %email))]
    async fn delete_mailbox(&self, email: &str) -> Result<(), PlatformError> {
        let (local_part, domain) = email.split_once('@').unwrap_or((email, ""));
        self.execute(
            "delpop",
            &[
                ("email", local_part.to_string()),
                ("domain", domain.to_string()),
            ],
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://example.com:2083/", "example.com")]
    #[case("http://example.com/some/path", "example.com")]
    #[case("example.com:2083", "example.com")]
    #[case("example.com", "example.com")]
    #[case("  https://panel.example.com  ", "panel.example.com")]
    fn sanitizes_hostnames(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_hostname(input), expected);
    }
}
