//! Mailcow mail server client.
//!
//! Mailcow's admin API answers every call with a JSON array of result
//! objects; an error is signalled by `[0].type == "error"` with a
//! human-readable `msg`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{CreatedMailbox, MailboxClient, MailboxRequest, PlatformError, is_non_json};
use crate::config::MailcowConfig;

const PLATFORM: &str = "mailcow";

pub struct MailcowClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    quota_mb: u32,
    timeout: Duration,
}

impl MailcowClient {
    pub fn from_config(config: &MailcowConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.instance_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            quota_mb: config.quota_mb,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Vec<Value>, PlatformError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(&body)
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

        let results: Vec<Value> =
            response
                .json()
                .await
                .map_err(|e| PlatformError::InvalidResponse {
                    platform: PLATFORM,
                    message: e.to_string(),
                })?;

        if let Some(first) = results.first()
            && first["type"].as_str() == Some("error")
        {
            let message = match &first["msg"] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(PlatformError::Rejected {
                platform: PLATFORM,
                message,
            });
        }

        Ok(results)
    }
}

#[async_trait]
impl MailboxClient for MailcowClient {
    #[tracing::instrument(
        skip(self, request),
        fields(platform = PLATFORM, local_part = %request.local_part)
    )]
    async fn create_mailbox(
        &self,
        request: &MailboxRequest,
    ) -> Result<CreatedMailbox, PlatformError> {
        self.post(
            "/api/v1/add/mailbox",
            json!({
                "local_part": request.local_part,
                "domain": request.domain,
                "password": request.password,
                "password2": request.password,
                "name": request.display_name,
                "active": "1",
                "quota": self.quota_mb,
            }),
        )
        .await?;

        Ok(CreatedMailbox {
            email: request.address(),
        })
    }

    #[tracing::instrument(skip(self), fields(platform = PLATFORM, %email))]
    async fn delete_mailbox(&self, email: &str) -> Result<(), PlatformError> {
        self.post("/api/v1/delete/mailbox", json!([email])).await?;
        Ok(())
    }
}
