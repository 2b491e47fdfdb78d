//! Chatwoot chat/support platform client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ChatClient, PlatformError, is_non_json};
use crate::config::ChatwootConfig;

const PLATFORM: &str = "chatwoot";

/// Agent record Chatwoot returns from a create call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedAgent {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
}

pub struct ChatwootClient {
    client: reqwest::Client,
    base_url: String,
    account_id: i64,
    api_token: String,
    timeout: Duration,
}

impl ChatwootClient {
    pub fn from_config(config: &ChatwootConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.instance_url.trim_end_matches('/').to_string(),
            account_id: config.account_id,
            api_token: config.api_token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, PlatformError> {
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

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body["message"]
                .as_str()
                .or_else(|| body["error"].as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(PlatformError::Rejected {
                platform: PLATFORM,
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatClient for ChatwootClient {
    #[tracing::instrument(skip(self), fields(platform = PLATFORM, %email))]
    async fn create_agent(&self, name: &str, email: &str) -> Result<CreatedAgent, PlatformError> {
        let url = format!(
            "{}/api/v1/accounts/{}/agents",
            self.base_url, self.account_id
        );
        let response = self
            .client
            .post(&url)
            .header("api_access_token", &self.api_token)
            .timeout(self.timeout)
            .json(&json!({
                "name": name,
                "email": email,
                "role": "agent",
                "availability_status": "available",
                "auto_offline": true,
            }))
            .send()
            .await?;

        let response = self.check(response).await?;
        response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse {
                platform: PLATFORM,
                message: e.to_string(),
            })
    }

    #[tracing::instrument(skip(self), fields(platform = PLATFORM, agent_id, team_id))]
    async fn add_agent_to_team(&self, agent_id: i64, team_id: i64) -> Result<(), PlatformError> {
        let url = format!(
            "{}/api/v1/accounts/{}/teams/{}/team_members",
            self.base_url, self.account_id, team_id
        );
        let response = self
            .client
            .post(&url)
            .header("api_access_token", &self.api_token)
            .timeout(self.timeout)
            .json(&json!({ "user_ids": [agent_id] }))
            .send()
            .await?;

        self.check(response).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(platform = PLATFORM, agent_id))]
    async fn delete_agent(&self, agent_id: i64) -> Result<(), PlatformError> {
        let url = format!(
            "{}/api/v1/accounts/{}/agents/{}",
            self.base_url, self.account_id, agent_id
        );
        let response = self
            .client
            .delete(&url)
            .header("api_access_token", &self.api_token)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Rejected {
                platform: PLATFORM,
                message: format!("HTTP {status}"),
            });
        }
        Ok(())
    }
}
