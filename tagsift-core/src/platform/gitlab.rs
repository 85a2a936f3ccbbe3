//! GitLab client with retry logic

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;
use tracing::warn;

use crate::platform::Platform;
use crate::platform::config::GitLabConfig;
use crate::platform::errors::PlatformError;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// GitLab implementation of the Platform seam.
#[derive(Debug)]
pub struct GitLab {
    client: Client,
    cfg: GitLabConfig,
}

impl GitLab {
    pub fn new(cfg: GitLabConfig) -> Result<Self, PlatformError> {
        if cfg.project_id.is_empty() {
            return Err(PlatformError::MissingCoordinate {
                name: "gitlab project",
                flag: "--gitlab-project-id",
                env: "CI_PROJECT_ID",
            });
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|source| PlatformError::Transport { platform: "gitlab", source })?;
        Ok(Self { client, cfg })
    }

    async fn get_json(&self, url: &str) -> Result<Value, PlatformError> {
        let mut attempt = 0;
        let mut backoff = Duration::from_millis(self.cfg.initial_retry_delay_ms);
        loop {
            match self.get_json_once(url).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    attempt += 1;
                    if attempt > self.cfg.max_retries {
                        return Err(PlatformError::RetriesExhausted {
                            platform: "gitlab",
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }
                    warn!(attempt, error = %err, "transient gitlab error, retrying in {backoff:?}");
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_json_once(&self, url: &str) -> Result<Value, PlatformError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.cfg.token {
            request = request.header("PRIVATE-TOKEN", token);
        }
        let response = request
            .send()
            .await
            .map_err(|source| PlatformError::Transport { platform: "gitlab", source })?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                platform: "gitlab",
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|source| PlatformError::Transport { platform: "gitlab", source })
    }
}

#[async_trait]
impl Platform for GitLab {
    /// Get the merge request description.
    async fn request_body(&self) -> Result<String, PlatformError> {
        let iid = self.cfg.merge_request_iid.ok_or(PlatformError::MissingCoordinate {
            name: "merge request iid",
            flag: "--number",
            env: "CI_MERGE_REQUEST_IID",
        })?;
        let url = format!(
            "{}/projects/{}/merge_requests/{}",
            self.cfg.api_url, self.cfg.project_id, iid
        );
        let value = self.get_json(&url).await?;
        Ok(description_field(&value))
    }

    /// Get the issue description.
    async fn issue_body(&self) -> Result<String, PlatformError> {
        let iid = self.cfg.issue_iid.ok_or(PlatformError::MissingCoordinate {
            name: "issue iid",
            flag: "--number",
            env: "CI_PROJECT_ID",
        })?;
        let url =
            format!("{}/projects/{}/issues/{}", self.cfg.api_url, self.cfg.project_id, iid);
        let value = self.get_json(&url).await?;
        Ok(description_field(&value))
    }
}

/// A null `description` means the description was left empty.
fn description_field(value: &Value) -> String {
    value.get("description").and_then(Value::as_str).unwrap_or_default().to_string()
}
