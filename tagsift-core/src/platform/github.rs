//! GitHub client with retry logic

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::platform::Platform;
use crate::platform::config::GitHubConfig;
use crate::platform::errors::PlatformError;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// GitHub implementation of the Platform seam.
#[derive(Debug)]
pub struct GitHub {
    client: Client,
    cfg: GitHubConfig,
}

impl GitHub {
    pub fn new(cfg: GitHubConfig) -> Result<Self, PlatformError> {
        if cfg.owner.is_empty() || cfg.repo.is_empty() {
            return Err(PlatformError::MissingCoordinate {
                name: "github repository",
                flag: "--github-owner/--github-repo",
                env: "GITHUB_REPOSITORY",
            });
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|source| PlatformError::Transport { platform: "github", source })?;
        Ok(Self { client, cfg })
    }

    /// GET a JSON document, retrying transient failures with doubling
    /// backoff capped at 30 seconds. 4xx other than 429 fails
    /// immediately.
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
                            platform: "github",
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }
                    warn!(attempt, error = %err, "transient github error, retrying in {backoff:?}");
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_json_once(&self, url: &str) -> Result<Value, PlatformError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", "tagsift");
        if let Some(token) = &self.cfg.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|source| PlatformError::Transport { platform: "github", source })?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                platform: "github",
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|source| PlatformError::Transport { platform: "github", source })
    }
}

#[async_trait]
impl Platform for GitHub {
    /// Get the pull request body. When the Actions event payload already
    /// carried it, no HTTP request is made.
    async fn request_body(&self) -> Result<String, PlatformError> {
        if let Some(body) = &self.cfg.pull_request_body {
            debug!("using pull request body from the event payload");
            return Ok(body.clone());
        }
        let number = self.cfg.pull_request_number.ok_or(PlatformError::MissingCoordinate {
            name: "pull request number",
            flag: "--number",
            env: "GITHUB_EVENT_PATH",
        })?;
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.cfg.api_url, self.cfg.owner, self.cfg.repo, number
        );
        let value = self.get_json(&url).await?;
        Ok(body_field(&value))
    }

    /// Get the issue body.
    async fn issue_body(&self) -> Result<String, PlatformError> {
        let number = self.cfg.issue_number.ok_or(PlatformError::MissingCoordinate {
            name: "issue number",
            flag: "--number",
            env: "GITHUB_EVENT_PATH",
        })?;
        let url = format!(
            "{}/repos/{}/{}/issues/{}",
            self.cfg.api_url, self.cfg.owner, self.cfg.repo, number
        );
        let value = self.get_json(&url).await?;
        Ok(body_field(&value))
    }
}

/// A null `body` means the description was left empty.
fn body_field(value: &Value) -> String {
    value.get("body").and_then(Value::as_str).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GitHubConfig {
        GitHubConfig {
            owner: "owner".to_string(),
            repo: "repo".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_repository_coordinates() {
        let err = GitHub::new(GitHubConfig::default()).unwrap_err();
        assert!(matches!(err, PlatformError::MissingCoordinate { .. }));
    }

    #[tokio::test]
    async fn test_request_body_prefers_event_payload() {
        let cfg = GitHubConfig {
            pull_request_body: Some("BODY=from-event".to_string()),
            ..config()
        };
        let github = GitHub::new(cfg).unwrap();
        assert_eq!(github.request_body().await.unwrap(), "BODY=from-event");
    }

    #[tokio::test]
    async fn test_request_body_without_number_is_config_error() {
        let github = GitHub::new(config()).unwrap();
        let err = github.request_body().await.unwrap_err();
        assert!(matches!(err, PlatformError::MissingCoordinate { .. }));
    }

    #[tokio::test]
    async fn test_issue_body_without_number_is_config_error() {
        let github = GitHub::new(config()).unwrap();
        let err = github.issue_body().await.unwrap_err();
        assert!(matches!(err, PlatformError::MissingCoordinate { .. }));
    }

    #[test]
    fn test_body_field_handles_null() {
        assert_eq!(body_field(&serde_json::json!({ "body": null })), "");
        assert_eq!(body_field(&serde_json::json!({ "body": "text" })), "text");
        assert_eq!(body_field(&serde_json::json!({})), "");
    }
}
