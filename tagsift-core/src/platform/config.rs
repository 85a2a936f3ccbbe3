//! Platform selection and target coordinates
//!
//! Coordinates are resolved once, at configuration-build time, from the
//! CI environment; CLI flags override individual fields afterwards. The
//! clients themselves never look at the environment.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::platform::errors::PlatformError;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_GITLAB_API_URL: &str = "https://gitlab.com/api/v4";

/// Merge queue branches look like
/// `refs/heads/gh-readonly-queue/<branch>/pr-123`; the trailing number
/// is the pull request being merged.
static MERGE_GROUP_HEAD_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^refs/heads/gh-readonly-queue/.+/pr-(\d+)$").expect("Invalid regex pattern")
});

/// Code review platforms tagsift can fetch from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformType {
    GitHub,
    GitLab,
}

impl PlatformType {
    /// Allowed flag spellings, sorted for help text.
    pub const ALLOWED: [&'static str; 2] = ["github", "gitlab"];

    /// Resolve the platform type from an optional flag value, falling
    /// back to the well-known CI environment variables when unset.
    pub fn resolve(flag: Option<&str>) -> Result<Self, PlatformError> {
        if let Some(value) = flag {
            return value.parse();
        }
        if env_flag("GITLAB_CI") {
            return Ok(Self::GitLab);
        }
        if env_flag("GITHUB_ACTIONS") {
            return Ok(Self::GitHub);
        }
        Err(PlatformError::UnspecifiedPlatform)
    }
}

impl FromStr for PlatformType {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(Self::GitHub),
            "gitlab" => Ok(Self::GitLab),
            other => Err(PlatformError::UnknownPlatform { value: other.to_string() }),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "t" | "true"))
        .unwrap_or(false)
}

/// Configuration needed to build a platform client.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub platform_type: PlatformType,
    pub github: GitHubConfig,
    pub gitlab: GitLabConfig,
}

impl PlatformConfig {
    /// Load both platform configs from the environment for the resolved
    /// type. Only the selected platform's config is ever used, but both
    /// are cheap to populate.
    pub fn from_env(platform_type: PlatformType) -> Result<Self, PlatformError> {
        Ok(Self {
            platform_type,
            github: GitHubConfig::from_env()?,
            gitlab: GitLabConfig::from_env(),
        })
    }
}

/// Config values for the GitHub client.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub pull_request_number: Option<u64>,
    pub issue_number: Option<u64>,
    /// Body carried in the Actions event payload. When present the
    /// client returns it directly and skips the HTTP fetch.
    pub pull_request_body: Option<String>,
    pub api_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub initial_retry_delay_ms: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            pull_request_number: None,
            issue_number: None,
            pull_request_body: None,
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            token: None,
            timeout_secs: 30,
            max_retries: 3,
            initial_retry_delay_ms: 500,
        }
    }
}

impl GitHubConfig {
    /// Build a config from the GitHub Actions environment: repository
    /// coordinates from GITHUB_REPOSITORY, target number and body from
    /// the event payload, token from GITHUB_TOKEN.
    pub fn from_env() -> Result<Self, PlatformError> {
        let repository = std::env::var("GITHUB_REPOSITORY").unwrap_or_default();
        let event_name = std::env::var("GITHUB_EVENT_NAME").unwrap_or_default();
        let event = load_event_payload()?;
        let defaults = GitHubDefaults::from_context(&repository, &event_name, &event);

        let api_url = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());

        Ok(Self {
            owner: defaults.owner,
            repo: defaults.repo,
            pull_request_number: defaults.pull_request_number,
            issue_number: defaults.issue_number,
            pull_request_body: defaults.pull_request_body,
            api_url,
            token: std::env::var("GITHUB_TOKEN").ok().filter(|v| !v.is_empty()),
            ..Default::default()
        })
    }
}

fn load_event_payload() -> Result<Value, PlatformError> {
    let path = match std::env::var("GITHUB_EVENT_PATH") {
        Ok(path) if !path.is_empty() => path,
        _ => return Ok(Value::Null),
    };
    let raw = std::fs::read_to_string(&path)
        .map_err(|source| PlatformError::EventRead { path: path.clone(), source })?;
    serde_json::from_str(&raw).map_err(|source| PlatformError::EventDecode { path, source })
}

/// Target coordinates recovered from the GitHub Actions event context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubDefaults {
    pub owner: String,
    pub repo: String,
    pub pull_request_number: Option<u64>,
    pub issue_number: Option<u64>,
    pub pull_request_body: Option<String>,
}

impl GitHubDefaults {
    /// Derive coordinates from the triggering event. Unknown event
    /// shapes leave the corresponding fields unset; explicit flags can
    /// still fill them in.
    pub fn from_context(repository: &str, event_name: &str, event: &Value) -> Self {
        let mut defaults = Self::default();
        if let Some((owner, repo)) = repository.split_once('/') {
            defaults.owner = owner.to_string();
            defaults.repo = repo.to_string();
        }

        match event_name {
            "pull_request" | "pull_request_target" => {
                defaults.pull_request_number = event.get("number").and_then(Value::as_u64);
                defaults.pull_request_body = pull_request_body(event);
            }
            "pull_request_review" | "pull_request_review_comment" => {
                defaults.pull_request_number = event
                    .pointer("/pull_request/number")
                    .and_then(Value::as_u64);
                defaults.pull_request_body = pull_request_body(event);
            }
            "merge_group" => {
                defaults.pull_request_number = event
                    .pointer("/merge_group/head_ref")
                    .and_then(Value::as_str)
                    .and_then(pr_number_from_head_ref);
            }
            "issues" | "issue_comment" => {
                defaults.issue_number = event.pointer("/issue/number").and_then(Value::as_u64);
            }
            other => {
                debug!(event_name = %other, "no coordinate defaults for event");
            }
        }
        defaults
    }
}

fn pull_request_body(event: &Value) -> Option<String> {
    event
        .pointer("/pull_request/body")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn pr_number_from_head_ref(head_ref: &str) -> Option<u64> {
    MERGE_GROUP_HEAD_REF
        .captures(head_ref)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Config values for the GitLab client.
#[derive(Debug, Clone)]
pub struct GitLabConfig {
    /// Numeric project id or URL-encoded path.
    pub project_id: String,
    pub merge_request_iid: Option<u64>,
    pub issue_iid: Option<u64>,
    pub api_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub initial_retry_delay_ms: u64,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            merge_request_iid: None,
            issue_iid: None,
            api_url: DEFAULT_GITLAB_API_URL.to_string(),
            token: None,
            timeout_secs: 30,
            max_retries: 3,
            initial_retry_delay_ms: 500,
        }
    }
}

impl GitLabConfig {
    /// Build a config from the GitLab CI environment.
    pub fn from_env() -> Self {
        let api_url = std::env::var("CI_API_V4_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_GITLAB_API_URL.to_string());

        Self {
            project_id: std::env::var("CI_PROJECT_ID").unwrap_or_default(),
            merge_request_iid: std::env::var("CI_MERGE_REQUEST_IID")
                .ok()
                .and_then(|v| v.parse().ok()),
            issue_iid: None,
            api_url,
            token: std::env::var("GITLAB_TOKEN").ok().filter(|v| !v.is_empty()),
            ..Default::default()
        }
    }
}
