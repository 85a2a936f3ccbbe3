//! Clients for code review platforms
//!
//! Defines the minimum Platform seam plus GitHub and GitLab
//! implementations that fetch pull/merge request and issue bodies over
//! HTTP. Retry and timeout policy lives here, never in the tags engine.

pub mod config;
pub mod errors;
pub mod github;
pub mod gitlab;
pub mod mock;

use async_trait::async_trait;

pub use config::{GitHubConfig, GitHubDefaults, GitLabConfig, PlatformConfig, PlatformType};
pub use errors::PlatformError;
pub use github::GitHub;
pub use gitlab::GitLab;
pub use mock::MockPlatform;

/// Minimum interface for a code review platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Get the pull request or merge request body.
    async fn request_body(&self) -> Result<String, PlatformError>;

    /// Get the issue body.
    async fn issue_body(&self) -> Result<String, PlatformError>;
}

/// Create a platform client for the configured type.
pub fn new_platform(config: &PlatformConfig) -> Result<Box<dyn Platform>, PlatformError> {
    match config.platform_type {
        PlatformType::GitHub => Ok(Box::new(GitHub::new(config.github.clone())?)),
        PlatformType::GitLab => Ok(Box::new(GitLab::new(config.gitlab.clone())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_platform_dispatches_on_type() {
        let config = PlatformConfig {
            platform_type: PlatformType::GitHub,
            github: GitHubConfig {
                owner: "owner".to_string(),
                repo: "repo".to_string(),
                ..Default::default()
            },
            gitlab: GitLabConfig::default(),
        };
        assert!(new_platform(&config).is_ok());

        let config = PlatformConfig {
            platform_type: PlatformType::GitLab,
            github: GitHubConfig::default(),
            gitlab: GitLabConfig { project_id: "42".to_string(), ..Default::default() },
        };
        assert!(new_platform(&config).is_ok());
    }

    #[test]
    fn test_new_platform_surfaces_missing_coordinates() {
        let config = PlatformConfig {
            platform_type: PlatformType::GitHub,
            github: GitHubConfig::default(),
            gitlab: GitLabConfig::default(),
        };
        assert!(matches!(
            new_platform(&config),
            Err(PlatformError::MissingCoordinate { .. })
        ));
    }
}
