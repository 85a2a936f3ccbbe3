//! Error types for platform clients

use thiserror::Error;

/// Errors fetching document bodies from a code review platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform flag had a value outside the allowed set.
    #[error("unknown platform type '{value}', allowed values are [\"github\", \"gitlab\"]")]
    UnknownPlatform { value: String },

    /// No platform flag and no recognizable CI environment.
    #[error("platform type not set and not inferable from GITHUB_ACTIONS or GITLAB_CI")]
    UnspecifiedPlatform,

    /// A required target coordinate was missing from flags and environment.
    #[error("missing {name}: set {flag} or the {env} environment variable")]
    MissingCoordinate { name: &'static str, flag: &'static str, env: &'static str },

    /// The platform API rejected the request.
    #[error("{platform} api error (status {status}): {message}")]
    Api { platform: &'static str, status: u16, message: String },

    /// Transport-level failure talking to the platform API.
    #[error("failed to talk to {platform}")]
    Transport {
        platform: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A retryable failure persisted through every attempt.
    #[error("{platform} request failed after {attempts} attempts")]
    RetriesExhausted {
        platform: &'static str,
        attempts: usize,
        #[source]
        source: Box<PlatformError>,
    },

    /// The event payload at GITHUB_EVENT_PATH could not be read.
    #[error("failed to read event payload from {path}")]
    EventRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The event payload at GITHUB_EVENT_PATH was not valid JSON.
    #[error("failed to decode event payload from {path}")]
    EventDecode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PlatformError {
    /// Whether the failure is transient and worth retrying. Permission
    /// and validation failures (4xx other than 429) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Transport { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let api = |status| PlatformError::Api {
            platform: "github",
            status,
            message: String::new(),
        };
        assert!(api(429).is_retryable());
        assert!(api(500).is_retryable());
        assert!(api(503).is_retryable());
        assert!(!api(403).is_retryable());
        assert!(!api(404).is_retryable());
        assert!(!api(422).is_retryable());
    }

    #[test]
    fn test_config_errors_are_not_retryable() {
        assert!(!PlatformError::UnspecifiedPlatform.is_retryable());
        assert!(
            !PlatformError::MissingCoordinate {
                name: "pull request number",
                flag: "--number",
                env: "GITHUB_EVENT_PATH",
            }
            .is_retryable()
        );
    }
}
