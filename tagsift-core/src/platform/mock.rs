//! Recording mock platform for command-level tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::platform::Platform;
use crate::platform::errors::PlatformError;

/// Records which fetches were made and returns canned responses.
#[derive(Debug, Default)]
pub struct MockPlatform {
    pub request_body_response: String,
    pub issue_body_response: String,
    /// When set, `request_body` fails with this API error message.
    pub request_body_error: Option<String>,
    /// When set, `issue_body` fails with this API error message.
    pub issue_body_error: Option<String>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockPlatform {
    pub fn with_request_body(body: impl Into<String>) -> Self {
        Self { request_body_response: body.into(), ..Default::default() }
    }

    pub fn with_issue_body(body: impl Into<String>) -> Self {
        Self { issue_body_response: body.into(), ..Default::default() }
    }

    pub fn with_request_error(message: impl Into<String>) -> Self {
        Self { request_body_error: Some(message.into()), ..Default::default() }
    }

    pub fn with_issue_error(message: impl Into<String>) -> Self {
        Self { issue_body_error: Some(message.into()), ..Default::default() }
    }

    /// The fetches made so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("mock lock poisoned").push(call);
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn request_body(&self) -> Result<String, PlatformError> {
        self.record("request_body");
        if let Some(message) = &self.request_body_error {
            return Err(PlatformError::Api {
                platform: "mock",
                status: 500,
                message: message.clone(),
            });
        }
        Ok(self.request_body_response.clone())
    }

    async fn issue_body(&self) -> Result<String, PlatformError> {
        self.record("issue_body");
        if let Some(message) = &self.issue_body_error {
            return Err(PlatformError::Api {
                platform: "mock",
                status: 500,
                message: message.clone(),
            });
        }
        Ok(self.issue_body_response.clone())
    }
}
