//! Prompt client trait and the backend response envelope

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response envelope returned by the coaching backend
///
/// `data` carries the model's markdown reply when `success` is true,
/// `error` a readable message otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    /// Whether the backend produced a reply
    pub success: bool,
    /// The reply text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PromptResponse {
    /// A successful response
    ///
    /// # Examples
    ///
    /// ```
    /// use lenscoach::providers::PromptResponse;
    ///
    /// let response = PromptResponse::ok("ISO 200, f/4");
    /// assert_eq!(response.into_reply(), Ok("ISO 200, f/4".to_string()));
    /// ```
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    /// A failed response
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// The reply text, or a readable error
    ///
    /// A "successful" response without data counts as a failure.
    pub fn into_reply(self) -> std::result::Result<String, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("Backend returned an empty response".to_string()),
            (false, _) => Err(self
                .error
                .unwrap_or_else(|| "Request failed without an error message".to_string())),
        }
    }
}

/// The single fallible call the session layer makes to the outside world
///
/// Implementations never panic or return transport errors directly: every
/// failure is folded into a `PromptResponse` with `success = false`.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use lenscoach::providers::{PromptClient, PromptResponse};
///
/// struct Canned;
///
/// #[async_trait]
/// impl PromptClient for Canned {
///     async fn send_prompt(&self, _text: &str, _images: &[String]) -> PromptResponse {
///         PromptResponse::ok("Use a tripod")
///     }
/// }
/// ```
#[async_trait]
pub trait PromptClient: Send + Sync {
    /// Send a prompt with optional image references
    async fn send_prompt(&self, text: &str, images: &[String]) -> PromptResponse;
}
