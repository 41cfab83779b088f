//! HTTP client for the coaching backend
//!
//! Prompts with images go to `POST {base_url}/analyze` as a multipart form;
//! text-only prompts go to `POST {base_url}/camera-settings` as JSON.

use super::base::{PromptClient, PromptResponse};
use crate::config::BackendConfig;
use crate::error::{LensCoachError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_EVENT_TYPE: &str = "general photography";
const DEFAULT_LIGHTING: &str = "natural light";
const DEFAULT_SUBJECT: &str = "general";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CameraSettingsRequest<'a> {
    event_type: &'a str,
    lighting: &'a str,
    subject: &'a str,
}

/// Prompt client talking to the coaching backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpPromptClient {
    client: Client,
    base_url: String,
    max_images: usize,
}

impl HttpPromptClient {
    /// Build a client from backend settings
    ///
    /// # Errors
    ///
    /// Returns `LensCoachError::Provider` if the HTTP client cannot be built
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("lenscoach/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LensCoachError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!("Initialized backend client: base_url={}", base_url);

        Ok(Self {
            client,
            base_url,
            max_images: config.max_images,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn analyze(&self, text: &str, images: &[String]) -> Result<PromptResponse> {
        if images.len() > self.max_images {
            tracing::warn!(
                "Only the first {} of {} images will be sent",
                self.max_images,
                images.len()
            );
        }

        let mut form = Form::new();
        for (index, image) in images.iter().take(self.max_images).enumerate() {
            form = form.part("images", image_part(image, index).await?);
        }
        form = form.text("prompt", text.to_string());

        let url = format!("{}/analyze", self.base_url);
        tracing::debug!("POST {}", url);
        let response = self.client.post(&url).multipart(form).send().await?;
        read_envelope(response).await
    }

    async fn camera_settings(&self, text: &str) -> Result<PromptResponse> {
        let event_type = if text.trim().is_empty() {
            DEFAULT_EVENT_TYPE
        } else {
            text
        };
        let body = CameraSettingsRequest {
            event_type,
            lighting: DEFAULT_LIGHTING,
            subject: DEFAULT_SUBJECT,
        };

        let url = format!("{}/camera-settings", self.base_url);
        tracing::debug!("POST {}", url);
        let response = self.client.post(&url).json(&body).send().await?;
        read_envelope(response).await
    }

    fn describe_failure(&self, error: &anyhow::Error) -> String {
        if let Some(http) = error.downcast_ref::<reqwest::Error>() {
            if http.is_timeout() {
                return "Request timeout. Check if the backend is running and reachable on your network."
                    .to_string();
            }
            if http.is_connect() {
                return format!(
                    "Cannot reach backend at {}. Make sure the backend is running and the port is reachable.",
                    self.base_url
                );
            }
        }
        format!("{:#}", error)
    }
}

#[async_trait]
impl PromptClient for HttpPromptClient {
    async fn send_prompt(&self, text: &str, images: &[String]) -> PromptResponse {
        let result = if images.is_empty() {
            self.camera_settings(text).await
        } else {
            self.analyze(text, images).await
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Backend request failed: {:#}", e);
                PromptResponse::failure(self.describe_failure(&e))
            }
        }
    }
}

/// Multipart file part for a local image path or `file://` URI
async fn image_part(reference: &str, index: usize) -> Result<Part> {
    let path = reference.strip_prefix("file://").unwrap_or(reference);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LensCoachError::Provider(format!("Failed to read image {}: {}", path, e)))?;

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| format!("photo{}.jpg", index + 1));

    let part = Part::bytes(bytes)
        .file_name(file_name.clone())
        .mime_str(&image_mime(&file_name))?;
    Ok(part)
}

/// MIME type from the file extension, `image/jpeg` when there is none
fn image_mime(file_name: &str) -> String {
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("image/{}", ext.to_lowercase()),
        _ => "image/jpeg".to_string(),
    }
}

/// Decode the `{success, data?, error?}` envelope regardless of HTTP status
async fn read_envelope(response: reqwest::Response) -> Result<PromptResponse> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<PromptResponse>(&body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !status.is_success() => Ok(PromptResponse::failure(format!(
            "Backend returned HTTP {}",
            status
        ))),
        Err(e) => Err(LensCoachError::Provider(format!(
            "Failed to parse backend response: {}",
            e
        ))
        .into()),
    }
}
