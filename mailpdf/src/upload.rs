#![doc = "Slack uploader: the chat implementation of the core `UploadSink` trait."]
//
//! # Uploader Integration (CLI <-> Core)
//!
//! Bridges [`mailpdf_core::contract::UploadSink`] to Slack's `files.upload`
//! Web API method. Finished PDFs are posted as multipart forms carrying the
//! token, filename, file type and destination channel.
//!
//! ## Client Usage
//!
//! - Construct [`SlackUploader`] from the environment (`CHAT_ACCESS_TOKEN`).
//! - Slack answers with `{"ok": bool, "error": "..."}`; that body becomes the
//!   [`UploadReceipt`]. Only transport failures are errors.

use async_trait::async_trait;
use mailpdf_core::contract::{UploadReceipt, UploadSink};
use mailpdf_core::error::UploadError;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::env;

pub const TOKEN_ENV: &str = "CHAT_ACCESS_TOKEN";
pub const DEFAULT_ENDPOINT: &str = "https://slack.com/api/files.upload";

pub struct SlackUploader {
    client: Client,
    token: String,
    endpoint: String,
}

impl SlackUploader {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn new_from_env() -> Result<Self, UploadError> {
        dotenvy::dotenv().ok();
        match env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => {
                tracing::info!(endpoint = DEFAULT_ENDPOINT, "Initialized SlackUploader from environment");
                Ok(Self::new(token))
            }
            Ok(_) => {
                tracing::error!("{TOKEN_ENV} is empty");
                Err(UploadError::Credential(format!("{TOKEN_ENV} is empty")))
            }
            Err(e) => {
                tracing::error!(error = ?e, "{TOKEN_ENV} missing in environment");
                Err(UploadError::Credential(format!("{TOKEN_ENV}: {e}")))
            }
        }
    }

    /// Post to `endpoint` instead of the public Slack API.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Decode a `files.upload` response body.
pub fn receipt_from_body(body: &str) -> Result<UploadReceipt, UploadError> {
    serde_json::from_str::<UploadReceipt>(body).map_err(|e| {
        tracing::error!(error = ?e, "Upload response is not a receipt");
        UploadError::Decode(e.to_string())
    })
}

#[async_trait]
impl UploadSink for SlackUploader {
    async fn upload(
        &self,
        destination: &str,
        filename: &str,
        content: &[u8],
    ) -> Result<UploadReceipt, UploadError> {
        tracing::info!(
            channel = destination,
            filename,
            size = content.len(),
            "Uploading PDF"
        );

        let file = Part::bytes(content.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .text("token", self.token.clone())
            .text("filename", filename.to_string())
            .text("filetype", "pdf")
            .text("channels", destination.to_string())
            .part("file", file);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, filename, "Upload request failed");
                e
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Upload endpoint returned error status");
            return Ok(UploadReceipt {
                ok: false,
                error: Some(format!("upload failed with status {status}")),
            });
        }

        let receipt = receipt_from_body(&body)?;
        match &receipt.error {
            Some(error) if !receipt.ok => {
                tracing::warn!(error = %error, filename, "Upload rejected")
            }
            _ => tracing::info!(filename, ok = receipt.ok, "Upload complete"),
        }
        Ok(receipt)
    }
}
