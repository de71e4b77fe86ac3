//! Unsigned multipart upload to a hosted image service.
//!
//! The request carries the image as `file` plus an `upload_preset` field;
//! the service answers with JSON whose `secure_url` is the public asset URL.

use std::time::Duration;

use async_trait::async_trait;
use folio_core::error::CoreError;
use folio_core::upload::{AssetUploader, ImageAsset};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::UploadError;

/// HTTP request timeout for one upload.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

pub struct RemoteUploader {
    client: reqwest::Client,
    url: String,
    preset: String,
}

impl RemoteUploader {
    pub fn new(url: String, preset: String) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url,
            preset,
        })
    }

    async fn send(&self, asset: &ImageAsset) -> Result<String, UploadError> {
        let mut part = Part::bytes(asset.bytes.clone()).file_name(asset.file_name.clone());
        if let Some(content_type) = &asset.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.preset.clone());

        let response = self.client.post(&self.url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(UploadError::HttpStatus(response.status().as_u16()));
        }

        let body: UploadResponse = response.json().await?;
        body.secure_url
            .filter(|u| !u.is_empty())
            .ok_or(UploadError::MissingUrl)
    }
}

#[async_trait]
impl AssetUploader for RemoteUploader {
    async fn upload(&self, asset: &ImageAsset) -> Result<String, CoreError> {
        match self.send(asset).await {
            Ok(url) => {
                tracing::info!(file_name = %asset.file_name, url = %url, "Image uploaded");
                Ok(url)
            }
            Err(e) => {
                tracing::error!(file_name = %asset.file_name, error = %e, "Image upload failed");
                Err(e.into())
            }
        }
    }
}
