//! Asset Upload Adapter contract and pre-upload checks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default upper bound for a single image (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A binary image picked by the admin, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub file_name: String,
    pub content_type: Option<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Reject assets that can never become a valid catalog image.
    ///
    /// Runs before the upload adapter is called so a bad pick costs no
    /// network round trip.
    pub fn validate(&self, max_bytes: usize) -> Result<(), CoreError> {
        if self.bytes.is_empty() {
            return Err(CoreError::Validation(format!(
                "Image '{}' is empty",
                self.file_name
            )));
        }
        if self.bytes.len() > max_bytes {
            return Err(CoreError::Validation(format!(
                "Image '{}' is {} bytes; the limit is {max_bytes}",
                self.file_name,
                self.bytes.len()
            )));
        }
        match self.content_type.as_deref() {
            Some(ct) if ct.starts_with("image/") => Ok(()),
            Some(ct) => Err(CoreError::Validation(format!(
                "Unsupported content type '{ct}'. Only images are accepted"
            ))),
            None => Err(CoreError::Validation(format!(
                "Image '{}' has no content type",
                self.file_name
            ))),
        }
    }
}

#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Store the asset durably and return its public URL.
    ///
    /// Network or remote rejections surface as `UploadFailed`. Callers must
    /// not write a catalog entry referencing the asset until this returns.
    async fn upload(&self, asset: &ImageAsset) -> Result<String, CoreError>;
}
