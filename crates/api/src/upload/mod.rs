//! Asset Upload Adapter implementations.
//!
//! - [`remote::RemoteUploader`] posts to a hosted image service.
//! - [`local::LocalUploader`] writes into a directory served by this process.

pub mod local;
pub mod remote;

use std::sync::Arc;

use folio_core::error::CoreError;
use folio_core::upload::AssetUploader;

use crate::config::UploadTarget;

pub use local::LocalUploader;
pub use remote::RemoteUploader;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upload service returned a non-2xx status code.
    #[error("Upload service returned HTTP {0}")]
    HttpStatus(u16),

    /// The upload service answered without a usable asset URL.
    #[error("Upload response did not contain an asset URL")]
    MissingUrl,

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for CoreError {
    fn from(err: UploadError) -> Self {
        CoreError::UploadFailed(err.to_string())
    }
}

/// Build the uploader selected by configuration.
pub fn build_uploader(target: &UploadTarget) -> Result<Arc<dyn AssetUploader>, UploadError> {
    Ok(match target {
        UploadTarget::Remote { url, preset } => {
            Arc::new(RemoteUploader::new(url.clone(), preset.clone())?)
        }
        UploadTarget::Local {
            dir,
            public_base_url,
        } => Arc::new(LocalUploader::new(dir.clone(), public_base_url.clone())),
    })
}
