//! Filesystem uploader.
//!
//! Files are named by the SHA-256 of their content, so re-uploading the same
//! image yields the same URL and never overwrites a different image.

use std::path::PathBuf;

use async_trait::async_trait;
use folio_core::error::CoreError;
use folio_core::upload::{AssetUploader, ImageAsset};
use sha2::{Digest, Sha256};

use super::UploadError;

pub struct LocalUploader {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalUploader {
    pub fn new(dir: PathBuf, public_base_url: String) -> Self {
        Self {
            dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    async fn store(&self, asset: &ImageAsset) -> Result<String, UploadError> {
        let digest = format!("{:x}", Sha256::digest(&asset.bytes));
        let file_name = match extension(asset) {
            Some(ext) => format!("{digest}.{ext}"),
            None => digest,
        };

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), &asset.bytes).await?;

        Ok(format!("{}/{file_name}", self.public_base_url))
    }
}

/// Lower-cased alphanumeric extension from the file name, falling back to
/// the content subtype.
fn extension(asset: &ImageAsset) -> Option<String> {
    let from_name = asset
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    let from_type = asset
        .content_type
        .as_deref()
        .and_then(|ct| ct.strip_prefix("image/"))
        .map(|sub| sub.split(['+', ';']).next().unwrap_or(sub).to_ascii_lowercase());

    from_name
        .into_iter()
        .chain(from_type)
        .find(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[async_trait]
impl AssetUploader for LocalUploader {
    async fn upload(&self, asset: &ImageAsset) -> Result<String, CoreError> {
        match self.store(asset).await {
            Ok(url) => {
                tracing::info!(file_name = %asset.file_name, url = %url, "Image stored locally");
                Ok(url)
            }
            Err(e) => {
                tracing::error!(file_name = %asset.file_name, error = %e, "Local image store failed");
                Err(e.into())
            }
        }
    }
}
