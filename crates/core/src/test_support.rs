//! Fakes shared by the unit tests of this crate.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::TimeZone;

use crate::auth::{AdminIdentity, AuthGate, Credentials};
use crate::contact::{ContactMessage, MessageRelay};
use crate::error::CoreError;
use crate::memory::MemoryCatalogStore;
use crate::photo::{NewPhoto, PhotoEntry, PhotoFilter, PhotoPatch};
use crate::store::CatalogStore;
use crate::types::DbId;
use crate::upload::{AssetUploader, ImageAsset};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse";

pub fn entry(id: DbId, category: &str, lens: &str) -> PhotoEntry {
    PhotoEntry {
        id,
        caption: format!("Photo {id}"),
        description: None,
        category: category.to_string(),
        lens: lens.to_string(),
        image_url: format!("https://cdn.example.com/{id}.jpg"),
        uploaded_at: chrono::Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
            + chrono::Duration::days(id),
    }
}

pub fn new_photo(category: &str, lens: &str) -> NewPhoto {
    NewPhoto {
        caption: "Seeded".into(),
        description: None,
        category: category.into(),
        lens: lens.into(),
        image_url: "https://cdn.example.com/seeded.jpg".into(),
        uploaded_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

pub fn jpeg(name: &str) -> ImageAsset {
    ImageAsset::new(name, Some("image/jpeg".into()), vec![0xFF, 0xD8, 0xFF])
}

// ---------------------------------------------------------------------------
// Store wrapper that counts writes and can be switched offline
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ProbeStore {
    pub inner: MemoryCatalogStore,
    pub offline: AtomicBool,
    pub fail_writes: AtomicBool,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl ProbeStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn read_gate(&self) -> Result<(), CoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(CoreError::StoreUnavailable("simulated outage".into()));
        }
        Ok(())
    }

    fn write_gate(&self) -> Result<(), CoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) || self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::StoreUnavailable("simulated outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for ProbeStore {
    async fn list_all(&self) -> Result<Vec<PhotoEntry>, CoreError> {
        self.read_gate()?;
        self.inner.list_all().await
    }

    async fn list_filtered(&self, filter: &PhotoFilter) -> Result<Vec<PhotoEntry>, CoreError> {
        self.read_gate()?;
        self.inner.list_filtered(filter).await
    }

    async fn get_by_id(&self, id: DbId) -> Result<PhotoEntry, CoreError> {
        self.read_gate()?;
        self.inner.get_by_id(id).await
    }

    async fn insert(&self, photo: &NewPhoto) -> Result<DbId, CoreError> {
        self.write_gate()?;
        self.inner.insert(photo).await
    }

    async fn update(&self, id: DbId, patch: &PhotoPatch) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.delete(id).await
    }
}

// ---------------------------------------------------------------------------
// Uploader
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeUploader {
    pub fail: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeUploader {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetUploader for FakeUploader {
    async fn upload(&self, asset: &ImageAsset) -> Result<String, CoreError> {
        self.calls.lock().unwrap().push(asset.file_name.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::UploadFailed("simulated network error".into()));
        }
        Ok(format!("https://cdn.example.com/uploads/{}", asset.file_name))
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeAuth {
    user: Mutex<Option<AdminIdentity>>,
}

impl FakeAuth {
    pub fn signed_in() -> Self {
        Self {
            user: Mutex::new(Some(AdminIdentity {
                email: ADMIN_EMAIL.into(),
            })),
        }
    }
}

#[async_trait]
impl AuthGate for FakeAuth {
    async fn current_user(&self) -> Option<AdminIdentity> {
        self.user.lock().unwrap().clone()
    }

    async fn login(&self, credentials: &Credentials) -> Result<AdminIdentity, CoreError> {
        if credentials.email != ADMIN_EMAIL || credentials.password != ADMIN_PASSWORD {
            return Err(CoreError::AuthFailed("Invalid email or password".into()));
        }
        let identity = AdminIdentity {
            email: credentials.email.clone(),
        };
        *self.user.lock().unwrap() = Some(identity.clone());
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), CoreError> {
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeRelay {
    fail: bool,
    sent: Mutex<Vec<ContactMessage>>,
}

impl FakeRelay {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageRelay for FakeRelay {
    async fn send(&self, message: &ContactMessage) -> Result<(), CoreError> {
        if self.fail {
            return Err(CoreError::RelayFailed("simulated relay outage".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
