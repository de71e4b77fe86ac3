//! Admin workflow controller.
//!
//! One form session moves through `Idle -> Editing -> Submitting -> (Idle | Error)`.
//! All transitions that need no I/O live on [`AdminState`] so they can be
//! exercised directly; [`AdminController`] wires them to the store, upload,
//! and auth collaborators.
//!
//! Write ordering is fixed: local validation, then the asset upload (when a
//! file was picked), then the store write. A failure at any step leaves the
//! form values untouched and persists nothing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{AdminIdentity, AuthGate, Credentials};
use crate::error::CoreError;
use crate::gallery::{to_filter, FacetSelection};
use crate::photo::{require_non_empty, FacetChoice, NewPhoto, PhotoEntry, PhotoPatch};
use crate::store::CatalogStore;
use crate::types::{DbId, Timestamp};
use crate::upload::{AssetUploader, ImageAsset, DEFAULT_MAX_UPLOAD_BYTES};
use crate::vocabulary::{derive_vocabulary, Vocabulary};

// ---------------------------------------------------------------------------
// Form model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Create,
    Edit(DbId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "message", rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Idle,
    Editing,
    Submitting,
    Error(String),
}

/// Raw form values as the admin typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoForm {
    pub caption: String,
    pub description: String,
    pub category: Option<FacetChoice>,
    pub lens: Option<FacetChoice>,
    pub uploaded_at: Option<Timestamp>,
    /// Replacement or new image. `None` while editing keeps the stored asset.
    pub asset: Option<ImageAsset>,
    /// Asset URL of the entry being edited, shown as the current image.
    pub current_image_url: Option<String>,
}

impl PhotoForm {
    /// Empty "create new" defaults.
    pub fn blank(now: Timestamp) -> Self {
        Self {
            uploaded_at: Some(now),
            ..Self::default()
        }
    }

    /// Pre-populated from a stored entry, asset left empty.
    pub fn from_entry(entry: &PhotoEntry) -> Self {
        Self {
            caption: entry.caption.clone(),
            description: entry.description.clone().unwrap_or_default(),
            category: Some(FacetChoice::Selected(entry.category.clone())),
            lens: Some(FacetChoice::Selected(entry.lens.clone())),
            uploaded_at: Some(entry.uploaded_at),
            asset: None,
            current_image_url: Some(entry.image_url.clone()),
        }
    }
}

/// Single-field form edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Caption(String),
    Description(String),
    Category(Option<FacetChoice>),
    Lens(Option<FacetChoice>),
    UploadedAt(Option<Timestamp>),
    Asset(Option<ImageAsset>),
}

/// Validated form values with both facets resolved to plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub mode: FormMode,
    pub caption: String,
    pub description: Option<String>,
    pub category: String,
    pub lens: String,
    pub uploaded_at: Timestamp,
    pub asset: Option<ImageAsset>,
}

impl Submission {
    /// Validate `form` for `mode` without touching any collaborator.
    pub fn prepare(mode: FormMode, form: &PhotoForm, max_upload_bytes: usize) -> Result<Self, CoreError> {
        require_non_empty("caption", &form.caption)?;
        let category = resolve_facet("category", form.category.as_ref())?;
        let lens = resolve_facet("lens", form.lens.as_ref())?;
        let uploaded_at = form
            .uploaded_at
            .ok_or_else(|| CoreError::Validation("uploadedAt is required".into()))?;

        match (&form.asset, mode) {
            (Some(asset), _) => asset.validate(max_upload_bytes)?,
            (None, FormMode::Create) => {
                return Err(CoreError::Validation("an image file is required".into()));
            }
            (None, FormMode::Edit(_)) => {}
        }

        let description = form.description.trim();
        Ok(Self {
            mode,
            caption: form.caption.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            category,
            lens,
            uploaded_at,
            asset: form.asset.clone(),
        })
    }

    fn into_new_photo(self, image_url: String) -> NewPhoto {
        NewPhoto {
            caption: self.caption,
            description: self.description,
            category: self.category,
            lens: self.lens,
            image_url,
            uploaded_at: self.uploaded_at,
        }
    }

    fn into_patch(self, image_url: Option<String>) -> PhotoPatch {
        PhotoPatch {
            caption: Some(self.caption),
            // Empty string clears a previously stored description.
            description: Some(self.description.unwrap_or_default()),
            category: Some(self.category),
            lens: Some(self.lens),
            image_url,
            uploaded_at: Some(self.uploaded_at),
        }
    }
}

fn resolve_facet(field: &str, choice: Option<&FacetChoice>) -> Result<String, CoreError> {
    choice
        .and_then(FacetChoice::resolve)
        .map(str::to_string)
        .ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

// ---------------------------------------------------------------------------
// Write orchestration
// ---------------------------------------------------------------------------

/// Upload-then-write sequence shared by the controller and the HTTP handlers.
#[derive(Clone)]
pub struct CatalogWriter {
    store: Arc<dyn CatalogStore>,
    uploader: Arc<dyn AssetUploader>,
}

impl CatalogWriter {
    pub fn new(store: Arc<dyn CatalogStore>, uploader: Arc<dyn AssetUploader>) -> Self {
        Self { store, uploader }
    }

    /// Upload the asset if one is present, then insert or update.
    ///
    /// Returns the id of the written entry. The store is never called when
    /// the upload fails.
    pub async fn write(&self, submission: Submission) -> Result<DbId, CoreError> {
        let image_url = match &submission.asset {
            Some(asset) => Some(self.uploader.upload(asset).await?),
            None => None,
        };

        match submission.mode {
            FormMode::Create => {
                let image_url = image_url
                    .ok_or_else(|| CoreError::Validation("an image file is required".into()))?;
                let id = self.store.insert(&submission.into_new_photo(image_url)).await?;
                tracing::info!(photo_id = id, "Photo created");
                Ok(id)
            }
            FormMode::Edit(id) => {
                let replaced = image_url.is_some();
                self.store.update(id, &submission.into_patch(image_url)).await?;
                tracing::info!(photo_id = id, replaced_asset = replaced, "Photo updated");
                Ok(id)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Confirmation and notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum ConfirmAction {
    DeletePhoto(DbId),
    Logout,
}

/// Prompt shown before a destructive action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub action: ConfirmAction,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Toast-style feedback for the last action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(err: &CoreError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: err.user_message(),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Serializable admin view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminState {
    pub session: Option<AdminIdentity>,
    pub phase: FormPhase,
    pub mode: FormMode,
    pub form: PhotoForm,
    /// Listing as returned by the store for the active filter.
    pub entries: Vec<PhotoEntry>,
    /// Derived from the unfiltered catalog.
    pub vocabulary: Vocabulary,
    pub filter_category: FacetSelection,
    pub filter_lens: FacetSelection,
    pub pending: Option<Confirmation>,
    pub list_error: Option<String>,
    pub notice: Option<Notice>,
    generation: u64,
}

impl AdminState {
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn begin_create(&mut self, now: Timestamp) {
        self.mode = FormMode::Create;
        self.form = PhotoForm::blank(now);
        self.phase = FormPhase::Editing;
    }

    pub fn begin_edit(&mut self, entry: &PhotoEntry) {
        self.mode = FormMode::Edit(entry.id);
        self.form = PhotoForm::from_entry(entry);
        self.phase = FormPhase::Editing;
    }

    /// Abandon the current form session.
    pub fn cancel_edit(&mut self, now: Timestamp) {
        self.mode = FormMode::Create;
        self.form = PhotoForm::blank(now);
        self.phase = FormPhase::Idle;
    }

    /// Apply one field edit. Ignored while a submission is in flight.
    pub fn edit(&mut self, edit: FormEdit) {
        if self.phase == FormPhase::Submitting {
            return;
        }
        match edit {
            FormEdit::Caption(v) => self.form.caption = v,
            FormEdit::Description(v) => self.form.description = v,
            FormEdit::Category(v) => self.form.category = v,
            FormEdit::Lens(v) => self.form.lens = v,
            FormEdit::UploadedAt(v) => self.form.uploaded_at = v,
            FormEdit::Asset(v) => self.form.asset = v,
        }
        self.phase = FormPhase::Editing;
    }

    /// Validate and enter `Submitting`. On a validation failure the phase
    /// becomes `Error` and the form is left as is.
    pub fn prepare_submission(&mut self, max_upload_bytes: usize) -> Result<Submission, CoreError> {
        if self.phase == FormPhase::Submitting {
            return Err(CoreError::Validation("a submission is already in progress".into()));
        }
        match Submission::prepare(self.mode, &self.form, max_upload_bytes) {
            Ok(submission) => {
                self.phase = FormPhase::Submitting;
                Ok(submission)
            }
            Err(e) => {
                self.submit_failed(&e);
                Err(e)
            }
        }
    }

    /// Full reset to "create new" defaults.
    pub fn submit_succeeded(&mut self, now: Timestamp) {
        let message = match self.mode {
            FormMode::Create => "Photo added",
            FormMode::Edit(_) => "Photo updated",
        };
        self.mode = FormMode::Create;
        self.form = PhotoForm::blank(now);
        self.phase = FormPhase::Idle;
        self.notice = Some(Notice::success(message));
    }

    /// Record the failure. Form values and mode are preserved for a retry.
    pub fn submit_failed(&mut self, err: &CoreError) {
        self.phase = FormPhase::Error(err.user_message());
        self.notice = Some(Notice::error(err));
    }

    pub fn request_delete(&mut self, entry: &PhotoEntry) {
        self.pending = Some(Confirmation {
            action: ConfirmAction::DeletePhoto(entry.id),
            title: "Delete photo".into(),
            message: format!(
                "Delete \"{}\" ({}, {})? This cannot be undone.",
                entry.caption, entry.category, entry.lens
            ),
        });
    }

    pub fn request_logout(&mut self) {
        self.pending = Some(Confirmation {
            action: ConfirmAction::Logout,
            title: "Log out".into(),
            message: "Are you sure you want to log out?".into(),
        });
    }

    /// Dismiss the pending confirmation without acting.
    pub fn decline(&mut self) {
        self.pending = None;
    }

    /// Change the listing filter. Unsaved form state is untouched.
    pub fn set_filter(&mut self, category: FacetSelection, lens: FacetSelection) {
        self.filter_category = category;
        self.filter_lens = lens;
    }

    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Apply a listing result. Returns `false` for a superseded fetch.
    pub fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<(Vec<PhotoEntry>, Vocabulary), CoreError>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "Dropping stale admin listing");
            return false;
        }
        match result {
            Ok((entries, vocabulary)) => {
                self.entries = entries;
                self.vocabulary = vocabulary;
                self.list_error = None;
            }
            Err(e) => {
                self.list_error = Some(e.user_message());
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct AdminController {
    store: Arc<dyn CatalogStore>,
    auth: Arc<dyn AuthGate>,
    writer: CatalogWriter,
    max_upload_bytes: usize,
    state: AdminState,
}

impl AdminController {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        uploader: Arc<dyn AssetUploader>,
        auth: Arc<dyn AuthGate>,
    ) -> Self {
        Self {
            writer: CatalogWriter::new(Arc::clone(&store), uploader),
            store,
            auth,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            state: AdminState::default(),
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn state(&self) -> &AdminState {
        &self.state
    }

    /// Ask the auth collaborator for a session and load the listing when
    /// one exists.
    pub async fn check_session(&mut self) -> Result<bool, CoreError> {
        self.state.session = self.auth.current_user().await;
        if self.state.session.is_none() {
            return Ok(false);
        }
        self.begin_create();
        self.refresh().await?;
        Ok(true)
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<AdminIdentity, CoreError> {
        credentials.check()?;
        let identity = self.auth.login(credentials).await?;
        tracing::info!(email = %identity.email, "Admin signed in");
        self.state.session = Some(identity.clone());
        self.begin_create();
        self.refresh().await?;
        Ok(identity)
    }

    /// Re-fetch the listing for the active filter and re-derive the vocabulary.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        self.require_session()?;
        let generation = self.state.begin_fetch();
        let filter = to_filter(&self.state.filter_category, &self.state.filter_lens);

        let result = async {
            let listed = self.store.list_filtered(&filter).await?;
            let vocabulary = if filter.is_empty() {
                derive_vocabulary(&listed)
            } else {
                derive_vocabulary(&self.store.list_all().await?)
            };
            Ok::<_, CoreError>((listed, vocabulary))
        }
        .await;

        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "Admin listing fetch failed");
        }
        self.state.complete_fetch(generation, result);
        outcome
    }

    pub async fn set_filter(
        &mut self,
        category: FacetSelection,
        lens: FacetSelection,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        self.state.set_filter(category, lens);
        self.refresh().await
    }

    pub fn begin_create(&mut self) {
        self.state.begin_create(chrono::Utc::now());
    }

    pub fn begin_edit(&mut self, id: DbId) -> Result<(), CoreError> {
        self.require_session()?;
        let entry = self.find_entry(id)?;
        self.state.begin_edit(&entry);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit(chrono::Utc::now());
    }

    pub fn edit(&mut self, edit: FormEdit) {
        self.state.edit(edit);
    }

    /// Validate, upload, write, then re-fetch.
    pub async fn submit(&mut self) -> Result<DbId, CoreError> {
        self.require_session()?;
        let submission = self.state.prepare_submission(self.max_upload_bytes)?;

        match self.writer.write(submission).await {
            Ok(id) => {
                self.state.submit_succeeded(chrono::Utc::now());
                // A failed re-fetch is reported on the listing, not the form.
                let _ = self.refresh().await;
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Photo submission failed");
                self.state.submit_failed(&e);
                Err(e)
            }
        }
    }

    pub fn request_delete(&mut self, id: DbId) -> Result<(), CoreError> {
        self.require_session()?;
        let entry = self.find_entry(id)?;
        self.state.request_delete(&entry);
        Ok(())
    }

    pub fn request_logout(&mut self) -> Result<(), CoreError> {
        self.require_session()?;
        self.state.request_logout();
        Ok(())
    }

    pub fn decline(&mut self) {
        self.state.decline();
    }

    /// Execute the pending confirmation. A no-op when nothing is pending.
    pub async fn confirm(&mut self) -> Result<(), CoreError> {
        self.require_session()?;
        let Some(confirmation) = self.state.pending.take() else {
            return Ok(());
        };

        match confirmation.action {
            ConfirmAction::DeletePhoto(id) => {
                if let Err(e) = self.store.delete(id).await {
                    tracing::warn!(photo_id = id, error = %e, "Photo delete failed");
                    self.state.notice = Some(Notice::error(&e));
                    return Err(e);
                }
                tracing::info!(photo_id = id, "Photo deleted");
                if self.state.mode == FormMode::Edit(id) {
                    self.cancel_edit();
                }
                self.state.notice = Some(Notice::success("Photo deleted"));
                self.refresh().await
            }
            ConfirmAction::Logout => {
                self.auth.logout().await?;
                tracing::info!("Admin signed out");
                self.state = AdminState::default();
                Ok(())
            }
        }
    }

    fn require_session(&self) -> Result<&AdminIdentity, CoreError> {
        self.state
            .session
            .as_ref()
            .ok_or_else(|| CoreError::AuthFailed("Sign in to manage the catalog".into()))
    }

    fn find_entry(&self, id: DbId) -> Result<PhotoEntry, CoreError> {
        self.state
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: crate::photo::PHOTO_ENTITY,
                id,
            })
    }
}
