//! Admin catalog endpoints (all require an admin token).
//!
//! Create and update accept the admin form as `multipart/form-data`. The
//! handlers rebuild the core `PhotoForm`, validate it into a `Submission`,
//! and hand it to the shared `CatalogWriter`, so the HTTP path follows the
//! same validate -> upload -> write ordering as the admin controller.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use folio_core::admin::{FormMode, PhotoForm, Submission};
use folio_core::error::CoreError;
use folio_core::photo::{FacetChoice, PhotoEntry};
use folio_core::types::DbId;
use folio_core::upload::ImageAsset;
use folio_core::vocabulary::{derive_vocabulary, FacetOption, Vocabulary};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::FilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Select options for both facets, each ending with "other".
#[derive(Debug, Serialize)]
pub struct VocabularyOptions {
    pub categories: Vec<FacetOption>,
    pub lenses: Vec<FacetOption>,
}

impl From<&Vocabulary> for VocabularyOptions {
    fn from(vocabulary: &Vocabulary) -> Self {
        Self {
            categories: vocabulary.category_options(),
            lenses: vocabulary.lens_options(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminListing {
    pub entries: Vec<PhotoEntry>,
    /// Derived from the unfiltered catalog.
    pub vocabulary: VocabularyOptions,
}

// ---------------------------------------------------------------------------
// Multipart form
// ---------------------------------------------------------------------------

/// Raw multipart fields of the admin photo form.
#[derive(Debug, Default)]
pub struct PhotoFormFields {
    pub caption: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub custom_category: Option<String>,
    pub lens: Option<String>,
    pub custom_lens: Option<String>,
    pub uploaded_at: Option<String>,
    pub file: Option<ImageAsset>,
}

impl PhotoFormFields {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut fields = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty, unnamed part when no file was picked.
                if !(data.is_empty() && file_name.is_empty()) {
                    fields.file = Some(ImageAsset::new(file_name, content_type, data.to_vec()));
                }
                continue;
            }

            let slot = match name.as_str() {
                "caption" => &mut fields.caption,
                "description" => &mut fields.description,
                "category" => &mut fields.category,
                "customCategory" => &mut fields.custom_category,
                "lens" => &mut fields.lens,
                "customLens" => &mut fields.custom_lens,
                "uploadedAt" => &mut fields.uploaded_at,
                _ => continue, // ignore unknown fields
            };
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            *slot = Some(text);
        }

        Ok(fields)
    }

    /// Overlay the supplied fields onto `form`. Absent fields keep the
    /// form's current value.
    pub fn apply_to(self, form: &mut PhotoForm) -> Result<(), CoreError> {
        if let Some(caption) = self.caption {
            form.caption = caption;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(choice) = facet_choice(self.category, self.custom_category) {
            form.category = Some(choice);
        }
        if let Some(choice) = facet_choice(self.lens, self.custom_lens) {
            form.lens = Some(choice);
        }
        if let Some(raw) = self.uploaded_at.filter(|v| !v.trim().is_empty()) {
            form.uploaded_at = Some(parse_timestamp(&raw)?);
        }
        if self.file.is_some() {
            form.asset = self.file;
        }
        Ok(())
    }
}

fn facet_choice(selected: Option<String>, custom: Option<String>) -> Option<FacetChoice> {
    match (selected, custom) {
        (Some(selected), custom) => {
            FacetChoice::from_form(&selected, custom.as_deref().unwrap_or(""))
        }
        (None, Some(custom)) => Some(FacetChoice::Custom(custom)),
        (None, None) => None,
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CoreError::Validation(format!("uploadedAt '{raw}' is not an RFC 3339 timestamp")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/photos
///
/// Server-side filtered listing plus the vocabulary of the whole catalog.
pub async fn list_photos(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> AppResult<Json<DataResponse<AdminListing>>> {
    let filter = params.into_filter();
    let entries = state.store.list_filtered(&filter).await?;
    let vocabulary = if filter.is_empty() {
        derive_vocabulary(&entries)
    } else {
        derive_vocabulary(&state.store.list_all().await?)
    };

    Ok(Json(DataResponse {
        data: AdminListing {
            entries,
            vocabulary: VocabularyOptions::from(&vocabulary),
        },
    }))
}

/// GET /api/v1/admin/vocabulary
pub async fn vocabulary(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<VocabularyOptions>>> {
    let entries = state.store.list_all().await?;
    Ok(Json(DataResponse {
        data: VocabularyOptions::from(&derive_vocabulary(&entries)),
    }))
}

/// POST /api/v1/admin/photos
///
/// Requires an image file. `uploadedAt` defaults to now.
pub async fn create_photo(
    user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PhotoEntry>>)> {
    let fields = PhotoFormFields::read(multipart).await?;
    let mut form = PhotoForm::blank(Utc::now());
    fields.apply_to(&mut form)?;

    let submission = Submission::prepare(FormMode::Create, &form, state.config.max_upload_bytes)?;
    let id = state.writer.write(submission).await?;
    let entry = state.store.get_by_id(id).await?;

    tracing::info!(photo_id = id, admin = %user.email, category = %entry.category, "Photo created via API");
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// PUT /api/v1/admin/photos/{id}
///
/// Fields not present in the form keep their stored values; without a file
/// the stored image is kept.
pub async fn update_photo(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<PhotoEntry>>> {
    let existing = state.store.get_by_id(id).await?;
    let fields = PhotoFormFields::read(multipart).await?;
    let mut form = PhotoForm::from_entry(&existing);
    fields.apply_to(&mut form)?;

    let submission =
        Submission::prepare(FormMode::Edit(id), &form, state.config.max_upload_bytes)?;
    state.writer.write(submission).await?;
    let entry = state.store.get_by_id(id).await?;

    tracing::info!(photo_id = id, admin = %user.email, "Photo updated via API");
    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/admin/photos/{id}
///
/// Idempotent: deleting an absent id also returns 204.
pub async fn delete_photo(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.store.delete(id).await?;
    tracing::info!(photo_id = id, admin = %user.email, "Photo deleted via API");
    Ok(StatusCode::NO_CONTENT)
}
