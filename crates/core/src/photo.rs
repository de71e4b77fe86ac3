//! Photo catalog entry model, write payloads, and field validation.
//!
//! Wire field names are camelCase (`imageUrl`, `uploadedAt`) and must
//! round-trip exactly through every store adapter.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Entity name used in `NotFound` errors and log fields.
pub const PHOTO_ENTITY: &str = "Photo";

/// Synthetic select value that switches a facet to free-text entry.
pub const OTHER_OPTION: &str = "other";

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One persisted catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEntry {
    /// Store-assigned, immutable. Also the routing key of the detail view.
    pub id: DbId,
    pub caption: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub lens: String,
    pub image_url: String,
    /// When the photo was taken or should display as uploaded.
    pub uploaded_at: Timestamp,
}

/// Insert payload. Every field except `description` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhoto {
    pub caption: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub lens: String,
    pub image_url: String,
    pub uploaded_at: Timestamp,
}

impl NewPhoto {
    /// Check the persisted-entry invariants before any store call.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("caption", &self.caption)?;
        require_non_empty("category", &self.category)?;
        require_non_empty("lens", &self.lens)?;
        validate_image_url(&self.image_url)
    }

    /// Materialize the entry the store will hold under `id`.
    pub fn into_entry(self, id: DbId) -> PhotoEntry {
        PhotoEntry {
            id,
            caption: self.caption,
            description: normalize_description(self.description),
            category: self.category,
            lens: self.lens,
            image_url: self.image_url,
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Partial update. `None` leaves the stored value untouched; in particular
/// an absent `image_url` keeps the previous asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPatch {
    pub caption: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    pub category: Option<String>,
    pub lens: Option<String>,
    pub image_url: Option<String>,
    pub uploaded_at: Option<Timestamp>,
}

impl PhotoPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.caption.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.lens.is_none()
            && self.image_url.is_none()
            && self.uploaded_at.is_none()
    }

    /// Supplied required fields must still satisfy the entry invariants.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(caption) = &self.caption {
            require_non_empty("caption", caption)?;
        }
        if let Some(category) = &self.category {
            require_non_empty("category", category)?;
        }
        if let Some(lens) = &self.lens {
            require_non_empty("lens", lens)?;
        }
        if let Some(url) = &self.image_url {
            validate_image_url(url)?;
        }
        Ok(())
    }

    /// Merge the supplied fields into `entry`.
    pub fn apply_to(&self, entry: &mut PhotoEntry) {
        if let Some(caption) = &self.caption {
            entry.caption = caption.clone();
        }
        if let Some(description) = &self.description {
            entry.description = normalize_description(Some(description.clone()));
        }
        if let Some(category) = &self.category {
            entry.category = category.clone();
        }
        if let Some(lens) = &self.lens {
            entry.lens = lens.clone();
        }
        if let Some(url) = &self.image_url {
            entry.image_url = url.clone();
        }
        if let Some(uploaded_at) = self.uploaded_at {
            entry.uploaded_at = uploaded_at;
        }
    }
}

// ---------------------------------------------------------------------------
// Facet choice
// ---------------------------------------------------------------------------

/// A category or lens value as picked in the admin form: either one of the
/// derived vocabulary values or free text typed after choosing "other".
///
/// Stays tagged until the store-write boundary, where [`FacetChoice::resolve`]
/// turns it into a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FacetChoice {
    Selected(String),
    Custom(String),
}

impl FacetChoice {
    /// Build a choice from a select value plus its free-text companion.
    ///
    /// An empty select value means nothing was chosen yet.
    pub fn from_form(selected: &str, custom: &str) -> Option<Self> {
        match selected.trim() {
            "" => None,
            OTHER_OPTION => Some(Self::Custom(custom.to_string())),
            value => Some(Self::Selected(value.to_string())),
        }
    }

    /// The plain value to persist, or `None` when it is blank.
    pub fn resolve(&self) -> Option<&str> {
        let raw = match self {
            Self::Selected(v) | Self::Custom(v) => v.trim(),
        };
        (!raw.is_empty()).then_some(raw)
    }

    /// The value the select control should show.
    pub fn select_value(&self) -> &str {
        match self {
            Self::Selected(v) => v,
            Self::Custom(_) => OTHER_OPTION,
        }
    }
}

// ---------------------------------------------------------------------------
// Server-side filter
// ---------------------------------------------------------------------------

/// Equality predicates on the two facet fields, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFilter {
    pub category: Option<String>,
    pub lens: Option<String>,
}

impl PhotoFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.lens.is_none()
    }

    pub fn matches(&self, entry: &PhotoEntry) -> bool {
        self.category.as_deref().map_or(true, |c| entry.category == c)
            && self.lens.as_deref().map_or(true, |l| entry.lens == l)
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Ensure `value` has at least one non-whitespace character.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// An image URL must be an absolute http(s) URL or a root-relative path.
pub fn validate_image_url(url: &str) -> Result<(), CoreError> {
    require_non_empty("imageUrl", url)?;
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/') {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "imageUrl '{url}' is not a resolvable URL"
        )))
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn new_photo() -> NewPhoto {
        NewPhoto {
            caption: "Jumping spider".into(),
            description: Some("Eyes in focus".into()),
            category: "insect".into(),
            lens: "macro-90mm".into(),
            image_url: "https://cdn.example.com/spider.jpg".into(),
            uploaded_at: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn valid_new_photo_passes() {
        assert!(new_photo().validate().is_ok());
    }

    #[test]
    fn blank_caption_is_rejected() {
        let mut photo = new_photo();
        photo.caption = "   ".into();
        assert_matches!(photo.validate(), Err(CoreError::Validation(msg)) if msg.contains("caption"));
    }

    #[test]
    fn relative_image_url_without_root_is_rejected() {
        let mut photo = new_photo();
        photo.image_url = "spider.jpg".into();
        assert_matches!(photo.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn wire_names_are_camel_case() {
        let entry = new_photo().into_entry(3);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("uploadedAt").is_some());
        let back: PhotoEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn patch_with_only_caption_keeps_image() {
        let mut entry = new_photo().into_entry(1);
        let patch = PhotoPatch {
            caption: Some("Renamed".into()),
            ..Default::default()
        };
        patch.apply_to(&mut entry);
        assert_eq!(entry.caption, "Renamed");
        assert_eq!(entry.image_url, "https://cdn.example.com/spider.jpg");
        assert_eq!(entry.lens, "macro-90mm");
    }

    #[test]
    fn patch_with_empty_description_clears_it() {
        let mut entry = new_photo().into_entry(1);
        let patch = PhotoPatch {
            description: Some(String::new()),
            ..Default::default()
        };
        patch.apply_to(&mut entry);
        assert_eq!(entry.description, None);
    }

    #[test]
    fn patch_rejects_blank_supplied_lens() {
        let patch = PhotoPatch {
            lens: Some(" ".into()),
            ..Default::default()
        };
        assert_matches!(patch.validate(), Err(CoreError::Validation(_)));
        assert!(PhotoPatch::default().is_empty());
    }

    #[test]
    fn facet_choice_from_form() {
        assert_eq!(FacetChoice::from_form("", "ignored"), None);
        assert_eq!(
            FacetChoice::from_form("flora", ""),
            Some(FacetChoice::Selected("flora".into()))
        );
        assert_eq!(
            FacetChoice::from_form("other", "fungi"),
            Some(FacetChoice::Custom("fungi".into()))
        );
    }

    #[test]
    fn facet_choice_resolves_trimmed_or_none() {
        assert_eq!(FacetChoice::Custom("  fungi ".into()).resolve(), Some("fungi"));
        assert_eq!(FacetChoice::Custom("   ".into()).resolve(), None);
        assert_eq!(FacetChoice::Custom("x".into()).select_value(), OTHER_OPTION);
    }

    #[test]
    fn filter_is_conjunctive() {
        let entry = new_photo().into_entry(1);
        let both = PhotoFilter {
            category: Some("insect".into()),
            lens: Some("macro-90mm".into()),
        };
        let wrong_lens = PhotoFilter {
            category: Some("insect".into()),
            lens: Some("macro-100mm".into()),
        };
        assert!(both.matches(&entry));
        assert!(!wrong_lens.matches(&entry));
        assert!(PhotoFilter::default().matches(&entry));
    }
}
