//! Shared query parameter types for API handlers.

use folio_core::gallery::{clamp_page_size, FacetSelection, GalleryQuery, ViewMode};
use folio_core::photo::PhotoFilter;
use serde::Deserialize;

/// Gallery parameters (`?category=&lens=&page=&pageSize=&view=`).
///
/// Missing facets mean `all`; `page` defaults to 1 and is clamped against
/// the filtered result; `pageSize` is clamped into `[1, MAX_PAGE_SIZE]`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryParams {
    pub category: Option<String>,
    pub lens: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub view: Option<ViewMode>,
}

impl GalleryParams {
    pub fn into_query(self) -> GalleryQuery {
        GalleryQuery {
            category: self.category.as_deref().map(FacetSelection::parse).unwrap_or_default(),
            lens: self.lens.as_deref().map(FacetSelection::parse).unwrap_or_default(),
            page: self.page.unwrap_or(1),
            page_size: clamp_page_size(self.page_size),
            view: self.view.unwrap_or_default(),
        }
    }
}

/// Admin listing filter (`?category=&lens=`), applied by the store.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub category: Option<String>,
    pub lens: Option<String>,
}

impl FilterParams {
    pub fn into_filter(self) -> PhotoFilter {
        folio_core::gallery::to_filter(
            &self.category.as_deref().map(FacetSelection::parse).unwrap_or_default(),
            &self.lens.as_deref().map(FacetSelection::parse).unwrap_or_default(),
        )
    }
}
