//! Gallery query, filter, and pagination engine.
//!
//! The public gallery fetches the whole catalog once, derives its facet
//! lists from that unfiltered snapshot, and then filters and paginates on
//! the client side. Selecting a category therefore never removes lens
//! options (and vice versa).
//!
//! State lives in [`GalleryState`] and only changes through
//! [`GalleryState::apply`] and the fetch ticket pair
//! [`GalleryState::begin_fetch`] / [`GalleryState::complete_fetch`]. A fetch
//! result carrying an outdated ticket is dropped, so a slow response can
//! never overwrite a newer one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::photo::{PhotoEntry, PhotoFilter};
use crate::store::CatalogStore;
use crate::vocabulary::{derive_vocabulary, Vocabulary};

/// Entries per gallery page.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Upper bound for a caller-supplied page size.
pub const MAX_PAGE_SIZE: usize = 60;

/// Wire value of the "no restriction" facet selection.
pub const ALL: &str = "all";

// ---------------------------------------------------------------------------
// Selections and modes
// ---------------------------------------------------------------------------

/// Filter value for one facet: everything, or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FacetSelection {
    #[default]
    All,
    Only(String),
}

impl FacetSelection {
    /// Parse a wire value. Empty input and any casing of `all` mean [`FacetSelection::All`].
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    /// The equality predicate value for a store-side filter.
    pub fn as_predicate(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }
}

impl From<String> for FacetSelection {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FacetSelection> for String {
    fn from(value: FacetSelection) -> Self {
        match value {
            FacetSelection::All => ALL.to_string(),
            FacetSelection::Only(v) => v,
        }
    }
}

/// Build the store-side filter for a pair of selections.
pub fn to_filter(category: &FacetSelection, lens: &FacetSelection) -> PhotoFilter {
    PhotoFilter {
        category: category.as_predicate().map(str::to_string),
        lens: lens.as_predicate().map(str::to_string),
    }
}

/// Layout toggle. Never affects which entries are selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Why a page has no items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The catalog itself is empty.
    NoContent,
    /// The catalog has entries but none pass the filters.
    NoMatches,
}

// ---------------------------------------------------------------------------
// Stateless query
// ---------------------------------------------------------------------------

/// Conjunctive facet predicate.
pub fn matches(entry: &PhotoEntry, category: &FacetSelection, lens: &FacetSelection) -> bool {
    category.matches(&entry.category) && lens.matches(&entry.lens)
}

/// Number of pages needed for `count` items. Zero items need zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamp a 1-based page index into `[1, max(total_pages, 1)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Clamp a caller-supplied page size into `[1, MAX_PAGE_SIZE]`.
pub fn clamp_page_size(page_size: Option<usize>) -> usize {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Query parameters of one gallery render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryQuery {
    pub category: FacetSelection,
    pub lens: FacetSelection,
    pub page: usize,
    pub page_size: usize,
    pub view: ViewMode,
}

impl Default for GalleryQuery {
    fn default() -> Self {
        Self {
            category: FacetSelection::All,
            lens: FacetSelection::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            view: ViewMode::Grid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Everything a gallery render needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPage {
    pub items: Vec<PhotoEntry>,
    pub pagination: Pagination,
    /// Entries passing the filters, across all pages.
    pub filtered_count: usize,
    /// Entries in the whole snapshot.
    pub total_count: usize,
    pub category: FacetSelection,
    pub lens: FacetSelection,
    pub filters_active: bool,
    pub view: ViewMode,
    /// Facet lists derived from the unfiltered snapshot.
    pub facets: Vocabulary,
    pub empty: Option<EmptyState>,
}

/// Filter and paginate a full catalog snapshot.
pub fn query_gallery(entries: &[PhotoEntry], query: &GalleryQuery) -> GalleryPage {
    let page_size = query.page_size.max(1);
    let filtered: Vec<&PhotoEntry> = entries
        .iter()
        .filter(|e| matches(e, &query.category, &query.lens))
        .collect();

    let filtered_count = filtered.len();
    let pages = total_pages(filtered_count, page_size);
    let page = clamp_page(query.page, pages);

    let items = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    let empty = if entries.is_empty() {
        Some(EmptyState::NoContent)
    } else if filtered_count == 0 {
        Some(EmptyState::NoMatches)
    } else {
        None
    };

    GalleryPage {
        items,
        pagination: Pagination {
            page,
            page_size,
            total_pages: pages,
            has_previous: page > 1,
            has_next: page < pages,
        },
        filtered_count,
        total_count: entries.len(),
        category: query.category.clone(),
        lens: query.lens.clone(),
        filters_active: !query.category.is_all() || !query.lens.is_all(),
        view: query.view,
        facets: derive_vocabulary(entries),
        empty,
    }
}

// ---------------------------------------------------------------------------
// Stateful view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// The last fetch failed; the view offers a retry.
    Failed { message: String },
}

/// Proof that a fetch was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GalleryAction {
    SelectCategory(FacetSelection),
    SelectLens(FacetSelection),
    ClearFilters,
    GoToPage(usize),
    NextPage,
    PreviousPage,
    SetView(ViewMode),
}

/// Serializable state of one gallery view instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryState {
    pub entries: Vec<PhotoEntry>,
    pub query: GalleryQuery,
    pub load: LoadState,
    generation: u64,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl GalleryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            query: GalleryQuery {
                page_size: page_size.max(1),
                ..GalleryQuery::default()
            },
            load: LoadState::Loading,
            generation: 0,
        }
    }

    /// Reduce one user action. Any filter change resets to page 1.
    pub fn apply(&mut self, action: GalleryAction) {
        match action {
            GalleryAction::SelectCategory(selection) => {
                self.query.category = selection;
                self.query.page = 1;
            }
            GalleryAction::SelectLens(selection) => {
                self.query.lens = selection;
                self.query.page = 1;
            }
            GalleryAction::ClearFilters => {
                self.query.category = FacetSelection::All;
                self.query.lens = FacetSelection::All;
                self.query.page = 1;
            }
            GalleryAction::GoToPage(page) => {
                self.query.page = clamp_page(page, self.total_pages());
            }
            GalleryAction::NextPage => {
                self.query.page = clamp_page(self.query.page + 1, self.total_pages());
            }
            GalleryAction::PreviousPage => {
                self.query.page = clamp_page(self.query.page.saturating_sub(1), self.total_pages());
            }
            GalleryAction::SetView(mode) => {
                self.query.view = mode;
            }
        }
    }

    /// Start a fetch. Filters and page are left untouched so a retry
    /// re-issues exactly the same view.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.load = LoadState::Loading;
        FetchTicket(self.generation)
    }

    /// Apply a fetch result. Returns `false` and changes nothing when the
    /// ticket is older than the latest `begin_fetch`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<PhotoEntry>, CoreError>,
    ) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "Dropping stale gallery fetch result"
            );
            return false;
        }

        match result {
            Ok(entries) => {
                self.entries = entries;
                self.load = LoadState::Ready;
                self.query.page = clamp_page(self.query.page, self.total_pages());
            }
            Err(e) => {
                self.load = LoadState::Failed {
                    message: e.user_message(),
                };
            }
        }
        true
    }

    pub fn can_retry(&self) -> bool {
        matches!(self.load, LoadState::Failed { .. })
    }

    pub fn total_pages(&self) -> usize {
        let count = self
            .entries
            .iter()
            .filter(|e| matches(e, &self.query.category, &self.query.lens))
            .count();
        total_pages(count, self.query.page_size)
    }

    pub fn view(&self) -> GalleryPage {
        query_gallery(&self.entries, &self.query)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Gallery view bound to a catalog store.
pub struct GalleryEngine {
    store: Arc<dyn CatalogStore>,
    state: GalleryState,
}

impl GalleryEngine {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            state: GalleryState::default(),
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Initial load: one unfiltered fetch.
    pub async fn mount(&mut self) -> Result<(), CoreError> {
        self.refresh().await
    }

    /// User-triggered retry after a failed fetch. Never called automatically.
    pub async fn retry(&mut self) -> Result<(), CoreError> {
        self.refresh().await
    }

    pub fn dispatch(&mut self, action: GalleryAction) -> GalleryPage {
        self.state.apply(action);
        self.state.view()
    }

    pub fn view(&self) -> GalleryPage {
        self.state.view()
    }

    async fn refresh(&mut self) -> Result<(), CoreError> {
        let ticket = self.state.begin_fetch();
        let result = self.store.list_all().await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "Gallery fetch failed");
        }
        self.state.complete_fetch(ticket, result);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, ProbeStore};
    use assert_matches::assert_matches;

    fn catalog() -> Vec<PhotoEntry> {
        vec![
            entry(1, "insect", "macro-90mm"),
            entry(2, "insect", "macro-100mm"),
            entry(3, "flora", "macro-90mm"),
            entry(4, "flora", "macro-100mm"),
            entry(5, "insect", "macro-90mm"),
        ]
    }

    fn only(v: &str) -> FacetSelection {
        FacetSelection::Only(v.to_string())
    }

    fn ready_state(entries: Vec<PhotoEntry>, page_size: usize) -> GalleryState {
        let mut state = GalleryState::new(page_size);
        let ticket = state.begin_fetch();
        assert!(state.complete_fetch(ticket, Ok(entries)));
        state
    }

    #[test]
    fn facet_selection_wire_format() {
        assert_eq!(FacetSelection::parse("All"), FacetSelection::All);
        assert_eq!(FacetSelection::parse(""), FacetSelection::All);
        assert_eq!(FacetSelection::parse(" flora "), only("flora"));
        let json = serde_json::to_string(&FacetSelection::All).unwrap();
        assert_eq!(json, "\"all\"");
        let back: FacetSelection = serde_json::from_str("\"insect\"").unwrap();
        assert_eq!(back, only("insect"));
    }

    #[test]
    fn displayed_set_equals_conjunctive_predicate_for_every_pair() {
        let entries = catalog();
        let vocab = derive_vocabulary(&entries);
        let mut categories = vec![FacetSelection::All];
        categories.extend(vocab.categories.iter().cloned().map(FacetSelection::Only));
        let mut lenses = vec![FacetSelection::All];
        lenses.extend(vocab.lenses.iter().cloned().map(FacetSelection::Only));

        for category in &categories {
            for lens in &lenses {
                let query = GalleryQuery {
                    category: category.clone(),
                    lens: lens.clone(),
                    page_size: MAX_PAGE_SIZE,
                    ..GalleryQuery::default()
                };
                let page = query_gallery(&entries, &query);
                let expected: Vec<_> = entries
                    .iter()
                    .filter(|e| {
                        (category.is_all() || category.matches(&e.category))
                            && (lens.is_all() || lens.matches(&e.lens))
                    })
                    .cloned()
                    .collect();
                assert_eq!(page.items, expected, "category={category:?} lens={lens:?}");
            }
        }
    }

    #[test]
    fn insect_with_all_lenses_then_intersection() {
        let entries = catalog();
        let insects = query_gallery(
            &entries,
            &GalleryQuery {
                category: only("insect"),
                ..GalleryQuery::default()
            },
        );
        assert_eq!(insects.filtered_count, 3);
        assert!(insects.items.iter().all(|e| e.category == "insect"));

        let narrow = query_gallery(
            &entries,
            &GalleryQuery {
                category: only("insect"),
                lens: only("macro-90mm"),
                ..GalleryQuery::default()
            },
        );
        let ids: Vec<_> = narrow.items.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn facets_come_from_unfiltered_snapshot() {
        let page = query_gallery(
            &catalog(),
            &GalleryQuery {
                category: only("flora"),
                lens: only("macro-90mm"),
                ..GalleryQuery::default()
            },
        );
        assert_eq!(page.facets.categories, vec!["flora", "insect"]);
        assert_eq!(page.facets.lenses, vec!["macro-100mm", "macro-90mm"]);
        assert!(page.filters_active);
    }

    #[test]
    fn pagination_slices_and_clamps() {
        let entries: Vec<_> = (1..=13).map(|i| entry(i, "insect", "macro-90mm")).collect();

        let first = query_gallery(&entries, &GalleryQuery::default());
        assert_eq!(first.items.len(), 6);
        assert_eq!(first.pagination.total_pages, 3);
        assert!(!first.pagination.has_previous);
        assert!(first.pagination.has_next);

        let last = query_gallery(
            &entries,
            &GalleryQuery {
                page: 99,
                ..GalleryQuery::default()
            },
        );
        assert_eq!(last.pagination.page, 3);
        assert_eq!(last.items.len(), 1);
        assert!(!last.pagination.has_next);

        let zero = query_gallery(
            &entries,
            &GalleryQuery {
                page: 0,
                ..GalleryQuery::default()
            },
        );
        assert_eq!(zero.pagination.page, 1);
    }

    #[test]
    fn empty_states_are_distinguished() {
        let nothing = query_gallery(&[], &GalleryQuery::default());
        assert_eq!(nothing.empty, Some(EmptyState::NoContent));
        assert_eq!(nothing.pagination.page, 1);
        assert_eq!(nothing.pagination.total_pages, 0);

        let no_match = query_gallery(
            &catalog(),
            &GalleryQuery {
                category: only("fungi"),
                ..GalleryQuery::default()
            },
        );
        assert_eq!(no_match.empty, Some(EmptyState::NoMatches));
        assert_eq!(no_match.total_count, 5);

        assert_eq!(query_gallery(&catalog(), &GalleryQuery::default()).empty, None);
    }

    #[test]
    fn any_filter_change_resets_page() {
        let entries: Vec<_> = (1..=20).map(|i| entry(i, "insect", "macro-90mm")).collect();
        let mut state = ready_state(entries, 6);

        for action in [
            GalleryAction::SelectCategory(only("insect")),
            GalleryAction::SelectLens(only("macro-90mm")),
            GalleryAction::SelectCategory(FacetSelection::All),
            GalleryAction::ClearFilters,
        ] {
            state.apply(GalleryAction::GoToPage(3));
            assert_eq!(state.query.page, 3);
            state.apply(action);
            assert_eq!(state.query.page, 1);
        }
    }

    #[test]
    fn boundary_navigation_is_a_no_op() {
        let entries: Vec<_> = (1..=7).map(|i| entry(i, "insect", "macro-90mm")).collect();
        let mut state = ready_state(entries, 6);

        state.apply(GalleryAction::PreviousPage);
        assert_eq!(state.query.page, 1);
        state.apply(GalleryAction::NextPage);
        state.apply(GalleryAction::NextPage);
        assert_eq!(state.query.page, 2);
    }

    #[test]
    fn view_mode_does_not_change_selection() {
        let mut state = ready_state(catalog(), 6);
        let grid = state.view();
        state.apply(GalleryAction::SetView(ViewMode::List));
        let list = state.view();
        assert_eq!(grid.items, list.items);
        assert_eq!(list.view, ViewMode::List);
    }

    #[test]
    fn stale_fetch_result_is_dropped() {
        let mut state = GalleryState::default();
        let old = state.begin_fetch();
        let new = state.begin_fetch();

        assert!(state.complete_fetch(new, Ok(vec![entry(2, "flora", "macro-90mm")])));
        assert!(!state.complete_fetch(old, Ok(vec![entry(1, "insect", "macro-90mm")])));

        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].id, 2);
        assert_eq!(state.load, LoadState::Ready);
    }

    #[test]
    fn stale_failure_does_not_clobber_newer_success() {
        let mut state = GalleryState::default();
        let old = state.begin_fetch();
        let new = state.begin_fetch();
        state.complete_fetch(new, Ok(catalog()));
        state.complete_fetch(old, Err(CoreError::StoreUnavailable("late".into())));
        assert_eq!(state.load, LoadState::Ready);
    }

    #[tokio::test]
    async fn failed_mount_then_retry_keeps_filters() {
        let store = Arc::new(ProbeStore::default());
        store
            .inner
            .insert(&crate::test_support::new_photo("insect", "macro-90mm"))
            .await
            .unwrap();
        store.set_offline(true);

        let mut engine = GalleryEngine::new(store.clone());
        engine.dispatch(GalleryAction::SelectCategory(only("insect")));
        assert_matches!(engine.mount().await, Err(CoreError::StoreUnavailable(_)));
        assert!(engine.state().can_retry());
        assert_eq!(store.reads(), 1);

        store.set_offline(false);
        engine.retry().await.unwrap();

        assert_eq!(engine.state().load, LoadState::Ready);
        assert_eq!(engine.state().query.category, only("insect"));
        assert_eq!(engine.view().filtered_count, 1);
        assert_eq!(store.reads(), 2);
    }
}
