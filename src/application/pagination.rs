//! Offset pagination with grouped page windows.
//!
//! The window is always derived from the current page, never from whatever
//! window was rendered before, so a direct jump recenters deterministically.

use std::num::NonZeroU32;

use crate::application::remote::ListQuery;
use crate::domain::types::SortOrder;

/// Page size and the number of page buttons shown per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    page_size: NonZeroU32,
    group_size: NonZeroU32,
}

impl PageGeometry {
    pub fn new(page_size: NonZeroU32, group_size: NonZeroU32) -> Self {
        Self {
            page_size,
            group_size,
        }
    }

    pub fn page_size(&self) -> u64 {
        u64::from(self.page_size.get())
    }

    pub fn group_size(&self) -> u64 {
        u64::from(self.group_size.get())
    }
}

/// Inclusive range of page numbers shown as buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u64,
    pub end: u64,
}

impl PageWindow {
    pub fn contains(&self, page: u64) -> bool {
        (self.start..=self.end).contains(&page)
    }

    pub fn pages(&self) -> impl Iterator<Item = u64> {
        self.start..=self.end
    }
}

/// Pagination state recomputed from the last successful page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u64,
    total_count: u64,
    geometry: PageGeometry,
}

impl PaginationState {
    pub fn new(current_page: u64, total_count: u64, geometry: PageGeometry) -> Self {
        Self {
            current_page: current_page.max(1),
            total_count,
            geometry,
        }
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.geometry.page_size())
    }

    /// One-based index of the group holding `current_page`.
    pub fn group_index(&self) -> u64 {
        self.current_page.div_ceil(self.geometry.group_size())
    }

    /// Window of page buttons around the current page.
    ///
    /// `None` when there are no pages at all. A current page past the end
    /// falls back to the last group so the controls can lead back.
    pub fn window(&self) -> Option<PageWindow> {
        let total_pages = self.total_pages();
        if total_pages == 0 {
            return None;
        }
        let group = self.geometry.group_size();
        let anchor = self.current_page.min(total_pages);
        let start = (anchor.div_ceil(group) - 1) * group + 1;
        let end = (start + group - 1).min(total_pages);
        Some(PageWindow { start, end })
    }

    /// First page of the previous group, if there is one.
    pub fn prev_group_target(&self) -> Option<u64> {
        let window = self.window()?;
        window
            .start
            .checked_sub(self.geometry.group_size())
            .filter(|target| *target >= 1)
    }

    /// First page of the next group, if there is one.
    pub fn next_group_target(&self) -> Option<u64> {
        let window = self.window()?;
        let target = window.end + 1;
        (target <= self.total_pages()).then_some(target)
    }
}

/// Builds page requests and folds their results back into [`PaginationState`].
#[derive(Debug, Clone)]
pub struct Paginator {
    geometry: PageGeometry,
    state: Option<PaginationState>,
}

impl Paginator {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            state: None,
        }
    }

    pub fn state(&self) -> Option<&PaginationState> {
        self.state.as_ref()
    }

    pub fn current_page(&self) -> u64 {
        self.state.map_or(1, |state| state.current_page())
    }

    /// Request for `page`, clamped to at least one. No upper clamp: a page
    /// past the end comes back empty.
    pub fn request(&self, page: u64, order: SortOrder) -> ListQuery {
        ListQuery::new(page, self.geometry.page_size(), order)
    }

    pub fn apply(&mut self, query: ListQuery, total_count: u64) -> PaginationState {
        let state = PaginationState::new(query.page, total_count, self.geometry);
        self.state = Some(state);
        state
    }

    pub fn prev_group_target(&self) -> Option<u64> {
        self.state.and_then(|state| state.prev_group_target())
    }

    pub fn next_group_target(&self) -> Option<u64> {
        self.state.and_then(|state| state.next_group_target())
    }
}
