//! Search and sort state.
//!
//! Decides whether a typed query routes to keyword search or back to paged
//! browsing, and tracks the active sort tab. Search results are a flat list:
//! pagination controls are hidden while one is displayed.

use std::time::Duration;

use tokio::time::Instant;

use crate::application::debounce::Debouncer;
use crate::domain::types::SortOrder;

/// What the post list currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListingMode {
    #[default]
    Paged,
    Search {
        keyword: String,
    },
}

impl ListingMode {
    pub fn is_search(&self) -> bool {
        matches!(self, ListingMode::Search { .. })
    }

    pub fn keyword(&self) -> Option<&str> {
        match self {
            ListingMode::Search { keyword } => Some(keyword),
            ListingMode::Paged => None,
        }
    }
}

/// Where a settled query sends the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRoute {
    /// Blank query: back to page one of the active sort order.
    Browse,
    Search(String),
}

impl QueryRoute {
    pub fn from_raw(raw: &str) -> Self {
        let keyword = raw.trim();
        if keyword.is_empty() {
            QueryRoute::Browse
        } else {
            QueryRoute::Search(keyword.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchController {
    order: SortOrder,
    mode: ListingMode,
    typed: Debouncer<String>,
}

impl SearchController {
    pub fn new(order: SortOrder, debounce: Duration) -> Self {
        Self {
            order,
            mode: ListingMode::Paged,
            typed: Debouncer::new(debounce),
        }
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    pub fn mode(&self) -> &ListingMode {
        &self.mode
    }

    pub fn enter_search(&mut self, keyword: String) {
        self.mode = ListingMode::Search { keyword };
    }

    pub fn enter_paged(&mut self) {
        self.mode = ListingMode::Paged;
    }

    /// Record a keystroke-level change of the query box.
    pub fn on_query_change(&mut self, raw: impl Into<String>, now: Instant) {
        self.typed.push(raw.into(), now);
    }

    /// Drop a query that has not fired yet.
    pub fn cancel_pending(&mut self) -> bool {
        self.typed.cancel().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.typed.is_pending()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.typed.deadline()
    }

    /// Route the query whose quiescence window has elapsed, if any.
    pub fn fire_due(&mut self, now: Instant) -> Option<QueryRoute> {
        self.typed
            .fire_due(now)
            .map(|raw| QueryRoute::from_raw(&raw))
    }
}
