//! Cursor-based incremental fetch over an [`AssetSource`](crate::traits::AssetSource).
//!
//! The pager itself performs no I/O. A fetch is split into [`Pager::begin`],
//! which hands out the request (or `None` while a fetch is in flight or the
//! library is exhausted), and [`Pager::finish`], which applies the result.
//! This keeps the "at most one fetch in flight" rule in one place no matter
//! how the caller drives the source.

use std::sync::Arc;

use crate::error::ServiceError;
use crate::models::{FetchFilters, PageCursor, SharedAsset};
use crate::traits::{Page, PageRequest};

#[derive(Debug, Clone)]
pub struct Pager {
    items: Vec<SharedAsset>,
    cursor: Option<PageCursor>,
    loading: bool,
    exhausted: bool,
    page_size: usize,
    filters: FetchFilters,
}

impl Pager {
    pub fn new(page_size: usize, filters: FetchFilters) -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            loading: false,
            exhausted: false,
            page_size,
            filters,
        }
    }

    /// Starts a fetch and returns its parameters.
    ///
    /// Returns `None` without touching any state when a fetch is already in
    /// flight or the source reported no further pages.
    pub fn begin(&mut self) -> Option<PageRequest> {
        if self.loading || self.exhausted {
            log::debug!(
                "Fetch skipped (loading={}, exhausted={})",
                self.loading,
                self.exhausted
            );
            return None;
        }

        self.loading = true;
        Some(PageRequest {
            cursor: self.cursor.clone(),
            page_size: self.page_size,
            filters: self.filters,
        })
    }

    /// Applies the outcome of the fetch started by [`Pager::begin`].
    ///
    /// On success returns the number of appended items. On failure only the
    /// loading flag is reset and the error is handed back.
    pub fn finish(&mut self, result: Result<Page, ServiceError>) -> Result<usize, ServiceError> {
        if !self.loading {
            log::warn!("Fetch result arrived with no fetch in flight, ignoring");
            return Ok(0);
        }
        self.loading = false;

        let page = result?;
        let appended = page.items.len();

        match page.has_more {
            Some(false) => self.exhausted = true,
            Some(true) => {}
            // Without a flag, an empty page is the only end marker we get
            None if appended == 0 => self.exhausted = true,
            None => {}
        }

        if appended > 0 {
            if let Some(next) = page.next_cursor {
                self.cursor = Some(next);
            }
            self.items.extend(page.items.into_iter().map(Arc::new));
        }

        log::debug!(
            "Page applied: {} new, {} total, exhausted={}",
            appended,
            self.items.len(),
            self.exhausted
        );
        Ok(appended)
    }

    pub fn items(&self) -> &[SharedAsset] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
