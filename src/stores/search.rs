//! Search page state: query, pagination, and product lists.
//!
//! Plain setters only. Filtering and paging of `all_products` into
//! `products` is the caller's job.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use std::num::NonZeroU32;

use serde::Serialize;
use tokio::sync::watch;

use crate::catalog::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("page must be a positive integer, got {0}")]
    InvalidPage(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub page: NonZeroU32,
    pub products: Vec<Product>,
    pub all_products: Vec<Product>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self { query: String::new(), page: NonZeroU32::MIN, products: Vec::new(), all_products: Vec::new() }
    }
}

pub struct SearchStore {
    state: watch::Sender<SearchState>,
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStore {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self { state }
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn query(&self) -> String {
        self.state.borrow().query.clone()
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.state.borrow().page.get()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_modify(|s| s.query = query);
    }

    /// # Errors
    ///
    /// Returns `InvalidPage` for page `0`; state is unchanged.
    pub fn set_current_page(&mut self, page: u32) -> Result<(), SearchError> {
        let page = NonZeroU32::new(page).ok_or(SearchError::InvalidPage(page))?;
        self.state.send_modify(|s| s.page = page);
        Ok(())
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.state.send_modify(|s| s.products = products);
    }

    pub fn set_all_products(&mut self, all_products: Vec<Product>) {
        self.state.send_modify(|s| s.all_products = all_products);
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }
}
