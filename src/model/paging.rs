//! Paged list engine: pagination state driven by a pluggable page provider
//!
//! The engine owns one [`PageListState`] per list screen. Triggers (`mount`,
//! `set_query`, `load_next`, `retry`) are pull-based: each one issues at most one
//! provider call and the state is updated from that call's outcome. While a load
//! is in flight every other trigger is ignored, except a query change which is
//! deferred until the in-flight page lands and then supersedes it.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::content::Page;
use super::data_state::DataState;
use super::provider::PageProvider;

/// Selection distance from the loaded tail that triggers the next page
pub const LOAD_MORE_THRESHOLD: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PageStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
    Empty,
}

/// Pagination state of one list screen
#[derive(Clone, Debug)]
pub struct PageListState<T> {
    pub current_page: u32,
    pub items: Vec<T>,
    pub status: PageStatus,
    pub query: Option<String>,
    pub error: Option<String>,
    pub end_reached: bool,
    pending_query: Option<Option<String>>,
}

impl<T> PageListState<T> {
    pub fn new(query: Option<String>) -> Self {
        Self {
            current_page: 0,
            items: Vec::new(),
            status: PageStatus::Idle,
            query,
            error: None,
            end_reached: false,
            pending_query: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == PageStatus::Loading
    }

    fn reset(&mut self, query: Option<String>) {
        self.current_page = 0;
        self.items.clear();
        self.query = query;
        self.error = None;
        self.end_reached = false;
        self.status = PageStatus::Loading;
    }

    fn apply(&mut self, page: u32, result: DataState<Page<T>>) {
        match result {
            DataState::Success(loaded) => self.apply_items(page, loaded.items),
            DataState::Empty => self.apply_items(page, Vec::new()),
            DataState::Error(e) => {
                // Items already on screen stay there
                self.status = PageStatus::Error;
                self.error = Some(e.to_string());
            }
            DataState::Loading => {}
        }
    }

    fn apply_items(&mut self, page: u32, items: Vec<T>) {
        self.error = None;
        if page == 0 {
            self.end_reached = items.is_empty();
            self.status = if items.is_empty() {
                PageStatus::Empty
            } else {
                PageStatus::Success
            };
            self.items = items;
        } else {
            if items.is_empty() {
                self.end_reached = true;
            }
            self.items.extend(items);
            self.status = PageStatus::Success;
        }
    }
}

impl<T> Default for PageListState<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Drives a [`PageListState`] against a provider.
///
/// Cloning the engine shares the state, so a controller task and the render
/// loop observe the same list. Every trigger returns `true` when it was
/// accepted and `false` when it was ignored.
pub struct PageListEngine<T> {
    provider: Arc<dyn PageProvider<T>>,
    state: Arc<Mutex<PageListState<T>>>,
    supports_query: bool,
}

impl<T> Clone for PageListEngine<T> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            state: self.state.clone(),
            supports_query: self.supports_query,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> PageListEngine<T> {
    pub fn new(provider: Arc<dyn PageProvider<T>>) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(PageListState::default())),
            supports_query: false,
        }
    }

    /// Engine for a screen with query-driven filtering, starting from `query`.
    pub fn with_query(provider: Arc<dyn PageProvider<T>>, query: Option<String>) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(PageListState::new(query))),
            supports_query: true,
        }
    }

    pub async fn snapshot(&self) -> PageListState<T> {
        self.state.lock().await.clone()
    }

    /// Fetch `page` with the current query; provider failures become `Error`.
    pub async fn load(&self, page: u32) -> DataState<Page<T>> {
        let query = self.state.lock().await.query.clone();
        match self.provider.load_page(page, query.as_deref()).await {
            Ok(loaded) => {
                tracing::debug!(page, items = loaded.items.len(), "Page loaded");
                DataState::Success(loaded)
            }
            Err(e) => {
                tracing::warn!(page, query = ?query, error = %e, "Page load failed");
                DataState::error(e)
            }
        }
    }

    /// Reset to page 0 and load it. Called when the list screen appears.
    pub async fn mount(&self) -> bool {
        {
            let mut state = self.state.lock().await;
            if state.is_loading() {
                tracing::trace!("Mount ignored, load in flight");
                return false;
            }
            let query = state.query.clone();
            state.reset(query);
        }
        self.run_from(0).await;
        true
    }

    pub async fn set_query(&self, query: Option<String>) -> bool {
        if !self.supports_query {
            tracing::warn!(query = ?query, "List does not support a query parameter");
            return false;
        }
        {
            let mut state = self.state.lock().await;
            if state.is_loading() {
                let target = state.pending_query.as_ref().unwrap_or(&state.query);
                if *target == query {
                    return false;
                }
                if state.query == query {
                    // Back to the query already in flight
                    state.pending_query = None;
                } else {
                    tracing::debug!(query = ?query, "Query change deferred until current page lands");
                    state.pending_query = Some(query);
                }
                return true;
            }
            if state.query == query && state.status != PageStatus::Idle {
                return false;
            }
            state.reset(query);
        }
        self.run_from(0).await;
        true
    }

    pub async fn load_next(&self) -> bool {
        let page = {
            let mut state = self.state.lock().await;
            if state.is_loading() {
                tracing::trace!("Load next ignored, load in flight");
                return false;
            }
            state.current_page += 1;
            state.status = PageStatus::Loading;
            state.current_page
        };
        self.run_from(page).await;
        true
    }

    /// Re-issue the current page without advancing.
    pub async fn retry(&self) -> bool {
        let page = {
            let mut state = self.state.lock().await;
            if state.is_loading() {
                tracing::trace!("Retry ignored, load in flight");
                return false;
            }
            state.status = PageStatus::Loading;
            state.current_page
        };
        tracing::debug!(page, "Retrying page");
        self.run_from(page).await;
        true
    }

    /// Whether `selected` is close enough to the tail to ask for the next page.
    pub async fn should_load_more(&self, selected: usize) -> bool {
        let state = self.state.lock().await;
        state.status == PageStatus::Success
            && !state.end_reached
            && selected + LOAD_MORE_THRESHOLD >= state.items.len()
    }

    async fn run_from(&self, mut page: u32) {
        loop {
            let result = self.load(page).await;

            let mut state = self.state.lock().await;
            if let Some(query) = state.pending_query.take() {
                tracing::debug!(page, query = ?query, "Discarding stale page after query change");
                state.reset(query);
                page = 0;
                continue;
            }
            state.apply(page, result);
            return;
        }
    }
}
