//! Async driver for a [`PagedList`].
//!
//! [`ListController`] owns a list behind a mutex and a page source. Viewport
//! events are applied synchronously under the lock; when one of them makes
//! the list ask for a page, the fetch is spawned on tokio and completed under
//! the lock again once the source answers. The lock is never held while the
//! source runs, so scroll events keep being served from the rows already
//! stored.
//!
//! ```no_run
//! # use pagestream::{ListController, QueryConfig, ViewportConfig, PageSource};
//! # async fn demo<S: PageSource>(source: S) -> Result<(), Box<dyn std::error::Error>> {
//! let controller =
//!     ListController::new(source, QueryConfig::default(), ViewportConfig::default())?;
//! controller.on_resize(720.0);
//!
//! // The "load more" button.
//! let outcome = controller.request_next().await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use pagestream_core::logging::targets;
use pagestream_core::{
    FetchOutcome, FetchResult, FetchState, FetchTicket, ListStatus, PageSource, PagedList,
    QueryConfig, RenderSink, Viewport, ViewportConfig, VisibleRange,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::runtime::{self, RuntimeError};

/// Drives a [`PagedList`] against a [`PageSource`].
///
/// Cloning is cheap; clones share the list, the source and the runtime.
pub struct ListController<S: PageSource> {
    list: Arc<Mutex<PagedList<S::Record>>>,
    source: Arc<S>,
    handle: Handle,
}

impl<S: PageSource> Clone for ListController<S> {
    fn clone(&self) -> Self {
        Self {
            list: Arc::clone(&self.list),
            source: Arc::clone(&self.source),
            handle: self.handle.clone(),
        }
    }
}

impl<S: PageSource> ListController<S> {
    /// Create a controller spawning on the ambient runtime, or on the shared
    /// one outside an async context.
    pub fn new(
        source: S,
        query: QueryConfig,
        config: ViewportConfig,
    ) -> Result<Self, RuntimeError> {
        Ok(Self::with_handle(source, query, config, runtime::handle()?))
    }

    /// Create a controller spawning fetches on `handle`.
    pub fn with_handle(
        source: S,
        query: QueryConfig,
        config: ViewportConfig,
        handle: Handle,
    ) -> Self {
        Self {
            list: Arc::new(Mutex::new(PagedList::new(query, config))),
            source: Arc::new(source),
            handle,
        }
    }

    /// The page source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run `f` with the list locked.
    ///
    /// Use this for read access and for connecting to
    /// [`signals`](PagedList::signals). `f` must not call back into the
    /// controller.
    pub fn with_list<T>(&self, f: impl FnOnce(&PagedList<S::Record>) -> T) -> T {
        f(&self.list.lock())
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.list.lock().len()
    }

    /// Whether no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.list.lock().is_empty()
    }

    /// The current fetch state.
    pub fn fetch_state(&self) -> FetchState {
        self.list.lock().fetch_state().clone()
    }

    /// The overall list status.
    pub fn status(&self) -> ListStatus {
        self.list.lock().status()
    }

    /// The current visible range.
    pub fn visible_range(&self) -> VisibleRange {
        self.list.lock().visible_range().clone()
    }

    /// Apply a scroll event.
    pub fn on_scroll(&self, scroll_offset: f64) -> VisibleRange {
        self.react(|list| list.on_scroll(scroll_offset).clone())
    }

    /// Apply a change of the scroll surface's height.
    pub fn on_resize(&self, height: f64) -> VisibleRange {
        self.react(|list| list.on_resize(height).clone())
    }

    /// Apply a combined scroll and resize.
    pub fn on_viewport(&self, viewport: Viewport) -> VisibleRange {
        self.react(|list| list.on_viewport(viewport).clone())
    }

    /// Record a measured row height reported by the sink.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a stored row.
    pub fn record_measurement(&self, index: usize, size: u32) -> VisibleRange {
        self.react(|list| list.record_measurement(index, size).clone())
    }

    /// Change the height assumed for unmeasured rows.
    pub fn set_estimated_size(&self, size: u32) -> VisibleRange {
        self.react(|list| list.set_estimated_size(size).clone())
    }

    /// Replace the query. Rows and fetch progress start over; a fetch still in
    /// flight for the old query is discarded when it lands.
    ///
    /// Returns `false` if `query` is already active.
    pub fn set_query(&self, query: QueryConfig) -> bool {
        let (changed, ticket) = {
            let mut list = self.list.lock();
            let changed = list.set_query(query);
            let ticket = if changed { list.evaluate_prefetch() } else { None };
            (changed, ticket)
        };
        if let Some(ticket) = ticket {
            self.spawn_fetch(ticket);
        }
        changed
    }

    /// Clear a fetch failure and, if the viewport still wants it, fetch the
    /// failed page again.
    ///
    /// Returns `false` if the list was not in the failed state.
    pub fn retry(&self) -> bool {
        let (retried, ticket) = {
            let mut list = self.list.lock();
            let retried = list.retry();
            let ticket = if retried { list.evaluate_prefetch() } else { None };
            (retried, ticket)
        };
        if let Some(ticket) = ticket {
            self.spawn_fetch(ticket);
        }
        retried
    }

    /// Fetch the next page regardless of the viewport and wait for it.
    ///
    /// Returns [`FetchOutcome::Skipped`] when a fetch is already in flight,
    /// the list is exhausted or a failure is pending [`retry`](Self::retry).
    pub async fn request_next(&self) -> FetchResult<FetchOutcome> {
        let ticket = self.list.lock().begin_fetch();
        match ticket {
            Some(ticket) => self.run_fetch(ticket).await,
            None => Ok(FetchOutcome::Skipped),
        }
    }

    /// Draw the current range into `sink`.
    pub fn render<K: RenderSink<S::Record>>(&self, sink: &mut K) {
        self.list.lock().render_into(sink);
    }

    fn react(&self, apply: impl FnOnce(&mut PagedList<S::Record>) -> VisibleRange) -> VisibleRange {
        let (range, ticket) = {
            let mut list = self.list.lock();
            let range = apply(&mut list);
            (range, list.evaluate_prefetch())
        };
        if let Some(ticket) = ticket {
            self.spawn_fetch(ticket);
        }
        range
    }

    fn spawn_fetch(&self, ticket: FetchTicket) -> JoinHandle<FetchResult<FetchOutcome>> {
        let controller = self.clone();
        self.handle
            .spawn(async move { controller.run_fetch(ticket).await })
    }

    async fn run_fetch(&self, ticket: FetchTicket) -> FetchResult<FetchOutcome> {
        let request = self.list.lock().request_for(&ticket);
        tracing::debug!(
            target: targets::FETCH,
            page = request.page,
            page_size = request.page_size,
            "requesting page"
        );

        let result = self.source.fetch_page(request).await;

        let (outcome, next) = {
            let mut list = self.list.lock();
            let outcome = list.complete_fetch(ticket, result);
            let next = match &outcome {
                Ok(FetchOutcome::Appended { .. }) => list.evaluate_prefetch(),
                _ => None,
            };
            (outcome, next)
        };

        if let Err(err) = &outcome {
            tracing::warn!(target: targets::FETCH, error = %err, "page fetch failed");
        }
        if let Some(next) = next {
            self.spawn_fetch(next);
        }
        outcome
    }
}

impl<S: PageSource> std::fmt::Debug for ListController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let list = self.list.lock();
        f.debug_struct("ListController")
            .field("len", &list.len())
            .field("cursor", &list.cursor())
            .field("fetch_state", list.fetch_state())
            .finish()
    }
}
