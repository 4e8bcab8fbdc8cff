//! The paged list: fetch tracker, store, sizes and window composed together.
//!
//! [`PagedList`] performs no I/O. A driver (see the `pagestream` crate's
//! `ListController`) feeds it viewport events, asks it for fetch tickets,
//! runs the page source and hands the result back:
//!
//! ```
//! use pagestream_core::{PagedList, QueryConfig, Record, ViewportConfig};
//!
//! #[derive(Debug, Clone)]
//! struct Row(u64);
//!
//! impl Record for Row {
//!     type Id = u64;
//!     fn id(&self) -> u64 {
//!         self.0
//!     }
//! }
//!
//! let mut list = PagedList::new(QueryConfig::new().page_size(3), ViewportConfig::default());
//! list.on_resize(800.0);
//!
//! let ticket = list.evaluate_prefetch().expect("empty list wants its first page");
//! assert_eq!(ticket.page(), 1);
//!
//! list.complete_fetch(ticket, Ok(vec![Row(1), Row(2)])).expect("page accepted");
//! assert_eq!(list.len(), 2);
//! assert!(list.fetch_state().is_exhausted());
//! ```

use crate::error::{FetchError, FetchResult};
use crate::fetch::{FetchOutcome, FetchState, FetchTicket, FetchTracker};
use crate::logging::{span_names, targets};
use crate::prefetch::PrefetchPolicy;
use crate::query::{QueryConfig, QueryGeneration, ViewportConfig};
use crate::signal::Signal;
use crate::sink::{ListStatus, RenderFrame, RenderSink};
use crate::size::SizeModel;
use crate::source::PageRequest;
use crate::store::{ItemStore, Record};
use crate::window::{Viewport, VisibleRange, compute_visible_range};

/// Notifications emitted by a [`PagedList`].
///
/// Slots run synchronously while the list is being mutated; they must not
/// call back into the list.
#[derive(Debug, Default)]
pub struct ListSignals {
    /// Rows `first..=last` were appended to the store.
    pub rows_appended: Signal<(usize, usize)>,
    /// The fetch state changed.
    pub fetch_state_changed: Signal<FetchState>,
    /// The total content height changed.
    pub content_size_changed: Signal<u64>,
    /// The query was replaced; all rows are gone.
    pub query_reset: Signal<QueryGeneration>,
}

/// An incrementally fetched, virtualized list of records.
#[derive(Debug)]
pub struct PagedList<R: Record> {
    query: QueryConfig,
    config: ViewportConfig,
    generation: QueryGeneration,
    tracker: FetchTracker,
    store: ItemStore<R>,
    sizes: SizeModel,
    policy: PrefetchPolicy,
    viewport: Option<Viewport>,
    range: VisibleRange,
    failure_reported: bool,
    signals: ListSignals,
}

impl<R: Record> PagedList<R> {
    /// Create an empty list for `query`.
    pub fn new(query: QueryConfig, config: ViewportConfig) -> Self {
        let generation = QueryGeneration::default();
        Self {
            tracker: FetchTracker::new(query.page_size, generation),
            store: ItemStore::new(),
            sizes: SizeModel::new(config.estimated_item_size),
            policy: PrefetchPolicy::from_config(&config),
            viewport: None,
            range: VisibleRange::default(),
            failure_reported: false,
            signals: ListSignals::default(),
            query,
            config,
            generation,
        }
    }

    /// The list's notifications.
    pub fn signals(&self) -> &ListSignals {
        &self.signals
    }

    /// The active query.
    pub fn query(&self) -> &QueryConfig {
        &self.query
    }

    /// The viewport tuning in effect.
    pub fn viewport_config(&self) -> &ViewportConfig {
        &self.config
    }

    /// The active query generation.
    pub fn generation(&self) -> QueryGeneration {
        self.generation
    }

    /// The last page accepted for the active query.
    pub fn cursor(&self) -> u32 {
        self.tracker.cursor()
    }

    /// The current fetch state.
    pub fn fetch_state(&self) -> &FetchState {
        self.tracker.state()
    }

    /// The stored items.
    pub fn store(&self) -> &ItemStore<R> {
        &self.store
    }

    /// The size model.
    pub fn sizes(&self) -> &SizeModel {
        &self.sizes
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no item is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The item at `index`.
    pub fn get(&self, index: usize) -> Option<&R> {
        self.store.get(index)
    }

    /// Total content height in pixels.
    pub fn total_size(&self) -> u64 {
        self.sizes.total_size()
    }

    /// The last reported viewport, if any.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// The range computed for the last event.
    pub fn visible_range(&self) -> &VisibleRange {
        &self.range
    }

    /// The overall list status.
    pub fn status(&self) -> ListStatus {
        ListStatus::derive(self.store.len(), self.tracker.state())
    }

    /// Replace the query, discarding every row and all fetch progress.
    ///
    /// Returns `false` and changes nothing if `query` equals the active one.
    /// A fetch still in flight for the old query is discarded when it lands.
    pub fn set_query(&mut self, query: QueryConfig) -> bool {
        if query == self.query {
            return false;
        }

        let had_content = self.total_size() > 0;
        self.generation = self.generation.next();
        self.tracker = FetchTracker::new(query.page_size, self.generation);
        self.store = ItemStore::new();
        self.sizes = SizeModel::new(self.config.estimated_item_size);
        self.query = query;
        self.failure_reported = false;
        self.recompute_range();

        crate::pagestream_info!(generation = %self.generation, query = ?self.query, "query reset");
        self.signals.query_reset.emit(self.generation);
        self.signals.fetch_state_changed.emit(FetchState::Idle);
        if had_content {
            self.signals.content_size_changed.emit(0);
        }
        true
    }

    /// Change the size assumed for unmeasured items.
    pub fn set_estimated_size(&mut self, size: u32) -> &VisibleRange {
        self.config.estimated_item_size = size;
        if self.sizes.set_estimated_size(size) {
            self.content_size_changed();
        }
        &self.range
    }

    /// React to a scroll event.
    pub fn on_scroll(&mut self, scroll_offset: f64) -> &VisibleRange {
        let height = self.viewport.map_or(0.0, |v| v.height);
        self.on_viewport(Viewport::new(scroll_offset, height))
    }

    /// React to the scroll surface changing height.
    pub fn on_resize(&mut self, height: f64) -> &VisibleRange {
        let scroll_offset = self.viewport.map_or(0.0, |v| v.scroll_offset);
        self.on_viewport(Viewport::new(scroll_offset, height))
    }

    /// React to a combined scroll and resize.
    pub fn on_viewport(&mut self, viewport: Viewport) -> &VisibleRange {
        self.viewport = Some(viewport);
        self.recompute_range();
        &self.range
    }

    /// Record the measured height of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn record_measurement(&mut self, index: usize, size: u32) -> &VisibleRange {
        if self.sizes.record_measurement(index, size) {
            self.content_size_changed();
        }
        &self.range
    }

    /// Begin a fetch if the viewport is close enough to the end of the
    /// content and the tracker is idle.
    ///
    /// Call after every event that moves the viewport or changes the content.
    /// Before the first scroll or resize there is nothing to fill and this
    /// returns `None`; use [`begin_fetch`](Self::begin_fetch) to load headless.
    pub fn evaluate_prefetch(&mut self) -> Option<FetchTicket> {
        let viewport = self.viewport?.clamped();
        if self
            .policy
            .should_prefetch(self.total_size(), viewport, self.tracker.state())
        {
            self.begin_fetch()
        } else {
            None
        }
    }

    /// Begin a fetch regardless of the viewport, the manual "load more".
    ///
    /// Returns `None` unless the tracker is idle.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let ticket = self.tracker.begin()?;
        self.signals.fetch_state_changed.emit(FetchState::InFlight);
        Some(ticket)
    }

    /// The page source request for `ticket`.
    pub fn request_for(&self, ticket: &FetchTicket) -> PageRequest {
        PageRequest {
            page: ticket.page(),
            page_size: ticket.page_size(),
            query: self.query.clone(),
        }
    }

    /// Hand the page source's answer for `ticket` back to the list.
    ///
    /// A ticket from a replaced query is discarded without touching any
    /// state. A failure is stored in the fetch state and also returned.
    ///
    /// # Panics
    ///
    /// Panics if `ticket` belongs to the active generation but no fetch is in
    /// flight.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: FetchResult<Vec<R>>,
    ) -> FetchResult<FetchOutcome> {
        if ticket.generation() != self.generation {
            let stale = ticket.stale(self.generation);
            tracing::debug!(target: targets::LIST, error = %stale, "stale page discarded");
            return Ok(FetchOutcome::Discarded(stale));
        }

        let _span = tracing::debug_span!(
            target: targets::LIST,
            "complete_fetch",
            operation = span_names::FETCH,
            page = ticket.page()
        )
        .entered();
        let page = ticket.page();

        let records = match result {
            Ok(records) => records,
            Err(err) => {
                let state = self.tracker.finish(ticket, Err(err.clone())).clone();
                self.failure_reported = false;
                self.signals.fetch_state_changed.emit(state);
                return Err(err);
            }
        };

        let received = records.len();
        let first = self.store.len();
        let accepted = {
            let _append = tracing::trace_span!(
                target: targets::STORE,
                "append",
                operation = span_names::APPEND
            )
            .entered();
            self.store.append(records)
        };
        self.sizes.extend(accepted);
        let state = self.tracker.finish(ticket, Ok(received)).clone();
        let exhausted = state.is_exhausted();

        if accepted > 0 {
            self.signals.rows_appended.emit((first, first + accepted - 1));
            self.content_size_changed();
        }
        self.signals.fetch_state_changed.emit(state);

        Ok(FetchOutcome::Appended {
            page,
            received,
            accepted,
            exhausted,
        })
    }

    /// Clear a fetch failure so the failed page can be requested again.
    pub fn retry(&mut self) -> bool {
        if self.tracker.retry() {
            self.signals.fetch_state_changed.emit(FetchState::Idle);
            true
        } else {
            false
        }
    }

    /// Draw the current range into `sink`.
    ///
    /// A fetch failure is reported to the sink once, on the first render
    /// after it happened.
    pub fn render_into<S: RenderSink<R>>(&mut self, sink: &mut S) {
        if let FetchState::Failed(err) = self.tracker.state()
            && !self.failure_reported
        {
            sink.fetch_failed(err);
            self.failure_reported = true;
        }

        let frame = RenderFrame {
            range: &self.range,
            items: self.store.slice(self.range.range()),
            total_size: self.sizes.total_size(),
            status: self.status(),
        };
        sink.render(frame);
    }

    /// The failure of the last fetch, if it failed.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.tracker.state().error()
    }

    fn content_size_changed(&mut self) {
        self.recompute_range();
        self.signals.content_size_changed.emit(self.sizes.total_size());
    }

    fn recompute_range(&mut self) {
        self.range = match self.viewport {
            Some(viewport) => {
                compute_visible_range(self.sizes.offsets(), viewport, self.config.overscan)
            }
            None => VisibleRange::default(),
        };
    }
}
