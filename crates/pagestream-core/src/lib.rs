//! Core engine for pagestream.
//!
//! This crate renders an unbounded, page-fetched collection as a virtual list.
//! It contains no I/O; the pieces are:
//!
//! - **Fetch Tracker**: pagination cursor and the `Idle`/`InFlight`/
//!   `Exhausted`/`Failed` state machine that admits one fetch at a time
//! - **Item Store**: append-only, filtered, deduplicated records
//! - **Size Model**: estimated and measured item heights with an exact
//!   prefix-sum offset table
//! - **Window Calculator**: the index range to materialize for a viewport
//! - **Prefetch Policy**: when to ask for the next page
//! - **Paged List**: all of the above composed, with change signals
//!
//! Records come from a [`PageSource`] and are drawn by a [`RenderSink`].
//!
//! # Example
//!
//! ```
//! use pagestream_core::{FetchOutcome, PagedList, QueryConfig, Record, ViewportConfig};
//!
//! #[derive(Debug, Clone)]
//! struct Issue {
//!     id: u64,
//!     pull_request: bool,
//! }
//!
//! impl Record for Issue {
//!     type Id = u64;
//!     fn id(&self) -> u64 {
//!         self.id
//!     }
//!     fn is_secondary(&self) -> bool {
//!         self.pull_request
//!     }
//! }
//!
//! let mut list = PagedList::new(QueryConfig::default(), ViewportConfig::default());
//! list.on_resize(900.0);
//!
//! let ticket = list.evaluate_prefetch().expect("first page");
//! let page: Vec<Issue> = (0..100)
//!     .map(|id| Issue { id, pull_request: id % 10 == 0 })
//!     .collect();
//!
//! let outcome = list.complete_fetch(ticket, Ok(page)).expect("page accepted");
//! assert!(matches!(outcome, FetchOutcome::Appended { accepted: 90, .. }));
//! assert_eq!(list.cursor(), 1);
//!
//! // Scrolling near the end asks for page 2.
//! list.on_scroll(12_800.0);
//! assert_eq!(list.evaluate_prefetch().map(|t| t.page()), Some(2));
//! ```

mod error;
pub mod fetch;
pub mod list;
pub mod logging;
pub mod prefetch;
pub mod query;
pub mod signal;
pub mod sink;
pub mod size;
pub mod source;
pub mod store;
pub mod window;

pub use error::{FetchError, FetchResult, StaleFetch, ViewportError};
pub use fetch::{FetchOutcome, FetchState, FetchTicket, FetchTracker};
pub use list::{ListSignals, PagedList};
pub use logging::PerfSpan;
pub use prefetch::PrefetchPolicy;
pub use query::{
    DEFAULT_PAGE_SIZE, IssueState, QueryConfig, QueryGeneration, SortDirection, SortKey,
    ViewportConfig,
};
pub use signal::{ConnectionId, Signal};
pub use sink::{ListStatus, RenderFrame, RenderSink};
pub use size::SizeModel;
pub use source::{PageRequest, PageSource};
pub use store::{ItemStore, Record};
pub use window::{Viewport, VisibleRange, compute_visible_range};
