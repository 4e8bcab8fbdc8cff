//! Cursor and fetch-state tracking.
//!
//! [`FetchTracker`] is the single gate every page request passes through.
//! [`FetchTracker::begin`] only hands out a [`FetchTicket`] while the tracker
//! is [`FetchState::Idle`], so at most one fetch is ever in flight and a burst
//! of prefetch triggers collapses into one request.
//!
//! ```
//! use pagestream_core::{FetchState, FetchTracker, QueryGeneration};
//!
//! let mut tracker = FetchTracker::new(100, QueryGeneration::default());
//! let ticket = tracker.begin().expect("idle tracker issues a ticket");
//! assert_eq!(ticket.page(), 1);
//! assert!(tracker.begin().is_none());
//!
//! tracker.finish(ticket, Ok(100));
//! assert_eq!(tracker.cursor(), 1);
//! assert_eq!(tracker.state(), &FetchState::Idle);
//! ```

use crate::error::{FetchError, StaleFetch};
use crate::logging::targets;
use crate::query::QueryGeneration;

/// Where a list stands with respect to its page source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Ready to request the next page.
    #[default]
    Idle,
    /// A page request is outstanding.
    InFlight,
    /// The source returned a short page; nothing more will be requested.
    Exhausted,
    /// The last request failed. Call [`FetchTracker::retry`] to try again.
    Failed(FetchError),
}

impl FetchState {
    /// Whether a new fetch may begin.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a fetch is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    /// Whether the source has no more pages.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// The failure, if the last fetch failed.
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for FetchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::InFlight => write!(f, "InFlight"),
            Self::Exhausted => write!(f, "Exhausted"),
            Self::Failed(err) => write!(f, "Failed({err})"),
        }
    }
}

/// Permission to fetch one page, issued by [`FetchTracker::begin`].
///
/// A ticket is consumed by [`FetchTracker::finish`] and cannot be cloned, so
/// each issued fetch completes at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchTicket {
    page: u32,
    page_size: u32,
    generation: QueryGeneration,
}

impl FetchTicket {
    /// The 1-based page number to request.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// The page size to request.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The query generation the ticket was issued for.
    pub fn generation(&self) -> QueryGeneration {
        self.generation
    }

    pub(crate) fn stale(&self, current: QueryGeneration) -> StaleFetch {
        StaleFetch {
            page: self.page,
            issued_for: self.generation,
            current,
        }
    }
}

/// The result of driving one fetch to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was appended to the store.
    Appended {
        /// The page number that was fetched.
        page: u32,
        /// Records the source returned.
        received: usize,
        /// Records that survived filtering and dedup.
        accepted: usize,
        /// Whether this was the final page.
        exhausted: bool,
    },
    /// The page belonged to a replaced query and was dropped.
    Discarded(StaleFetch),
    /// No fetch was issued because one was already in flight, the list is
    /// exhausted, or the last fetch failed.
    Skipped,
}

/// Pagination cursor plus the fetch state machine for one query generation.
#[derive(Debug, Clone)]
pub struct FetchTracker {
    cursor: u32,
    page_size: u32,
    generation: QueryGeneration,
    state: FetchState,
}

impl FetchTracker {
    /// Create a tracker that has not fetched anything yet.
    pub fn new(page_size: u32, generation: QueryGeneration) -> Self {
        Self {
            cursor: 0,
            page_size: page_size.max(1),
            generation,
            state: FetchState::Idle,
        }
    }

    /// The last page accepted, or 0 before the first fetch completes.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// The page the next ticket will request.
    pub fn next_page(&self) -> u32 {
        self.cursor + 1
    }

    /// Records requested per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The query generation this tracker belongs to.
    pub fn generation(&self) -> QueryGeneration {
        self.generation
    }

    /// The current fetch state.
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Start fetching the next page.
    ///
    /// Returns `None` without side effects unless the tracker is idle.
    pub fn begin(&mut self) -> Option<FetchTicket> {
        if !self.state.is_idle() {
            tracing::trace!(
                target: targets::FETCH,
                state = %self.state,
                "fetch not started"
            );
            return None;
        }

        self.state = FetchState::InFlight;
        let ticket = FetchTicket {
            page: self.next_page(),
            page_size: self.page_size,
            generation: self.generation,
        };
        tracing::debug!(
            target: targets::FETCH,
            page = ticket.page,
            page_size = ticket.page_size,
            generation = %ticket.generation,
            "fetch started"
        );
        Some(ticket)
    }

    /// Complete the fetch `ticket` was issued for.
    ///
    /// On success `result` carries the number of raw records the source
    /// returned: the cursor advances and the tracker becomes exhausted when
    /// the page was short. On failure the cursor stays put.
    ///
    /// # Panics
    ///
    /// Panics if no fetch is in flight or the ticket was issued by another
    /// generation or for another page. Stale tickets must be filtered out by
    /// the caller before they reach the tracker.
    pub fn finish(
        &mut self,
        ticket: FetchTicket,
        result: Result<usize, FetchError>,
    ) -> &FetchState {
        assert!(
            self.state.is_in_flight(),
            "finish called with no fetch in flight (state {})",
            self.state
        );
        assert_eq!(
            ticket.generation, self.generation,
            "finish called with a ticket from another query generation"
        );
        assert_eq!(
            ticket.page,
            self.next_page(),
            "finish called with a ticket for the wrong page"
        );

        self.state = match result {
            Ok(received) => {
                self.cursor += 1;
                if received < self.page_size as usize {
                    tracing::debug!(
                        target: targets::FETCH,
                        page = ticket.page,
                        received,
                        "short page, source exhausted"
                    );
                    FetchState::Exhausted
                } else {
                    tracing::debug!(
                        target: targets::FETCH,
                        page = ticket.page,
                        received,
                        "fetch finished"
                    );
                    FetchState::Idle
                }
            }
            Err(err) => {
                tracing::debug!(
                    target: targets::FETCH,
                    page = ticket.page,
                    error = %err,
                    "fetch failed"
                );
                FetchState::Failed(err)
            }
        };
        &self.state
    }

    /// Clear a failure so the same page can be requested again.
    ///
    /// Returns `true` if the tracker was in the failed state.
    pub fn retry(&mut self) -> bool {
        if matches!(self.state, FetchState::Failed(_)) {
            tracing::debug!(
                target: targets::FETCH,
                page = self.next_page(),
                "retrying failed page"
            );
            self.state = FetchState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> FetchTracker {
        FetchTracker::new(100, QueryGeneration::new(1))
    }

    #[test]
    fn test_begin_only_when_idle() {
        let mut tracker = tracker();
        let ticket = tracker.begin().expect("first begin issues a ticket");
        assert_eq!(ticket.page(), 1);
        assert_eq!(ticket.page_size(), 100);
        assert_eq!(ticket.generation(), QueryGeneration::new(1));
        assert!(tracker.state().is_in_flight());

        assert!(tracker.begin().is_none());
        assert!(tracker.state().is_in_flight());
        assert_eq!(tracker.cursor(), 0);
    }

    #[test]
    fn test_full_page_returns_to_idle() {
        let mut tracker = tracker();
        let ticket = tracker.begin().expect("ticket");
        assert_eq!(tracker.finish(ticket, Ok(100)), &FetchState::Idle);
        assert_eq!(tracker.cursor(), 1);
        assert_eq!(tracker.next_page(), 2);

        let ticket = tracker.begin().expect("ticket");
        assert_eq!(ticket.page(), 2);
    }

    #[test]
    fn test_short_page_exhausts() {
        let mut tracker = tracker();
        let ticket = tracker.begin().expect("ticket");
        tracker.finish(ticket, Ok(42));
        assert!(tracker.state().is_exhausted());
        assert_eq!(tracker.cursor(), 1);
        assert!(tracker.begin().is_none());
        assert!(!tracker.retry());
    }

    #[test]
    fn test_failure_keeps_cursor_and_retry_refetches() {
        let mut tracker = tracker();
        let ticket = tracker.begin().expect("ticket");
        tracker.finish(ticket, Ok(100));

        let ticket = tracker.begin().expect("ticket");
        tracker.finish(ticket, Err(FetchError::Network("connection reset".into())));
        assert_eq!(tracker.cursor(), 1);
        assert_eq!(
            tracker.state().error(),
            Some(&FetchError::Network("connection reset".into()))
        );
        assert!(tracker.begin().is_none());

        assert!(tracker.retry());
        let ticket = tracker.begin().expect("ticket after retry");
        assert_eq!(ticket.page(), 2);
    }

    #[test]
    #[should_panic(expected = "no fetch in flight")]
    fn test_finish_without_flight_panics() {
        let mut tracker = tracker();
        let ticket = tracker.begin().expect("ticket");
        let mut other = FetchTracker::new(100, QueryGeneration::new(1));
        other.finish(ticket, Ok(0));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(FetchState::Idle.to_string(), "Idle");
        assert_eq!(
            FetchState::Failed(FetchError::other("boom")).to_string(),
            "Failed(boom)"
        );
    }
}
