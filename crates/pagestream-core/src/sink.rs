//! The render sink collaborator and the derived view status.

use crate::error::FetchError;
use crate::fetch::FetchState;
use crate::store::Record;
use crate::window::VisibleRange;

/// What the list as a whole should look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing stored yet and the first page is pending.
    Loading,
    /// The last fetch failed. Items fetched earlier are still rendered.
    Error(FetchError),
    /// The source is exhausted and no item matched.
    Empty,
    /// Items are available.
    Ready {
        /// Whether more pages may follow.
        has_more: bool,
        /// Whether the next page is being fetched.
        is_fetching_more: bool,
    },
}

impl ListStatus {
    /// Derive the status from the store length and fetch state.
    pub fn derive(len: usize, state: &FetchState) -> Self {
        match state {
            FetchState::Failed(err) => Self::Error(err.clone()),
            FetchState::Exhausted if len == 0 => Self::Empty,
            FetchState::Idle | FetchState::InFlight if len == 0 => Self::Loading,
            FetchState::Exhausted => Self::Ready {
                has_more: false,
                is_fetching_more: false,
            },
            FetchState::Idle | FetchState::InFlight => Self::Ready {
                has_more: true,
                is_fetching_more: state.is_in_flight(),
            },
        }
    }

    /// Whether a "load more" affordance should be offered.
    pub fn has_more(&self) -> bool {
        match self {
            Self::Ready { has_more, .. } => *has_more,
            Self::Loading | Self::Error(_) => true,
            Self::Empty => false,
        }
    }
}

impl std::fmt::Display for ListStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading"),
            Self::Error(err) => write!(f, "Error: {err}"),
            Self::Empty => write!(f, "No items found"),
            Self::Ready {
                is_fetching_more: true,
                ..
            } => write!(f, "Loading more..."),
            Self::Ready { has_more: true, .. } => write!(f, "Load more"),
            Self::Ready { .. } => write!(f, "No more items"),
        }
    }
}

/// Everything a sink needs to draw one frame.
#[derive(Debug)]
pub struct RenderFrame<'a, R> {
    /// The materialized range and per-item offsets.
    pub range: &'a VisibleRange,
    /// The items in `range`, in order.
    pub items: &'a [R],
    /// Height of the scroll surface's content.
    pub total_size: u64,
    /// The overall list status.
    pub status: ListStatus,
}

impl<'a, R> RenderFrame<'a, R> {
    /// Pairs of `(index, offset, item)` for every materialized item.
    pub fn visible(&self) -> impl Iterator<Item = (usize, u64, &'a R)> + '_ {
        self.range
            .iter()
            .zip(self.items.iter())
            .map(|((index, offset), item)| (index, offset, item))
    }
}

/// Draws a visible range onto a fixed-height scroll surface.
///
/// After drawing, the sink reports real item heights back through
/// [`PagedList::record_measurement`](crate::PagedList::record_measurement).
pub trait RenderSink<R: Record> {
    /// Draw one frame.
    fn render(&mut self, frame: RenderFrame<'_, R>);

    /// Show a fetch failure to the user.
    fn fetch_failed(&mut self, error: &FetchError) {
        let _ = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derive() {
        assert_eq!(ListStatus::derive(0, &FetchState::Idle), ListStatus::Loading);
        assert_eq!(ListStatus::derive(0, &FetchState::InFlight), ListStatus::Loading);
        assert_eq!(ListStatus::derive(0, &FetchState::Exhausted), ListStatus::Empty);
        assert_eq!(
            ListStatus::derive(10, &FetchState::InFlight),
            ListStatus::Ready {
                has_more: true,
                is_fetching_more: true
            }
        );
        assert_eq!(
            ListStatus::derive(10, &FetchState::Exhausted),
            ListStatus::Ready {
                has_more: false,
                is_fetching_more: false
            }
        );
        let err = FetchError::other("offline");
        assert_eq!(
            ListStatus::derive(10, &FetchState::Failed(err.clone())),
            ListStatus::Error(err)
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ListStatus::Empty.to_string(), "No items found");
        assert_eq!(ListStatus::derive(3, &FetchState::Idle).to_string(), "Load more");
        assert!(!ListStatus::Empty.has_more());
    }
}
