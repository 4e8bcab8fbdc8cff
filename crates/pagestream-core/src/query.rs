//! Query and viewport configuration.
//!
//! A [`QueryConfig`] selects which records the page source returns and in
//! which order. Replacing it starts a new [`QueryGeneration`]: every piece of
//! pagination state is rebuilt and in-flight fetches for the old generation
//! are discarded when they land.

use serde::{Deserialize, Serialize};

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Which records to include by lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Only open records.
    Open,
    /// Only closed records.
    Closed,
    /// Every record regardless of state.
    #[default]
    All,
}

impl IssueState {
    /// The wire name of this state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The field records are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Creation time.
    #[default]
    Created,
    /// Last update time.
    Updated,
    /// Number of comments.
    Comments,
}

impl SortKey {
    /// The wire name of this key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Comments => "comments",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending, newest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// The wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The filter and ordering a list is built for.
///
/// Two configs that compare equal describe the same list; applying an equal
/// config to a list is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Lifecycle state filter.
    pub state: IssueState,
    /// Label names; a record must carry all of them.
    pub labels: Vec<String>,
    /// Ordering field.
    pub sort: SortKey,
    /// Ordering direction.
    pub direction: SortDirection,
    /// Records requested per page. A page shorter than this ends the list.
    pub page_size: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            state: IssueState::default(),
            labels: Vec::new(),
            sort: SortKey::default(),
            direction: SortDirection::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryConfig {
    /// Create the default query: all records, newest first, 100 per page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the state filter.
    pub fn state(mut self, state: IssueState) -> Self {
        self.state = state;
        self
    }

    /// Add a required label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Set the ordering field.
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Set the ordering direction.
    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the page size. Zero is raised to one.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Labels joined the way list endpoints expect them, or `None` when no
    /// label filter is set.
    pub fn labels_param(&self) -> Option<String> {
        if self.labels.is_empty() {
            None
        } else {
            Some(self.labels.join(","))
        }
    }
}

/// Identifies one query configuration over the lifetime of a list.
///
/// Incremented on every reset. Fetch tickets capture the generation they were
/// issued for so that late results can be recognized as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QueryGeneration(u64);

impl QueryGeneration {
    /// Create a generation from its raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The generation after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for QueryGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layout tuning for the visible window and prefetch trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Height assumed for an item until the sink measures it, in pixels.
    pub estimated_item_size: u32,
    /// Extra items materialized on each side of the visible range.
    pub overscan: usize,
    /// Distance from the bottom of the content, in pixels, below which the
    /// next page is requested.
    pub prefetch_threshold_px: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            estimated_item_size: 150,
            overscan: 5,
            prefetch_threshold_px: 600.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = QueryConfig::default();
        assert_eq!(query.state, IssueState::All);
        assert_eq!(query.sort, SortKey::Created);
        assert_eq!(query.direction, SortDirection::Desc);
        assert_eq!(query.page_size, 100);
        assert!(query.labels_param().is_none());
    }

    #[test]
    fn test_query_builder() {
        let query = QueryConfig::new()
            .state(IssueState::Open)
            .label("bug")
            .label("good first issue")
            .sort(SortKey::Comments)
            .direction(SortDirection::Asc)
            .page_size(0);

        assert_eq!(query.state.as_str(), "open");
        assert_eq!(query.sort.as_str(), "comments");
        assert_eq!(query.direction.as_str(), "asc");
        assert_eq!(query.page_size, 1);
        assert_eq!(query.labels_param().as_deref(), Some("bug,good first issue"));
        assert_ne!(query, QueryConfig::default());
    }

    #[test]
    fn test_generation_next() {
        let generation = QueryGeneration::default();
        assert_eq!(generation.get(), 0);
        assert_eq!(generation.next(), QueryGeneration::new(1));
        assert!(generation.next() > generation);
        assert_eq!(generation.next().to_string(), "1");
    }

    #[test]
    fn test_viewport_defaults() {
        let config = ViewportConfig::default();
        assert_eq!(config.estimated_item_size, 150);
        assert_eq!(config.overscan, 5);
        assert_eq!(config.prefetch_threshold_px, 600.0);
    }
}
