//! Commonly used types.
//!
//! ```ignore
//! use pagestream::prelude::*;
//! ```

pub use crate::controller::ListController;
pub use crate::settings::Settings;

pub use pagestream_core::{
    FetchError, FetchOutcome, FetchState, ListStatus, PageRequest, PageSource, PagedList,
    QueryConfig, Record, RenderFrame, RenderSink, Signal, Viewport, ViewportConfig, VisibleRange,
};

#[cfg(feature = "networking")]
pub use pagestream_net::{GitHubConfig, GitHubIssue, GitHubIssueSource};
