//! Logging facilities for pagestream.
//!
//! pagestream is instrumented with the `tracing` crate. The library never
//! installs a subscriber; applications decide where logs go:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("pagestream_core::fetch=debug"))
//!         .init();
//! }
//! ```
//!
//! Each subsystem logs under its own target (see [`targets`]) so fetch
//! bookkeeping can be followed without the per-scroll window traces.

/// Span names used throughout pagestream for tracing.
pub mod span_names {
    /// Visible range computation span.
    pub const WINDOW: &str = "pagestream::window";
    /// Page fetch span, from ticket issue to completion.
    pub const FETCH: &str = "pagestream::fetch";
    /// Store append span.
    pub const APPEND: &str = "pagestream::append";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core engine target.
    pub const CORE: &str = "pagestream_core";
    /// Cursor and fetch-state tracker.
    pub const FETCH: &str = "pagestream_core::fetch";
    /// Item store appends and dedup.
    pub const STORE: &str = "pagestream_core::store";
    /// Size model and offset table.
    pub const SIZE: &str = "pagestream_core::size";
    /// Window calculator.
    pub const WINDOW: &str = "pagestream_core::window";
    /// Prefetch decisions.
    pub const PREFETCH: &str = "pagestream_core::prefetch";
    /// Paged list composition and query resets.
    pub const LIST: &str = "pagestream_core::list";
    /// Signal emission.
    pub const SIGNAL: &str = "pagestream_core::signal";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time hot paths such as the window computation.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a performance span named after `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::trace_span!(target: "pagestream::perf", "perf", operation = operation);
        Self {
            span: span.entered(),
        }
    }
}

/// `tracing::info!` with the core target filled in.
#[macro_export]
macro_rules! pagestream_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "pagestream_core", $($arg)*)
    };
}
