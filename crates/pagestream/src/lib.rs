//! pagestream - incrementally fetched, virtualized lists.
//!
//! This is the umbrella crate. It re-exports the engine from
//! `pagestream-core`, adds an async driver ([`ListController`]) and
//! settings loading, and with the `networking` feature exposes the GitHub
//! issues source under [`net`].
//!
//! # Example
//!
//! ```no_run
//! use pagestream::net::{GitHubConfig, GitHubIssueSource};
//! use pagestream::{ListController, QueryConfig, ViewportConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = GitHubIssueSource::new(GitHubConfig::from_env())?;
//!     let controller =
//!         ListController::new(source, QueryConfig::default(), ViewportConfig::default())?;
//!
//!     // Forward the host's scroll surface events.
//!     controller.on_resize(900.0);
//!     let range = controller.on_scroll(0.0);
//!     println!("materialize rows {:?}", range.range());
//!     Ok(())
//! }
//! ```

pub use pagestream_core::*;

pub mod controller;
pub mod prelude;
pub mod runtime;
pub mod settings;

pub use controller::ListController;
pub use runtime::{RuntimeConfig, RuntimeError};
pub use settings::{Settings, SettingsError};

/// HTTP client and the GitHub issues page source.
#[cfg(feature = "networking")]
pub mod net {
    pub use pagestream_net::*;
}
