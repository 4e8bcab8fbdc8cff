//! Prefetch decisions.
//!
//! The policy is stateless. It is asked again after every scroll, resize,
//! measurement and append, and the [`FetchState`] guard alone keeps a burst of
//! positive answers from turning into more than one request.

use crate::fetch::FetchState;
use crate::logging::targets;
use crate::query::ViewportConfig;
use crate::window::Viewport;

/// Decides when the next page should be requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefetchPolicy {
    threshold_px: f64,
}

impl Default for PrefetchPolicy {
    fn default() -> Self {
        Self::from_config(&ViewportConfig::default())
    }
}

impl PrefetchPolicy {
    /// Request a page once fewer than `threshold_px` pixels of content remain
    /// below the viewport.
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px: threshold_px.max(0.0),
        }
    }

    /// Build the policy from viewport configuration.
    pub fn from_config(config: &ViewportConfig) -> Self {
        Self::new(config.prefetch_threshold_px)
    }

    /// The trigger distance in pixels.
    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    /// Pixels of content below the bottom edge of the viewport.
    pub fn remaining(total_size: u64, viewport: Viewport) -> f64 {
        total_size as f64 - viewport.bottom()
    }

    /// Whether a fetch should begin now.
    ///
    /// True only when the tracker is idle and the remaining content is below
    /// the threshold. Exhausted and failed lists never prefetch.
    pub fn should_prefetch(&self, total_size: u64, viewport: Viewport, state: &FetchState) -> bool {
        if !state.is_idle() {
            return false;
        }
        let remaining = Self::remaining(total_size, viewport);
        let trigger = remaining < self.threshold_px;
        if trigger {
            tracing::trace!(
                target: targets::PREFETCH,
                remaining,
                threshold = self.threshold_px,
                "prefetch threshold crossed"
            );
        }
        trigger
    }
}
