//! Visible range computation.
//!
//! [`compute_visible_range`] maps a scroll position onto the offset table
//! produced by [`SizeModel`](crate::SizeModel) and returns the contiguous
//! index range to materialize. It is a pure function: it reads the offset
//! table and the viewport and never mutates either.

use std::ops::Range;

use crate::error::ViewportError;
use crate::logging::{PerfSpan, span_names, targets};

/// The scroll surface as reported by the host, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Distance scrolled from the top of the content.
    pub scroll_offset: f64,
    /// Height of the visible area.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(scroll_offset: f64, height: f64) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }

    /// Check the calculator's preconditions.
    pub fn validate(&self) -> Result<(), ViewportError> {
        if !(self.scroll_offset >= 0.0) {
            return Err(ViewportError::NegativeScrollOffset(self.scroll_offset));
        }
        if !(self.height > 0.0) {
            return Err(ViewportError::NonPositiveHeight(self.height));
        }
        Ok(())
    }

    /// A copy with out-of-range values clamped: negative or NaN offsets
    /// become zero and non-positive heights become zero-height.
    pub fn clamped(&self) -> Self {
        let scroll_offset = if self.scroll_offset >= 0.0 {
            self.scroll_offset
        } else {
            0.0
        };
        let height = if self.height > 0.0 { self.height } else { 0.0 };
        Self {
            scroll_offset,
            height,
        }
    }

    /// Pixel position of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.scroll_offset + self.height
    }
}

/// The items to materialize and where each one starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleRange {
    /// First index, inclusive.
    pub start: usize,
    /// Last index, exclusive.
    pub end: usize,
    /// Absolute pixel offset of each index in `start..end`.
    pub offsets: Vec<u64>,
}

impl VisibleRange {
    /// The index range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of items in range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether nothing should be materialized.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `index` is materialized.
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// The offset of `index`, if it is in range.
    pub fn offset_of(&self, index: usize) -> Option<u64> {
        if self.contains(index) {
            self.offsets.get(index - self.start).copied()
        } else {
            None
        }
    }

    /// Pairs of `(index, offset)` for every materialized item.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.range().zip(self.offsets.iter().copied())
    }
}

/// Compute the index range to materialize.
///
/// `offsets` is a prefix-sum table of `len + 1` entries. The range starts at
/// the item containing the scroll offset and ends after the last item that
/// starts above the bottom edge, widened by `overscan` on both sides and
/// clamped to the list. An offset past the end of the content clamps to the
/// last item.
///
/// An invalid viewport is logged and clamped; it never fails.
pub fn compute_visible_range(offsets: &[u64], viewport: Viewport, overscan: usize) -> VisibleRange {
    let _span = PerfSpan::new(span_names::WINDOW);

    let len = offsets.len().saturating_sub(1);
    if len == 0 {
        return VisibleRange::default();
    }

    let viewport = match viewport.validate() {
        Ok(()) => viewport,
        Err(err) => {
            tracing::warn!(target: targets::WINDOW, error = %err, "invalid viewport, clamping");
            viewport.clamped()
        }
    };

    let total = offsets[len] as f64;
    let top = viewport.scroll_offset.min(total);
    let bottom = viewport.bottom();

    // Items ending at or above `top` are fully scrolled past.
    let first = offsets[1..]
        .partition_point(|&end| end as f64 <= top)
        .min(len - 1);
    let last = offsets[..len]
        .partition_point(|&start| (start as f64) < bottom)
        .saturating_sub(1)
        .max(first);

    let start = first.saturating_sub(overscan);
    let end = last.saturating_add(overscan).saturating_add(1).min(len);

    tracing::trace!(
        target: targets::WINDOW,
        scroll_offset = viewport.scroll_offset,
        height = viewport.height,
        first,
        last,
        start,
        end,
        "visible range computed"
    );

    VisibleRange {
        start,
        end,
        offsets: offsets[start..end].to_vec(),
    }
}
