//! Per-item sizes and the prefix-sum offset table.
//!
//! Every stored item has a size entry that starts out *estimated* and becomes
//! *measured* once the render sink reports its real height. The offset table
//! holds `len + 1` non-decreasing prefix sums: `offsets[i]` is the pixel
//! position where item `i` starts and `offsets[len]` is the total content
//! size.

use crate::logging::targets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeEntry {
    Estimated(u32),
    Measured(u32),
}

impl SizeEntry {
    fn get(self) -> u32 {
        match self {
            Self::Estimated(size) | Self::Measured(size) => size,
        }
    }
}

/// Item sizes with override-on-measurement and an exact offset table.
#[derive(Debug, Clone)]
pub struct SizeModel {
    estimated: u32,
    entries: Vec<SizeEntry>,
    offsets: Vec<u64>,
}

impl SizeModel {
    /// Create an empty model that assumes `estimated` pixels per item.
    pub fn new(estimated: u32) -> Self {
        Self {
            estimated,
            entries: Vec::new(),
            offsets: vec![0],
        }
    }

    /// Number of items with a size entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no items are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The size assumed for an unmeasured index.
    pub fn estimate(&self, _index: usize) -> u32 {
        self.estimated
    }

    /// The current size of `index`, measured or estimated.
    pub fn size_of(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|entry| entry.get())
    }

    /// Whether `index` has a measured size.
    pub fn is_measured(&self, index: usize) -> bool {
        matches!(self.entries.get(index), Some(SizeEntry::Measured(_)))
    }

    /// The pixel offset where `index` starts. `offset(len())` is the total.
    pub fn offset(&self, index: usize) -> Option<u64> {
        self.offsets.get(index).copied()
    }

    /// The whole offset table, `len() + 1` entries long.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Total content size in pixels.
    pub fn total_size(&self) -> u64 {
        self.offsets[self.entries.len()]
    }

    /// Append `count` estimated entries for newly stored items.
    pub fn extend(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let mut running = self.total_size();
        self.entries.reserve(count);
        self.offsets.reserve(count);
        for _ in 0..count {
            let size = self.estimate(self.entries.len());
            self.entries.push(SizeEntry::Estimated(size));
            running += u64::from(size);
            self.offsets.push(running);
        }
        tracing::trace!(
            target: targets::SIZE,
            count,
            len = self.entries.len(),
            total = running,
            "sizes extended"
        );
    }

    /// Record the real size of `index`.
    ///
    /// Only offsets after `index` move. Returns `true` if the size changed.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn record_measurement(&mut self, index: usize, size: u32) -> bool {
        assert!(
            index < self.entries.len(),
            "measurement for index {index} beyond size model length {}",
            self.entries.len()
        );

        let previous = self.entries[index];
        self.entries[index] = SizeEntry::Measured(size);
        if previous.get() == size {
            return false;
        }

        self.recompute_from(index);
        tracing::trace!(
            target: targets::SIZE,
            index,
            from = previous.get(),
            to = size,
            total = self.total_size(),
            "measurement recorded"
        );
        true
    }

    /// Change the estimate and re-estimate every unmeasured entry.
    ///
    /// Returns `true` if any offset moved.
    pub fn set_estimated_size(&mut self, estimated: u32) -> bool {
        if estimated == self.estimated {
            return false;
        }
        self.estimated = estimated;

        let mut first_changed = None;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if let SizeEntry::Estimated(size) = entry
                && *size != estimated
            {
                *size = estimated;
                first_changed.get_or_insert(index);
            }
        }

        match first_changed {
            Some(index) => {
                self.recompute_from(index);
                true
            }
            None => false,
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.offsets.truncate(1);
    }

    fn recompute_from(&mut self, index: usize) {
        let mut running = self.offsets[index];
        for (i, entry) in self.entries.iter().enumerate().skip(index) {
            running += u64::from(entry.get());
            self.offsets[i + 1] = running;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_uses_estimate() {
        let mut sizes = SizeModel::new(150);
        assert_eq!(sizes.total_size(), 0);
        sizes.extend(3);
        assert_eq!(sizes.offsets(), &[0, 150, 300, 450]);
        assert_eq!(sizes.estimate(2), 150);
        assert!(!sizes.is_measured(0));
    }

    #[test]
    fn test_measurement_shifts_suffix_only() {
        let mut sizes = SizeModel::new(150);
        sizes.extend(50);
        let before = sizes.offsets().to_vec();

        assert!(sizes.record_measurement(37, 220));

        assert_eq!(sizes.offset(37), Some(before[37]));
        for i in 38..=50 {
            assert_eq!(sizes.offsets()[i], before[i] + 70);
        }
        for i in 0..=37 {
            assert_eq!(sizes.offsets()[i], before[i]);
        }
        assert!(sizes.is_measured(37));
    }

    #[test]
    fn test_same_measurement_is_noop() {
        let mut sizes = SizeModel::new(150);
        sizes.extend(5);
        assert!(sizes.record_measurement(2, 90));
        assert!(!sizes.record_measurement(2, 90));
        assert!(sizes.record_measurement(2, 100));
        assert_eq!(sizes.total_size(), 150 * 4 + 100);
    }

    #[test]
    fn test_set_estimated_size_keeps_measurements() {
        let mut sizes = SizeModel::new(150);
        sizes.extend(4);
        sizes.record_measurement(1, 80);

        assert!(sizes.set_estimated_size(100));
        assert_eq!(sizes.size_of(0), Some(100));
        assert_eq!(sizes.size_of(1), Some(80));
        assert_eq!(sizes.total_size(), 380);

        sizes.extend(1);
        assert_eq!(sizes.size_of(4), Some(100));
    }

    #[test]
    #[should_panic(expected = "beyond size model length")]
    fn test_measure_out_of_range_panics() {
        let mut sizes = SizeModel::new(150);
        sizes.extend(2);
        sizes.record_measurement(2, 10);
    }

    #[test]
    fn test_clear() {
        let mut sizes = SizeModel::new(150);
        sizes.extend(2);
        sizes.clear();
        assert!(sizes.is_empty());
        assert_eq!(sizes.offsets(), &[0]);
    }
}
