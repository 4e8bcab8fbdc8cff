//! Append-only item storage.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::logging::targets;

/// A record delivered by a page source.
pub trait Record {
    /// Stable identity used for dedup and as a rendering key.
    type Id: Hash + Eq + Clone + Debug + Send + Sync + 'static;

    /// This record's identity.
    fn id(&self) -> Self::Id;

    /// Whether the record should be kept out of the list.
    ///
    /// Issue feeds, for instance, interleave pull requests with issues.
    fn is_secondary(&self) -> bool {
        false
    }
}

/// The ordered, filtered, deduplicated items of one query generation.
///
/// Items are only ever appended; an index, once assigned, always refers to the
/// same item until the store is replaced.
#[derive(Debug)]
pub struct ItemStore<R: Record> {
    items: Vec<R>,
    seen: HashSet<R::Id>,
}

impl<R: Record> Default for ItemStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> ItemStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Append a raw page, returning how many records were accepted.
    ///
    /// Secondary records are dropped and a record whose identity is already
    /// stored is skipped, keeping the first copy.
    pub fn append(&mut self, page: impl IntoIterator<Item = R>) -> usize {
        let before = self.items.len();
        let mut secondary = 0usize;
        let mut duplicates = 0usize;

        for record in page {
            if record.is_secondary() {
                secondary += 1;
                continue;
            }
            if !self.seen.insert(record.id()) {
                duplicates += 1;
                continue;
            }
            self.items.push(record);
        }

        let accepted = self.items.len() - before;
        tracing::debug!(
            target: targets::STORE,
            accepted,
            secondary,
            duplicates,
            len = self.items.len(),
            "page appended"
        );
        accepted
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `index`.
    pub fn get(&self, index: usize) -> Option<&R> {
        self.items.get(index)
    }

    /// Whether a record with `id` has been accepted.
    pub fn contains(&self, id: &R::Id) -> bool {
        self.seen.contains(id)
    }

    /// The items in `range`, clamped to the store.
    pub fn slice(&self, range: std::ops::Range<usize>) -> &[R] {
        let end = range.end.min(self.items.len());
        let start = range.start.min(end);
        &self.items[start..end]
    }

    /// Iterate over all items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }
}
