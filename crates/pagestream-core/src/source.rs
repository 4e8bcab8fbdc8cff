//! The page source collaborator.

use std::future::Future;
use std::sync::Arc;

use crate::error::FetchResult;
use crate::query::QueryConfig;
use crate::store::Record;

/// One page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page number to fetch.
    pub page: u32,
    /// Records per page.
    pub page_size: u32,
    /// The query the list is showing.
    pub query: QueryConfig,
}

/// Something that serves records a page at a time.
///
/// A page shorter than `page_size` tells the list there is nothing more to
/// fetch. Implementations attach whatever transport, authentication and
/// decoding they need; the list only sees records and [`FetchError`]s.
///
/// [`FetchError`]: crate::FetchError
pub trait PageSource: Send + Sync + 'static {
    /// The record type this source produces.
    type Record: Record + Send + Sync + 'static;

    /// Fetch one page.
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = FetchResult<Vec<Self::Record>>> + Send;
}

impl<S: PageSource> PageSource for Arc<S> {
    type Record = S::Record;

    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = FetchResult<Vec<Self::Record>>> + Send {
        S::fetch_page(self, request)
    }
}
