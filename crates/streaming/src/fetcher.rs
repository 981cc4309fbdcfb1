//! The page-fetch collaborator.
//!
//! The sequence never talks to the network itself: it hands the current
//! paging state to a `PageFetcher` and waits for the page it returns.

use crate::page::{PagingState, ResultPage};
use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;

/// Fetches the page that follows `paging_state`.
///
/// `Error` is whatever the data access layer fails with. It is handed back
/// to every consumer waiting on the fetch, hence `Clone`.
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    type Error: Clone + Debug + Send + Sync + 'static;

    async fn fetch_page(&self, paging_state: PagingState) -> Result<ResultPage, Self::Error>;
}

/// `PageFetcher` backed by an async closure.
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap `f` as a page fetcher.
pub fn fetcher_fn<F, Fut, E>(f: F) -> FnFetcher<F>
where
    F: Fn(PagingState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResultPage, E>> + Send + 'static,
    E: Clone + Debug + Send + Sync + 'static,
{
    FnFetcher { f }
}

#[async_trait]
impl<F, Fut, E> PageFetcher for FnFetcher<F>
where
    F: Fn(PagingState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResultPage, E>> + Send + 'static,
    E: Clone + Debug + Send + Sync + 'static,
{
    type Error = E;

    async fn fetch_page(&self, paging_state: PagingState) -> Result<ResultPage, E> {
        (self.f)(paging_state).await
    }
}
