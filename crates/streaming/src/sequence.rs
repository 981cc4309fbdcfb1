//! Paged result sequence.
//!
//! A `ResultSequence` buffers every row fetched so far in an append-only
//! vector and hands out cursors that are plain indices into it. Cursors walk
//! buffered rows without suspending; a cursor reaching the end of the buffer
//! while a paging state is set waits for the next page.
//!
//! # Single flight
//!
//! At most one fetch is in flight per sequence. The fetch is a `Shared`
//! future kept under the paging mutex: the first consumer to hit the
//! boundary creates it, later ones clone and await it. On completion it
//! appends rows and replaces the paging state under the same lock, so a
//! consumer either sees the old boundary with the fetch pending or the new
//! rows, never a half-applied page.
//!
//! When a Tokio runtime is current the fetch is also spawned onto it, so it
//! runs to completion even if every waiter is dropped. Without a runtime the
//! waiters drive it themselves (see [`RowCursor::blocking_iter`]).

use crate::fetcher::PageFetcher;
use crate::page::{ColumnSpec, ExecutionInfo, PagingState, ResultPage, Row};
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::stream::{self, Stream};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

type Fetcher<E> = Arc<dyn PageFetcher<Error = E>>;
type PendingFetch<E> = Shared<BoxFuture<'static, Result<(), E>>>;

struct Paging<E> {
    paging_state: Option<PagingState>,
    in_flight: Option<PendingFetch<E>>,
}

struct SequenceState<E> {
    columns: Vec<ColumnSpec>,
    info: ExecutionInfo,
    /// Append-only; rows are never removed or reordered.
    rows: RwLock<Vec<Row>>,
    /// Lock order: `paging` before `rows`.
    paging: Mutex<Paging<E>>,
    fetcher: Option<Fetcher<E>>,
}

/// What a consumer standing at the end of the buffer has to do.
enum Advance<E> {
    /// Rows were appended meanwhile.
    Ready,
    /// No more rows will arrive.
    Exhausted,
    Wait(PendingFetch<E>),
}

impl<E> SequenceState<E>
where
    E: Clone + fmt::Debug + Send + Sync + 'static,
{
    fn row_at(&self, position: usize) -> Option<Row> {
        self.rows.read().get(position).cloned()
    }

    fn advance(self: &Arc<Self>, position: usize) -> Advance<E> {
        let mut paging = self.paging.lock();
        if position < self.rows.read().len() {
            return Advance::Ready;
        }

        let Some(paging_state) = paging.paging_state.clone() else {
            return Advance::Exhausted;
        };

        let Some(fetcher) = &self.fetcher else {
            debug!(buffered = position, "no page fetcher registered, discarding paging state");
            paging.paging_state = None;
            return Advance::Exhausted;
        };

        if let Some(pending) = &paging.in_flight {
            trace!(buffered = position, "joining in-flight page fetch");
            return Advance::Wait(pending.clone());
        }

        let pending = Self::start_fetch(Arc::downgrade(self), Arc::clone(fetcher), paging_state);
        paging.in_flight = Some(pending.clone());
        Advance::Wait(pending)
    }

    fn start_fetch(
        state: Weak<Self>,
        fetcher: Fetcher<E>,
        paging_state: PagingState,
    ) -> PendingFetch<E> {
        debug!(?paging_state, "fetching next page");
        let pending = async move {
            let result = fetcher.fetch_page(paging_state).await;
            match state.upgrade() {
                Some(state) => state.complete_fetch(result),
                // Sequence dropped while fetching; nobody is left to read the rows.
                None => result.map(drop),
            }
        }
        .boxed()
        .shared();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(pending.clone());
        }
        pending
    }

    fn complete_fetch(&self, result: Result<ResultPage, E>) -> Result<(), E> {
        let mut paging = self.paging.lock();
        paging.in_flight = None;

        match result {
            Ok(page) => {
                let (_, rows, _, next_state) = page.into_parts();
                let mut buffer = self.rows.write();
                debug!(
                    appended = rows.len(),
                    buffered = buffer.len() + rows.len(),
                    more_pages = next_state.is_some(),
                    "page fetched"
                );
                buffer.extend(rows);
                paging.paging_state = next_state;
                Ok(())
            }
            Err(error) => {
                warn!(?error, "page fetch failed, keeping paging state for retry");
                Err(error)
            }
        }
    }
}

/// A query result spanning any number of pages, read as one sequence.
///
/// Cloning is cheap and yields a handle to the same shared buffer. Any number
/// of cursors may traverse it concurrently; pages already fetched are never
/// fetched again.
pub struct ResultSequence<E> {
    state: Arc<SequenceState<E>>,
}

impl<E> Clone for ResultSequence<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E> ResultSequence<E>
where
    E: Clone + fmt::Debug + Send + Sync + 'static,
{
    /// A sequence over `page` alone. If the page carries a paging state it
    /// is dropped once a cursor reaches the end of the rows.
    pub fn new(page: ResultPage) -> Self {
        Self::build(page, None)
    }

    /// A sequence that fetches further pages through `fetcher`.
    pub fn with_fetcher<F>(page: ResultPage, fetcher: F) -> Self
    where
        F: PageFetcher<Error = E>,
    {
        Self::build(page, Some(Arc::new(fetcher)))
    }

    /// A sequence fetching through a fetcher already shared elsewhere.
    pub fn with_shared_fetcher(page: ResultPage, fetcher: Arc<dyn PageFetcher<Error = E>>) -> Self {
        Self::build(page, Some(fetcher))
    }

    fn build(page: ResultPage, fetcher: Option<Fetcher<E>>) -> Self {
        let (columns, rows, info, paging_state) = page.into_parts();
        Self {
            state: Arc::new(SequenceState {
                columns,
                info,
                rows: RwLock::new(rows),
                paging: Mutex::new(Paging {
                    paging_state,
                    in_flight: None,
                }),
                fetcher,
            }),
        }
    }

    /// Schema of the first page.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.state.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.state.columns.iter().position(|c| c.name == name)
    }

    /// Diagnostics of the first page.
    pub fn info(&self) -> &ExecutionInfo {
        &self.state.info
    }

    pub fn paging_state(&self) -> Option<PagingState> {
        self.state.paging.lock().paging_state.clone()
    }

    pub fn has_more_pages(&self) -> bool {
        self.state.paging.lock().paging_state.is_some()
    }

    /// Rows fetched so far.
    pub fn buffered_len(&self) -> usize {
        self.state.rows.read().len()
    }

    /// Snapshot of the rows fetched so far, without fetching.
    pub fn current_rows(&self) -> Vec<Row> {
        self.state.rows.read().clone()
    }

    /// A new traversal from the first row.
    pub fn rows(&self) -> RowCursor<E> {
        RowCursor {
            state: Arc::clone(&self.state),
            position: 0,
        }
    }

    /// Fetch the next page without consuming rows, joining a fetch already
    /// in flight. Returns `false` if there was nothing left to fetch.
    pub async fn fetch_next_page(&self) -> Result<bool, E> {
        let position = self.buffered_len();
        match self.state.advance(position) {
            Advance::Ready => Ok(true),
            Advance::Exhausted => Ok(false),
            Advance::Wait(pending) => pending.await.map(|_| true),
        }
    }
}

impl<E> fmt::Debug for ResultSequence<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paging = self.state.paging.lock();
        f.debug_struct("ResultSequence")
            .field("columns", &self.state.columns.len())
            .field("buffered", &self.state.rows.read().len())
            .field("paging_state", &paging.paging_state)
            .field("fetching", &paging.in_flight.is_some())
            .finish()
    }
}

/// One forward traversal of a [`ResultSequence`].
///
/// Holds only an index into the shared buffer, so appends by other
/// consumers never invalidate it.
pub struct RowCursor<E> {
    state: Arc<SequenceState<E>>,
    position: usize,
}

impl<E> Clone for RowCursor<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            position: self.position,
        }
    }
}

impl<E> RowCursor<E>
where
    E: Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Index of the next row this cursor yields.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Rows this cursor can still yield without waiting for a fetch.
    pub fn available_without_fetching(&self) -> usize {
        self.state.rows.read().len().saturating_sub(self.position)
    }

    /// True iff this cursor consumed the buffer and no paging state is set.
    ///
    /// A point-in-time answer: a fetch in flight may still append rows.
    pub fn is_exhausted(&self) -> bool {
        let paging = self.state.paging.lock();
        self.position >= self.state.rows.read().len() && paging.paging_state.is_none()
    }

    /// The next row, fetching the next page if the buffer is consumed.
    ///
    /// A fetch failure is returned as the fetcher's own error. The paging
    /// state is kept, so calling `next` again retries the same page.
    pub async fn next(&mut self) -> Option<Result<Row, E>> {
        loop {
            if let Some(row) = self.state.row_at(self.position) {
                self.position += 1;
                return Some(Ok(row));
            }

            match self.state.advance(self.position) {
                Advance::Ready => continue,
                Advance::Exhausted => return None,
                Advance::Wait(pending) => {
                    if let Err(error) = pending.await {
                        return Some(Err(error));
                    }
                }
            }
        }
    }

    /// Collect every remaining row, stopping at the first failure.
    pub async fn try_collect(mut self) -> Result<Vec<Row>, E> {
        let mut rows = Vec::new();
        while let Some(row) = self.next().await {
            rows.push(row?);
        }
        Ok(rows)
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Row, E>> + Send {
        stream::unfold(self, |mut cursor| async move {
            let item = cursor.next().await?;
            Some((item, cursor))
        })
    }

    /// Iterate on the calling thread, blocking at page boundaries.
    ///
    /// Must not be used from inside an async task.
    pub fn blocking_iter(self) -> BlockingRows<E> {
        BlockingRows { cursor: self }
    }
}

/// Blocking iterator over the rows of a [`RowCursor`].
pub struct BlockingRows<E> {
    cursor: RowCursor<E>,
}

impl<E> Iterator for BlockingRows<E>
where
    E: Clone + fmt::Debug + Send + Sync + 'static,
{
    type Item = Result<Row, E>;

    fn next(&mut self) -> Option<Self::Item> {
        futures::executor::block_on(self.cursor.next())
    }
}
