//! Tests for paged result sequences.
//!
//! # Test Strategy
//!
//! 1. **Traversal**: Buffered rows, page boundaries, empty pages
//! 2. **Single flight**: Concurrent cursors on tasks and threads
//! 3. **Failures**: Fetch errors reach consumers unaltered, then retry
//! 4. **Truncation**: Paging state without a fetcher

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use streaming::{
    fetcher_fn, ColumnSpec, PageFetcher, PagingState, ResultPage, ResultSequence, Row,
};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
enum DriverError {
    #[error("no host available")]
    NoHostAvailable,
    #[error("server error: {0}")]
    Server(String),
}

/// Answers fetches from a queue of scripted responses, in call order.
struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<ResultPage, DriverError>>>,
    seen: Mutex<Vec<PagingState>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<Result<ResultPage, DriverError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
            delay: None,
        }
    }

    /// Each fetch waits for one `notify_one` on `gate`.
    fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<PagingState> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    type Error = DriverError;

    async fn fetch_page(&self, paging_state: PagingState) -> Result<ResultPage, DriverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(paging_state);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(DriverError::Server("unexpected fetch".to_owned())))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn state(bytes: &'static [u8]) -> PagingState {
    PagingState::new(Bytes::from_static(bytes))
}

fn row(value: u8) -> Row {
    Row::new(vec![Some(Bytes::from(vec![value]))])
}

fn rows(values: &[u8]) -> Vec<Row> {
    values.iter().copied().map(row).collect()
}

fn page(values: &[u8], next: Option<&'static [u8]>) -> ResultPage {
    let columns = vec![ColumnSpec::new("ks", "events", "v", "tinyint")];
    ResultPage::from_rows(columns, rows(values))
        .unwrap()
        .with_paging_state(next.map(state))
}

// ============================================================================
// Traversal Tests
// ============================================================================

#[tokio::test]
async fn test_traversal_crosses_page_boundary() {
    init_tracing();
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(page(&[3, 4], None))]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher.clone());

    assert_eq!(seq.rows().try_collect().await.unwrap(), rows(&[1, 2, 3, 4]));
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(fetcher.seen(), vec![state(b"P")]);
    assert!(!seq.has_more_pages());
}

#[tokio::test]
async fn test_second_traversal_reuses_fetched_pages() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        Ok(page(&[3], Some(b"Q"))),
        Ok(page(&[4], None)),
    ]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher.clone());

    let first = seq.rows().try_collect().await.unwrap();
    let second = seq.rows().try_collect().await.unwrap();

    assert_eq!(first, rows(&[1, 2, 3, 4]));
    assert_eq!(first, second);
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(fetcher.seen(), vec![state(b"P"), state(b"Q")]);
}

#[tokio::test]
async fn test_empty_page_with_paging_state_is_skipped() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        Ok(page(&[], Some(b"Q"))),
        Ok(page(&[3], None)),
    ]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher.clone());

    assert_eq!(seq.rows().try_collect().await.unwrap(), rows(&[1, 2, 3]));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_current_rows_does_not_fetch() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(page(&[3], None))]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher.clone());

    assert_eq!(seq.current_rows(), rows(&[1, 2]));
    assert_eq!(seq.buffered_len(), 2);
    assert_eq!(seq.rows().available_without_fetching(), 2);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_fetch_next_page_explicitly() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        Ok(page(&[2], Some(b"Q"))),
        Ok(page(&[3], None)),
    ]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1], Some(b"P")), fetcher.clone());

    assert!(seq.fetch_next_page().await.unwrap());
    assert_eq!(seq.buffered_len(), 2);
    assert!(seq.fetch_next_page().await.unwrap());
    assert_eq!(seq.buffered_len(), 3);
    assert!(!seq.fetch_next_page().await.unwrap());

    // Cursor walks everything without fetching again
    assert_eq!(seq.rows().try_collect().await.unwrap(), rows(&[1, 2, 3]));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_into_stream() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(page(&[3], None))]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher);

    let collected: Vec<_> = seq.rows().into_stream().collect().await;
    assert_eq!(collected, rows(&[1, 2, 3]).into_iter().map(Ok).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_closure_fetcher() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let fetcher = fetcher_fn(move |paging_state: PagingState| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            assert_eq!(paging_state, state(b"P"));
            Ok::<_, DriverError>(page(&[9], None))
        }
    });
    let seq = ResultSequence::with_fetcher(page(&[8], Some(b"P")), fetcher);

    assert_eq!(seq.rows().try_collect().await.unwrap(), rows(&[8, 9]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_schema_and_info_from_first_page() {
    let seq: ResultSequence<DriverError> = ResultSequence::new(page(&[1], None));

    assert_eq!(seq.columns().len(), 1);
    assert_eq!(seq.column_index("v"), Some(0));
    assert_eq!(seq.column_index("missing"), None);
    assert!(seq.info().warnings.is_empty());
}

// ============================================================================
// Exhaustion Tests
// ============================================================================

#[tokio::test]
async fn test_is_exhausted_is_point_in_time() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(page(&[2], None))]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1], Some(b"P")), fetcher);
    let mut cursor = seq.rows();

    assert!(!cursor.is_exhausted());
    assert_eq!(cursor.next().await, Some(Ok(row(1))));
    // Buffer consumed but a paging state is still set
    assert!(!cursor.is_exhausted());
    assert_eq!(cursor.next().await, Some(Ok(row(2))));
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.next().await, None);

    // A fresh cursor is not exhausted until it consumes the buffer
    let fresh = seq.rows();
    assert!(!fresh.is_exhausted());
    assert_eq!(fresh.position(), 0);
}

#[tokio::test]
async fn test_missing_fetcher_truncates_silently() {
    let seq: ResultSequence<DriverError> = ResultSequence::new(page(&[1, 2], Some(b"P")));
    assert!(seq.has_more_pages());

    assert_eq!(seq.rows().try_collect().await.unwrap(), rows(&[1, 2]));
    assert!(!seq.has_more_pages());
    assert_eq!(seq.paging_state(), None);
    assert!(!seq.fetch_next_page().await.unwrap());
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_failure_keeps_kind_and_allows_retry() {
    init_tracing();
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        Err(DriverError::NoHostAvailable),
        Ok(page(&[3], None)),
    ]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher.clone());
    let mut cursor = seq.rows();

    assert_eq!(cursor.next().await, Some(Ok(row(1))));
    assert_eq!(cursor.next().await, Some(Ok(row(2))));
    assert_eq!(cursor.next().await, Some(Err(DriverError::NoHostAvailable)));
    assert_eq!(seq.paging_state(), Some(state(b"P")));

    // Continuing retries the same paging state
    assert_eq!(cursor.next().await, Some(Ok(row(3))));
    assert_eq!(cursor.next().await, None);
    assert_eq!(fetcher.seen(), vec![state(b"P"), state(b"P")]);
}

#[tokio::test]
async fn test_try_collect_stops_at_failure() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Err(DriverError::Server(
        "read timeout".to_owned(),
    ))]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1], Some(b"P")), fetcher);

    assert_eq!(
        seq.rows().try_collect().await,
        Err(DriverError::Server("read timeout".to_owned()))
    );
    assert_eq!(seq.buffered_len(), 1);
}

// ============================================================================
// Single Flight Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_cursors_share_one_fetch() {
    init_tracing();
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(
        ScriptedFetcher::new(vec![Ok(page(&[3, 4], None))]).with_gate(Arc::clone(&gate)),
    );
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher.clone());

    // Both cursors reach the boundary before the fetch is released
    let (a, b, ()) = tokio::join!(
        seq.rows().try_collect(),
        seq.rows().try_collect(),
        async { gate.notify_one() },
    );

    assert_eq!(a.unwrap(), rows(&[1, 2, 3, 4]));
    assert_eq!(b.unwrap(), rows(&[1, 2, 3, 4]));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_cursors_all_see_failure() {
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(
        ScriptedFetcher::new(vec![Err(DriverError::NoHostAvailable)]).with_gate(Arc::clone(&gate)),
    );
    let seq = ResultSequence::with_shared_fetcher(page(&[1], Some(b"P")), fetcher.clone());

    let (a, b, ()) = tokio::join!(
        seq.rows().try_collect(),
        seq.rows().try_collect(),
        async { gate.notify_one() },
    );

    assert_eq!(a, Err(DriverError::NoHostAvailable));
    assert_eq!(b, Err(DriverError::NoHostAvailable));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_tasks_fetch_each_page_once() {
    init_tracing();
    let fetcher = Arc::new(
        ScriptedFetcher::new(vec![Ok(page(&[3, 4], Some(b"Q"))), Ok(page(&[5], None))])
            .with_delay(Duration::from_millis(20)),
    );
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher.clone());

    let handles: Vec<_> = (0..8)
        .map(|_| tokio::spawn(seq.rows().try_collect()))
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), rows(&[1, 2, 3, 4, 5]));
    }
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(fetcher.seen(), vec![state(b"P"), state(b"Q")]);
}

#[tokio::test]
async fn test_fetch_completes_after_waiter_dropped() {
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(
        ScriptedFetcher::new(vec![Ok(page(&[2], None))]).with_gate(Arc::clone(&gate)),
    );
    let seq = ResultSequence::with_shared_fetcher(page(&[1], Some(b"P")), fetcher.clone());

    // Start the fetch, then abandon the waiting cursor
    let mut cursor = seq.rows();
    assert_eq!(cursor.next().await, Some(Ok(row(1))));
    let timed_out = tokio::time::timeout(Duration::from_millis(10), cursor.next()).await;
    assert!(timed_out.is_err());
    drop(cursor);

    gate.notify_one();
    assert_eq!(seq.rows().try_collect().await.unwrap(), rows(&[1, 2]));
    assert_eq!(fetcher.calls(), 1);
}

#[test]
fn test_blocking_consumers_on_threads() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        Ok(page(&[3], Some(b"Q"))),
        Ok(page(&[4, 5], None)),
    ]));
    let seq = ResultSequence::with_shared_fetcher(page(&[1, 2], Some(b"P")), fetcher.clone());
    let barrier = Arc::new(std::sync::Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cursor = seq.rows();
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                cursor.blocking_iter().collect::<Result<Vec<_>, _>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), rows(&[1, 2, 3, 4, 5]));
    }
    assert_eq!(fetcher.calls(), 2);
}
