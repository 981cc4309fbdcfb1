//! Paged result streaming.
//!
//! This crate exposes query results that span several server round-trips
//! as one forward-only sequence of rows:
//! - Pages as delivered by the protocol layer
//! - The collaborator that fetches a page by its paging state
//! - The shared, append-only sequence and its independent cursors

pub mod error;
pub mod fetcher;
pub mod page;
pub mod sequence;

pub use error::StreamingError;
pub use fetcher::{fetcher_fn, FnFetcher, PageFetcher};
pub use page::{ColumnSpec, ExecutionInfo, PagingState, ResultPage, Row};
pub use sequence::{BlockingRows, ResultSequence, RowCursor};
