//! One page of a query result.

use crate::error::StreamingError;
use bytes::Bytes;
use std::fmt;
use std::net::SocketAddr;

/// Opaque server-issued cursor. Its presence on a page means more pages exist.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PagingState(Bytes);

impl PagingState {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        PagingState(bytes.into())
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

impl fmt::Debug for PagingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PagingState({} bytes)", self.0.len())
    }
}

/// Metadata of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub keyspace: String,
    pub table: String,
    pub name: String,
    /// CQL type as reported by the server, e.g. `text` or `map<int, text>`.
    pub type_name: String,
}

impl ColumnSpec {
    pub fn new(
        keyspace: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            keyspace: keyspace.into(),
            table: table.into(),
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Diagnostics about how the query was executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionInfo {
    /// Host that served the request.
    pub queried_host: Option<SocketAddr>,
    /// Server-side warnings attached to the response.
    pub warnings: Vec<String>,
    /// Tracing session id, when tracing was requested.
    pub tracing_id: Option<u128>,
}

/// One result row: raw serialized column values, `None` for null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<Option<Bytes>>,
}

impl Row {
    pub fn new(values: Vec<Option<Bytes>>) -> Self {
        Self { values }
    }

    /// Value at column `index`; `None` for null or out of range.
    pub fn get(&self, index: usize) -> Option<&Bytes> {
        self.values.get(index)?.as_ref()
    }

    pub fn values(&self) -> &[Option<Bytes>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A batch of rows with schema, diagnostics, and an optional cursor.
#[derive(Debug, Clone, Default)]
pub struct ResultPage {
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
    info: ExecutionInfo,
    paging_state: Option<PagingState>,
}

impl ResultPage {
    /// Empty last page with the given schema.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    pub fn from_rows(columns: Vec<ColumnSpec>, rows: Vec<Row>) -> Result<Self, StreamingError> {
        let mut page = Self::new(columns);
        page.rows.reserve(rows.len());
        for row in rows {
            page.push_row(row)?;
        }
        Ok(page)
    }

    /// Appends a row, rejecting one whose arity differs from the schema.
    pub fn push_row(&mut self, row: Row) -> Result<(), StreamingError> {
        if row.len() != self.columns.len() {
            return Err(StreamingError::ColumnCountMismatch {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn with_paging_state(mut self, paging_state: Option<PagingState>) -> Self {
        self.paging_state = paging_state;
        self
    }

    pub fn with_info(mut self, info: ExecutionInfo) -> Self {
        self.info = info;
        self
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn info(&self) -> &ExecutionInfo {
        &self.info
    }

    pub fn paging_state(&self) -> Option<&PagingState> {
        self.paging_state.as_ref()
    }

    /// True if the server indicated more pages follow this one.
    pub fn has_more_pages(&self) -> bool {
        self.paging_state.is_some()
    }

    pub(crate) fn into_parts(self) -> (Vec<ColumnSpec>, Vec<Row>, ExecutionInfo, Option<PagingState>) {
        (self.columns, self.rows, self.info, self.paging_state)
    }
}
