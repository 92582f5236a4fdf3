//! Offset pagination over a page source
//!
//! Pages are requested strictly one after another. Rows are deduplicated
//! by their `id` field and fetching ends on the first of:
//! - an empty page (exhausted)
//! - a page shorter than the batch size (last page)
//! - `max_empty_loops` consecutive pages that added no new rows (stalled)

use crate::client::GraphQlError;
use async_trait::async_trait;
use politigraph_common::RunConfig;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Source of result pages addressed by `limit`/`offset`
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<Value>, GraphQlError>;
}

/// Pagination tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Rows requested per page
    pub batch_size: usize,
    /// Consecutive no-new-row pages before giving up
    pub max_empty_loops: usize,
    /// Pause between pages
    pub inter_page_delay: Duration,
}

impl From<&RunConfig> for PaginationConfig {
    fn from(config: &RunConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            max_empty_loops: config.max_empty_loops,
            inter_page_delay: config.inter_page_delay,
        }
    }
}

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Server returned an empty page
    Exhausted,
    /// Server returned fewer rows than requested
    ShortPage,
    /// Too many consecutive pages contributed nothing new
    Stalled,
}

/// Accumulated rows of one paginated fetch
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Unique rows in first-seen order
    pub rows: Vec<Value>,
    /// Number of page requests made
    pub pages_requested: usize,
    pub termination: Termination,
}

/// Fetch every reachable row from `source`
///
/// Any error from the source aborts the whole fetch; rows collected so
/// far are discarded.
pub async fn fetch_all<S>(
    source: &S,
    config: &PaginationConfig,
) -> Result<FetchOutcome, GraphQlError>
where
    S: PageSource + ?Sized,
{
    let mut seen_ids: HashSet<RowId> = HashSet::new();
    let mut rows: Vec<Value> = Vec::new();
    let mut offset = 0usize;
    let mut stalled = 0usize;
    let mut pages_requested = 0usize;

    let termination = loop {
        let page = source.fetch_page(config.batch_size, offset).await?;
        pages_requested += 1;
        let page_size = page.len();

        info!(offset, fetched = page_size, "Fetched page");
        if page_size == 0 {
            info!(offset, "Empty page, no more data");
            break Termination::Exhausted;
        }

        let mut added = 0usize;
        for row in page {
            let id = row_id(&row)?;
            if seen_ids.insert(id) {
                rows.push(row);
                added += 1;
            }
        }

        debug!(added, total = rows.len(), "Merged page");

        if added == 0 {
            stalled += 1;
            if stalled >= config.max_empty_loops {
                warn!(offset, stalled, "Stalled pagination. Stopping.");
                break Termination::Stalled;
            }
        } else {
            stalled = 0;
        }

        if page_size < config.batch_size {
            info!(offset, fetched = page_size, "Short page, treating as last");
            break Termination::ShortPage;
        }

        offset += config.batch_size;
        if !config.inter_page_delay.is_zero() {
            tokio::time::sleep(config.inter_page_delay).await;
        }
    };

    Ok(FetchOutcome {
        rows,
        pages_requested,
        termination,
    })
}

/// Dedup key of a row
///
/// String and numeric ids are distinct keys: `1` and `"1"` are two rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RowId {
    Text(String),
    Number(serde_json::Number),
}

fn row_id(row: &Value) -> Result<RowId, GraphQlError> {
    match row.get("id") {
        Some(Value::String(id)) => Ok(RowId::Text(id.clone())),
        Some(Value::Number(id)) => Ok(RowId::Number(id.clone())),
        _ => Err(GraphQlError::MissingField("id".to_string())),
    }
}
