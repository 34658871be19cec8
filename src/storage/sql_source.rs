//! SQL query source
//!
//! Runs a query through the sqlx `Any` driver (PostgreSQL and SQLite URLs)
//! on a private single-threaded runtime. Rows are streamed by a background
//! task into a bounded channel, so the pipeline pulls them one at a time
//! without materializing the result set.

use futures::StreamExt;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Column, Executor, Row, Statement};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{DecryptError, DecryptResult};
use crate::models::Header;

use super::TabularSource;

/// Rows buffered between the database task and the pipeline
const ROW_BUFFER: usize = 256;

/// Lazily reads the result set of one query
pub struct SqlSource {
    header: Header,
    rows: mpsc::Receiver<DecryptResult<Vec<String>>>,
    pool: AnyPool,
    runtime: Runtime,
}

impl SqlSource {
    /// Connect, prepare the query for its column names, and start streaming
    pub fn open(connection: &str, query: &str) -> DecryptResult<Self> {
        sqlx::any::install_default_drivers();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                DecryptError::SourceUnavailable(format!("Failed to start database runtime: {}", e))
            })?;

        let pool = runtime
            .block_on(
                AnyPoolOptions::new()
                    .max_connections(1)
                    .connect(connection),
            )
            .map_err(|e| {
                DecryptError::SourceUnavailable(format!("Failed to connect to database: {}", e))
            })?;

        let header = match runtime.block_on(describe_columns(&pool, query)) {
            Ok(header) => header,
            Err(e) => {
                runtime.block_on(pool.close());
                return Err(e);
            }
        };
        debug!(columns = header.len(), "prepared query");

        let (tx, rx) = mpsc::channel(ROW_BUFFER);
        runtime.spawn(stream_rows(pool.clone(), query.to_string(), tx));

        Ok(Self {
            header,
            rows: rx,
            pool,
            runtime,
        })
    }
}

impl Iterator for SqlSource {
    type Item = DecryptResult<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.rows.recv())
    }
}

impl TabularSource for SqlSource {
    fn header(&self) -> &[String] {
        &self.header
    }
}

impl Drop for SqlSource {
    fn drop(&mut self) {
        // Wakes a task blocked on a full channel so it releases its connection.
        self.rows.close();
        self.runtime.block_on(self.pool.close());
    }
}

async fn describe_columns(pool: &AnyPool, query: &str) -> DecryptResult<Header> {
    let statement = pool
        .prepare(query)
        .await
        .map_err(|e| DecryptError::QueryFailed(format!("Failed to prepare query: {}", e)))?;

    Ok(statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect())
}

async fn stream_rows(
    pool: AnyPool,
    query: String,
    tx: mpsc::Sender<DecryptResult<Vec<String>>>,
) {
    let mut rows = sqlx::query(&query).fetch(&pool);

    while let Some(next) = rows.next().await {
        let message = next
            .map(|row| row_cells(&row))
            .map_err(|e| DecryptError::QueryFailed(format!("Failed to read row: {}", e)));
        let failed = message.is_err();

        if tx.send(message).await.is_err() || failed {
            break;
        }
    }
}

fn row_cells(row: &AnyRow) -> Vec<String> {
    (0..row.columns().len())
        .map(|index| cell_text(row, index))
        .collect()
}

/// Render a column value as text; NULL becomes an empty cell
fn cell_text(row: &AnyRow, index: usize) -> String {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map(|n| n.to_string()).unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return v.map(|n| n.to_string()).unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v.map(|n| n.to_string()).unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map(|b| b.to_string()).unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return v
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
    }

    String::new()
}
