//! SQLite database with connection pooling

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::config::SqliteSourceConfig;
use crate::decode::{bind_value, decode_rows};
use crate::query::SqliteQuery;
use crate::{Error, Result};

/// Result returned from write operations (e.g. INSERT, UPDATE, DELETE).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteQueryResult {
   /// The number of rows affected by the write operation.
   pub rows_affected: u64,
   /// The last inserted row ID (SQLite ROWID).
   pub last_insert_id: i64,
}

/// SQLite database with a pool of read-only connections for queries and a
/// single write connection.
///
/// ## Architecture
///
/// - **`read_pool`**: read-only connections; every [`SqliteQuery`] runs here
/// - **`write_conn`**: single-connection pool (max_connections=1) used for
///   schema setup and inserts, which also creates the file and enables WAL
///
/// ## Usage Pattern
///
/// ```text
/// 1. Connect (creates the file if needed)
/// 2. Write through execute(), read through query(table) or fetch_all()
/// 3. Close (or remove) when done
/// ```
#[derive(Debug)]
pub struct SqliteDatabase {
   /// Pool of read-only connections (defaults to max_connections=6) for concurrent reads
   read_pool: Pool<Sqlite>,

   /// Single read-write connection pool (max_connections=1) for serialized writes
   write_conn: Pool<Sqlite>,

   /// Marks database as closed to prevent further operations
   closed: AtomicBool,

   /// Path to database file (used for cleanup)
   path: PathBuf,
}

impl SqliteDatabase {
   /// Open (or create) the database at `path`.
   pub async fn connect(
      path: impl AsRef<Path>,
      custom_config: Option<SqliteSourceConfig>,
   ) -> Result<Arc<Self>> {
      let config = custom_config.unwrap_or_default();
      let path = path.as_ref().to_path_buf();

      if let Some(parent) = path.parent()
         && !parent.as_os_str().is_empty()
      {
         std::fs::create_dir_all(parent)?;
      }

      // The writer connects first so the file exists before read-only
      // connections open it
      let write_options = SqliteConnectOptions::new()
         .filename(&path)
         .create_if_missing(true)
         .journal_mode(SqliteJournalMode::Wal);
      let write_conn = SqlitePoolOptions::new()
         .max_connections(1)
         .idle_timeout(config.idle_timeout)
         .connect_with(write_options)
         .await?;

      let read_options = SqliteConnectOptions::new().filename(&path).read_only(true);
      let read_pool = SqlitePoolOptions::new()
         .max_connections(config.max_read_connections)
         .idle_timeout(config.idle_timeout)
         .connect_with(read_options)
         .await?;

      debug!(
         path = %path.display(),
         max_read_connections = config.max_read_connections,
         "Connected to SQLite database"
      );

      Ok(Arc::new(Self {
         read_pool,
         write_conn,
         closed: AtomicBool::new(false),
         path,
      }))
   }

   pub fn path(&self) -> &Path {
      &self.path
   }

   /// The read-only pool, unless the database has been closed.
   pub fn read_pool(&self) -> Result<&Pool<Sqlite>> {
      if self.closed.load(Ordering::Acquire) {
         return Err(Error::DatabaseClosed);
      }
      Ok(&self.read_pool)
   }

   /// Acquire the single write connection.
   pub async fn acquire_writer(&self) -> Result<PoolConnection<Sqlite>> {
      if self.closed.load(Ordering::Acquire) {
         return Err(Error::DatabaseClosed);
      }
      Ok(self.write_conn.acquire().await?)
   }

   /// Start a query against `table`.
   pub fn query(self: &Arc<Self>, table: &str) -> SqliteQuery {
      SqliteQuery::new(Arc::clone(self), table)
   }

   /// Execute a write query (INSERT/UPDATE/DELETE/DDL)
   pub async fn execute(&self, query: &str, values: Vec<JsonValue>) -> Result<WriteQueryResult> {
      let mut writer = self.acquire_writer().await?;

      let mut q = sqlx::query(query);
      for value in values {
         q = bind_value(q, value);
      }

      let result = q.execute(&mut *writer).await?;
      Ok(WriteQueryResult {
         rows_affected: result.rows_affected(),
         last_insert_id: result.last_insert_rowid(),
      })
   }

   /// Execute a raw SELECT query, possibly returning multiple rows
   pub async fn fetch_all(
      &self,
      query: &str,
      values: Vec<JsonValue>,
   ) -> Result<Vec<IndexMap<String, JsonValue>>> {
      let pool = self.read_pool()?;

      let mut q = sqlx::query(query);
      for value in values {
         q = bind_value(q, value);
      }

      let rows = q.fetch_all(pool).await?;
      decode_rows(rows)
   }

   /// Close both pools. Later calls are no-ops.
   pub async fn close(&self) -> Result<()> {
      if self.closed.swap(true, Ordering::AcqRel) {
         return Ok(());
      }

      self.read_pool.close().await;
      self.write_conn.close().await;
      debug!(path = %self.path.display(), "Closed SQLite database");
      Ok(())
   }

   /// Close the database and delete its files (including WAL and SHM).
   pub async fn remove(&self) -> Result<()> {
      self.close().await?;

      let base = self.path.as_os_str().to_owned();
      for suffix in ["", "-wal", "-shm"] {
         let mut file = base.clone();
         file.push(suffix);
         match std::fs::remove_file(&file) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
         }
      }
      Ok(())
   }
}
