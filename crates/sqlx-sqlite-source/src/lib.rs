//! # sqlx-sqlite-source
//!
//! A SQLite [`QuerySource`](cursor_pagination::QuerySource) for
//! `cursor-pagination`, built on SQLx.
//!
//! ## Core Types
//!
//! - **[`SqliteDatabase`]**: read-only connection pool for queries plus a single write connection
//! - **[`SqliteQuery`]**: immutable SELECT builder that compiles predicates to `$n`-numbered SQL
//! - **[`SqliteSourceConfig`]**: pool settings
//! - **[`Error`]**: error type for database operations
//!
//! ## Example
//!
//! ```no_run
//! use cursor_pagination::{
//!    JsonBase64Codec, PaginationOptions, PaginationRequest, Predicate, QuerySource, SortField,
//!    SortKeySpec, paginate,
//! };
//! use sqlx_sqlite_source::SqliteDatabase;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = SqliteDatabase::connect("notes.db", None).await?;
//! let spec = SortKeySpec::new(vec![SortField::text("created_at"), SortField::text("id")])?;
//!
//! let page = paginate(
//!    db.query("notes").filter(Predicate::eq("owner_id", "u1")),
//!    &PaginationRequest::first(20),
//!    &spec,
//!    PaginationOptions::default(),
//!    &JsonBase64Codec,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod database;
mod decode;
mod error;
mod query;

pub use config::SqliteSourceConfig;
pub use database::{SqliteDatabase, WriteQueryResult};
pub use error::{Error, Result};
pub use query::SqliteQuery;
