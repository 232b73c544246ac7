//! # content-bff
//!
//! Backend-for-frontend surface for paginated content collections.
//!
//! Resolvers hand client [`ConnectionArgs`] to a service such as
//! [`NotesService`], which validates them against [`PaginationConfig`] and
//! returns a Relay-style [`Page`](cursor_pagination::Page) serialized as
//! `{pageInfo, edges, totalCount}`.
//!
//! ## Example
//!
//! ```no_run
//! use content_bff::{BffConfig, ConnectionArgs, NotesService};
//! use cursor_pagination::SortDirection;
//! use sqlx_sqlite_source::SqliteDatabase;
//!
//! # async fn example() -> content_bff::Result<()> {
//! let config = BffConfig::from_file("bff.json")?;
//! let db = SqliteDatabase::connect(&config.database.path, Some(config.database.source_config()))
//!    .await?;
//!
//! let notes = NotesService::new(db, config.pagination)?;
//! notes.migrate().await?;
//!
//! let page = notes
//!    .list("u1", &ConnectionArgs::first(20), SortDirection::Desc)
//!    .await?;
//! println!("{}", serde_json::to_string(&page)?);
//! # Ok(())
//! # }
//! ```

mod args;
mod config;
mod error;
mod notes;

pub use args::ConnectionArgs;
pub use config::{BffConfig, DatabaseConfig, PaginationConfig};
pub use error::{Error, Result};
pub use notes::{Note, NotesService};
