//! Service configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use sqlx_sqlite_source::SqliteSourceConfig;

use crate::{Error, Result};

/// Top-level configuration, loaded from JSON.
///
/// Every field has a default, so `{}` is a valid configuration.
///
/// ```
/// use content_bff::BffConfig;
///
/// let config = BffConfig::from_json_str(r#"{ "pagination": { "maxPageSize": 50 } }"#).unwrap();
/// assert_eq!(config.pagination.max_page_size, 50);
/// assert_eq!(config.pagination.count_limit, 5000);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BffConfig {
   pub database: DatabaseConfig,
   pub pagination: PaginationConfig,
}

impl BffConfig {
   pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
      let contents = std::fs::read_to_string(path)?;
      Self::from_json_str(&contents)
   }

   pub fn from_json_str(json: &str) -> Result<Self> {
      let config: Self = serde_json::from_str(json)?;
      config.validate()?;
      Ok(config)
   }

   /// Reject limits that would make every request fail or every count
   /// come back as zero.
   pub fn validate(&self) -> Result<()> {
      let zero = |field: &str| Error::InvalidConfig(format!("'{field}' must be greater than zero"));

      if self.database.max_read_connections == 0 {
         return Err(zero("database.maxReadConnections"));
      }
      if self.pagination.max_page_size == 0 {
         return Err(zero("pagination.maxPageSize"));
      }
      if self.pagination.count_limit == 0 {
         return Err(zero("pagination.countLimit"));
      }
      Ok(())
   }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseConfig {
   /// Location of the SQLite file
   pub path: PathBuf,

   /// Maximum number of concurrent read connections
   pub max_read_connections: u32,

   /// Seconds before an idle connection is closed
   pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
   fn default() -> Self {
      let source = SqliteSourceConfig::default();
      Self {
         path: PathBuf::from("content.db"),
         max_read_connections: source.max_read_connections,
         idle_timeout_secs: source.idle_timeout.as_secs(),
      }
   }
}

impl DatabaseConfig {
   pub fn source_config(&self) -> SqliteSourceConfig {
      SqliteSourceConfig {
         max_read_connections: self.max_read_connections,
         idle_timeout: Duration::from_secs(self.idle_timeout_secs),
      }
   }
}

/// Limits applied to client pagination arguments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationConfig {
   /// Largest `first`/`last` a client may ask for
   pub max_page_size: usize,

   /// Upper bound on rows scanned by the total count query
   pub count_limit: usize,
}

impl Default for PaginationConfig {
   fn default() -> Self {
      Self {
         max_page_size: 100,
         count_limit: cursor_pagination::DEFAULT_COUNT_LIMIT,
      }
   }
}
