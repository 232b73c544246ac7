//! Pool settings for [`SqliteDatabase`](crate::SqliteDatabase)

use std::time::Duration;

/// Pool sizing for a [`SqliteDatabase`](crate::SqliteDatabase).
///
/// Every [`SqliteQuery`](crate::SqliteQuery) runs on the read pool, so
/// `max_read_connections` bounds how many page and count queries run at
/// once. The write side is always a single connection.
///
/// ```
/// use sqlx_sqlite_source::SqliteSourceConfig;
/// use std::time::Duration;
///
/// let config = SqliteSourceConfig {
///     max_read_connections: 2,
///     ..Default::default()
/// };
///
/// assert_eq!(config.idle_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteSourceConfig {
   /// Upper bound on concurrent page and count queries. A request that
   /// resolves its total count uses two of these in sequence.
   ///
   /// Default: 6
   pub max_read_connections: u32,

   /// How long an unused read or write connection stays open.
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,
}

impl Default for SqliteSourceConfig {
   fn default() -> Self {
      Self {
         max_read_connections: 6,
         idle_timeout: Duration::from_secs(30),
      }
   }
}
