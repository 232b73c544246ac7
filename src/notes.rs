//! The paginated notes collection

use std::sync::Arc;

use cursor_pagination::{
   JsonBase64Codec, Page, PaginationOptions, Predicate, QuerySource, SortDirection, SortField,
   SortKeySpec, paginate,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use sqlx_sqlite_source::SqliteDatabase;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};
use tracing::debug;
use uuid::Uuid;

use crate::args::ConnectionArgs;
use crate::config::PaginationConfig;
use crate::Result;

const NOTES_TABLE: &str = "notes";

/// A user's note.
///
/// Rows come back from SQLite with snake_case column names; clients see
/// camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
   pub id: Uuid,
   #[serde(alias = "owner_id")]
   pub owner_id: String,
   pub title: String,
   pub body: String,
   #[serde(alias = "created_at", with = "time::serde::rfc3339")]
   pub created_at: OffsetDateTime,
}

/// Reads and writes notes, and pages through them per owner.
#[derive(Debug, Clone)]
pub struct NotesService {
   db: Arc<SqliteDatabase>,
   config: PaginationConfig,
   sort_key: SortKeySpec,
}

impl NotesService {
   pub fn new(db: Arc<SqliteDatabase>, config: PaginationConfig) -> Result<Self> {
      // id is unique, which makes the key total
      let sort_key = SortKeySpec::new(vec![
         SortField::timestamp("created_at"),
         SortField::uuid("id"),
      ])?;

      Ok(Self {
         db,
         config,
         sort_key,
      })
   }

   /// Create the notes table and the index backing its listing.
   pub async fn migrate(&self) -> Result<()> {
      self
         .db
         .execute(
            "CREATE TABLE IF NOT EXISTS notes (
               id TEXT PRIMARY KEY,
               owner_id TEXT NOT NULL,
               title TEXT NOT NULL,
               body TEXT NOT NULL,
               created_at TEXT NOT NULL
            )",
            vec![],
         )
         .await?;

      self
         .db
         .execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_owner_created ON notes (owner_id, created_at, id)",
            vec![],
         )
         .await?;

      Ok(())
   }

   /// Insert a note with a fresh id.
   ///
   /// `created_at` is stored in UTC at whole-second precision, so that the
   /// RFC 3339 text sorts the same way as the instants it encodes.
   pub async fn create(
      &self,
      owner_id: &str,
      title: &str,
      body: &str,
      created_at: OffsetDateTime,
   ) -> Result<Note> {
      let created_at = created_at.to_offset(UtcOffset::UTC);
      let created_at = created_at - Duration::nanoseconds(i64::from(created_at.nanosecond()));

      let note = Note {
         id: Uuid::new_v4(),
         owner_id: owner_id.to_string(),
         title: title.to_string(),
         body: body.to_string(),
         created_at,
      };

      self
         .db
         .execute(
            "INSERT INTO notes (id, owner_id, title, body, created_at) VALUES ($1, $2, $3, $4, $5)",
            vec![
               json!(note.id.to_string()),
               json!(note.owner_id),
               json!(note.title),
               json!(note.body),
               json!(note.created_at.format(&Rfc3339)?),
            ],
         )
         .await?;

      Ok(note)
   }

   /// One page of `owner_id`'s notes, ordered by creation time.
   pub async fn list(
      &self,
      owner_id: &str,
      args: &ConnectionArgs,
      order: SortDirection,
   ) -> Result<Page<Note>> {
      let request = args.to_request(&self.config)?;

      let source = self
         .db
         .query(NOTES_TABLE)
         .filter(Predicate::eq("owner_id", owner_id));
      let options = PaginationOptions {
         logical_order: order,
         count_limit: self.config.count_limit,
      };

      let page = paginate(source, &request, &self.sort_key, options, &JsonBase64Codec)
         .await?
         .resolve_total_count()
         .await?;

      debug!(
         owner_id,
         edges = page.len(),
         total_count = page.total_count,
         "Listed notes"
      );

      page.try_map_nodes(note_from_row)
   }
}

fn note_from_row(row: IndexMap<String, JsonValue>) -> Result<Note> {
   let object: serde_json::Map<String, JsonValue> = row.into_iter().collect();
   Ok(serde_json::from_value(JsonValue::Object(object))?)
}
