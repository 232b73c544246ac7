//! # cursor-pagination
//!
//! Cursor-based pagination over any filterable, orderable query source.
//!
//! ## Core Types
//!
//! - **[`SortKeySpec`]**: ordered fields forming a unique composite sort key
//! - **[`CursorCodec`]**: turns sort key values into opaque cursors and back ([`JsonBase64Codec`] by default)
//! - **[`QuerySource`]**: the capabilities needed from a storage backend
//! - **[`PaginationRequest`]**: `first`/`after` or `last`/`before`
//! - **[`Page`]**: edges, page info and a deferred total count
//!
//! ## Example
//!
//! ```ignore
//! use cursor_pagination::{
//!    JsonBase64Codec, PaginationOptions, PaginationRequest, SortField, SortKeySpec, paginate,
//! };
//!
//! let spec = SortKeySpec::new(vec![SortField::timestamp("created_at"), SortField::uuid("id")])?;
//! let page = paginate(
//!    db.query("notes").filter(Predicate::eq("owner_id", owner)),
//!    &PaginationRequest::first(20),
//!    &spec,
//!    PaginationOptions::default(),
//!    &JsonBase64Codec,
//! )
//! .await?
//! .resolve_total_count()
//! .await?;
//! ```

pub mod codec;
pub mod director;
mod error;
pub mod page;
pub mod predicate;
pub mod request;
pub mod sort_key;
pub mod source;
pub mod sql;

pub use codec::{CursorCodec, JsonBase64Codec};
pub use director::{DEFAULT_COUNT_LIMIT, PagePlan, PaginationOptions, paginate};
pub use error::{BoxError, Error, Result};
pub use page::{DeferredCount, Edge, Page, PageInfo};
pub use predicate::{ComparisonOp, Predicate, build_lexicographic_predicate};
pub use request::PaginationRequest;
pub use sort_key::{FieldType, SortDirection, SortField, SortKeySpec};
pub use source::{KeysetRow, QuerySource};
pub use sql::CompiledQuery;
