//! # Tern
//!
//! A typed, blocking client core for JSON document search engines.
//!
//! ## Features
//!
//! - Typed documents with a validating wire codec
//! - Compound query construction (match, multi-match, range, bool)
//! - Blocking document CRUD, search, and index management
//! - Bulk write batching with per-item failure reporting
//! - Highlight and pagination support with typed results
// Core modules
pub mod bulk;
mod client;
mod codec;
mod data;
mod error;
pub mod index;
pub mod query;

// Re-exports for the public API
pub use bulk::{BulkOperation, BulkRequest, BulkResult, ItemOutcome, ItemResult};
pub use client::config::{ClientConfig, ClientConfigBuilder};
pub use client::search::{Highlight, Hit, SearchRequest, SearchRequestBuilder, SearchResult};
pub use client::{DeleteResult, SearchClient, UpdateResult};
pub use codec::DocumentCodec;
pub use data::{Document, FieldValue};
pub use error::{Result, TernError};
pub use index::{FieldMapping, FieldType, IndexSettings, Mapping, MappingBuilder};
pub use query::{BoolQuery, MatchQuery, MultiMatchQuery, Operator, Query, RangeQuery};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
