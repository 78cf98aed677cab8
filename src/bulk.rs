//! Bulk write batching.
//!
//! A [`BulkRequest`] is an ordered sequence of [`BulkOperation`]s rendered
//! as one newline-delimited wire body: an action-metadata line per
//! operation, a source line for index and update operations, and a
//! trailing newline terminating the whole body (the bulk endpoint rejects
//! bodies without it).
//!
//! Operations are independent; there is no cross-item transaction. The
//! engine acknowledges each item separately, and [`BulkResult`] reports
//! those outcomes in input order. Partial failure is data, never an
//! error.

use serde_json::{Map, Value, json};

use crate::codec::DocumentCodec;
use crate::data::Document;
use crate::error::Result;

/// One write operation inside a batch.
#[derive(Debug, Clone)]
pub enum BulkOperation {
    /// Index a document, creating or replacing it. With `id` absent the
    /// engine assigns one.
    Index {
        index: String,
        id: Option<String>,
        document: Document,
    },
    /// Merge a partial document into an existing one.
    Update {
        index: String,
        id: String,
        patch: Document,
    },
    /// Delete a document by id.
    Delete { index: String, id: String },
}

/// An ordered batch of write operations.
#[derive(Debug, Clone, Default)]
pub struct BulkRequest {
    operations: Vec<BulkOperation>,
}

impl BulkRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn add(mut self, op: BulkOperation) -> Self {
        self.operations.push(op);
        self
    }

    /// Append an index operation; the document's own id is used if set.
    pub fn index(self, index: impl Into<String>, document: Document) -> Self {
        let id = document.id.clone();
        self.add(BulkOperation::Index {
            index: index.into(),
            id,
            document,
        })
    }

    /// Append an update operation.
    pub fn update(self, index: impl Into<String>, id: impl Into<String>, patch: Document) -> Self {
        self.add(BulkOperation::Update {
            index: index.into(),
            id: id.into(),
            patch,
        })
    }

    /// Append a delete operation.
    pub fn delete(self, index: impl Into<String>, id: impl Into<String>) -> Self {
        self.add(BulkOperation::Delete {
            index: index.into(),
            id: id.into(),
        })
    }

    pub fn operations(&self) -> &[BulkOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Render the newline-delimited wire body.
    ///
    /// `legacy_type` adds `_type` to each action's metadata for engines
    /// that still partition indices by type.
    pub fn body(&self, codec: &DocumentCodec, legacy_type: Option<&str>) -> Result<String> {
        let mut body = String::new();
        for op in &self.operations {
            match op {
                BulkOperation::Index {
                    index,
                    id,
                    document,
                } => {
                    push_line(
                        &mut body,
                        &json!({ "index": action_metadata(index, id.as_deref(), legacy_type) }),
                    )?;
                    push_line(&mut body, &codec.source_value(document)?)?;
                }
                BulkOperation::Update { index, id, patch } => {
                    push_line(
                        &mut body,
                        &json!({ "update": action_metadata(index, Some(id.as_str()), legacy_type) }),
                    )?;
                    push_line(&mut body, &json!({ "doc": codec.source_value(patch)? }))?;
                }
                BulkOperation::Delete { index, id } => {
                    push_line(
                        &mut body,
                        &json!({ "delete": action_metadata(index, Some(id.as_str()), legacy_type) }),
                    )?;
                }
            }
        }
        Ok(body)
    }
}

/// Build the action-metadata object, omitting absent fields entirely.
fn action_metadata(index: &str, id: Option<&str>, legacy_type: Option<&str>) -> Value {
    let mut meta = Map::new();
    meta.insert("_index".to_string(), Value::String(index.to_string()));
    if let Some(doc_type) = legacy_type {
        meta.insert("_type".to_string(), Value::String(doc_type.to_string()));
    }
    if let Some(id) = id {
        meta.insert("_id".to_string(), Value::String(id.to_string()));
    }
    Value::Object(meta)
}

fn push_line(body: &mut String, value: &Value) -> Result<()> {
    body.push_str(&serde_json::to_string(value)?);
    body.push('\n');
    Ok(())
}

/// Outcome of one item in a submitted batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// The engine acknowledged the item; `id` is the (possibly assigned)
    /// document id and `result` the engine's verdict (`created`,
    /// `updated`, `deleted`, ...).
    Success { id: Option<String>, result: String },
    /// The engine rejected this item.
    Failure { reason: String },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success { .. })
    }
}

/// Per-item result, at the same position as the submitted operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResult {
    /// Zero-based position in the submitted batch.
    pub position: usize,
    pub outcome: ItemOutcome,
}

/// Result of a batch submission.
///
/// The batch as a whole succeeded in transport terms; callers must
/// inspect `has_failures` and the per-item outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkResult {
    pub has_failures: bool,
    pub items: Vec<ItemResult>,
}

impl BulkResult {
    /// Iterate over the failed items only.
    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.items.iter().filter(|i| !i.outcome.is_success())
    }
}
