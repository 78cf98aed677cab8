//! Wire bindings for the engine's response bodies and their mapping
//! into the crate's typed results.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::bulk::{BulkResult, ItemOutcome, ItemResult};
use crate::client::search::{Hit, SearchResult};
use crate::codec::DocumentCodec;
use crate::error::{Result, TernError};

/// Index-management acknowledgment body.
#[derive(Debug, Deserialize)]
pub(crate) struct AckResponse {
    pub acknowledged: bool,
}

/// Body of a single-document write (index).
#[derive(Debug, Deserialize)]
pub(crate) struct IndexResponse {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Body of a get-by-id.
#[derive(Debug, Deserialize)]
pub(crate) struct GetResponse {
    pub found: bool,
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_source")]
    pub source: Option<Value>,
}

/// Body of an update or delete, reduced to the engine's verdict.
#[derive(Debug, Deserialize)]
pub(crate) struct WriteResponse {
    pub result: String,
}

/// Search response body.
///
/// `total` accepts both the bare count of 6.x engines and the
/// `{value, relation}` object of 7.x and later.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub hits: Option<RawHits>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHits {
    pub total: Option<RawTotal>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawTotal {
    fn value(&self) -> u64 {
        match self {
            RawTotal::Count(v) => *v,
            RawTotal::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Option<Value>,
    pub highlight: Option<HashMap<String, Vec<String>>>,
}

/// Bulk response body: one single-key object per submitted operation,
/// keyed by the action name.
#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    pub errors: bool,
    pub items: Vec<HashMap<String, BulkItemBody>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItemBody {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub status: u16,
    pub result: Option<String>,
    pub error: Option<Value>,
}

/// Map a raw search response into a [`SearchResult`].
///
/// Hit order is the engine's relevance ranking and is preserved as-is.
/// Only the first highlight fragment per field is kept.
pub(crate) fn map_search_response(
    raw: SearchResponse,
    codec: &DocumentCodec,
) -> Result<SearchResult> {
    let hits = raw
        .hits
        .ok_or_else(|| TernError::malformed_response("search response has no hits section"))?;
    let total = hits
        .total
        .ok_or_else(|| TernError::malformed_response("search response lacks a total hit count"))?
        .value();

    let mut mapped = Vec::with_capacity(hits.hits.len());
    for hit in hits.hits {
        let mut document = match &hit.source {
            Some(source) => codec.document_from_value(source)?,
            None => crate::data::Document::new(),
        };
        document.id = Some(hit.id.clone());

        let highlights = hit
            .highlight
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(field, mut fragments)| {
                if fragments.is_empty() {
                    None
                } else {
                    Some((field, fragments.remove(0)))
                }
            })
            .collect();

        mapped.push(Hit {
            id: hit.id,
            score: hit.score,
            document,
            highlights,
        });
    }

    Ok(SearchResult {
        total,
        hits: mapped,
    })
}

/// Map a raw bulk response into a [`BulkResult`], preserving input order.
///
/// `expected` is the number of submitted operations; a count mismatch
/// means the response cannot be aligned with the batch.
pub(crate) fn map_bulk_response(raw: BulkResponse, expected: usize) -> Result<BulkResult> {
    if raw.items.len() != expected {
        return Err(TernError::malformed_response(format!(
            "bulk response has {} items for {} operations",
            raw.items.len(),
            expected
        )));
    }

    let mut items = Vec::with_capacity(raw.items.len());
    for (position, entry) in raw.items.into_iter().enumerate() {
        let body = entry.into_values().next().ok_or_else(|| {
            TernError::malformed_response(format!("bulk item {position} carries no action body"))
        })?;

        let outcome = if let Some(error) = &body.error {
            ItemOutcome::Failure {
                reason: error_value_reason(error),
            }
        } else if body.status >= 400 {
            ItemOutcome::Failure {
                reason: format!("engine answered status {}", body.status),
            }
        } else {
            ItemOutcome::Success {
                id: body.id,
                result: body.result.unwrap_or_default(),
            }
        };

        items.push(ItemResult { position, outcome });
    }

    Ok(BulkResult {
        has_failures: raw.errors,
        items,
    })
}

/// Extract a human-readable reason from an engine error body.
///
/// The error payload is `{"error": {"reason": ...}}` on current engines,
/// a bare string on very old ones, and occasionally absent; the raw body
/// is the fallback.
pub(crate) fn error_reason(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(error) = value.get("error") {
            return error_value_reason(error);
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error body".to_string()
    } else {
        trimmed.to_string()
    }
}

fn error_value_reason(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("reason").and_then(Value::as_str) {
            Some(reason) => match map.get("type").and_then(Value::as_str) {
                Some(kind) => format!("{kind}: {reason}"),
                None => reason.to_string(),
            },
            None => error.to_string(),
        },
        other => other.to_string(),
    }
}
