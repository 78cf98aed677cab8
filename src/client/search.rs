use std::collections::HashMap;

use serde_json::{Map, Value, json};

use crate::data::Document;
use crate::query::Query;

/// Highlight configuration for a search request.
///
/// Matched terms in the listed fields come back wrapped in the pre/post
/// tag pair. Tags set with [`tags`](Highlight::tags) apply to every
/// field; [`field_with_tags`](Highlight::field_with_tags) overrides them
/// for one field. With no tags set the engine's defaults apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlight {
    fields: Vec<HighlightField>,
    pre_tag: Option<String>,
    post_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct HighlightField {
    name: String,
    pre_tag: Option<String>,
    post_tag: Option<String>,
}

impl Highlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request highlighting for a field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(HighlightField {
            name: name.into(),
            pre_tag: None,
            post_tag: None,
        });
        self
    }

    /// Request highlighting for a field with its own tag pair.
    pub fn field_with_tags(
        mut self,
        name: impl Into<String>,
        pre: impl Into<String>,
        post: impl Into<String>,
    ) -> Self {
        self.fields.push(HighlightField {
            name: name.into(),
            pre_tag: Some(pre.into()),
            post_tag: Some(post.into()),
        });
        self
    }

    /// Set the tag pair wrapped around matched terms in every field.
    pub fn tags(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.pre_tag = Some(pre.into());
        self.post_tag = Some(post.into());
        self
    }

    /// Names of the fields highlighting was requested for.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut highlight = Map::new();
        if let Some(pre) = &self.pre_tag {
            highlight.insert("pre_tags".to_string(), json!([pre]));
        }
        if let Some(post) = &self.post_tag {
            highlight.insert("post_tags".to_string(), json!([post]));
        }

        let mut fields = Map::new();
        for field in &self.fields {
            let mut options = Map::new();
            if let Some(pre) = &field.pre_tag {
                options.insert("pre_tags".to_string(), json!([pre]));
            }
            if let Some(post) = &field.post_tag {
                options.insert("post_tags".to_string(), json!([post]));
            }
            fields.insert(field.name.clone(), Value::Object(options));
        }
        highlight.insert("fields".to_string(), Value::Object(fields));

        Value::Object(highlight)
    }
}

/// A search request: query tree, pagination window, highlighting.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// The query tree.
    pub query: Query,

    /// Number of hits to skip (pagination offset). Engine default 0.
    pub from: Option<usize>,

    /// Maximum number of hits to return. Engine default when unset.
    pub size: Option<usize>,

    /// Highlight configuration.
    pub highlight: Option<Highlight>,
}

impl SearchRequest {
    pub fn new(query: impl Into<Query>) -> Self {
        Self {
            query: query.into(),
            from: None,
            size: None,
            highlight: None,
        }
    }

    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::new()
    }

    /// Render the request body for the search endpoint.
    pub fn body_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.to_json());
        if let Some(from) = self.from {
            body.insert("from".to_string(), Value::from(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }
        if let Some(highlight) = &self.highlight {
            body.insert("highlight".to_string(), highlight.to_json());
        }
        Value::Object(body)
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::new(Query::MatchAll)
    }
}

pub struct SearchRequestBuilder {
    request: SearchRequest,
}

impl Default for SearchRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: SearchRequest::default(),
        }
    }

    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.request.query = query.into();
        self
    }

    pub fn from(mut self, from: usize) -> Self {
        self.request.from = Some(from);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.request.size = Some(size);
        self
    }

    pub fn highlight(mut self, highlight: Highlight) -> Self {
        self.request.highlight = Some(highlight);
        self
    }

    pub fn build(self) -> SearchRequest {
        self.request
    }
}

/// A single matched document.
#[derive(Debug, Clone)]
pub struct Hit {
    /// Document id.
    pub id: String,

    /// Relevance score; absent when the engine suppressed scoring.
    pub score: Option<f64>,

    /// The stored source document.
    pub document: Document,

    /// First highlighted fragment per requested field, when the
    /// highlight configuration matched.
    pub highlights: HashMap<String, String>,
}

/// Result of a search: total match count plus the returned window of
/// hits, in the engine's relevance order.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Total number of matching documents, which can exceed the number
    /// of hits returned in this window.
    pub total: u64,

    /// The returned hits, ranked by the engine.
    pub hits: Vec<Hit>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
