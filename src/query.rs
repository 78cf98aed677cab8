//! Compound query construction for the engine's query DSL.
//!
//! Queries are immutable trees built from per-type constructors and
//! rendered with [`Query::to_json`]. Composition is purely structural;
//! nothing is validated against a live schema.

use serde_json::{Map, Value, json};

use crate::data::FieldValue;

/// Term-combination operator for a match query.
///
/// The engine defaults to `Or`; `And` requires every analyzed term to
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Or,
    And,
}

/// A full-text match query against a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    field: String,
    text: String,
    operator: Option<Operator>,
}

impl MatchQuery {
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
            operator: None,
        }
    }

    /// Require `And` to match every term instead of any.
    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }
}

/// A full-text match query across several fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchQuery {
    text: String,
    fields: Vec<String>,
}

impl MultiMatchQuery {
    pub fn new<I, S>(text: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// A range query over a single field, with optional inclusive bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    field: String,
    gte: Option<FieldValue>,
    lte: Option<FieldValue>,
}

impl RangeQuery {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            gte: None,
            lte: None,
        }
    }

    /// Lower bound, inclusive.
    pub fn gte(mut self, value: impl Into<FieldValue>) -> Self {
        self.gte = Some(value.into());
        self
    }

    /// Upper bound, inclusive.
    pub fn lte(mut self, value: impl Into<FieldValue>) -> Self {
        self.lte = Some(value.into());
        self
    }
}

/// A boolean query combining sub-queries.
///
/// `must` clauses score; `filter` clauses constrain without scoring.
/// With both lists empty the query matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    must: Vec<Query>,
    filter: Vec<Query>,
}

impl BoolQuery {
    /// Create a new empty boolean query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a MUST clause.
    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into());
        self
    }

    /// Add a FILTER clause (matches like must but does not affect scoring).
    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.filter.push(query.into());
        self
    }
}

/// A query tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches every document.
    MatchAll,
    Match(MatchQuery),
    MultiMatch(MultiMatchQuery),
    Range(RangeQuery),
    Bool(BoolQuery),
}

impl Query {
    /// Render this query as the engine's DSL tree.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Match(m) => {
                let clause = match m.operator {
                    None => Value::String(m.text.clone()),
                    Some(op) => {
                        let operator = match op {
                            Operator::Or => "or",
                            Operator::And => "and",
                        };
                        json!({ "query": &m.text, "operator": operator })
                    }
                };
                let mut field = Map::new();
                field.insert(m.field.clone(), clause);
                json!({ "match": field })
            }
            Query::MultiMatch(m) => {
                json!({ "multi_match": { "query": &m.text, "fields": &m.fields } })
            }
            Query::Range(r) => {
                let mut bounds = Map::new();
                if let Some(gte) = &r.gte {
                    bounds.insert("gte".to_string(), bound_value(gte));
                }
                if let Some(lte) = &r.lte {
                    bounds.insert("lte".to_string(), bound_value(lte));
                }
                let mut field = Map::new();
                field.insert(r.field.clone(), Value::Object(bounds));
                json!({ "range": field })
            }
            Query::Bool(b) => {
                // An empty bool constrains nothing; collapse to match-all
                // so the wire form says what it means.
                if b.must.is_empty() && b.filter.is_empty() {
                    return Query::MatchAll.to_json();
                }
                let mut clauses = Map::new();
                if !b.must.is_empty() {
                    clauses.insert(
                        "must".to_string(),
                        Value::Array(b.must.iter().map(Query::to_json).collect()),
                    );
                }
                if !b.filter.is_empty() {
                    clauses.insert(
                        "filter".to_string(),
                        Value::Array(b.filter.iter().map(Query::to_json).collect()),
                    );
                }
                json!({ "bool": clauses })
            }
        }
    }
}

impl From<MatchQuery> for Query {
    fn from(q: MatchQuery) -> Self {
        Query::Match(q)
    }
}

impl From<MultiMatchQuery> for Query {
    fn from(q: MultiMatchQuery) -> Self {
        Query::MultiMatch(q)
    }
}

impl From<RangeQuery> for Query {
    fn from(q: RangeQuery) -> Self {
        Query::Range(q)
    }
}

impl From<BoolQuery> for Query {
    fn from(q: BoolQuery) -> Self {
        Query::Bool(q)
    }
}

fn bound_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::Integer(i) => Value::from(*i),
        FieldValue::Float(f) => Value::from(*f),
        FieldValue::String(s) => Value::String(s.clone()),
        FieldValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
    }
}
