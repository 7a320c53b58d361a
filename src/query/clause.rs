//! Filter clauses and the buckets they are collected into.

use serde::Serialize;
use serde_json::{Map, Value};

/// Bounds of a range clause. Unset bounds are omitted from the wire form.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<Value>,
}

impl RangeBounds {
    pub fn gt(value: Value) -> Self {
        Self {
            gt: Some(value),
            ..Default::default()
        }
    }

    pub fn gte(value: Value) -> Self {
        Self {
            gte: Some(value),
            ..Default::default()
        }
    }

    pub fn lt(value: Value) -> Self {
        Self {
            lt: Some(value),
            ..Default::default()
        }
    }

    pub fn lte(value: Value) -> Self {
        Self {
            lte: Some(value),
            ..Default::default()
        }
    }

    /// Set bounds as a `{gt, gte, lt, lte}` object, unset ones omitted.
    pub fn to_json(&self) -> Value {
        let bounds = [
            ("gt", &self.gt),
            ("gte", &self.gte),
            ("lt", &self.lt),
            ("lte", &self.lte),
        ];

        let mut map = Map::new();
        for (key, bound) in bounds {
            if let Some(value) = bound {
                map.insert(key.to_string(), value.clone());
            }
        }
        Value::Object(map)
    }

    /// Inclusive `[lo, hi]` bounds. `lo > hi` is passed through unchanged.
    pub fn between(lo: Value, hi: Value) -> Self {
        Self {
            gte: Some(lo),
            lte: Some(hi),
            ..Default::default()
        }
    }
}

/// A single structured filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Exact value match.
    Term { field: String, value: Value },
    /// Match any value of a set.
    Terms { field: String, values: Vec<Value> },
    /// Bounded comparison.
    Range { field: String, bounds: RangeBounds },
    /// Field has a non-null value.
    Exists { field: String },
    /// Regular expression match with engine flags (e.g. `ALL`).
    Regexp {
        field: String,
        pattern: String,
        flags: String,
    },
}

impl FilterClause {
    pub fn field(&self) -> &str {
        match self {
            FilterClause::Term { field, .. }
            | FilterClause::Terms { field, .. }
            | FilterClause::Range { field, .. }
            | FilterClause::Exists { field }
            | FilterClause::Regexp { field, .. } => field,
        }
    }

    /// Query DSL form of this clause.
    pub fn to_json(&self) -> Value {
        match self {
            FilterClause::Term { field, value } => keyed("term", keyed(field, value.clone())),
            FilterClause::Terms { field, values } => {
                keyed("terms", keyed(field, Value::Array(values.clone())))
            }
            FilterClause::Range { field, bounds } => {
                keyed("range", keyed(field, bounds.to_json()))
            }
            FilterClause::Exists { field } => {
                keyed("exists", keyed("field", Value::String(field.clone())))
            }
            FilterClause::Regexp {
                field,
                pattern,
                flags,
            } => {
                let mut options = Map::new();
                options.insert("value".to_string(), Value::String(pattern.clone()));
                options.insert("flags".to_string(), Value::String(flags.clone()));
                keyed("regexp", keyed(field, Value::Object(options)))
            }
        }
    }
}

/// Which side of the boolean filter a clause lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    Must,
    MustNot,
}

/// Positive and negative filter clauses in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseBucket {
    must: Vec<FilterClause>,
    must_not: Vec<FilterClause>,
}

impl ClauseBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, occur: Occur, clause: FilterClause) {
        match occur {
            Occur::Must => self.must.push(clause),
            Occur::MustNot => self.must_not.push(clause),
        }
    }

    pub fn must(&self) -> &[FilterClause] {
        &self.must
    }

    pub fn must_not(&self) -> &[FilterClause] {
        &self.must_not
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty()
    }

    pub fn len(&self) -> usize {
        self.must.len() + self.must_not.len()
    }

    /// `{bool: {must: [...], must_not: [...]}}`, omitting empty sides.
    /// Returns `None` when both sides are empty.
    pub fn to_json(&self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }

        let mut inner = Map::new();
        if !self.must.is_empty() {
            inner.insert("must".to_string(), clauses_to_json(&self.must));
        }
        if !self.must_not.is_empty() {
            inner.insert("must_not".to_string(), clauses_to_json(&self.must_not));
        }
        Some(keyed("bool", Value::Object(inner)))
    }
}

fn clauses_to_json(clauses: &[FilterClause]) -> Value {
    Value::Array(clauses.iter().map(FilterClause::to_json).collect())
}

/// `{key: value}`
pub(crate) fn keyed(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}
