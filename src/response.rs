//! Raw search results as returned by the transport client.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::model::key_to_string;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,

    #[serde(default)]
    pub timed_out: bool,

    #[serde(default)]
    pub hits: Hits,

    /// Per-shard timing breakdown, present when profiling was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Value>,
}

impl SearchResponse {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Build a response holding `hits`, with the total set to their count.
    pub fn with_hits(hits: Vec<Hit>) -> Self {
        Self {
            hits: Hits {
                total: TotalHits::Count(hits.len() as u64),
                max_score: None,
                hits,
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: TotalHits,

    #[serde(default)]
    pub max_score: Option<f64>,

    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Reported hit count: a bare integer on older engines, an object with a
/// relation (`eq` / `gte`) on newer ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(count) => *count,
            TotalHits::Object { value, .. } => *value,
        }
    }
}

impl Default for TotalHits {
    fn default() -> Self {
        TotalHits::Count(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index", default)]
    pub index: String,

    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    #[serde(rename = "_id", deserialize_with = "id_as_string")]
    pub id: String,

    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,

    #[serde(rename = "_explanation", default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Value>,
}

impl Hit {
    pub fn new(id: impl Into<String>, source: Map<String, Value>) -> Self {
        Self {
            index: String::new(),
            doc_type: None,
            id: id.into(),
            score: None,
            source,
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: Value) -> Self {
        self.explanation = Some(explanation);
        self
    }

    /// The explanation, if the engine attached a non-empty one.
    pub fn explanation(&self) -> Option<&Value> {
        self.explanation.as_ref().filter(|e| match e {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        })
    }
}

fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(key_to_string(&value))
}
