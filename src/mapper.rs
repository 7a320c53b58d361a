//! Reconciliation of search hits with backing-store records.

use ahash::{AHashMap, AHashSet};
use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::{Searchable, key_to_string};
use crate::response::{Hit, SearchResponse};
use crate::store::RecordStore;

/// One mapped search result, in relevance order.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedRecord<M> {
    /// A record loaded from the backing store, with the hit's score
    /// explanation when the engine returned one.
    Hydrated {
        record: M,
        explanation: Option<Value>,
    },
    /// The hit's stored fields.
    Source(Map<String, Value>),
}

impl<M> MappedRecord<M> {
    pub fn record(&self) -> Option<&M> {
        match self {
            MappedRecord::Hydrated { record, .. } => Some(record),
            MappedRecord::Source(_) => None,
        }
    }

    pub fn source(&self) -> Option<&Map<String, Value>> {
        match self {
            MappedRecord::Source(source) => Some(source),
            MappedRecord::Hydrated { .. } => None,
        }
    }

    pub fn explanation(&self) -> Option<&Value> {
        match self {
            MappedRecord::Hydrated { explanation, .. } => explanation.as_ref(),
            MappedRecord::Source(_) => None,
        }
    }

    pub fn into_record(self) -> Option<M> {
        match self {
            MappedRecord::Hydrated { record, .. } => Some(record),
            MappedRecord::Source(_) => None,
        }
    }
}

/// Total hit count reported by the engine.
pub fn total_count(response: &SearchResponse) -> u64 {
    response.hits.total.value()
}

/// Hit ids in result order.
pub fn map_ids(response: &SearchResponse) -> Vec<String> {
    response.hits.hits.iter().map(|hit| hit.id.clone()).collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMapper {
    raw_result: bool,
    fields: Option<Vec<String>>,
}

impl ResultMapper {
    pub fn new(raw_result: bool, fields: Option<Vec<String>>) -> Self {
        Self { raw_result, fields }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.raw_result, config.fields.clone())
    }

    /// Map `response` to records, preserving hit order.
    ///
    /// A zero total short-circuits to an empty result. In raw mode the hits'
    /// stored fields are returned without touching `store`; otherwise `store`
    /// is queried exactly once and hits without a record are dropped. A hit
    /// repeated in the response yields its record once per occurrence.
    pub async fn map<M>(
        &self,
        response: &SearchResponse,
        store: &dyn RecordStore<M>,
    ) -> Result<Vec<MappedRecord<M>>>
    where
        M: Searchable + Clone,
    {
        if total_count(response) == 0 {
            return Ok(Vec::new());
        }

        if self.raw_result {
            return Ok(response
                .hits
                .hits
                .iter()
                .map(|hit| MappedRecord::Source(self.filter_source(hit)))
                .collect());
        }

        let key_name = M::key_name();
        let ids = unique_ids(response);
        let columns = self.columns(key_name);

        let records = store
            .find_by_keys(key_name, &ids, columns.as_deref())
            .await?;

        let by_key: AHashMap<String, M> = records
            .into_iter()
            .map(|record| (key_to_string(&record.key()), record))
            .collect();

        let mut mapped = Vec::with_capacity(response.hits.hits.len());
        for hit in &response.hits.hits {
            match by_key.get(&hit.id) {
                Some(record) => mapped.push(MappedRecord::Hydrated {
                    record: record.clone(),
                    explanation: hit.explanation().cloned(),
                }),
                None => log::warn!(
                    "dropping hit '{}' from {}: no matching record in the backing store",
                    hit.id,
                    hit.index
                ),
            }
        }

        Ok(mapped)
    }

    fn filter_source(&self, hit: &Hit) -> Map<String, Value> {
        match &self.fields {
            Some(fields) if !fields.is_empty() => hit
                .source
                .iter()
                .filter(|(key, _)| fields.contains(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            _ => hit.source.clone(),
        }
    }

    /// Projection for the store fetch: the allowlist plus the key, deduplicated.
    fn columns(&self, key_name: &str) -> Option<Vec<String>> {
        let fields = self.fields.as_ref().filter(|fields| !fields.is_empty())?;

        let mut seen = AHashSet::new();
        let columns = fields
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(key_name))
            .filter(|column| seen.insert(*column))
            .map(str::to_string)
            .collect();
        Some(columns)
    }
}

fn unique_ids(response: &SearchResponse) -> Vec<String> {
    let mut seen = AHashSet::new();
    response
        .hits
        .hits
        .iter()
        .filter(|hit| seen.insert(hit.id.as_str()))
        .map(|hit| hit.id.clone())
        .collect()
}
