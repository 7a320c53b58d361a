//! Transport client capability consumed by the engine.
//!
//! The crate never speaks HTTP itself; an implementation of [`SearchClient`]
//! wraps whatever driver the application uses. Errors it returns reach the
//! caller unchanged.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::payload::Payload;
use crate::query::compiler::CompiledPayload;
use crate::response::SearchResponse;

/// Pagination options passed alongside a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

impl SearchOptions {
    /// `per_page` hits starting at 1-based `page`.
    pub fn paginate(per_page: usize, page: usize) -> Self {
        Self {
            limit: Some(per_page),
            page: Some(page),
        }
    }
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Index (create or replace) a single document.
    async fn index(&self, payload: &Payload) -> Result<()>;

    /// Remove a single document.
    async fn delete(&self, payload: &Payload) -> Result<()>;

    /// Execute a compiled search.
    async fn search(
        &self,
        payload: &CompiledPayload,
        options: &SearchOptions,
    ) -> Result<SearchResponse>;

    /// Execute a caller-supplied query document scoped to an index and type.
    async fn search_raw(&self, payload: &Payload) -> Result<SearchResponse>;

    /// Toggle score explanations on searches issued through this client.
    fn debug(&self, enabled: bool);

    /// Toggle query profiling on searches issued through this client.
    fn profile(&self, enabled: bool);

    // Index administration.

    async fn exists(&self, payload: &Payload) -> Result<bool>;

    async fn close(&self, payload: &Payload) -> Result<()>;

    async fn open(&self, payload: &Payload) -> Result<()>;

    async fn put_settings(&self, payload: &Payload) -> Result<()>;

    async fn put_mapping(&self, payload: &Payload) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_serialize_only_set_keys() {
        let options = SearchOptions::paginate(8, 2);
        assert_eq!(
            serde_json::to_value(options).unwrap(),
            serde_json::json!({"limit": 8, "page": 2})
        );
        assert_eq!(
            serde_json::to_value(SearchOptions::default()).unwrap(),
            serde_json::json!({})
        );
    }
}
