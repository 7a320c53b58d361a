use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::client::{SearchClient, SearchOptions};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::maintenance;
use crate::mapper::{self, MappedRecord, ResultMapper};
use crate::model::Searchable;
use crate::payload::Payload;
use crate::query::builder::SearchBuilder;
use crate::query::compiler::{self, CompileSettings, CompiledPayload};
use crate::response::SearchResponse;
use crate::store::RecordStore;

/// Search engine façade.
///
/// Compiles builders into payloads, submits them through the transport
/// client, and maps the raw results back to records. The client is injected
/// by the caller; the engine holds no process-wide state.
pub struct ElasticEngine {
    client: Arc<dyn SearchClient>,
    config: EngineConfig,
    update_mapping: AtomicBool,
    explain: AtomicBool,
    profile: AtomicBool,
}

impl ElasticEngine {
    pub fn new(client: Arc<dyn SearchClient>, config: EngineConfig) -> Self {
        let update_mapping = AtomicBool::new(config.update_mapping);
        Self {
            client,
            config,
            update_mapping,
            explain: AtomicBool::new(false),
            profile: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &Arc<dyn SearchClient> {
        &self.client
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Index each record with one transport call per record.
    ///
    /// Records with an empty searchable map are skipped. There is no
    /// batching: a failure stops the loop and leaves earlier records indexed.
    /// A pending mapping update is pushed before the first record and stays
    /// pending until a call completes.
    pub async fn update<M: Searchable>(&self, records: &[M]) -> Result<()> {
        if self.update_mapping.load(Ordering::SeqCst) {
            if let Some(record) = records.first() {
                maintenance::update_mapping(self.client.as_ref(), record).await?;
            }
        }

        for record in records {
            let fields = record.to_searchable_map();
            if fields.is_empty() {
                log::debug!(
                    "skipping {} {}: nothing to index",
                    record.searchable_as(),
                    record.key()
                );
                continue;
            }

            let payload = Payload::for_document(record)?.set("body", Value::Object(fields))?;
            self.client.index(&payload).await?;
        }

        self.update_mapping.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Remove each record's document with one transport call per record.
    pub async fn delete<M: Searchable>(&self, records: &[M]) -> Result<()> {
        for record in records {
            let payload = Payload::for_document(record)?;
            self.client.delete(&payload).await?;
        }
        Ok(())
    }

    pub async fn search(&self, builder: &SearchBuilder) -> Result<SearchResponse> {
        self.perform_search(builder, SearchOptions::default()).await
    }

    /// Search for page `page` (1-based) of `per_page` hits.
    pub async fn paginate(
        &self,
        builder: &SearchBuilder,
        per_page: usize,
        page: usize,
    ) -> Result<SearchResponse> {
        self.perform_search(builder, SearchOptions::paginate(per_page, page))
            .await
    }

    async fn perform_search(
        &self,
        builder: &SearchBuilder,
        options: SearchOptions,
    ) -> Result<SearchResponse> {
        if let Some(callback) = builder.callback() {
            log::debug!("delegating search for '{}' to callback", builder.query());
            return callback(self.client.as_ref(), builder.query(), &options).await;
        }

        let payload = self.build_payload(builder, &options);
        self.client.search(&payload, &options).await
    }

    /// Compile `builder` with this engine's settings and toggles.
    pub fn build_payload(&self, builder: &SearchBuilder, options: &SearchOptions) -> CompiledPayload {
        let settings = CompileSettings {
            debug: self.explain.load(Ordering::SeqCst),
            profile: self.profile.load(Ordering::SeqCst),
            ..CompileSettings::from_config(&self.config)
        };
        compiler::compile(builder, options, &settings)
    }

    /// Request score explanations on subsequent searches.
    ///
    /// The toggle is forwarded to the client so raw and callback searches
    /// see it too.
    pub fn explain(&self, enabled: bool) -> &Self {
        self.explain.store(enabled, Ordering::SeqCst);
        self.client.debug(enabled);
        self
    }

    /// Request query profiling on subsequent searches.
    pub fn profile(&self, enabled: bool) -> &Self {
        self.profile.store(enabled, Ordering::SeqCst);
        self.client.profile(enabled);
        self
    }

    /// Submit a caller-supplied query document scoped to `record`'s index and
    /// type, bypassing the builder and compiler.
    pub async fn search_raw<M: Searchable>(&self, record: &M, query: Value) -> Result<SearchResponse> {
        let payload = Payload::for_type(record)?.set("body", query)?;
        self.client.search_raw(&payload).await
    }

    /// Restrict mapped results to `fields`.
    pub fn set_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Map hits to their stored fields instead of hydrated records.
    pub fn set_raw_result(&mut self, raw: bool) -> &mut Self {
        self.config.raw_result = raw;
        self
    }

    pub fn get_total_count(&self, response: &SearchResponse) -> u64 {
        mapper::total_count(response)
    }

    pub fn map_ids(&self, response: &SearchResponse) -> Vec<String> {
        mapper::map_ids(response)
    }

    pub async fn map<M: Searchable + Clone>(
        &self,
        response: &SearchResponse,
        store: &dyn RecordStore<M>,
    ) -> Result<Vec<MappedRecord<M>>> {
        ResultMapper::from_config(&self.config)
            .map(response, store)
            .await
    }
}
