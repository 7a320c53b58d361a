//! In-memory [`SearchClient`] that records every call.
//!
//! Searches answer with a configurable canned response. Individual operations
//! can be made to fail, which is how partial-failure paths are exercised.

use std::sync::atomic::{AtomicBool, Ordering};

use ahash::AHashSet;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{SearchClient, SearchOptions};
use crate::error::{Result, ScoutError};
use crate::payload::Payload;
use crate::query::compiler::CompiledPayload;
use crate::response::SearchResponse;

/// A call received by [`MemoryClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    Index(Payload),
    Delete(Payload),
    Search {
        payload: CompiledPayload,
        options: SearchOptions,
    },
    SearchRaw(Payload),
    Exists(Payload),
    Close(Payload),
    Open(Payload),
    PutSettings(Payload),
    PutMapping(Payload),
}

impl ClientCall {
    /// Operation name, as accepted by [`MemoryClient::fail_on`].
    pub fn name(&self) -> &'static str {
        match self {
            ClientCall::Index(_) => "index",
            ClientCall::Delete(_) => "delete",
            ClientCall::Search { .. } => "search",
            ClientCall::SearchRaw(_) => "search_raw",
            ClientCall::Exists(_) => "exists",
            ClientCall::Close(_) => "close",
            ClientCall::Open(_) => "open",
            ClientCall::PutSettings(_) => "put_settings",
            ClientCall::PutMapping(_) => "put_mapping",
        }
    }
}

#[derive(Debug)]
pub struct MemoryClient {
    calls: Mutex<Vec<ClientCall>>,
    response: Mutex<SearchResponse>,
    failures: Mutex<AHashSet<&'static str>>,
    index_exists: AtomicBool,
    debug: AtomicBool,
    profile: AtomicBool,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Mutex::new(SearchResponse::default()),
            failures: Mutex::new(AHashSet::new()),
            index_exists: AtomicBool::new(true),
            debug: AtomicBool::new(false),
            profile: AtomicBool::new(false),
        }
    }

    /// Answer every search with `response`.
    pub fn with_response(self, response: SearchResponse) -> Self {
        *self.response.lock() = response;
        self
    }

    /// Report every index as missing from `exists`.
    pub fn without_index(self) -> Self {
        self.index_exists.store(false, Ordering::SeqCst);
        self
    }

    /// Make the named operation fail with a transport error. The call is
    /// still recorded.
    pub fn fail_on(&self, operation: &'static str) {
        self.failures.lock().insert(operation);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().clone()
    }

    /// Names of all calls received so far, in order.
    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(ClientCall::name).collect()
    }

    /// Whether score explanations are currently requested.
    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::SeqCst)
    }

    pub fn is_profile(&self) -> bool {
        self.profile.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: ClientCall) -> Result<()> {
        let name = call.name();
        self.calls.lock().push(call);
        if self.failures.lock().contains(name) {
            return Err(ScoutError::transport(format!("{name} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchClient for MemoryClient {
    async fn index(&self, payload: &Payload) -> Result<()> {
        self.record(ClientCall::Index(payload.clone()))
    }

    async fn delete(&self, payload: &Payload) -> Result<()> {
        self.record(ClientCall::Delete(payload.clone()))
    }

    async fn search(
        &self,
        payload: &CompiledPayload,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        self.record(ClientCall::Search {
            payload: payload.clone(),
            options: *options,
        })?;
        Ok(self.response.lock().clone())
    }

    async fn search_raw(&self, payload: &Payload) -> Result<SearchResponse> {
        self.record(ClientCall::SearchRaw(payload.clone()))?;
        Ok(self.response.lock().clone())
    }

    fn debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::SeqCst);
    }

    fn profile(&self, enabled: bool) {
        self.profile.store(enabled, Ordering::SeqCst);
    }

    async fn exists(&self, payload: &Payload) -> Result<bool> {
        self.record(ClientCall::Exists(payload.clone()))?;
        Ok(self.index_exists.load(Ordering::SeqCst))
    }

    async fn close(&self, payload: &Payload) -> Result<()> {
        self.record(ClientCall::Close(payload.clone()))
    }

    async fn open(&self, payload: &Payload) -> Result<()> {
        self.record(ClientCall::Open(payload.clone()))
    }

    async fn put_settings(&self, payload: &Payload) -> Result<()> {
        self.record(ClientCall::PutSettings(payload.clone()))
    }

    async fn put_mapping(&self, payload: &Payload) -> Result<()> {
        self.record(ClientCall::PutMapping(payload.clone()))
    }
}
