//! # elastic-scout
//!
//! Fluent Elasticsearch query construction and result mapping for Rust.
//!
//! ## Features
//!
//! - Typed filter predicates compiled into the `bool` query DSL
//! - Full-query override strategies and raw search callbacks
//! - Pluggable transport client and backing record store
//! - Hydration of hits into records in relevance order
//! - Index settings and mapping maintenance

pub mod client;
pub mod config;
mod engine;
mod error;
pub mod maintenance;
pub mod mapper;
pub mod model;
pub mod payload;
pub mod query;
pub mod response;
pub mod store;

// Re-exports for the public API
pub use client::memory::{ClientCall, MemoryClient};
pub use client::{SearchClient, SearchOptions};
pub use config::{EngineConfig, IndexConfigurator};
pub use engine::ElasticEngine;
pub use error::{Result, ScoutError};
pub use mapper::{MappedRecord, ResultMapper};
pub use model::Searchable;
pub use payload::Payload;
pub use query::{
    CompiledPayload, FilterClause, FilterOperator, SearchBuilder, SearchTarget, SortDirection,
};
pub use response::{Hit, SearchResponse, TotalHits};
pub use store::RecordStore;
pub use store::memory::MemoryRecordStore;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
