//! Backing-store capability used to hydrate search hits.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

/// Source of the full records behind indexed documents.
#[async_trait]
pub trait RecordStore<M: Send>: Send + Sync {
    /// Fetch every record whose `key_name` value is one of `keys`.
    ///
    /// `columns`, when given, limits the fetched fields; it always contains
    /// `key_name`. Records may come back in any order, and keys with no
    /// record are simply absent.
    async fn find_by_keys(
        &self,
        key_name: &str,
        keys: &[String],
        columns: Option<&[String]>,
    ) -> Result<Vec<M>>;
}
