//! In-memory [`RecordStore`] over a fixed set of records.

use ahash::AHashSet;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::model::{Searchable, key_to_string};
use crate::store::RecordStore;

/// Arguments of one `find_by_keys` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub key_name: String,
    pub keys: Vec<String>,
    pub columns: Option<Vec<String>>,
}

/// Returns clones of held records in insertion order, regardless of the
/// order keys were requested in.
#[derive(Debug)]
pub struct MemoryRecordStore<M> {
    records: Vec<M>,
    fetches: Mutex<Vec<FetchRequest>>,
}

impl<M> MemoryRecordStore<M> {
    pub fn new(records: Vec<M>) -> Self {
        Self {
            records,
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn fetches(&self) -> Vec<FetchRequest> {
        self.fetches.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }
}

#[async_trait]
impl<M> RecordStore<M> for MemoryRecordStore<M>
where
    M: Searchable + Clone,
{
    async fn find_by_keys(
        &self,
        key_name: &str,
        keys: &[String],
        columns: Option<&[String]>,
    ) -> Result<Vec<M>> {
        self.fetches.lock().push(FetchRequest {
            key_name: key_name.to_string(),
            keys: keys.to_vec(),
            columns: columns.map(<[String]>::to_vec),
        });

        let wanted: AHashSet<&str> = keys.iter().map(String::as_str).collect();
        Ok(self
            .records
            .iter()
            .filter(|record| wanted.contains(key_to_string(&record.key()).as_str()))
            .cloned()
            .collect())
    }
}
