//! Capability a domain record must provide to be indexed and searched.

use serde_json::{Map, Value};

use crate::config::IndexConfigurator;

/// A record that can be written to and reconciled from a search index.
///
/// # Example
///
/// ```ignore
/// struct Product { id: i64, name: String }
///
/// impl Searchable for Product {
///     fn key(&self) -> Value { Value::from(self.id) }
///     fn searchable_as(&self) -> String { "products".into() }
///     fn index_configurator(&self) -> IndexConfigurator { IndexConfigurator::new("shop") }
///     fn to_searchable_map(&self) -> Map<String, Value> { ... }
/// }
/// ```
pub trait Searchable: Send + Sync {
    /// Name of the primary-key field in the backing store.
    fn key_name() -> &'static str
    where
        Self: Sized,
    {
        "id"
    }

    /// Primary-key value of this record.
    fn key(&self) -> Value;

    /// Document type (collection) the record is indexed under.
    fn searchable_as(&self) -> String;

    /// Index metadata for this record type.
    fn index_configurator(&self) -> IndexConfigurator;

    /// Fields written to the search index. An empty map means the record is
    /// not indexed.
    fn to_searchable_map(&self) -> Map<String, Value>;

    /// Type mapping pushed by [`update_mapping`](crate::maintenance::update_mapping).
    fn mapping(&self) -> Option<Value> {
        None
    }
}

/// Render a key as the string form the search engine reports in `_id`.
pub fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_key_to_string() {
        assert_eq!(key_to_string(&json!(1)), "1");
        assert_eq!(key_to_string(&json!("abc")), "abc");
        assert_eq!(key_to_string(&json!(true)), "true");
    }
}
