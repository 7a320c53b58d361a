//! Wire payloads addressed to an index, a document type, or a single document.
//!
//! All three share the `{index, type?, id?, body?}` shape expected by the
//! search engine; they differ in which keys are fixed at construction and may
//! no longer be overwritten through [`Payload::set`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::IndexConfigurator;
use crate::error::{Result, ScoutError};
use crate::model::Searchable;

const INDEX_KEYS: &[&str] = &["index"];
const TYPE_KEYS: &[&str] = &["index", "type"];
const DOCUMENT_KEYS: &[&str] = &["index", "type", "id"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub index: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    #[serde(skip)]
    protected: &'static [&'static str],
}

impl Payload {
    /// Payload addressing a whole index.
    pub fn index(configurator: &IndexConfigurator) -> Result<Self> {
        if configurator.name.is_empty() {
            return Err(ScoutError::configuration(
                "index configurator must declare an index name",
            ));
        }

        Ok(Self {
            index: configurator.name.clone(),
            doc_type: None,
            id: None,
            body: None,
            protected: INDEX_KEYS,
        })
    }

    /// Payload addressing the document type a record is indexed under.
    pub fn for_type<M: Searchable>(record: &M) -> Result<Self> {
        let doc_type = record.searchable_as();
        if doc_type.is_empty() {
            return Err(ScoutError::configuration(format!(
                "the {} record must declare a searchable type",
                std::any::type_name::<M>()
            )));
        }

        let mut payload = Self::index(&record.index_configurator())?;
        payload.doc_type = Some(doc_type);
        payload.protected = TYPE_KEYS;
        Ok(payload)
    }

    /// Payload addressing a single record's document.
    pub fn for_document<M: Searchable>(record: &M) -> Result<Self> {
        let mut payload = Self::for_type(record)?;
        payload.id = Some(record.key());
        payload.protected = DOCUMENT_KEYS;
        Ok(payload)
    }

    /// Write `value` at a dotted `path` such as `"body.settings"` or `"type"`.
    ///
    /// Intermediate objects under `body` are created as needed.
    pub fn set(mut self, path: &str, value: Value) -> Result<Self> {
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or_default();

        if self.protected.contains(&head) {
            return Err(ScoutError::invalid_argument(format!(
                "the key '{head}' is protected and cannot be overwritten"
            )));
        }

        let rest: Vec<&str> = segments.collect();
        if head != "body" && !rest.is_empty() {
            return Err(ScoutError::invalid_argument(format!(
                "the key '{head}' does not hold nested values"
            )));
        }

        match head {
            "index" => self.index = expect_string(head, value)?,
            "type" => self.doc_type = Some(expect_string(head, value)?),
            "id" => self.id = Some(value),
            "body" => {
                let body = self.body.take().unwrap_or_else(|| Value::Object(Map::new()));
                self.body = Some(set_nested(body, &rest, value)?);
            }
            other => {
                return Err(ScoutError::invalid_argument(format!(
                    "unknown payload key '{other}'"
                )));
            }
        }

        Ok(self)
    }

    /// Serialize to the JSON document sent over the wire.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn expect_string(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(ScoutError::invalid_argument(format!(
            "the key '{key}' expects a string, got {other}"
        ))),
    }
}

fn set_nested(target: Value, path: &[&str], value: Value) -> Result<Value> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(value);
    };

    let mut map = match target {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ScoutError::invalid_argument(format!(
                "cannot set '{first}' inside non-object value {other}"
            )));
        }
    };

    let child = map.remove(*first).unwrap_or(Value::Null);
    map.insert((*first).to_string(), set_nested(child, rest, value)?);
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Item {
        id: i64,
        doc_type: &'static str,
    }

    impl Searchable for Item {
        fn key(&self) -> Value {
            json!(self.id)
        }

        fn searchable_as(&self) -> String {
            self.doc_type.to_string()
        }

        fn index_configurator(&self) -> IndexConfigurator {
            IndexConfigurator::new("test_index")
        }

        fn to_searchable_map(&self) -> Map<String, Value> {
            Map::new()
        }
    }

    #[test]
    fn test_document_payload_shape() {
        let item = Item {
            id: 1,
            doc_type: "test_table",
        };
        let payload = Payload::for_document(&item)
            .unwrap()
            .set("body", json!({"id": 1, "test_field": "test text"}))
            .unwrap();

        assert_eq!(
            payload.to_value().unwrap(),
            json!({
                "index": "test_index",
                "type": "test_table",
                "id": 1,
                "body": {"id": 1, "test_field": "test text"}
            })
        );
    }

    #[test]
    fn test_missing_type_is_configuration_error() {
        let item = Item { id: 1, doc_type: "" };
        let err = Payload::for_type(&item).unwrap_err();
        assert!(matches!(err, ScoutError::Configuration(_)));
    }

    #[test]
    fn test_missing_index_name_is_configuration_error() {
        let err = Payload::index(&IndexConfigurator::new("")).unwrap_err();
        assert!(matches!(err, ScoutError::Configuration(_)));
    }

    #[test]
    fn test_protected_keys() {
        let item = Item {
            id: 1,
            doc_type: "test_table",
        };
        let payload = Payload::for_document(&item).unwrap();
        assert!(payload.clone().set("id", json!(2)).is_err());
        assert!(payload.clone().set("type", json!("other")).is_err());
        assert!(payload.set("index", json!("other")).is_err());
    }

    #[test]
    fn test_index_payload_allows_type_override() {
        let payload = Payload::index(&IndexConfigurator::new("shop"))
            .unwrap()
            .set("type", json!("_default_"))
            .unwrap()
            .set("body._default_", json!({"properties": {}}))
            .unwrap();

        assert_eq!(
            payload.to_value().unwrap(),
            json!({
                "index": "shop",
                "type": "_default_",
                "body": {"_default_": {"properties": {}}}
            })
        );
    }

    #[test]
    fn test_nested_set_merges_body() {
        let payload = Payload::index(&IndexConfigurator::new("shop"))
            .unwrap()
            .set("body.settings.number_of_replicas", json!(1))
            .unwrap()
            .set("body.settings.refresh_interval", json!("1s"))
            .unwrap();

        assert_eq!(
            payload.body,
            Some(json!({"settings": {"number_of_replicas": 1, "refresh_interval": "1s"}}))
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let payload = Payload::index(&IndexConfigurator::new("shop")).unwrap();
        assert!(payload.set("routing", json!("x")).is_err());
    }
}
