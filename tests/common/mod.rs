#![allow(dead_code)]

use serde_json::{Map, Value, json};

use elastic_scout::{Hit, IndexConfigurator, SearchResponse, Searchable, TotalHits};

/// A record indexed as `test_index/test_table`.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub test_field: String,
}

impl Product {
    pub fn new(id: i64, test_field: &str) -> Self {
        Self {
            id,
            test_field: test_field.to_string(),
        }
    }
}

impl Searchable for Product {
    fn key(&self) -> Value {
        json!(self.id)
    }

    fn searchable_as(&self) -> String {
        "test_table".to_string()
    }

    fn index_configurator(&self) -> IndexConfigurator {
        IndexConfigurator::new("test_index")
    }

    fn to_searchable_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if self.test_field.is_empty() {
            return map;
        }
        map.insert("id".to_string(), json!(self.id));
        map.insert("test_field".to_string(), json!(self.test_field));
        map
    }

    fn mapping(&self) -> Option<Value> {
        Some(json!({"properties": {"test_field": {"type": "text"}}}))
    }
}

/// Response with hits `1` and `3`, in that order.
pub fn two_hit_response() -> SearchResponse {
    SearchResponse::from_value(json!({
        "took": 2,
        "timed_out": false,
        "_shards": {"total": 5, "successful": 5, "failed": 0},
        "hits": {
            "total": 2,
            "max_score": 2.3862944,
            "hits": [
                {
                    "_index": "test_index",
                    "_type": "test_table",
                    "_id": "1",
                    "_score": 2.3862944,
                    "_source": {"id": 1, "test_field": "the first item content"}
                },
                {
                    "_index": "test_index",
                    "_type": "test_table",
                    "_id": "3",
                    "_score": 2.3862944,
                    "_source": {"id": 3, "test_field": "the second item content"}
                }
            ]
        }
    }))
    .unwrap()
}

pub fn empty_response() -> SearchResponse {
    let mut response = SearchResponse::default();
    response.hits.total = TotalHits::Count(0);
    response
}

pub fn hit_with_source(id: &str, source: Value) -> Hit {
    let source = match source {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Hit::new(id, source)
}
