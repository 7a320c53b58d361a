//! Translation of builder state into the wire-ready search payload.
//!
//! The compiled query always has the shape
//!
//! ```json
//! {
//!   "bool": {
//!     "must": { "match": { "_all": "phone" } },
//!     "filter": { "bool": { "must": [...], "must_not": [...] } }
//!   }
//! }
//! ```
//!
//! with `match_all` standing in for an empty free-text query and `filter`
//! omitted when no clause was added. A registered strategy replaces the whole
//! `bool` body instead.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::SearchOptions;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::query::builder::{SearchBuilder, Strategy};
use crate::query::clause::{ClauseBucket, keyed};

/// Engine-level inputs to compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileSettings {
    /// Composite field matched by the free-text query.
    pub default_field: String,
    pub debug: bool,
    pub profile: bool,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            default_field: "_all".to_string(),
            debug: false,
            profile: false,
        }
    }
}

impl CompileSettings {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            default_field: config.default_field.clone(),
            ..Default::default()
        }
    }
}

/// How the `bool` body of a query is produced, resolved once per compile.
pub enum Compilation<'a> {
    /// Free-text clause plus the accumulated filter buckets.
    Default {
        query: &'a str,
        clauses: &'a ClauseBucket,
    },
    /// The last registered strategy.
    Custom(&'a Strategy),
}

impl<'a> Compilation<'a> {
    pub fn resolve(builder: &'a SearchBuilder) -> Self {
        match builder.strategies().last() {
            Some(strategy) => Compilation::Custom(strategy),
            None => Compilation::Default {
                query: builder.query(),
                clauses: builder.clauses(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBody {
    pub query: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,
}

/// A finalized search request.
///
/// `debug` and `profile` are engine toggles carried next to the body for the
/// transport client; they are not serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledPayload {
    pub index: String,

    #[serde(rename = "type")]
    pub doc_type: String,

    pub body: SearchBody,

    #[serde(skip)]
    pub debug: bool,

    #[serde(skip)]
    pub profile: bool,
}

impl CompiledPayload {
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Compile `builder` into a payload. Pure: identical input yields an identical
/// payload.
pub fn compile(
    builder: &SearchBuilder,
    options: &SearchOptions,
    settings: &CompileSettings,
) -> CompiledPayload {
    let bool_body = match Compilation::resolve(builder) {
        Compilation::Custom(strategy) => strategy(builder),
        Compilation::Default { query, clauses } => {
            default_bool_body(query, clauses, &settings.default_field)
        }
    };

    let sort = if builder.sort().is_empty() {
        None
    } else {
        Some(builder.sort().iter().map(|s| s.to_json()).collect())
    };

    let size = options.limit.or(builder.limit());
    let from = match options.page {
        Some(page) => size.map(|size| page.saturating_sub(1).saturating_mul(size)),
        None => builder.get_offset(),
    };

    let target = builder.target();
    let payload = CompiledPayload {
        index: target.index.clone(),
        doc_type: target.doc_type.clone(),
        body: SearchBody {
            query: keyed("bool", bool_body),
            sort,
            size,
            from,
        },
        debug: settings.debug || builder.is_debug(),
        profile: settings.profile || builder.is_profile(),
    };

    log::debug!(
        "compiled search on {}/{}: {:?}",
        payload.index,
        payload.doc_type,
        payload.body
    );
    payload
}

fn default_bool_body(query: &str, clauses: &ClauseBucket, default_field: &str) -> Value {
    let base = if query.is_empty() {
        keyed("match_all", Value::Object(Map::new()))
    } else {
        keyed("match", keyed(default_field, Value::String(query.to_string())))
    };

    let mut body = Map::new();
    body.insert("must".to_string(), base);
    if let Some(filter) = clauses.to_json() {
        body.insert("filter".to_string(), filter);
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::builder::SearchTarget;

    fn builder(query: &str) -> SearchBuilder {
        SearchBuilder::new(SearchTarget::new("test_index", "test_table"), query)
    }

    fn compile_default(builder: &SearchBuilder) -> Value {
        compile(builder, &SearchOptions::default(), &CompileSettings::default())
            .to_value()
            .unwrap()
    }

    #[test]
    fn test_empty_query_is_match_all() {
        assert_eq!(
            compile_default(&builder("")),
            json!({
                "index": "test_index",
                "type": "test_table",
                "body": {"query": {"bool": {"must": {"match_all": {}}}}}
            })
        );
    }

    #[test]
    fn test_free_text_uses_default_field() {
        let settings = CompileSettings {
            default_field: "content".into(),
            ..Default::default()
        };
        let payload = compile(&builder("test query"), &SearchOptions::default(), &settings);
        assert_eq!(
            payload.body.query,
            json!({"bool": {"must": {"match": {"content": "test query"}}}})
        );
    }

    #[test]
    fn test_filters_nest_under_bool_filter() {
        let payload = builder("phone")
            .filter("brand", "apple")
            .filter_op("used", "<>", "yes")
            .build();

        assert_eq!(
            payload.body.query,
            json!({
                "bool": {
                    "must": {"match": {"_all": "phone"}},
                    "filter": {
                        "bool": {
                            "must": [{"term": {"brand": "apple"}}],
                            "must_not": [{"term": {"used": "yes"}}]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_last_strategy_replaces_everything() {
        let payload = builder("John")
            .filter("brand", "apple")
            .with_strategy(|_| json!({"must": {"match_all": {}}}))
            .with_strategy(|b| json!({"must": {"match": {"name": b.query()}}}))
            .build();

        assert_eq!(
            payload.body.query,
            json!({"bool": {"must": {"match": {"name": "John"}}}})
        );
    }

    #[test]
    fn test_window_from_builder() {
        let payload = builder("q").take(10).build();
        assert_eq!(payload.body.size, Some(10));
        assert_eq!(payload.body.from, None);

        let payload = builder("q").take(10).offset(20).build();
        assert_eq!(payload.body.from, Some(20));
    }

    #[test]
    fn test_window_from_page_options() {
        let options = SearchOptions::paginate(8, 2);
        let payload = compile(&builder("q").offset(99), &options, &CompileSettings::default());
        assert_eq!(payload.body.size, Some(8));
        assert_eq!(payload.body.from, Some(8));

        let first = compile(&builder("q"), &SearchOptions::paginate(8, 1), &CompileSettings::default());
        assert_eq!(first.body.from, Some(0));

        let zero = compile(&builder("q"), &SearchOptions::paginate(8, 0), &CompileSettings::default());
        assert_eq!(zero.body.from, Some(0));
    }

    #[test]
    fn test_window_offset_saturates() {
        let options = SearchOptions::paginate(usize::MAX / 2, 4);
        let payload = compile(&builder("q"), &options, &CompileSettings::default());
        assert_eq!(payload.body.size, Some(usize::MAX / 2));
        assert_eq!(payload.body.from, Some(usize::MAX));
    }

    #[test]
    fn test_sort_array_in_insertion_order() {
        let payload = builder("q").sort_by("name", "asc").sort_by("price", "desc").build();
        assert_eq!(
            payload.body.sort,
            Some(vec![json!({"name": "asc"}), json!({"price": "desc"})])
        );
    }

    #[test]
    fn test_flags_are_not_serialized() {
        let settings = CompileSettings {
            debug: true,
            ..Default::default()
        };
        let payload = compile(&builder("q").set_profile(true), &SearchOptions::default(), &settings);
        assert!(payload.debug);
        assert!(payload.profile);

        let wire = payload.to_value().unwrap();
        assert!(wire.get("debug").is_none());
        assert!(wire.get("profile").is_none());
        assert!(wire["body"].get("explain").is_none());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let builder = builder("phone")
            .filter_in("id", [1, 2])
            .filter_exists("sale")
            .sort_by("name", "asc");
        assert_eq!(builder.build(), builder.build());
    }
}
