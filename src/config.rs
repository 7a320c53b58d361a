use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

fn default_field() -> String {
    "_all".to_string()
}

/// Configuration for the search engine façade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Composite field that free-text queries are matched against.
    #[serde(default = "default_field")]
    pub default_field: String,

    /// Map hits to their stored `_source` fields instead of hydrating
    /// records from the backing store.
    pub raw_result: bool,

    /// Field allowlist applied when mapping results.
    /// `None` means every field.
    pub fields: Option<Vec<String>>,

    /// Push the index mapping before the next `update` call.
    pub update_mapping: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_field: default_field(),
            raw_result: false,
            fields: None,
            update_mapping: false,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn default_field(mut self, field: impl Into<String>) -> Self {
        self.config.default_field = field.into();
        self
    }

    pub fn raw_result(mut self, raw: bool) -> Self {
        self.config.raw_result = raw;
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn update_mapping(mut self, update: bool) -> Self {
        self.config.update_mapping = update;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// Index metadata attached to a searchable record type.
///
/// Settings and the default mapping are opaque JSON documents handed to the
/// search engine as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IndexConfigurator {
    /// Name of the index on the search engine.
    pub name: String,

    #[serde(default)]
    pub settings: Option<Value>,

    #[serde(default)]
    pub default_mapping: Option<Value>,
}

impl IndexConfigurator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: None,
            default_mapping: None,
        }
    }

    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_default_mapping(mut self, mapping: Value) -> Self {
        self.default_mapping = Some(mapping);
        self
    }

    /// Parse an index configurator from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
