use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::clause::keyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive: `"asc"` is ascending, anything else descending.
    pub fn parse(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl From<&str> for SortDirection {
    fn from(direction: &str) -> Self {
        SortDirection::parse(direction)
    }
}

impl From<String> for SortDirection {
    fn from(direction: String) -> Self {
        SortDirection::parse(&direction)
    }
}

/// One key of the sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

impl SortField {
    /// `{field: "asc"|"desc"}`
    pub fn to_json(&self) -> Value {
        keyed(&self.field, Value::String(self.direction.as_str().to_string()))
    }
}
