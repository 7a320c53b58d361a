use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ScoutError;
use crate::query::clause::{FilterClause, Occur, RangeBounds};

/// Comparison operator accepted by [`SearchBuilder::filter_with`](super::SearchBuilder::filter_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `!=` or `<>`
    Ne,
}

impl FilterOperator {
    /// Clause and bucket this operator produces for `field` and `value`.
    pub fn to_clause(self, field: String, value: Value) -> (Occur, FilterClause) {
        match self {
            FilterOperator::Eq => (Occur::Must, FilterClause::Term { field, value }),
            FilterOperator::Ne => (Occur::MustNot, FilterClause::Term { field, value }),
            FilterOperator::Gt => range(field, RangeBounds::gt(value)),
            FilterOperator::Lt => range(field, RangeBounds::lt(value)),
            FilterOperator::Gte => range(field, RangeBounds::gte(value)),
            FilterOperator::Lte => range(field, RangeBounds::lte(value)),
        }
    }
}

fn range(field: String, bounds: RangeBounds) -> (Occur, FilterClause) {
    (Occur::Must, FilterClause::Range { field, bounds })
}

impl FromStr for FilterOperator {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(FilterOperator::Eq),
            ">" => Ok(FilterOperator::Gt),
            "<" => Ok(FilterOperator::Lt),
            ">=" => Ok(FilterOperator::Gte),
            "<=" => Ok(FilterOperator::Lte),
            "!=" | "<>" => Ok(FilterOperator::Ne),
            other => Err(ScoutError::invalid_argument(format!(
                "unsupported filter operator '{other}'"
            ))),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            FilterOperator::Eq => "=",
            FilterOperator::Gt => ">",
            FilterOperator::Lt => "<",
            FilterOperator::Gte => ">=",
            FilterOperator::Lte => "<=",
            FilterOperator::Ne => "!=",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_all_operators() {
        let cases = [
            ("=", FilterOperator::Eq),
            (">", FilterOperator::Gt),
            ("<", FilterOperator::Lt),
            (">=", FilterOperator::Gte),
            ("<=", FilterOperator::Lte),
            ("!=", FilterOperator::Ne),
            ("<>", FilterOperator::Ne),
        ];
        for (symbol, expected) in cases {
            assert_eq!(symbol.parse::<FilterOperator>().unwrap(), expected);
        }
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        assert!("like".parse::<FilterOperator>().is_err());
        assert!("==".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn test_not_equal_lands_in_must_not() {
        let (occur, clause) = FilterOperator::Ne.to_clause("used".into(), json!("yes"));
        assert_eq!(occur, Occur::MustNot);
        assert_eq!(clause.to_json(), json!({"term": {"used": "yes"}}));
    }

    #[test]
    fn test_range_operators_pick_bound_key() {
        let (occur, clause) = FilterOperator::Lt.to_clause("weight".into(), json!(200));
        assert_eq!(occur, Occur::Must);
        assert_eq!(clause.to_json(), json!({"range": {"weight": {"lt": 200}}}));
    }

    #[test]
    fn test_display_roundtrip() {
        assert_eq!(FilterOperator::Gte.to_string(), ">=");
        assert_eq!(
            FilterOperator::Gte.to_string().parse::<FilterOperator>().unwrap(),
            FilterOperator::Gte
        );
    }
}
