//! Fluent accumulator of filter predicates, sort order and pagination.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::client::{SearchClient, SearchOptions};
use crate::error::Result;
use crate::model::Searchable;
use crate::payload::Payload;
use crate::query::clause::{ClauseBucket, FilterClause, Occur, RangeBounds};
use crate::query::compiler::{self, CompileSettings, CompiledPayload};
use crate::query::operator::FilterOperator;
use crate::query::sort::{SortDirection, SortField};
use crate::response::SearchResponse;

/// Full-query override. Its return value becomes the body of the outer
/// `bool` query.
pub type Strategy = Arc<dyn Fn(&SearchBuilder) -> Value + Send + Sync>;

/// Raw search override invoked with the transport client, the free-text
/// query and the search options, bypassing payload compilation entirely.
pub type SearchCallback = Arc<
    dyn for<'a> Fn(&'a dyn SearchClient, &'a str, &'a SearchOptions) -> BoxFuture<'a, Result<SearchResponse>>
        + Send
        + Sync,
>;

/// Index and document type a search is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    pub index: String,
    pub doc_type: String,
}

impl SearchTarget {
    pub fn new(index: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
        }
    }

    /// Resolve the target of a record type, failing fast when the record
    /// does not declare an index or a type.
    pub fn of<M: Searchable>(record: &M) -> Result<Self> {
        let payload = Payload::for_type(record)?;
        Ok(Self {
            index: payload.index,
            doc_type: payload.doc_type.unwrap_or_default(),
        })
    }
}

/// Builder state for a single logical query.
///
/// Every mutator consumes and returns the builder, so an instance has exactly
/// one owner while it is being assembled.
///
/// # Example
///
/// ```ignore
/// let builder = SearchBuilder::for_record(&product, "phone")?
///     .filter("brand", "apple")
///     .filter_op("memory", ">=", 32)
///     .filter_not_in("color", ["red", "green"])
///     .sort_by("price", "desc")
///     .take(10);
/// ```
#[derive(Clone)]
pub struct SearchBuilder {
    target: SearchTarget,
    query: String,
    clauses: ClauseBucket,
    sort: Vec<SortField>,
    limit: Option<usize>,
    offset: Option<usize>,
    strategies: Vec<Strategy>,
    callback: Option<SearchCallback>,
    debug: bool,
    profile: bool,
}

impl SearchBuilder {
    pub fn new(target: SearchTarget, query: impl Into<String>) -> Self {
        Self {
            target,
            query: query.into(),
            clauses: ClauseBucket::new(),
            sort: Vec::new(),
            limit: None,
            offset: None,
            strategies: Vec::new(),
            callback: None,
            debug: false,
            profile: false,
        }
    }

    /// Start a query against the index of `record`'s type.
    pub fn for_record<M: Searchable>(record: &M, query: impl Into<String>) -> Result<Self> {
        Ok(Self::new(SearchTarget::of(record)?, query))
    }

    fn push(mut self, occur: Occur, clause: FilterClause) -> Self {
        self.clauses.push(occur, clause);
        self
    }

    /// Equality filter (`field = value`).
    pub fn filter(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter_with(field, FilterOperator::Eq, value)
    }

    /// Filter with a typed comparison operator.
    pub fn filter_with(
        self,
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        let (occur, clause) = operator.to_clause(field.into(), value.into());
        self.push(occur, clause)
    }

    /// Filter with an operator given as text: `=`, `>`, `<`, `>=`, `<=`,
    /// `!=` or `<>`. Any other operator adds no clause.
    pub fn filter_op(
        self,
        field: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Self {
        let field: String = field.into();
        match operator.parse::<FilterOperator>() {
            Ok(operator) => self.filter_with(field, operator, value),
            Err(e) => {
                log::warn!("ignoring filter on '{field}': {e}");
                self
            }
        }
    }

    pub fn filter_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let clause = terms(field.into(), values);
        self.push(Occur::Must, clause)
    }

    pub fn filter_not_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let clause = terms(field.into(), values);
        self.push(Occur::MustNot, clause)
    }

    /// Inclusive range filter over `[lo, hi]`.
    pub fn filter_between<V: Into<Value>>(self, field: impl Into<String>, [lo, hi]: [V; 2]) -> Self {
        let clause = between(field.into(), lo.into(), hi.into());
        self.push(Occur::Must, clause)
    }

    pub fn filter_not_between<V: Into<Value>>(
        self,
        field: impl Into<String>,
        [lo, hi]: [V; 2],
    ) -> Self {
        let clause = between(field.into(), lo.into(), hi.into());
        self.push(Occur::MustNot, clause)
    }

    pub fn filter_exists(self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.push(Occur::Must, FilterClause::Exists { field })
    }

    pub fn filter_not_exists(self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.push(Occur::MustNot, FilterClause::Exists { field })
    }

    /// Regular expression filter with the `ALL` flag set.
    pub fn filter_regexp(self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filter_regexp_with_flags(field, pattern, "ALL")
    }

    pub fn filter_regexp_with_flags(
        self,
        field: impl Into<String>,
        pattern: impl Into<String>,
        flags: impl Into<String>,
    ) -> Self {
        let clause = FilterClause::Regexp {
            field: field.into(),
            pattern: pattern.into(),
            flags: flags.into(),
        };
        self.push(Occur::Must, clause)
    }

    /// Append a sort key. Earlier keys take priority.
    pub fn sort_by(mut self, field: impl Into<String>, direction: impl Into<SortDirection>) -> Self {
        self.sort.push(SortField {
            field: field.into(),
            direction: direction.into(),
        });
        self
    }

    /// Maximum number of hits to return.
    pub fn take(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of hits to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Register a full-query override. When several are registered the last
    /// one wins.
    pub fn with_strategy<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&SearchBuilder) -> Value + Send + Sync + 'static,
    {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Bypass compilation and hand the search to `callback`.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: for<'a> Fn(&'a dyn SearchClient, &'a str, &'a SearchOptions) -> BoxFuture<'a, Result<SearchResponse>>
            + Send
            + Sync
            + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Ask the engine to attach a score explanation to every hit.
    pub fn set_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Ask the engine to profile query execution.
    pub fn set_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    /// Compile with default settings and no pagination options.
    pub fn build(&self) -> CompiledPayload {
        compiler::compile(self, &SearchOptions::default(), &CompileSettings::default())
    }

    pub fn target(&self) -> &SearchTarget {
        &self.target
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn clauses(&self) -> &ClauseBucket {
        &self.clauses
    }

    pub fn sort(&self) -> &[SortField] {
        &self.sort
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn callback(&self) -> Option<&SearchCallback> {
        self.callback.as_ref()
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn is_profile(&self) -> bool {
        self.profile
    }
}

impl fmt::Debug for SearchBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchBuilder")
            .field("target", &self.target)
            .field("query", &self.query)
            .field("clauses", &self.clauses)
            .field("sort", &self.sort)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("strategies", &self.strategies.len())
            .field("callback", &self.callback.is_some())
            .field("debug", &self.debug)
            .field("profile", &self.profile)
            .finish()
    }
}

fn terms<I, V>(field: String, values: I) -> FilterClause
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    FilterClause::Terms {
        field,
        values: values.into_iter().map(Into::into).collect(),
    }
}

fn between(field: String, lo: Value, hi: Value) -> FilterClause {
    FilterClause::Range {
        field,
        bounds: RangeBounds::between(lo, hi),
    }
}
