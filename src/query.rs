//! Query construction: filter clauses, the fluent builder and the compiler
//! that turns builder state into a search payload.

pub mod builder;
pub mod clause;
pub mod compiler;
pub mod operator;
pub mod sort;

pub use builder::{SearchBuilder, SearchCallback, SearchTarget, Strategy};
pub use clause::{ClauseBucket, FilterClause, Occur, RangeBounds};
pub use compiler::{CompileSettings, CompiledPayload, Compilation, SearchBody, compile};
pub use operator::FilterOperator;
pub use sort::{SortDirection, SortField};
