//! Index settings and mapping maintenance.

pub mod index;

pub use index::{update_index, update_mapping};
