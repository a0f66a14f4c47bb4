//! Value module - Tagged-union JSON/YAML values.
//!
//! Documents, fragments and query results are all [`Value`]s.

mod value;

pub use value::*;
