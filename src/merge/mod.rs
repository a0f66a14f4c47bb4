//! Merge module - Deep merge and path-aware merge of documents.
//!
//! [`deep_merge`] is the generic recursive merge. [`MergeEngine`] builds on it
//! to merge a fragment at an arbitrary, possibly missing, path.

mod deep;
mod engine;


pub use deep::*;
pub use engine::*;
