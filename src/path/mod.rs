//! Path module - Splits path strings and walks documents along them.
//!
//! Paths are dot-separated. Array indices may be written in bracket form
//! (`fee[0]`) or as a plain segment (`fee.0`); both address the same slot.

mod resolve;

pub use resolve::*;
