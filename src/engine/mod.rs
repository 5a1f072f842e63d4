//! Index store built on top of the database primitives.
//!
//! - `indexed`: `IndexedDatabase`, the record store facade over one `AvlTree`.

pub mod indexed;

pub use indexed::*;
