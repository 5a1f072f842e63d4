/// Settings loading (defaults, file, `AVLDB_*` environment).
pub mod config;
/// Built-in data structures: Record and the AVL tree index.
pub mod database;
/// Record store facade over the index.
pub mod engine;
/// Common error types.
pub mod error;
/// Logging setup (formatting, filters, sinks).
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use self::config::{Settings, StoreConfig};
/// Data types: Record, AvlTree and its helpers.
pub use database::{
    AvlIter, AvlStatistics, AvlTree, Node, Record, SearchProbe, ValidationError,
};
/// Record store.
pub use engine::IndexedDatabase;
/// Operation errors and result types.
pub use error::{StoreError, StoreResult};
/// Logging entry point.
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingHandle};
