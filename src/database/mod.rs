pub mod avl;
pub mod record;

pub use avl::*;
pub use record::*;
