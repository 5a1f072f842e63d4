//! AVL-дерево - упорядоченный индекс записей для avldb.
//!
//! # Модули
//!
//! - `avl_base`: узлы, повороты, вставка, удаление, поиск и диапазоны.
//! - `iter`: in-order итератор с явным стеком.
//! - `safety`: валидация инвариантов и статистика

pub mod avl_base;
pub mod iter;
pub mod safety;

pub use avl_base::*;
pub use iter::*;
pub use safety::*;
