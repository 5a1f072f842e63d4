use std::fmt;

use serde::{Deserialize, Serialize};

/// Запись индекса: строковый ключ-нагрузка и целочисленное значение.
///
/// Дерево упорядочивает записи только по `value`; `key` хранится как
/// полезная нагрузка и в сравнениях не участвует. После создания запись
/// не изменяется.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    key: String,
    value: i64,
}

impl Record {
    /// Создаёт новую запись.
    pub fn new(
        key: impl Into<String>,
        value: i64,
    ) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Возвращает ключ записи.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Возвращает значение, по которому упорядочен индекс.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Разбирает запись на ключ и значение.
    pub fn into_parts(self) -> (String, i64) {
        (self.key, self.value)
    }
}

impl fmt::Display for Record {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "({}, {})", self.key, self.value)
    }
}

impl<K: Into<String>> From<(K, i64)> for Record {
    fn from((key, value): (K, i64)) -> Self {
        Self::new(key, value)
    }
}
