use thiserror::Error;

/// Макрос для валидации условий с возвратом ошибки.
#[macro_export]
macro_rules! validate {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Нарушения инвариантов AVL-дерева.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Нарушен порядок двоичного дерева поиска
    #[error("Order violation at value {value}: {message}")]
    OrderViolation { value: i64, message: String },
    /// Фактор баланса вышел за пределы {-1, 0, 1}
    #[error("Node {value} is unbalanced: balance factor {balance}")]
    Unbalanced { value: i64, balance: isize },
    /// Закешированная высота не совпадает с вычисленной по детям
    #[error("Stale height at node {value}: cached {cached}, expected {expected}")]
    StaleHeight {
        value: i64,
        cached: usize,
        expected: usize,
    },
    /// Счётчик узлов не совпадает с реальным кол-вом узлов
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Статистика формы AVL-дерева.
#[derive(Debug, Clone, PartialEq)]
pub struct AvlStatistics {
    /// Количество узлов
    pub node_count: usize,
    /// Высота корня (0 для пустого дерева)
    pub height: usize,
    /// Количество листьев
    pub leaf_count: usize,
    /// Узлы с фактором баланса +1
    pub left_heavy: usize,
    /// Узлы с фактором баланса 0
    pub balanced: usize,
    /// Узлы с фактором баланса -1
    pub right_heavy: usize,
    /// Средняя глубина узла (корень на глубине 1)
    pub average_depth: f64,
}

impl AvlStatistics {
    /// Создает пустую статистику.
    pub fn empty() -> Self {
        Self {
            node_count: 0,
            height: 0,
            leaf_count: 0,
            left_heavy: 0,
            balanced: 0,
            right_heavy: 0,
            average_depth: 0.0,
        }
    }

    /// Теоретическая верхняя граница высоты AVL-дерева с `node_count` узлами:
    /// `1.44 * log2(n + 2)`.
    pub fn height_bound(&self) -> f64 {
        1.4405 * ((self.node_count + 2) as f64).log2() - 0.3277
    }

    /// Форматирует статистику для вывода.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("AVL Tree Statistics:\n");
        report.push_str(&format!("  Total nodes: {}\n", self.node_count));
        report.push_str(&format!("  Height: {}\n", self.height));
        report.push_str(&format!("  Height bound: {:.2}\n", self.height_bound()));
        report.push_str(&format!("  Leaves: {}\n", self.leaf_count));
        report.push_str(&format!("  Average depth: {:.2}\n", self.average_depth));
        report.push_str("  Balance distribution:\n");

        for (label, count) in [
            ("+1", self.left_heavy),
            (" 0", self.balanced),
            ("-1", self.right_heavy),
        ] {
            if count > 0 {
                let percentage = (count as f64 / self.node_count as f64) * 100.0;
                report.push_str(&format!(
                    "    {label}: {count} nodes ({percentage:.1}%)\n"
                ));
            }
        }

        report
    }
}

impl Default for AvlStatistics {
    fn default() -> Self {
        Self::empty()
    }
}
