use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{AvlIter, AvlStatistics, ValidationError};
use crate::{database::Record, validate};

type Link = Option<Box<Node>>;

/// Узел AVL-дерева.
///
/// Узел единолично владеет своей записью и двумя поддеревьями. Высота
/// кешируется: у листа она равна 1, у пустого поддерева 0.
#[derive(Debug, Clone)]
pub struct Node {
    record: Record,
    left: Link,
    right: Link,
    height: usize,
}

/// AVL-дерево: корень, упорядоченный по `Record::value`, и счётчик узлов.
#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    root: Link,
    length: usize,
}

/// Результат поиска вместе с числом просмотренных узлов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProbe<'a> {
    /// Найденная запись, если значение присутствует в дереве.
    pub record: Option<&'a Record>,
    /// Количество узлов, посещённых на пути от корня.
    pub comparisons: usize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Node {
    fn new(record: Record) -> Box<Self> {
        Box::new(Node {
            record,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Возвращает ссылку на запись узла.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Значение, по которому упорядочен узел.
    pub fn value(&self) -> i64 {
        self.record.value()
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// Закешированная высота поддерева.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Фактор баланса: высота левого поддерева минус высота правого.
    pub fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

#[inline]
fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

#[inline]
fn balance(link: &Link) -> isize {
    link.as_ref().map_or(0, |node| node.balance())
}

/// Правый поворот вокруг `y`. Возвращает новый корень поддерева.
fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };

    y.left = x.right.take();
    y.update_height();

    x.right = Some(y);
    x.update_height();

    x
}

/// Левый поворот вокруг `x`. Возвращает новый корень поддерева.
fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };

    x.right = y.left.take();
    x.update_height();

    y.left = Some(x);
    y.update_height();

    y
}

/// Балансировка после вставки `value`. Случай выбирается по тому, с какой
/// стороны тяжёлого ребёнка оказалось вставленное значение.
fn rebalance_after_insert(
    mut node: Box<Node>,
    value: i64,
) -> Box<Node> {
    let bf = node.balance();

    if bf > 1 {
        if let Some(left_value) = node.left.as_ref().map(|l| l.value()) {
            match value.cmp(&left_value) {
                // LL
                Ordering::Less => return rotate_right(node),
                // LR
                Ordering::Greater => {
                    node.left = node.left.take().map(rotate_left);
                    return rotate_right(node);
                }
                Ordering::Equal => {}
            }
        }
    }

    if bf < -1 {
        if let Some(right_value) = node.right.as_ref().map(|r| r.value()) {
            match value.cmp(&right_value) {
                // RR
                Ordering::Greater => return rotate_left(node),
                // RL
                Ordering::Less => {
                    node.right = node.right.take().map(rotate_right);
                    return rotate_left(node);
                }
                Ordering::Equal => {}
            }
        }
    }

    node
}

/// Балансировка после удаления. Ребёнок с нулевым балансом разрешается
/// одиночным поворотом.
fn rebalance_after_delete(mut node: Box<Node>) -> Box<Node> {
    let bf = node.balance();

    if bf > 1 {
        // LR, иначе LL
        if balance(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if bf < -1 {
        // RL, иначе RR
        if balance(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

impl AvlTree {
    /// Создаёт пустое дерево.
    pub fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Вставляет запись. Если значение уже есть в дереве, ничего не меняет и
    /// возвращает `false`; существующая запись остаётся на месте.
    pub fn insert(
        &mut self,
        record: Record,
    ) -> bool {
        let before = self.length;
        let root = self.root.take();
        self.root = Some(Self::insert_node(root, record, &mut self.length));
        self.length != before
    }

    fn insert_node(
        link: Link,
        record: Record,
        length: &mut usize,
    ) -> Box<Node> {
        let mut node = match link {
            Some(node) => node,
            None => {
                *length += 1;
                return Node::new(record);
            }
        };

        let value = record.value();

        match value.cmp(&node.value()) {
            Ordering::Less => {
                node.left = Some(Self::insert_node(node.left.take(), record, length));
            }
            Ordering::Greater => {
                node.right = Some(Self::insert_node(node.right.take(), record, length));
            }
            Ordering::Equal => return node,
        }

        node.update_height();
        rebalance_after_insert(node, value)
    }

    /// Удаляет узел с заданным значением и возвращает его запись.
    pub fn delete(
        &mut self,
        value: i64,
    ) -> Option<Record> {
        let (root, removed) = Self::delete_node(self.root.take(), value);
        self.root = root;

        if removed.is_some() {
            self.length -= 1;
        }

        removed
    }

    fn delete_node(
        link: Link,
        value: i64,
    ) -> (Link, Option<Record>) {
        let Some(mut node) = link else {
            return (None, None);
        };

        let removed = match value.cmp(&node.value()) {
            Ordering::Less => {
                let (left, removed) = Self::delete_node(node.left.take(), value);
                node.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Self::delete_node(node.right.take(), value);
                node.right = right;
                removed
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                // Ноль или один ребёнок: ребёнок встаёт на место узла.
                (None, child) | (child, None) => {
                    let Node { record, .. } = *node;
                    return (child, Some(record));
                }
                // Два ребёнка: запись заменяется in-order преемником, а сам
                // преемник вырезается из правого поддерева.
                (Some(left), Some(right)) => {
                    let (right, successor) = Self::detach_min(right);
                    node.left = Some(left);
                    node.right = right;
                    Some(std::mem::replace(&mut node.record, successor))
                }
            },
        };

        node.update_height();
        (Some(rebalance_after_delete(node)), removed)
    }

    /// Вырезает самый левый узел поддерева, балансируя путь к нему.
    fn detach_min(mut node: Box<Node>) -> (Link, Record) {
        match node.left.take() {
            None => {
                let Node { record, right, .. } = *node;
                (right, record)
            }
            Some(left) => {
                let (left, min) = Self::detach_min(left);
                node.left = left;
                node.update_height();
                (Some(rebalance_after_delete(node)), min)
            }
        }
    }

    /// Ищет запись по значению и считает посещённые узлы. Счётчик начинается с
    /// нуля при каждом вызове.
    pub fn probe(
        &self,
        value: i64,
    ) -> SearchProbe<'_> {
        let mut comparisons = 0;
        let mut current = self.root.as_deref();

        while let Some(node) = current {
            comparisons += 1;

            match value.cmp(&node.value()) {
                Ordering::Less => current = node.left(),
                Ordering::Greater => current = node.right(),
                Ordering::Equal => {
                    return SearchProbe {
                        record: Some(&node.record),
                        comparisons,
                    }
                }
            }
        }

        SearchProbe {
            record: None,
            comparisons,
        }
    }

    /// Ищет запись по значению.
    pub fn search(
        &self,
        value: i64,
    ) -> Option<&Record> {
        self.probe(value).record
    }

    /// Проверяет, содержится ли значение в дереве.
    pub fn contains(
        &self,
        value: i64,
    ) -> bool {
        self.search(value).is_some()
    }

    /// Собирает записи со значениями в `[start, end]` в порядке возрастания.
    /// Поддеревья, целиком лежащие вне диапазона, не посещаются.
    pub fn range(
        &self,
        start: i64,
        end: i64,
    ) -> Vec<&Record> {
        let mut result = Vec::new();
        Self::collect_range(self.root.as_deref(), start, end, &mut result);
        result
    }

    fn collect_range<'a>(
        node: Option<&'a Node>,
        start: i64,
        end: i64,
        result: &mut Vec<&'a Record>,
    ) {
        let Some(node) = node else {
            return;
        };
        let value = node.value();

        if value >= start {
            Self::collect_range(node.left(), start, end, result);
        }

        if start <= value && value <= end {
            result.push(&node.record);
        }

        if value <= end {
            Self::collect_range(node.right(), start, end, result);
        }
    }

    /// Освобождает все узлы обходом в обратном порядке и возвращает их
    /// количество.
    pub fn clear(&mut self) -> usize {
        let released = Self::release(self.root.take());
        self.length = 0;
        released
    }

    fn release(link: Link) -> usize {
        let Some(node) = link else {
            return 0;
        };
        let Node {
            record,
            left,
            right,
            ..
        } = *node;

        let released = Self::release(left) + Self::release(right);
        drop(record);

        released + 1
    }

    /// Возвращает текущее число узлов.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Проверяет на пустоту.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Корень дерева, если оно не пустое.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Закешированная высота корня, O(1).
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Высота, вычисленная полным обходом без использования кеша, O(n).
    pub fn computed_height(&self) -> usize {
        fn measure(node: Option<&Node>) -> usize {
            match node {
                None => 0,
                Some(n) => 1 + measure(n.left()).max(measure(n.right())),
            }
        }

        measure(self.root())
    }

    /// Возвращает запись с минимальным значением.
    pub fn first(&self) -> Option<&Record> {
        let mut current = self.root()?;

        while let Some(left) = current.left() {
            current = left;
        }

        Some(&current.record)
    }

    /// Возвращает запись с максимальным значением.
    pub fn last(&self) -> Option<&Record> {
        let mut current = self.root()?;

        while let Some(right) = current.right() {
            current = right;
        }

        Some(&current.record)
    }

    /// Возвращает итератор по записям в порядке возрастания значения.
    pub fn iter(&self) -> AvlIter<'_> {
        AvlIter::new(self.root(), self.length)
    }

    /// Проверяет порядок, баланс, высоты и счётчик узлов.
    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        let actual = match self.root() {
            Some(root) => Self::check_subtree(root, None, None)?.1,
            None => 0,
        };

        validate!(
            actual == self.length,
            ValidationError::LengthMismatch {
                expected: self.length,
                actual
            }
        );

        Ok(())
    }

    /// Возвращает (высота, кол-во узлов) проверенного поддерева.
    fn check_subtree(
        node: &Node,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Result<(usize, usize), ValidationError> {
        let value = node.value();

        if let Some(lower) = lower {
            validate!(
                value > lower,
                ValidationError::OrderViolation {
                    value,
                    message: format!("{value} <= lower bound {lower}")
                }
            );
        }

        if let Some(upper) = upper {
            validate!(
                value < upper,
                ValidationError::OrderViolation {
                    value,
                    message: format!("{value} >= upper bound {upper}")
                }
            );
        }

        let (left_height, left_count) = match node.left() {
            Some(left) => Self::check_subtree(left, lower, Some(value))?,
            None => (0, 0),
        };
        let (right_height, right_count) = match node.right() {
            Some(right) => Self::check_subtree(right, Some(value), upper)?,
            None => (0, 0),
        };

        let expected = 1 + left_height.max(right_height);

        validate!(
            node.height == expected,
            ValidationError::StaleHeight {
                value,
                cached: node.height,
                expected
            }
        );

        let bf = left_height as isize - right_height as isize;

        validate!(
            (-1..=1).contains(&bf),
            ValidationError::Unbalanced { value, balance: bf }
        );

        Ok((expected, left_count + right_count + 1))
    }

    /// Собирает статистику формы дерева.
    pub fn statistics(&self) -> AvlStatistics {
        let mut stats = AvlStatistics::empty();
        let mut depth_sum = 0usize;
        let mut stack: Vec<(&Node, usize)> = self.root().map(|r| (r, 1)).into_iter().collect();

        while let Some((node, depth)) = stack.pop() {
            stats.node_count += 1;
            depth_sum += depth;

            match node.balance() {
                b if b > 0 => stats.left_heavy += 1,
                0 => stats.balanced += 1,
                _ => stats.right_heavy += 1,
            }

            if node.left.is_none() && node.right.is_none() {
                stats.leaf_count += 1;
            }

            stack.extend(node.left().map(|l| (l, depth + 1)));
            stack.extend(node.right().map(|r| (r, depth + 1)));
        }

        stats.height = self.height();

        if stats.node_count > 0 {
            stats.average_depth = depth_sum as f64 / stats.node_count as f64;
        }

        stats
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для AvlTree
////////////////////////////////////////////////////////////////////////////////

impl<'a> IntoIterator for &'a AvlTree {
    type Item = &'a Record;
    type IntoIter = AvlIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Record> for AvlTree {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl Extend<Record> for AvlTree {
    fn extend<I: IntoIterator<Item = Record>>(
        &mut self,
        iter: I,
    ) {
        for record in iter {
            self.insert(record);
        }
    }
}

/// Два дерева равны, если содержат одинаковые записи; форма не учитывается.
impl PartialEq for AvlTree {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for AvlTree {}

impl Serialize for AvlTree {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for AvlTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records: Vec<Record> = Vec::deserialize(deserializer)?;
        Ok(records.into_iter().collect())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
