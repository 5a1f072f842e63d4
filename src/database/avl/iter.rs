use std::iter::FusedIterator;

use super::Node;
use crate::database::Record;

/// Итератор по записям дерева в порядке возрастания значения.
///
/// Хранит явный стек левой границы, поэтому глубина рекурсии не растёт.
pub struct AvlIter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> AvlIter<'a> {
    pub(crate) fn new(
        root: Option<&'a Node>,
        len: usize,
    ) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(
        &mut self,
        mut node: Option<&'a Node>,
    ) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a> Iterator for AvlIter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.record())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for AvlIter<'_> {}

impl FusedIterator for AvlIter<'_> {}
