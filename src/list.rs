//! Unbounded doubly-linked list.
//!
//! A plain FIFO list with one allocation per node. It offers the same
//! push/shift ordering as [`SegmentedQueue`] without segment chaining, plus
//! concatenation and string rendering.
//!
//! [`SegmentedQueue`]: crate::SegmentedQueue

use std::collections::linked_list;
use std::fmt;

/// A doubly-linked FIFO list.
#[derive(Clone, PartialEq, Eq)]
pub struct LinkedList<T> {
    inner: std::collections::LinkedList<T>,
}

impl<T> LinkedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            inner: std::collections::LinkedList::new(),
        }
    }

    /// Append an item and return the new length.
    pub fn push(&mut self, item: T) -> usize {
        self.inner.push_back(item);
        self.inner.len()
    }

    /// Remove and return the first item.
    pub fn shift(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    /// Borrow the first item.
    pub fn first(&self) -> Option<&T> {
        self.inner.front()
    }

    /// Borrow the last item.
    pub fn last(&self) -> Option<&T> {
        self.inner.back()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate from first to last.
    pub fn iter(&self) -> linked_list::Iter<'_, T> {
        self.inner.iter()
    }

    /// Build a new list holding this list's items followed by `items`.
    ///
    /// Neither input is modified.
    pub fn concat<I>(&self, items: I) -> Self
    where
        T: Clone,
        I: IntoIterator<Item = T>,
    {
        let mut list = self.clone();
        list.extend(items);
        list
    }

    /// Copy the items into a vector, first to last.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.iter().cloned().collect()
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T> From<Vec<T>> for LinkedList<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = linked_list::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = linked_list::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// Renders items separated by commas, e.g. `a,b,c`.
impl<T: fmt::Display> fmt::Display for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items = self.inner.iter();
        if let Some(first) = items.next() {
            write!(f, "{first}")?;
            for item in items {
                write!(f, ",{item}")?;
            }
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}
