//! # Collections
//!
//! [`Collection`] is the ordered result-set type: API list responses and
//! `collection`-cast attributes both land in one. It is a thin newtype over a
//! `Vec` and serializes as a plain JSON array.
//!
//! Behaviour lives in traits so wrapper types can share it:
//!
//! - [`Items`]: the factory plus array-like access, in-place edits, slicing,
//!   paging, padding and conditional combinators.
//! - [`SetOps`]: deep-equality operations (`unique`, `duplicates`, `union`,
//!   `intersect`, `diff`), blanket-implemented for every `Items` container.
//!
//! `Collection<Value>` adds JSON-aware helpers such as `pluck`.
//!
//! ```
//! use restive::collection::{Collection, Items, SetOps};
//!
//! let c: Collection<i32> = vec![3, 1, 3, 2].into();
//! assert_eq!(c.unique().take(2).to_vec(), vec![3, 1]);
//! ```

use std::any::Any;
use std::ops::Index;

use serde::{Deserialize, Serialize};

mod condition;
mod items;
mod json;
mod sets;

pub use condition::Condition;
pub use items::{Items, DEFAULT_DUMP_LABEL};
pub use sets::SetOps;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build `n` items from `f(1)..=f(n)`.
    pub fn times(n: usize, f: impl FnMut(usize) -> T) -> Self {
        (1..=n).map(f).collect()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> Collection<T> {
    pub fn repeat(n: usize, value: T) -> Self {
        Self {
            items: vec![value; n],
        }
    }
}

impl<T: 'static> Collection<T> {
    /// Whether `value` is a `Collection<T>`.
    pub fn is_collection(value: &dyn Any) -> bool {
        value.is::<Self>()
    }
}

impl<T: Clone> Items<T> for Collection<T> {
    fn from_items(items: Vec<T>) -> Self {
        Self { items }
    }

    fn items(&self) -> &[T] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Extend<T> for Collection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> Index<usize> for Collection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

/// An item of a nested collection: a value, or another level of nesting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node<T> {
    Leaf(T),
    Branch(Collection<Node<T>>),
}

impl<T> Node<T> {
    pub fn branch(nodes: impl IntoIterator<Item = Node<T>>) -> Self {
        Node::Branch(nodes.into_iter().collect())
    }
}

impl<T: Clone> Collection<Node<T>> {
    /// Flatten nested branches up to `depth` levels. A depth of zero or less
    /// copies the top level as is.
    pub fn flat(&self, depth: i32) -> Self {
        let mut out = Vec::new();
        flatten_into(&self.items, usize::try_from(depth).unwrap_or(0), &mut out);
        Self { items: out }
    }

    /// Every leaf, at any depth, in order.
    pub fn leaves(&self) -> Collection<T> {
        let mut out = Vec::new();
        collect_leaves(&self.items, &mut out);
        Collection { items: out }
    }
}

fn flatten_into<T: Clone>(nodes: &[Node<T>], depth: usize, out: &mut Vec<Node<T>>) {
    for node in nodes {
        match node {
            Node::Branch(inner) if depth > 0 => flatten_into(&inner.items, depth - 1, out),
            other => out.push(other.clone()),
        }
    }
}

fn collect_leaves<T: Clone>(nodes: &[Node<T>], out: &mut Vec<T>) {
    for node in nodes {
        match node {
            Node::Leaf(value) => out.push(value.clone()),
            Node::Branch(inner) => collect_leaves(&inner.items, out),
        }
    }
}

impl<T: Clone> Collection<Collection<T>> {
    /// Concatenate the inner collections.
    pub fn collapse(&self) -> Collection<T> {
        self.items
            .iter()
            .flat_map(|inner| inner.items.iter().cloned())
            .collect()
    }
}
