use std::cmp::Ordering;
use std::fmt;

use chrono::{SecondsFormat, Utc};

use super::{Collection, Condition};
use crate::coerce::Truthy;
use crate::error::Result;

pub const DEFAULT_DUMP_LABEL: &str = "collection";

/// Clamp a possibly negative index into `0..=len`. Negative values count from
/// the back.
pub(crate) fn resolve_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}

/// An ordered container whose derived results keep the container's type.
///
/// Implementors supply the factory and access to the backing vector; every
/// other operation is provided. Operations taking `&self` never touch the
/// receiver and build their result through [`Items::from_items`], so a
/// wrapper like `struct Tags(Vec<String>)` gets `Tags` back from `filter`,
/// `unique`, `slice` and the rest.
///
/// Wrappers that need constructor state beyond the items themselves cannot be
/// rebuilt by the factory and should not implement this trait.
pub trait Items<T: Clone>: Sized {
    fn from_items(items: Vec<T>) -> Self;

    fn items(&self) -> &[T];

    fn items_mut(&mut self) -> &mut Vec<T>;

    fn len(&self) -> usize {
        self.items().len()
    }

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.items().get(index)
    }

    fn first(&self) -> Option<&T> {
        self.items().first()
    }

    fn last(&self) -> Option<&T> {
        self.items().last()
    }

    fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items().iter()
    }

    fn to_vec(&self) -> Vec<T> {
        self.items().to_vec()
    }

    fn copy(&self) -> Self {
        Self::from_items(self.to_vec())
    }

    // --- in place ---------------------------------------------------------

    /// Append one item. Returns the new length.
    fn push(&mut self, item: T) -> usize {
        let items = self.items_mut();
        items.push(item);
        items.len()
    }

    fn push_all(&mut self, items: impl IntoIterator<Item = T>) -> usize {
        let target = self.items_mut();
        target.extend(items);
        target.len()
    }

    fn pop(&mut self) -> Option<T> {
        self.items_mut().pop()
    }

    /// Remove and return the first item.
    fn shift(&mut self) -> Option<T> {
        let items = self.items_mut();
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    }

    /// Prepend `items`, keeping their order. Returns the new length.
    fn unshift(&mut self, items: impl IntoIterator<Item = T>) -> usize {
        let target = self.items_mut();
        let tail = std::mem::take(target);
        target.extend(items);
        target.extend(tail);
        target.len()
    }

    /// Remove `delete_count` items at `start` (all remaining when `None`),
    /// insert `items` in their place, and return what was removed.
    fn splice(
        &mut self,
        start: isize,
        delete_count: Option<usize>,
        items: impl IntoIterator<Item = T>,
    ) -> Self {
        let len = self.len();
        let start = resolve_index(start, len);
        let available = len - start;
        let end = start + delete_count.map_or(available, |n| n.min(available));
        let removed = self.items_mut().splice(start..end, items).collect();
        Self::from_items(removed)
    }

    /// Overwrite `start..end` with clones of `value`.
    fn fill(&mut self, value: T, start: isize, end: Option<isize>) -> &mut Self {
        let len = self.len();
        let from = resolve_index(start, len);
        let to = end.map_or(len, |e| resolve_index(e, len));
        if from < to {
            self.items_mut()[from..to].fill(value);
        }
        self
    }

    /// Copy `start..end` over the items beginning at `target`. The length
    /// never changes; the copy is cut short at the end of the collection.
    fn copy_within(&mut self, target: isize, start: isize, end: Option<isize>) -> &mut Self {
        let len = self.len();
        let to = resolve_index(target, len);
        let from = resolve_index(start, len);
        let until = end.map_or(len, |e| resolve_index(e, len));
        let count = until.saturating_sub(from).min(len - to);
        if count > 0 {
            let source = self.items()[from..from + count].to_vec();
            self.items_mut()[to..to + count].clone_from_slice(&source);
        }
        self
    }

    // --- queries ----------------------------------------------------------

    fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items().iter().find(|item| predicate(item))
    }

    fn every(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.items().iter().all(predicate)
    }

    fn some(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.items().iter().any(predicate)
    }

    fn reduce<A>(&self, init: A, f: impl FnMut(A, &T) -> A) -> A {
        self.items().iter().fold(init, f)
    }

    fn each(&self, f: impl FnMut(&T)) -> &Self {
        self.items().iter().for_each(f);
        self
    }

    // --- derived collections ----------------------------------------------

    fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        Self::from_items(
            self.items()
                .iter()
                .filter(|item| predicate(item))
                .cloned()
                .collect(),
        )
    }

    fn reject(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        self.filter(|item| !predicate(item))
    }

    fn map(&self, f: impl FnMut(&T) -> T) -> Self {
        Self::from_items(self.items().iter().map(f).collect())
    }

    /// Map into a plain collection of another item type.
    fn map_into<U>(&self, f: impl FnMut(&T) -> U) -> Collection<U> {
        self.items().iter().map(f).collect()
    }

    fn sort_by(&self, compare: impl FnMut(&T, &T) -> Ordering) -> Self {
        let mut items = self.to_vec();
        items.sort_by(compare);
        Self::from_items(items)
    }

    fn reverse(&self) -> Self {
        Self::from_items(self.items().iter().rev().cloned().collect())
    }

    fn slice(&self, start: isize, end: Option<isize>) -> Self {
        let len = self.len();
        let from = resolve_index(start, len);
        let to = end.map_or(len, |e| resolve_index(e, len));
        if from >= to {
            return Self::from_items(Vec::new());
        }
        Self::from_items(self.items()[from..to].to_vec())
    }

    fn concat(&self, items: impl IntoIterator<Item = T>) -> Self {
        let mut joined = self.to_vec();
        joined.extend(items);
        Self::from_items(joined)
    }

    /// Split into runs of `size`; the last run holds the remainder. A size of
    /// zero yields no chunks.
    fn chunk(&self, size: usize) -> Collection<Self> {
        if size == 0 {
            return Collection::new();
        }
        self.items()
            .chunks(size)
            .map(|chunk| Self::from_items(chunk.to_vec()))
            .collect()
    }

    /// The `page`th window of `per_page` items. Pages start at 1; page 0 is
    /// treated as the first page.
    fn for_page(&self, page: usize, per_page: usize) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        Self::from_items(
            self.items()
                .iter()
                .skip(offset)
                .take(per_page)
                .cloned()
                .collect(),
        )
    }

    /// First `count` items, or the last `|count|` when negative. Asking for
    /// more than there are returns everything.
    fn take(&self, count: isize) -> Self {
        let len = self.len();
        let n = count.unsigned_abs().min(len);
        let items = if count >= 0 {
            &self.items()[..n]
        } else {
            &self.items()[len - n..]
        };
        Self::from_items(items.to_vec())
    }

    /// Everything but the first `count` items, or the last `|count|` when
    /// negative.
    fn skip(&self, count: isize) -> Self {
        let len = self.len();
        let n = count.unsigned_abs().min(len);
        let items = if count >= 0 {
            &self.items()[n..]
        } else {
            &self.items()[..len - n]
        };
        Self::from_items(items.to_vec())
    }

    /// Remove items from the front while `predicate` holds and return them.
    /// The first failing item stays in the receiver.
    fn take_while(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        let n = self
            .items()
            .iter()
            .take_while(|item| predicate(item))
            .count();
        Self::from_items(self.items_mut().drain(..n).collect())
    }

    /// Remove items from the front until `predicate` holds and return them.
    fn take_until(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        self.take_while(|item| !predicate(item))
    }

    fn skip_while(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        Self::from_items(
            self.items()
                .iter()
                .skip_while(|item| predicate(item))
                .cloned()
                .collect(),
        )
    }

    fn skip_until(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        self.skip_while(|item| !predicate(item))
    }

    /// Pad to `|length|` items, appending when `length` is positive and
    /// prepending when negative. A falsy `value` pads with `T::default()`.
    fn pad(&self, length: isize, value: Option<T>) -> Self
    where
        T: Default + Truthy,
    {
        let value = value.filter(|v| v.is_truthy()).unwrap_or_default();
        self.pad_with(length, || value.clone())
    }

    fn pad_with(&self, length: isize, producer: impl FnMut() -> T) -> Self {
        let missing = length.unsigned_abs().saturating_sub(self.len());
        if missing == 0 {
            return self.copy();
        }
        let padding = std::iter::repeat_with(producer).take(missing);
        let existing = self.items().iter().cloned();
        let items = if length > 0 {
            existing.chain(padding).collect()
        } else {
            padding.chain(existing).collect()
        };
        Self::from_items(items)
    }

    // --- control flow -----------------------------------------------------

    /// Apply `then` when the condition holds, otherwise return `self` as is.
    fn when<'a>(
        self,
        condition: impl Into<Condition<'a, Self>>,
        then: impl FnOnce(Self) -> Self,
    ) -> Result<Self> {
        self.when_else(condition, then, |c| c)
    }

    fn when_else<'a>(
        self,
        condition: impl Into<Condition<'a, Self>>,
        then: impl FnOnce(Self) -> Self,
        otherwise: impl FnOnce(Self) -> Self,
    ) -> Result<Self> {
        if condition.into().resolve("when", &self)? {
            Ok(then(self))
        } else {
            Ok(otherwise(self))
        }
    }

    fn unless<'a>(
        self,
        condition: impl Into<Condition<'a, Self>>,
        then: impl FnOnce(Self) -> Self,
    ) -> Result<Self> {
        self.unless_else(condition, then, |c| c)
    }

    fn unless_else<'a>(
        self,
        condition: impl Into<Condition<'a, Self>>,
        then: impl FnOnce(Self) -> Self,
        otherwise: impl FnOnce(Self) -> Self,
    ) -> Result<Self> {
        if condition.into().resolve("unless", &self)? {
            Ok(otherwise(self))
        } else {
            Ok(then(self))
        }
    }

    fn when_empty(self, then: impl FnOnce(Self) -> Self) -> Self {
        if self.is_empty() {
            then(self)
        } else {
            self
        }
    }

    fn when_not_empty(self, then: impl FnOnce(Self) -> Self) -> Self {
        if self.is_empty() {
            self
        } else {
            then(self)
        }
    }

    fn tap(self, f: impl FnOnce(&Self)) -> Self {
        f(&self);
        self
    }

    fn pipe<R>(self, f: impl FnOnce(Self) -> R) -> R {
        f(self)
    }

    /// Log the items at `info` on the `restive::collection` target.
    fn dump(&self, label: Option<&str>) -> &Self
    where
        T: fmt::Debug,
    {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        tracing::info!(
            target: "restive::collection",
            "[{stamp}] {}: {:?}",
            label.unwrap_or(DEFAULT_DUMP_LABEL),
            self.items()
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: i32) -> Collection<i32> {
        (1..=n).collect()
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tags(Vec<String>);

    impl Items<String> for Tags {
        fn from_items(items: Vec<String>) -> Self {
            Tags(items)
        }

        fn items(&self) -> &[String] {
            &self.0
        }

        fn items_mut(&mut self) -> &mut Vec<String> {
            &mut self.0
        }
    }

    #[test]
    fn resolve_index_clamps_both_ends() {
        assert_eq!(resolve_index(2, 5), 2);
        assert_eq!(resolve_index(9, 5), 5);
        assert_eq!(resolve_index(-2, 5), 3);
        assert_eq!(resolve_index(-9, 5), 0);
    }

    #[test]
    fn derived_results_keep_the_wrapper_type() {
        let tags = Tags(vec!["a".into(), "bb".into(), "ccc".into()]);
        let long: Tags = tags.filter(|t| t.len() > 1);
        assert_eq!(long, Tags(vec!["bb".into(), "ccc".into()]));

        let chunks: Collection<Tags> = tags.chunk(2);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.get(1), Some(&Tags(vec!["ccc".into()])));
    }

    #[test]
    fn push_and_pop() {
        let mut c = numbers(2);
        assert_eq!(c.push(3), 3);
        assert_eq!(c.pop(), Some(3));
        assert_eq!(c.to_vec(), vec![1, 2]);
    }

    #[test]
    fn push_all_of_own_items_doubles() {
        let mut c = numbers(3);
        let len = c.push_all(c.to_vec());
        assert_eq!(len, 6);
        assert_eq!(c.to_vec(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn shift_and_pop_on_empty() {
        let mut c: Collection<i32> = Collection::new();
        assert_eq!(c.shift(), None);
        assert_eq!(c.pop(), None);
    }

    #[test]
    fn unshift_prepends_in_order() {
        let mut c = numbers(2);
        assert_eq!(c.unshift([8, 9]), 4);
        assert_eq!(c.to_vec(), vec![8, 9, 1, 2]);
        assert_eq!(c.shift(), Some(8));
    }

    #[test]
    fn splice_returns_removed_items() {
        let mut c = numbers(5);
        let removed = c.splice(1, Some(2), [20, 30, 40]);
        assert_eq!(removed.to_vec(), vec![2, 3]);
        assert_eq!(c.to_vec(), vec![1, 20, 30, 40, 4, 5]);

        let tail = c.splice(-2, None, []);
        assert_eq!(tail.to_vec(), vec![4, 5]);
        assert_eq!(c.to_vec(), vec![1, 20, 30, 40]);
    }

    #[test]
    fn fill_and_copy_within() {
        let mut c = numbers(5);
        c.fill(0, 1, Some(3));
        assert_eq!(c.to_vec(), vec![1, 0, 0, 4, 5]);

        let mut c = numbers(5);
        c.copy_within(0, 3, None);
        assert_eq!(c.to_vec(), vec![4, 5, 3, 4, 5]);

        let mut c = numbers(5);
        c.copy_within(3, 0, None);
        assert_eq!(c.to_vec(), vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn slice_with_negative_bounds() {
        let c = numbers(5);
        assert_eq!(c.slice(1, Some(-1)).to_vec(), vec![2, 3, 4]);
        assert_eq!(c.slice(-2, None).to_vec(), vec![4, 5]);
        assert!(c.slice(4, Some(2)).is_empty());
    }

    #[test]
    fn chunk_keeps_the_remainder() {
        let chunks = numbers(5).chunk(2);
        let shapes: Vec<Vec<i32>> = chunks.iter().map(|c| c.to_vec()).collect();
        assert_eq!(shapes, vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert!(numbers(5).chunk(0).is_empty());
    }

    #[test]
    fn for_page_windows() {
        let c = numbers(7);
        assert_eq!(c.for_page(1, 3).to_vec(), vec![1, 2, 3]);
        assert_eq!(c.for_page(3, 3).to_vec(), vec![7]);
        assert!(c.for_page(4, 3).is_empty());
        assert_eq!(c.for_page(0, 2).to_vec(), vec![1, 2]);
    }

    #[test]
    fn take_and_skip() {
        let c = numbers(5);
        assert_eq!(c.take(2).to_vec(), vec![1, 2]);
        assert_eq!(c.take(-2).to_vec(), vec![4, 5]);
        assert_eq!(c.take(10), c);
        assert_eq!(c.skip(2).to_vec(), vec![3, 4, 5]);
        assert_eq!(c.skip(-2).to_vec(), vec![1, 2, 3]);
        assert!(c.skip(10).is_empty());
    }

    #[test]
    fn take_while_drains_the_receiver() {
        let mut c = numbers(5);
        let taken = c.take_while(|n| *n < 3);
        assert_eq!(taken.to_vec(), vec![1, 2]);
        assert_eq!(c.to_vec(), vec![3, 4, 5]);

        let taken = c.take_until(|n| *n == 5);
        assert_eq!(taken.to_vec(), vec![3, 4]);
        assert_eq!(c.to_vec(), vec![5]);
    }

    #[test]
    fn skip_while_leaves_the_receiver() {
        let c = numbers(5);
        assert_eq!(c.skip_while(|n| *n < 3).to_vec(), vec![3, 4, 5]);
        assert_eq!(c.skip_until(|n| *n == 4).to_vec(), vec![4, 5]);
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn pad_both_directions() {
        let c = numbers(2);
        assert_eq!(c.pad(4, Some(9)).to_vec(), vec![1, 2, 9, 9]);
        assert_eq!(c.pad(-4, Some(9)).to_vec(), vec![9, 9, 1, 2]);
        assert_eq!(c.pad(1, Some(9)), c);
    }

    #[test]
    fn pad_normalizes_falsy_values() {
        let c: Collection<String> = vec!["a".to_string()].into();
        let padded = c.pad(3, Some(String::new()));
        assert_eq!(padded.to_vec(), vec!["a", "", ""]);
    }

    #[test]
    fn when_and_unless() {
        let doubled = numbers(2).when(true, |c| c.map(|n| n * 2)).unwrap();
        assert_eq!(doubled.to_vec(), vec![2, 4]);

        let same = numbers(2).unless(true, |c| c.map(|n| n * 2)).unwrap();
        assert_eq!(same.to_vec(), vec![1, 2]);

        let chosen = numbers(3)
            .when_else(
                Condition::predicate(|c: &Collection<i32>| c.len() > 5),
                |c| c.take(1),
                |c| c.take(-1),
            )
            .unwrap();
        assert_eq!(chosen.to_vec(), vec![3]);
    }

    #[test]
    fn when_rejects_non_boolean_data() {
        let err = numbers(2)
            .when(serde_json::json!(1), |c| c)
            .unwrap_err();
        assert!(err.to_string().contains("`when`"));
    }

    #[test]
    fn emptiness_branches() {
        let empty: Collection<i32> = Collection::new();
        assert_eq!(empty.when_empty(|_| numbers(1)).to_vec(), vec![1]);
        assert_eq!(numbers(2).when_not_empty(|c| c.take(1)).to_vec(), vec![1]);
        assert_eq!(numbers(2).when_empty(|_| Collection::new()).len(), 2);
    }

    #[test]
    fn tap_pipe_and_reduce() {
        let mut seen = 0;
        let total = numbers(4)
            .tap(|c| seen = c.len())
            .pipe(|c| c.reduce(0, |acc, n| acc + n));
        assert_eq!(seen, 4);
        assert_eq!(total, 10);
    }

    #[test]
    fn dump_returns_the_collection_untouched() {
        let c = numbers(3);
        assert_eq!(c.dump(Some("numbers")), &c);
        assert_eq!(c.dump(None).len(), 3);
    }
}
