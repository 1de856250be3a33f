//! Operations that compare items by deep equality.

use super::Items;

/// Equality-based operations, available on every [`Items`] container whose
/// items implement `PartialEq`.
///
/// Comparison is structural: two JSON objects with the same keys and values
/// are equal regardless of where they came from.
pub trait SetOps<T: PartialEq + Clone>: Items<T> {
    fn contains(&self, value: &T) -> bool {
        self.items().contains(value)
    }

    fn index_of(&self, value: &T) -> Option<usize> {
        self.items().iter().position(|item| item == value)
    }

    /// Keep the first occurrence of each distinct item.
    fn unique(&self) -> Self {
        let mut kept: Vec<T> = Vec::new();
        for item in self.items() {
            if !kept.contains(item) {
                kept.push(item.clone());
            }
        }
        Self::from_items(kept)
    }

    /// Keep only the items whose key occurs exactly once. `[1, 2, 3, 4]` keyed
    /// by parity gives `[]`; keyed by parity, `[1, 2, 4]` gives `[1]`.
    fn unique_by<K: PartialEq>(&self, key: impl FnMut(&T) -> K) -> Self {
        let keys: Vec<K> = self.items().iter().map(key).collect();
        let kept = self
            .items()
            .iter()
            .zip(&keys)
            .filter(|(_, k)| keys.iter().filter(|other| other == k).count() == 1)
            .map(|(item, _)| item.clone())
            .collect();
        Self::from_items(kept)
    }

    /// Items that have at least one equal peer, each reported once.
    fn duplicates(&self) -> Self {
        self.duplicates_by(T::clone)
    }

    fn duplicates_by<K: PartialEq>(&self, key: impl FnMut(&T) -> K) -> Self {
        let keys: Vec<K> = self.items().iter().map(key).collect();
        let mut reported: Vec<&K> = Vec::new();
        let mut kept = Vec::new();
        for (index, (item, k)) in self.items().iter().zip(&keys).enumerate() {
            let repeated = keys
                .iter()
                .enumerate()
                .any(|(other, candidate)| other != index && candidate == k);
            if repeated && !reported.contains(&k) {
                reported.push(k);
                kept.push(item.clone());
            }
        }
        Self::from_items(kept)
    }

    /// Append the incoming items not already present in `self`.
    fn union(&self, items: impl IntoIterator<Item = T>) -> Self {
        let mut merged = self.to_vec();
        merged.extend(items.into_iter().filter(|item| !self.contains(item)));
        Self::from_items(merged)
    }

    fn intersect(&self, values: &[T]) -> Self {
        self.filter(|item| values.contains(item))
    }

    /// Items of `self` that do not appear in `values`.
    fn diff(&self, values: &[T]) -> Self {
        self.reject(|item| values.contains(item))
    }
}

impl<T: PartialEq + Clone, C: Items<T>> SetOps<T> for C {}
