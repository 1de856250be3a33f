//! Operations specific to collections of JSON values, the shape API results
//! arrive in.

use serde_json::{Map, Value};

use super::{Collection, Items, SetOps};
use crate::error::{ModelError, Result};

impl Collection<Value> {
    /// Extract one property from every item. Missing properties become `null`.
    pub fn pluck(&self, prop: &str) -> Result<Collection<Value>> {
        self.objects("pluck")?
            .into_iter()
            .map(|object| Ok(object.get(prop).cloned().unwrap_or(Value::Null)))
            .collect()
    }

    /// Project every item onto `props`. Properties an item lacks are left out
    /// of its projection.
    pub fn pluck_many(&self, props: &[&str]) -> Result<Collection<Value>> {
        self.objects("pluck_many")?
            .into_iter()
            .map(|object| {
                let projected: Map<String, Value> = props
                    .iter()
                    .filter_map(|p| object.get(*p).map(|v| (p.to_string(), v.clone())))
                    .collect();
                Ok(Value::Object(projected))
            })
            .collect()
    }

    /// Keep the first object for each distinct value of `prop`.
    pub fn unique_by_key(&self, prop: &str) -> Self {
        self.first_per_key(|item| item.get(prop).cloned())
    }

    /// Key-function dedup that follows the shape of the items. When every item
    /// is an object the first item per key is kept; otherwise only items whose
    /// key occurs exactly once survive, as with [`SetOps::unique_by`].
    pub fn unique_with<K: PartialEq>(&self, key: impl FnMut(&Value) -> K) -> Self {
        if self.iter().all(Value::is_object) {
            self.first_per_key(key)
        } else {
            self.unique_by(key)
        }
    }

    pub fn duplicates_by_key(&self, prop: &str) -> Self {
        self.duplicates_by(|item| item.get(prop).cloned())
    }

    /// Left-only items followed by one array of the `values` missing from
    /// `self`: `[1, 2, 3]` against `[2, 4]` gives `[1, 3, [4]]`.
    pub fn diff_with_missing(&self, values: &[Value]) -> Self {
        let mut out = self.diff(values).to_vec();
        let missing: Vec<Value> = values
            .iter()
            .filter(|value| !self.contains(value))
            .cloned()
            .collect();
        out.push(Value::Array(missing));
        Collection::from(out)
    }

    fn first_per_key<K: PartialEq>(&self, mut key: impl FnMut(&Value) -> K) -> Self {
        let mut seen: Vec<K> = Vec::new();
        let mut kept = Vec::new();
        for item in self.iter() {
            let k = key(item);
            if !seen.contains(&k) {
                seen.push(k);
                kept.push(item.clone());
            }
        }
        Collection::from(kept)
    }

    fn objects(&self, method: &'static str) -> Result<Vec<&Map<String, Value>>> {
        self.iter()
            .enumerate()
            .map(|(index, item)| item.as_object().ok_or(ModelError::NotObject { method, index }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> Collection<Value> {
        vec![
            json!({"id": 1, "name": "Ada", "team": "core"}),
            json!({"id": 2, "name": "Grace", "team": "core"}),
            json!({"id": 3, "team": "docs"}),
        ]
        .into()
    }

    #[test]
    fn pluck_fills_missing_with_null() {
        let names = people().pluck("name").unwrap();
        assert_eq!(names.to_vec(), vec![json!("Ada"), json!("Grace"), Value::Null]);
    }

    #[test]
    fn pluck_many_projects_present_props() {
        let projected = people().pluck_many(&["id", "name"]).unwrap();
        assert_eq!(projected.get(0), Some(&json!({"id": 1, "name": "Ada"})));
        assert_eq!(projected.get(2), Some(&json!({"id": 3})));
    }

    #[test]
    fn pluck_rejects_non_objects() {
        let mixed: Collection<Value> = vec![json!({"a": 1}), json!(2)].into();
        match mixed.pluck("a") {
            Err(ModelError::NotObject { method, index }) => {
                assert_eq!(method, "pluck");
                assert_eq!(index, 1);
            }
            other => panic!("Expected NotObject, got {other:?}"),
        }
    }

    #[test]
    fn key_based_dedup() {
        let teams = people().unique_by_key("team");
        assert_eq!(teams.len(), 2);
        assert_eq!(teams.get(1), Some(&json!({"id": 3, "team": "docs"})));

        let dupes = people().duplicates_by_key("team");
        assert_eq!(dupes.to_vec(), vec![json!({"id": 1, "name": "Ada", "team": "core"})]);
    }

    #[test]
    fn unique_with_depends_on_item_shape() {
        let by_team = people().unique_with(|item| item["team"].clone());
        assert_eq!(
            by_team.pluck("id").unwrap().to_vec(),
            vec![json!(1), json!(3)]
        );

        let scalars: Collection<Value> = vec![json!(1), json!(2), json!(3), json!(4)].into();
        assert!(scalars.unique_with(|n| n.as_i64().map(|n| n % 2)).is_empty());

        let mixed: Collection<Value> = vec![json!({"team": "core"}), json!("core"), json!("docs")].into();
        let kept = mixed.unique_with(|item| item.is_object());
        assert_eq!(kept.to_vec(), vec![json!({"team": "core"})]);
        let kept = mixed.unique_with(|item| item.as_str() == Some("docs"));
        assert_eq!(kept.to_vec(), vec![json!("docs")]);
    }

    #[test]
    fn diff_with_missing_appends_right_only_items() {
        let c: Collection<Value> = vec![json!(1), json!(2), json!(3)].into();
        let out = c.diff_with_missing(&[json!(2), json!(4)]);
        assert_eq!(Value::Array(out.to_vec()), json!([1, 3, [4]]));

        let same = c.diff_with_missing(&c.to_vec());
        assert_eq!(Value::Array(same.to_vec()), json!([[]]));
    }
}
