//! # Models
//!
//! A [`Model`] is one record from an API endpoint: its raw attributes, the
//! snapshot they were last synced to, and the rules for reading and writing
//! them. It composes the pieces from [`crate::attributes`]:
//!
//! ```text
//!            ┌──────────────┐
//!  fill ────►│    Guard     │── drops guarded keys
//!            └──────┬───────┘
//!                   ▼
//!  force_fill ─► normalize casing ─► set_attribute ─► setter override
//!                                                  ├► relation capability
//!                                                  └► AttributeStore
//!
//!  get_attribute ─► AttributeStore ─► getter override or Casts
//!               └─► relation capability ─► computed members ─► default
//! ```
//!
//! ## Dirty Tracking
//!
//! Every attribute key is `unset`, or `set` and then either *clean* or
//! *dirty*: dirty when its raw value is not deep-equal to the Original
//! Snapshot. The snapshot is taken when the model is built and whenever
//! [`Model::sync_original`] is called.
//!
//! ## Inherited Presence Checks
//!
//! Three single-key lookups use *truthiness* rather than presence, which API
//! code built against these models relies on:
//!
//! - [`Model::get_original`] treats `0`, `false`, `""` and `null` as absent.
//! - [`Model::get_change`] ignores keys whose current value is falsy.
//! - [`Model::sync_original_keys`] ignores keys the snapshot has never seen.
//!
//! [`Model::get_raw_original`] only treats absent and `null` as missing.
//!
//! ## Bulk Output
//!
//! Projections ([`Model::get_attributes`], [`Model::get_changes`],
//! [`Model::only`], [`Model::except`], [`Model::to_json`]) render cast values
//! into a JSON map in attribute insertion order.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::attributes::{
    Accessors, AttrValue, AttributeStore, Cast, CastMap, Casts, Guard, GuardPolicy,
};
use crate::casing::AttributeCasing;
use crate::coerce::Truthy;
use crate::config::ModelConfig;
use crate::error::Result;
use crate::relations::{RelationSet, Relations};

/// Input keys that collide with intrinsic members of the objects API clients
/// deserialize into. They never become attributes.
static RESERVED_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "constructor",
        "prototype",
        "__proto__",
        "__defineGetter__",
        "__defineSetter__",
        "__lookupGetter__",
        "__lookupSetter__",
        "hasOwnProperty",
        "isPrototypeOf",
        "propertyIsEnumerable",
        "toLocaleString",
        "toString",
        "valueOf",
    ]
    .into_iter()
    .collect()
});

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(key)
}

pub struct Model {
    casing: AttributeCasing,
    casts: Casts,
    guard: Guard,
    store: AttributeStore,
    accessors: Accessors,
    relations: Box<dyn Relations + Send + Sync>,
}

impl Model {
    /// Start configuring a model of the named type.
    pub fn builder(type_name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(type_name)
    }

    /// The type name, used as the owner in cast errors.
    pub fn type_name(&self) -> &str {
        self.casts.owner()
    }

    /// The key casing applied on `force_fill`.
    pub fn casing(&self) -> AttributeCasing {
        self.casing
    }

    /// The per-key cast registry.
    pub fn casts(&self) -> &Casts {
        &self.casts
    }

    /// The fillable/guarded policy consulted by `fill`.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn guard_mut(&mut self) -> &mut Guard {
        &mut self.guard
    }

    /// The relation capability this model was built with.
    pub fn relations(&self) -> &dyn Relations {
        self.relations.as_ref()
    }

    /// Raw attributes and the original snapshot.
    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    // --- Policy ---

    /// Replace the cast registry. See [`Casts::merge_casts`].
    pub fn merge_casts(&mut self, casts: &CastMap) -> &mut Self {
        self.casts.merge_casts(casts);
        self
    }

    /// Extend the allow-list. See [`Guard::merge_fillable`].
    pub fn merge_fillable<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guard.merge_fillable(keys);
        self
    }

    /// Extend the deny-list. See [`Guard::merge_guarded`].
    pub fn merge_guarded<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guard.merge_guarded(keys);
        self
    }

    // --- Reads ---

    /// Read `key`.
    ///
    /// Resolution order: stored attribute (getter override, else cast), loaded
    /// relation, computed member, nothing. A declared relation that hasn't been
    /// loaded reads as nothing, even if a member shares its name.
    pub fn get_attribute(&self, key: &str) -> Result<Option<AttrValue>> {
        if let Some(raw) = self.store.get(key) {
            return self.present(key, raw).map(Some);
        }

        if self.relations.relation_loaded(key) {
            return Ok(self
                .relations
                .get_relation(key)
                .map(|value| AttrValue::Json(value.clone())));
        }

        if self.relations.relation_defined(key) {
            return Ok(None);
        }

        Ok(self
            .accessors
            .get_member(key)
            .map(|member| member(&self.store)))
    }

    /// Read `key`, falling back to `default` when nothing resolves.
    pub fn get_attribute_or(&self, key: &str, default: impl Into<AttrValue>) -> Result<AttrValue> {
        Ok(self.get_attribute(key)?.unwrap_or_else(|| default.into()))
    }

    /// Whether `key` is stored, whatever its value.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    /// Stored values, uncast.
    pub fn get_raw_attributes(&self) -> &Map<String, Value> {
        self.store.attributes()
    }

    /// Cast every stored attribute.
    pub fn get_attributes(&self) -> Result<Map<String, Value>> {
        self.render(self.store.keys())
    }

    /// Cast attributes for `keys`, skipping keys that aren't stored.
    pub fn only<S: AsRef<str>>(&self, keys: &[S]) -> Result<Map<String, Value>> {
        let present: Vec<String> = keys
            .iter()
            .map(|key| key.as_ref().to_string())
            .filter(|key| self.store.contains(key))
            .collect();
        self.render(&present)
    }

    /// Cast attributes for every stored key not in `keys`.
    pub fn except<S: AsRef<str>>(&self, keys: &[S]) -> Result<Map<String, Value>> {
        let excluded: HashSet<&str> = keys.iter().map(AsRef::as_ref).collect();
        self.render(
            self.store
                .keys()
                .filter(|key| !excluded.contains(key.as_str())),
        )
    }

    /// The cast attributes as a JSON object.
    pub fn to_json(&self) -> Result<Value> {
        self.get_attributes().map(Value::Object)
    }

    // --- Writes ---

    /// Write a single attribute.
    ///
    /// Not subject to the guard: only bulk assignment is filtered. A setter
    /// override takes the write over entirely; an object or array value for a
    /// declared relation registers the relation instead of an attribute.
    pub fn set_attribute(&mut self, key: &str, value: Value) -> &mut Self {
        if let Some(setter) = self.accessors.get_setter(key).cloned() {
            setter(&mut self.store, value);
            return self;
        }

        if is_relation_payload(&value) && self.relations.relation_defined(key) {
            self.relations.add_relation(key, value);
            return self;
        }

        self.casts.offer(key, &value);
        self.store.set(key, value);
        self
    }

    /// Remove `key`, returning it to the unset state.
    pub fn forget_attribute(&mut self, key: &str) -> Option<Value> {
        self.store.remove(key)
    }

    /// Bulk-assign the keys the guard allows.
    ///
    /// The guard sees keys as given, before casing normalization.
    pub fn fill(&mut self, attrs: Map<String, Value>) -> &mut Self {
        let allowed = self.guard.fillable_from(attrs);
        self.force_fill(allowed)
    }

    /// Bulk-assign every key, bypassing the guard.
    pub fn force_fill(&mut self, attrs: Map<String, Value>) -> &mut Self {
        for (key, value) in attrs {
            let key = self.casing.apply(&key);
            self.set_attribute(&key, value);
        }
        self
    }

    // --- Snapshot ---

    /// Snapshot the current attributes; the model becomes clean.
    pub fn sync_original(&mut self) -> &mut Self {
        self.store.sync_all();
        self
    }

    /// Re-snapshot `keys`. Keys the snapshot has never seen are skipped.
    pub fn sync_original_keys<S: AsRef<str>>(&mut self, keys: &[S]) -> &mut Self {
        self.store.sync_keys(keys);
        self
    }

    /// Cast snapshot value for `key`; falsy snapshot values read as `None`.
    pub fn get_original(&self, key: &str) -> Result<Option<AttrValue>> {
        match self.store.original_value(key) {
            Some(raw) if raw.is_truthy() => self.casts.cast_attribute(key, raw).map(Some),
            _ => Ok(None),
        }
    }

    /// The whole cast snapshot, or `None` when it is empty.
    pub fn get_original_all(&self) -> Result<Option<Map<String, Value>>> {
        if self.store.original().is_empty() {
            return Ok(None);
        }
        self.store
            .original()
            .iter()
            .map(|(key, raw)| Ok((key.clone(), self.casts.cast_attribute(key, raw)?.to_json())))
            .collect::<Result<Map<String, Value>>>()
            .map(Some)
    }

    /// Raw snapshot value for `key`; absent and `null` read as `None`.
    pub fn get_raw_original(&self, key: &str) -> Option<&Value> {
        self.store.original_value(key).filter(|raw| !raw.is_null())
    }

    /// The whole raw snapshot, or `None` when it is empty.
    pub fn get_raw_original_all(&self) -> Option<&Map<String, Value>> {
        Some(self.store.original()).filter(|original| !original.is_empty())
    }

    // --- Changes ---

    /// Cast current values of every dirty key, or `None` if nothing is dirty.
    pub fn get_changes(&self) -> Result<Option<Map<String, Value>>> {
        let changed = self.store.changed_keys();
        if changed.is_empty() {
            return Ok(None);
        }
        self.render(changed).map(Some)
    }

    /// Cast current value of `key` if it is dirty and its current value is truthy.
    pub fn get_change(&self, key: &str) -> Result<Option<Map<String, Value>>> {
        if !self.has_change(key) {
            return Ok(None);
        }
        self.only(&[key]).map(Some)
    }

    /// Whether any stored key differs from the snapshot.
    pub fn has_changes(&self) -> bool {
        !self.store.changed_keys().is_empty()
    }

    pub fn has_change(&self, key: &str) -> bool {
        self.store.get(key).is_some_and(Truthy::is_truthy) && self.store.is_changed(key)
    }

    /// Same as [`Model::has_changes`].
    pub fn is_dirty(&self) -> bool {
        self.has_changes()
    }

    pub fn is_dirty_key(&self, key: &str) -> bool {
        self.has_change(key)
    }

    /// Negation of [`Model::is_dirty`].
    pub fn is_clean(&self) -> bool {
        !self.is_dirty()
    }

    pub fn is_clean_key(&self, key: &str) -> bool {
        !self.is_dirty_key(key)
    }

    // --- Internals ---

    fn present(&self, key: &str, raw: &Value) -> Result<AttrValue> {
        match self.accessors.get_getter(key) {
            Some(getter) => Ok(getter(raw)),
            None => self.casts.cast_attribute(key, raw),
        }
    }

    fn render<'a, I>(&self, keys: I) -> Result<Map<String, Value>>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut out = Map::new();
        for key in keys {
            if let Some(raw) = self.store.get(key) {
                out.insert(key.clone(), self.present(key, raw)?.to_json());
            }
        }
        Ok(out)
    }
}

fn is_relation_payload(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("type_name", &self.type_name())
            .field("casing", &self.casing)
            .field("casts", &self.casts)
            .field("guard", &self.guard)
            .field("store", &self.store)
            .field("accessors", &self.accessors)
            .finish_non_exhaustive()
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.get_attributes()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Defines a model type and builds instances of it.
///
/// The guard policy set here plays the role of the definition's
/// initialization hook: it is in place before any attribute is assigned.
pub struct ModelBuilder {
    type_name: String,
    casing: AttributeCasing,
    casts: CastMap,
    policy: GuardPolicy,
    accessors: Accessors,
    relations: Box<dyn Relations + Send + Sync>,
}

impl ModelBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            casing: AttributeCasing::default(),
            casts: CastMap::new(),
            policy: GuardPolicy::default(),
            accessors: Accessors::new(),
            relations: Box::new(RelationSet::new()),
        }
    }

    /// Take casing and default guard lists from `config`.
    ///
    /// Lists set explicitly on the builder afterwards take precedence.
    pub fn with_config(mut self, config: &ModelConfig) -> Self {
        self.casing = config.attribute_casing;
        self.policy = config.guard_policy();
        self
    }

    pub fn casing(mut self, casing: AttributeCasing) -> Self {
        self.casing = casing;
        self
    }

    pub fn cast(mut self, key: impl Into<String>, cast: impl Into<Cast>) -> Self {
        self.casts.insert(key.into(), cast.into());
        self
    }

    pub fn casts(mut self, casts: CastMap) -> Self {
        self.casts = casts;
        self
    }

    pub fn policy(mut self, policy: GuardPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn fillable<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.fillable = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn guarded<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.guarded = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Register getters, setters and computed members.
    pub fn accessors(mut self, register: impl FnOnce(&mut Accessors)) -> Self {
        register(&mut self.accessors);
        self
    }

    pub fn relations(mut self, relations: impl Relations + Send + Sync + 'static) -> Self {
        self.relations = Box::new(relations);
        self
    }

    /// Build an instance from an API payload.
    ///
    /// Reserved keys are dropped, keys are normalized to the configured casing,
    /// object payloads for declared relations are registered as relations, the
    /// rest go through guarded bulk assignment. The result is clean.
    pub fn build(self, input: Map<String, Value>) -> Model {
        let mut casts = Casts::new(self.type_name);
        casts.merge_casts(&self.casts);

        let mut model = Model {
            casing: self.casing,
            casts,
            guard: Guard::new(self.policy),
            store: AttributeStore::new(),
            accessors: self.accessors,
            relations: self.relations,
        };

        let mut attributes = Map::new();
        for (key, value) in input {
            if is_reserved_key(&key) {
                tracing::trace!(key = %key, "skipping reserved key");
                continue;
            }
            let key = model.casing.apply(&key);
            if is_relation_payload(&value) && model.relations.relation_defined(&key) {
                model.relations.add_relation(&key, value);
            } else {
                attributes.insert(key, value);
            }
        }

        model.fill(attributes).sync_original();
        tracing::debug!(
            model = model.type_name(),
            attributes = model.store.attributes().len(),
            "model built"
        );
        model
    }

    /// Build an instance from a JSON object body, as [`ModelBuilder::build`]
    /// does. Text that is not a JSON object fails with
    /// [`ModelError::Serialization`](crate::ModelError::Serialization).
    pub fn build_json(self, body: &str) -> Result<Model> {
        let input: Map<String, Value> = serde_json::from_str(body)?;
        Ok(self.build(input))
    }

    pub fn build_empty(self) -> Model {
        self.build(Map::new())
    }
}
