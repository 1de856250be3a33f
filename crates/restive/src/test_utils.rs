use serde_json::{Map, Value};

use crate::attributes::CastKind;
use crate::model::{Model, ModelBuilder};
use crate::relations::RelationSet;

/// Unwrap a `json!({...})` literal into an attribute map.
pub fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("attrs() expects a JSON object, got {other}"),
    }
}

/// Builder for a typical "user" model used across tests.
pub struct ModelFixture {
    builder: ModelBuilder,
}

impl Default for ModelFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelFixture {
    pub fn new() -> Self {
        Self {
            builder: Model::builder("User")
                .fillable(["firstName", "lastName", "email", "age", "active", "tags"])
                .cast("age", CastKind::Number)
                .cast("active", CastKind::Boolean)
                .cast("tags", CastKind::Collection),
        }
    }

    pub fn with_relations(mut self, names: &[&str]) -> Self {
        self.builder = self
            .builder
            .relations(names.iter().copied().collect::<RelationSet>());
        self
    }

    pub fn build(self, input: Value) -> Model {
        self.builder.build(attrs(input))
    }
}
