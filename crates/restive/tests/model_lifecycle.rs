use std::io::Write;
use std::sync::{Arc, Mutex};

use restive::attributes::CastMap;
use restive::{
    AttrValue, AttributeCasing, Cast, CastKind, CustomCaster, Model, ModelConfig, ModelError,
    RelationSet, Result,
};
use serde_json::{json, Map, Value};

fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn article() -> Model {
    Model::builder("Article")
        .fillable(["title", "views", "published", "publishedAt", "tags"])
        .cast("views", CastKind::Number)
        .cast("published", CastKind::Boolean)
        .cast("publishedAt", CastKind::DateTime)
        .cast("tags", CastKind::Collection)
        .relations(RelationSet::new().declare("author"))
        .build(attrs(json!({
            "id": 10,
            "title": "Hello",
            "views": "12",
            "published": "TRUE",
            "published_at": "2024-03-01",
            "tags": ["rust", "api"],
            "author": {"id": 7, "name": "Ada"}
        })))
}

#[test]
fn test_payload_to_cast_output() {
    let model = article();

    assert!(!model.has_attribute("id"));
    assert!(!model.has_attribute("author"));
    assert!(model.is_clean());

    let out = model.to_json().unwrap();
    assert_eq!(out["title"], json!("Hello"));
    assert_eq!(out["views"], json!(12));
    assert_eq!(out["published"], json!(true));
    assert_eq!(out["publishedAt"], json!("2024-03-01T00:00:00Z"));
    assert_eq!(out["tags"], json!(["rust", "api"]));
    assert_eq!(
        model.get_attribute("author").unwrap(),
        Some(AttrValue::Json(json!({"id": 7, "name": "Ada"})))
    );
}

#[test]
fn test_edit_then_sync_cycle() {
    let mut model = article();

    model.set_attribute("views", json!(13));
    model.set_attribute("title", json!("Hello"));
    assert_eq!(model.get_changes().unwrap(), Some(attrs(json!({"views": 13}))));
    assert_eq!(model.get_raw_original("views"), Some(&json!("12")));

    model.sync_original();
    assert!(model.is_clean());
    assert_eq!(model.get_raw_original("views"), Some(&json!(13)));
}

#[test]
fn test_forgetting_and_refilling() {
    let mut model = article();
    assert_eq!(model.forget_attribute("title"), Some(json!("Hello")));
    assert_eq!(model.get_attribute("title").unwrap(), None);

    model.fill(attrs(json!({"title": "Again", "id": 99})));
    let title = model.get_attribute("title").unwrap();
    assert_eq!(title, Some(AttrValue::Json(json!("Again"))));
    assert!(title.is_some_and(|v| v == json!("Again")));
    assert!(!model.has_attribute("id"));
}

#[test]
fn test_bad_raw_value_fails_projection_but_not_storage() {
    let mut model = article();
    model.set_attribute("views", json!("many"));

    assert_eq!(model.get_raw_attributes().get("views"), Some(&json!("many")));
    match model.get_attribute("views") {
        Err(ModelError::TypeMismatch { key, owner, expected }) => {
            assert_eq!(key, "views");
            assert_eq!(owner, "Article");
            assert_eq!(expected, "number");
        }
        other => panic!("Expected TypeMismatch, got {other:?}"),
    }
    assert!(model.only(&["title"]).is_ok());
    assert!(model.except(&["title"]).is_err());
}

#[test]
fn test_merge_casts_replaces_registry() {
    let mut model = article();
    model.merge_casts(&CastMap::from([("title".to_string(), Cast::from("string"))]));

    assert!(!model.casts().has_cast("views"));
    assert_eq!(model.get_attribute("views").unwrap(), Some(AttrValue::Json(json!("12"))));
}

#[derive(Clone, Default)]
struct Cents {
    written: Arc<Mutex<Vec<Value>>>,
}

impl CustomCaster for Cents {
    fn get(&self, key: &str, raw: &Value) -> Result<AttrValue> {
        raw.as_i64()
            .map(|cents| AttrValue::Text(format!("{}.{:02}", cents / 100, cents % 100)))
            .ok_or_else(|| ModelError::TypeMismatch {
                key: key.to_string(),
                owner: "Order".to_string(),
                expected: "cents".to_string(),
            })
    }

    fn set(&self, _key: &str, value: &Value) {
        if let Ok(mut written) = self.written.lock() {
            written.push(value.clone());
        }
    }
}

#[test]
fn test_custom_caster_reads_and_observes_writes() {
    let cents = Cents::default();
    let mut order = Model::builder("Order")
        .fillable(["*"])
        .cast("total", Cast::custom(cents.clone()))
        .build(attrs(json!({"total": 1250})));

    assert_eq!(order.get_attribute("total").unwrap(), Some(AttrValue::from("12.50")));
    assert_eq!(order.casts().cast_type("total").as_deref(), Some("class"));

    order.set_attribute("total", json!(99));
    assert_eq!(order.to_json().unwrap(), json!({"total": "0.99"}));

    let written = cents.written.lock().unwrap();
    assert_eq!(*written, vec![json!(1250), json!(99)]);
}

#[test]
fn test_config_file_drives_builder() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "attribute_casing = \"snake\"\nguarded = [\"id\"]\nfillable = []").unwrap();

    let config = ModelConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.attribute_casing, AttributeCasing::Snake);

    let model = Model::builder("Account")
        .with_config(&config)
        .build(attrs(json!({"id": 1, "displayName": "ada"})));
    assert_eq!(model.get_raw_attributes(), &attrs(json!({"display_name": "ada"})));
}

#[test]
fn test_member_and_relation_precedence() {
    let model = Model::builder("Article")
        .fillable(["title"])
        .relations(RelationSet::new().declare("author").declare("comments"))
        .accessors(|a| {
            a.member("slug", |store| {
                let title = store.get("title").and_then(Value::as_str).unwrap_or_default();
                AttrValue::Text(title.to_lowercase().replace(' ', "-"))
            });
            a.member("comments", |_| AttrValue::from("never read"));
        })
        .build(attrs(json!({"title": "Hello World", "author": [{"id": 1}]})));

    assert_eq!(model.get_attribute("slug").unwrap(), Some(AttrValue::from("hello-world")));
    assert_eq!(model.get_attribute("comments").unwrap(), None);
    assert_eq!(
        model.get_attribute("author").unwrap(),
        Some(AttrValue::Json(json!([{"id": 1}])))
    );
}
