//! # Restive Architecture
//!
//! Restive is the **attribute core** of a REST resource client: the part of an
//! ORM-style model that holds a record's fields, presents them with casts,
//! tracks what changed since the last sync, and keeps bulk assignment behind a
//! guard. Talking to the server, resolving relations and naming endpoints are
//! someone else's job. This crate only needs to be told what the payload was.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model (model.rs)                                           │
//! │  - Builder acts as the model definition                     │
//! │  - Read / write / snapshot / change-detection surface       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attribute System (attributes/)                             │
//! │  - AttributeStore: raw values + original snapshot           │
//! │  - Casts, Guard, Accessors                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Values (coerce.rs, collection/)                            │
//! │  - Loose coercion and truthiness over JSON                  │
//! │  - Collection: the ordered result-set type                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Relations plug in from the side through the [`relations::Relations`]
//! capability; casing comes from [`casing::AttributeCasing`].
//!
//! ## Key Principle: Raw In, Cast Out
//!
//! Stored values are exactly what arrived: `serde_json::Value`, never
//! converted on write. Casting happens on every read and every projection, so
//! a change of cast never loses data and dirty checks always compare what the
//! server sent against what will be sent back.
//!
//! ## Quick Start
//!
//! ```
//! use restive::{CastKind, Model};
//! use serde_json::json;
//!
//! let mut user = Model::builder("User")
//!     .fillable(["firstName", "age"])
//!     .cast("age", CastKind::Number)
//!     .build(json!({"first_name": "Ada", "age": "36", "role": "admin"})
//!         .as_object()
//!         .cloned()
//!         .unwrap_or_default());
//!
//! assert!(!user.has_attribute("role"));
//! assert!(user.is_clean());
//!
//! user.set_attribute("age", json!(37));
//! assert_eq!(user.to_json().unwrap(), json!({"firstName": "Ada", "age": 37}));
//! assert!(user.is_dirty());
//! ```
//!
//! ## Module Overview
//!
//! - [`model`]: `Model` and `ModelBuilder`
//! - [`attributes`]: storage, casts, guard and accessor overrides
//! - [`collection`]: `Collection` and the `Items` / `SetOps` traits
//! - [`relations`]: the relation capability and an in-memory implementation
//! - [`coerce`]: truthiness and loose number/string coercion
//! - [`casing`]: attribute key casing
//! - [`config`]: configuration management
//! - [`logging`]: subscriber setup
//! - [`error`]: error types

pub mod attributes;
pub mod casing;
pub mod coerce;
pub mod collection;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod relations;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use attributes::{AttrValue, Cast, CastKind, CustomCaster, GuardPolicy};
pub use casing::AttributeCasing;
pub use collection::{Collection, Condition, Items, Node, SetOps};
pub use config::ModelConfig;
pub use error::{ModelError, Result};
pub use model::{Model, ModelBuilder};
pub use relations::{RelationSet, Relations};
