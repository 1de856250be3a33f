//! # Attribute System
//!
//! The pieces a [`crate::model::Model`] composes to manage its attributes:
//!
//! - **Storage** ([`AttributeStore`]): raw JSON values plus the Original
//!   Snapshot used for change detection.
//! - **Casting** ([`Casts`]): per-key presentation of raw values on read.
//! - **Guarding** ([`Guard`]): which keys bulk assignment may set.
//! - **Overrides** ([`Accessors`]): per-key getters, setters and computed members.
//!
//! ## Cast Kinds
//!
//! | Kind | Accepts | Produces |
//! |------|---------|----------|
//! | `boolean` | `true`/`false`/`1`/`0`, any case, as JSON or text | [`AttrValue::Bool`] |
//! | `number` | anything that coerces to a number | [`AttrValue::Number`] |
//! | `string` | anything | [`AttrValue::Text`] |
//! | `collection` | arrays | [`AttrValue::Collection`] |
//! | `datetime` | RFC 3339, `YYYY-MM-DD`, epoch millis | [`AttrValue::DateTime`] |
//! | `class` | whatever the [`CustomCaster`] accepts | whatever it returns |
//!
//! ## Write Path
//!
//! ```text
//! fill(attrs) ──► Guard::fillable_from ──► force_fill ──► set_attribute ──► store
//! ```
//!
//! Read path: store ──► getter override or [`Casts::cast_attribute`].

mod accessors;
mod casts;
mod guard;
mod store;
mod value;

pub use accessors::{Accessors, Getter, Member, Setter};
pub use casts::{Cast, CastKind, CastMap, Casts, CustomCaster};
pub use guard::{Guard, GuardPolicy, WILDCARD};
pub use store::AttributeStore;
pub use value::AttrValue;
