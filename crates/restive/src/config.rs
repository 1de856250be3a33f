//! # Configuration
//!
//! Model-wide defaults are managed by [`confique`], which handles layered
//! loading from TOML files, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `RESTIVE_ATTRIBUTE_CASING`.
//! 2. **Config file**: a `restive.toml` passed to [`ModelConfig::load`].
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `attribute_casing` | `camel` | Casing applied to bulk-assigned keys (`camel` or `snake`) |
//! | `fillable` | none | Default allow-list for models that don't supply a policy |
//! | `guarded` | none | Default deny-list for models that don't supply a policy |

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::attributes::GuardPolicy;
use crate::casing::AttributeCasing;
use crate::error::Result;

/// Configuration for models, stored in `restive.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Casing applied to every key entering a model through bulk assignment.
    #[config(default = "camel", env = "RESTIVE_ATTRIBUTE_CASING")]
    pub attribute_casing: AttributeCasing,

    /// Allow-list applied when a model definition doesn't set one.
    pub fillable: Option<Vec<String>>,

    /// Deny-list applied when a model definition doesn't set one.
    pub guarded: Option<Vec<String>>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            attribute_casing: AttributeCasing::Camel,
            fillable: None,
            guarded: None,
        }
    }
}

impl ModelConfig {
    /// Load from the environment and an optional TOML file.
    ///
    /// A missing file is not an error; compiled defaults fill the gaps.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    /// The guard policy these settings describe.
    ///
    /// Lists left unset fall back to the restrictive default inside
    /// [`crate::attributes::Guard`].
    pub fn guard_policy(&self) -> GuardPolicy {
        GuardPolicy {
            fillable: self.fillable.clone(),
            guarded: self.guarded.clone(),
        }
    }
}
