use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    /// A raw attribute value could not be coerced to its declared cast.
    #[error("{owner}: attribute `{key}` cannot be cast to {expected}")]
    TypeMismatch {
        key: String,
        owner: String,
        expected: String,
    },

    #[error("invalid argument for `{method}`: {reason}")]
    InvalidArgument {
        method: &'static str,
        reason: String,
    },

    /// `has_cast` and `cast_type` disagree. Raised only on a misconfigured
    /// cast registry; never a recoverable condition.
    #[error("internal logic error: {0}")]
    InternalLogic(String),

    #[error("`{method}` requires object items, item {index} is not an object")]
    NotObject { method: &'static str, index: usize },

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn type_mismatch(
        key: impl Into<String>,
        owner: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            owner: owner.into(),
            expected: expected.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
