use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Sort key '{key}' is not present on any record")]
    InvalidSortKey { key: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error in {path}: {reason}")]
    Config { path: String, reason: String },
}

impl DashError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }
}

pub type DashResult<T> = Result<T, DashError>;
