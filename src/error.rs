use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

/// Failures raised while resolving or loading a single record.
///
/// `MissingField` is row-scoped: the batch loop records it and moves on.
/// `Store` is fatal for the whole pass.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing field '{column}'")]
    MissingField { column: String },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl LoadError {
    pub fn missing(column: &str) -> Self {
        LoadError::MissingField {
            column: column.to_string(),
        }
    }
}
