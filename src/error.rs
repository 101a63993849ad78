use thiserror::Error;

/// Errors raised while turning authored JSON text into content values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    #[error("Invalid JSON: {0}")]
    JsonParse(String),

    #[error("JSON does not describe a {expected}: {message}")]
    Decode { expected: String, message: String },
}

impl ContentError {
    pub(crate) fn decode(expected: &str, err: impl std::fmt::Display) -> Self {
        ContentError::Decode {
            expected: expected.to_string(),
            message: err.to_string(),
        }
    }
}

/// Errors raised while loading runtime settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Invalid config file '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Errors reported by a content store collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store rejected the write for '{key}': {message}")]
    Rejected { key: String, message: String },

    #[error("Store I/O failed: {0}")]
    Io(String),

    #[error("Store snapshot could not be written: {0}")]
    Encode(String),

    #[error("Store snapshot is unreadable: {0}")]
    Snapshot(String),
}

/// Errors surfaced by the authoring draft when previewing or publishing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthoringError {
    #[error("Cannot publish '{key}' while its JSON is invalid: {message}")]
    InvalidJson { key: String, message: String },

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised when a student opens a published module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("Module '{0}' has not been published")]
    NotFound(String),

    #[error("Module '{key}' could not be loaded: {source}")]
    Content { key: String, source: ContentError },

    #[error(transparent)]
    Store(#[from] StoreError),
}
