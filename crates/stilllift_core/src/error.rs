use thiserror::Error;

/// Failure to interpret a wire string as one of the fixed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown mood: {0:?}")]
    UnknownMood(String),
    #[error("unknown context: {0:?}")]
    UnknownContext(String),
}

/// Failure to load a content library from its authored source.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content library {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed content library: {0}")]
    Malformed(#[from] serde_json::Error),
}
