use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the outer surfaces (input reading, JSON, keyword parsing).
/// The pipeline itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown direction: {0}")]
    UnknownDirection(String),
}
