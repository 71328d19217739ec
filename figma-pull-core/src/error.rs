use std::path::PathBuf;

/// Error type shared by the decomposition engine, the Figma client and the pull pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PullError {
    /// Creating a directory or writing a file failed.
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request never produced a response (connect, timeout, body decode).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("GET {url} failed: {status} {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("FIGMA_TOKEN environment variable is required")]
    MissingToken,

    #[error("token is not a valid header value: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

impl PullError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PullError::Io {
            path: path.into(),
            source,
        }
    }
}
