/// Errors produced by the deck API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Application error reported by the server (`{error}` body field or a
    /// non-2xx reply). Shown to the user verbatim.
    #[error("{0}")]
    Server(String),

    #[error("invalid deck location: {0:?}")]
    InvalidDeck(String),
}

impl ApiError {
    /// Whether the error should be surfaced in the UI. Transport and decode
    /// failures are only logged; the triggering action is abandoned.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ApiError::Server(_))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
