use thiserror::Error;

/// Anything that can go wrong while talking to the catalog API.
///
/// Callers treat every variant the same way; the distinction only shows up in logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("artwork could not be decoded: {0}")]
    Image(#[from] image::ImageError),
}

/// A blocking, user-facing alert. Dismissed by any key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn list_failed() -> Self {
        Self::new("Error", "Failed to load Pokémon!")
    }

    pub fn detail_failed() -> Self {
        Self::new("Error", "Failed to fetch Pokémon details")
    }
}
