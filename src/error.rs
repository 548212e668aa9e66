use thiserror::Error;

/// Failures talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned HTTP {0}")]
    Status(u16),

    #[error("could not decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("no genres selected")]
    NoGenresSelected,

    #[error("unknown genre `{0}`")]
    UnknownGenre(String),

    #[error("rating {0} is out of range (0-5)")]
    InvalidRating(u8),
}
