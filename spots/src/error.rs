use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotError {
    #[error("overpass request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("overpass returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("overpass returned an unreadable payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RollError {
    #[error("route endpoints must be finite coordinates")]
    InvalidRoute,
    #[error("search radius must be strictly positive")]
    InvalidRadius,
}
