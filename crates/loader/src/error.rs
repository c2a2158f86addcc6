use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("gzip decode failed: {0}")]
    Gzip(#[from] std::io::Error),
    #[error("payload decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
