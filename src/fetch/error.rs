// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected status code {status} from {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid pagination header {name}: {value:?}")]
    InvalidHeader { name: String, value: String },
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("Resource unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::UnexpectedStatus { status, .. } => Some(*status),
            FetchError::Http { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
