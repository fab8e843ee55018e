use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider returned no text")]
    EmptyResponse,
    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),
}
