use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write turn to '{table}': {message}")]
    Write { table: String, message: String },
}

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("failed to fetch parameter '{name}': {message}")]
    Fetch { name: String, message: String },
    #[error("parameter '{0}' has no value")]
    Empty(String),
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid API key header: {0}")]
    InvalidApiKey(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("response contained no text content")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
