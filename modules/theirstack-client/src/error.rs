use thiserror::Error;

pub type Result<T> = std::result::Result<T, TheirStackError>;

#[derive(Debug, Error)]
pub enum TheirStackError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TheirStackError {
    fn from(err: reqwest::Error) -> Self {
        TheirStackError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for TheirStackError {
    fn from(err: serde_json::Error) -> Self {
        TheirStackError::Parse(err.to_string())
    }
}
