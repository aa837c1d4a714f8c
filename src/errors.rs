use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("invalid backup level '{0}', expected Full, Incremental or Differential")]
    InvalidBackupLevel(String),

    #[error("server returned an empty response")]
    EmptyResponse,

    #[error("request failed: {0}")]
    RequestFailure(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SdkError>;
