use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Every way a call against the prediction service can fail.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("input file '{}' does not exist", path.display())]
    InputFileMissing { path: PathBuf },

    #[error("cannot connect to server at {base_url}: {message}")]
    ConnectionFailed { base_url: String, message: String },

    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("{0}")]
    UnexpectedError(String),
}

impl ClientError {
    /// Stable, machine readable name of the failure category.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::InputFileMissing { .. } => "input_file_missing",
            ClientError::ConnectionFailed { .. } => "connection_failed",
            ClientError::Timeout { .. } => "timeout",
            ClientError::HttpError { .. } => "http_error",
            ClientError::UnexpectedError(_) => "unexpected_error",
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::UnexpectedError(format!("invalid service URL: {}", err))
    }
}
