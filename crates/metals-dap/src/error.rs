use std::io;

use metals_core::sanitize_json_error_message;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DapError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization failure. The message has string values redacted.
    #[error("json error: {0}")]
    Json(String),

    #[error("dap protocol error: {0}")]
    Protocol(String),
}

impl From<serde_json::Error> for DapError {
    fn from(err: serde_json::Error) -> Self {
        DapError::Json(sanitize_json_error_message(&err.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("invalid debug adapter uri: {0}")]
    InvalidUri(String),
    #[error("debug adapter uri {0:?} has no host")]
    MissingHost(String),
    #[error("debug adapter uri {0:?} has no port")]
    MissingPort(String),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("language server request failed: {0}")]
    Server(String),

    #[error("editor request failed: {0}")]
    Host(String),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("json error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for LaunchError {
    fn from(err: serde_json::Error) -> Self {
        LaunchError::Json(sanitize_json_error_message(&err.to_string()))
    }
}

pub type LaunchResult<T> = Result<T, LaunchError>;
