use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ZipkeepError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("Zip Error: {0}")]
    Zip(#[from] Arc<zip::result::ZipError>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid source directory: {0}")]
    InvalidSource(String),

    #[error("Destination not writable: {0}")]
    DestinationUnwritable(String),

    #[error("Ownership change failed: {0}")]
    Ownership(String),

    #[error("Failed to list destination for retention: {0}")]
    RetentionList(String),

    #[error("Failed to delete artifact: {0}")]
    Deletion(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for ZipkeepError {
    fn from(err: std::io::Error) -> Self {
        ZipkeepError::Io(Arc::new(err))
    }
}

impl From<zip::result::ZipError> for ZipkeepError {
    fn from(err: zip::result::ZipError) -> Self {
        ZipkeepError::Zip(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ZipkeepError>;
