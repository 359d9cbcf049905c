use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Unsupported notification method: {0}")]
    UnsupportedMethod(String),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to serialize notification payload")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to deliver notification: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Notifier {0} not found")]
    NotifierNotFound(String),

    #[error("Failed to read file: {path}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl NotifyError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        NotifyError::Delivery(DeliveryError::Transport(message.into()))
    }
}

pub type NotifyResult<T> = Result<T, NotifyError>;
