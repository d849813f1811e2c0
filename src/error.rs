use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConcordError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Permission denied: {0}")]
    PermissionError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Device busy: {0}")]
    DeviceBusyError(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConcordError>;
