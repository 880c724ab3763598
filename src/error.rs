use thiserror::Error;

/// Errors that can occur while talking to the firmware
#[derive(Error, Debug)]
pub enum RfmError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Drive not mounted")]
    DriveNotMounted,

    /// The firmware answered with a nonzero error code that has no
    /// more specific meaning for the attempted operation.
    #[error("Failed to perform: {action}")]
    OperationFailed { action: String },

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for file manager operations
pub type Result<T> = std::result::Result<T, RfmError>;
