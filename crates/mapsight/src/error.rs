use thiserror::Error;

use crate::snapshot::FaultKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Snapshot not ready: {0}")]
    Transient(FaultKind),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn read_failed(address: u64, message: impl Into<String>) -> Self {
        Error::MemoryReadFailed {
            address,
            message: message.into(),
        }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Faults that are expected to clear on a later frame (area loading,
    /// half-initialised game state). The caller should skip the frame and retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transient(_))
    }

    /// The fault kind, when this is a transient invariant violation.
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            Error::Transient(kind) => Some(*kind),
            _ => None,
        }
    }
}
