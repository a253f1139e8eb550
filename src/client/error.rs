use thiserror::Error;

/// Shown for every failure where no response was received.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Shown for any failed health check.
pub const UNAVAILABLE_MESSAGE: &str = "API is not responding";

/// Failures of a request to the steganography service.
///
/// `Display` is the user-facing text. The `reason` fields carry the technical
/// cause for the logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status
    #[error("{detail}")]
    Service { status: u16, detail: String },

    /// No usable response: connection failure, timeout or malformed body
    #[error("Network error occurred")]
    Network { reason: String },

    /// Health check failed, whatever the cause
    #[error("API is not responding")]
    Unavailable { reason: String },

    /// The file id cannot name a download (empty, `.` or `..`)
    #[error("Invalid file id: {file_id:?}")]
    InvalidFileId { file_id: String },
}

impl ApiError {
    pub fn network(reason: impl ToString) -> Self {
        Self::Network {
            reason: reason.to_string(),
        }
    }

    /// HTTP status for service-reported failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}
