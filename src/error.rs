//! Error types for the Last.fm client.
//!
//! Every failure the library can produce is a [`LastfmError`]. Callers that
//! only care about the broad category (is this my configuration, the network,
//! or did Last.fm change its response format?) use [`LastfmError::kind`].

use std::fmt;

use thiserror::Error;

/// Broad failure categories used to tell configuration problems apart from
/// transient network problems and remote protocol changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Network,
    Protocol,
    Unauthenticated,
    Argument,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Network => "network",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Argument => "argument",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LastfmError {
    /// A required setting is missing, blank or unparseable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response (connect failure, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Last.fm answered with a non-success status code.
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("Malformed {context}: {reason}")]
    Protocol {
        context: &'static str,
        reason: String,
    },

    /// A well-formed Last.fm error envelope (`{"error": .., "message": ..}`).
    #[error("Last.fm API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Not authenticated. Run the authentication handshake first.")]
    Unauthenticated,

    #[error("Invalid argument: {0}")]
    Argument(String),

    /// The caller gave up while waiting for the user to approve access.
    #[error("Authorization cancelled: {0}")]
    Cancelled(String),
}

impl LastfmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LastfmError::Configuration(_) => ErrorKind::Configuration,
            LastfmError::Transport(_) | LastfmError::Status { .. } => ErrorKind::Network,
            LastfmError::Protocol { .. } | LastfmError::Api { .. } => ErrorKind::Protocol,
            LastfmError::Unauthenticated => ErrorKind::Unauthenticated,
            LastfmError::Argument(_) => ErrorKind::Argument,
            LastfmError::Cancelled(_) => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn protocol(context: &'static str, reason: impl Into<String>) -> Self {
        LastfmError::Protocol {
            context,
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for LastfmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LastfmError::Transport(format!("request timed out: {}", err))
        } else {
            LastfmError::Transport(err.to_string())
        }
    }
}

/// Convenience Result type for library operations.
pub type Result<T> = std::result::Result<T, LastfmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_group_network_failures() {
        let status = LastfmError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        let transport = LastfmError::Transport("connection refused".to_string());
        assert_eq!(status.kind(), ErrorKind::Network);
        assert_eq!(transport.kind(), ErrorKind::Network);
    }

    #[test]
    fn test_api_error_is_protocol_kind() {
        let err = LastfmError::Api {
            code: 14,
            message: "Unauthorized Token".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.to_string(), "Last.fm API error 14: Unauthorized Token");
    }

    #[test]
    fn test_status_message_carries_code() {
        let err = LastfmError::Status {
            status: 403,
            message: "Invalid API key".to_string(),
        };
        assert!(err.to_string().contains("403"));
    }
}
