//! gcsprobe Error Types

use thiserror::Error;

/// Result type alias for gcsprobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// gcsprobe error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Credential errors
    #[error("Could not resolve default credentials: {0}")]
    Credentials(#[from] gcp_auth::Error),

    // Transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Storage API errors
    #[error("{status} {method} {url}: {message}")]
    Api {
        status: u16,
        method: String,
        url: String,
        message: String,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a failure, logged alongside the uniform
/// console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Permission,
    Transport,
    Configuration,
    Protocol,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::Permission => "permission",
            ErrorKind::Transport => "transport",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Protocol => "protocol",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Credentials(_) => ErrorKind::Authentication,
            Error::Http(e) if e.is_decode() => ErrorKind::Protocol,
            Error::Http(_) | Error::Io(_) => ErrorKind::Transport,
            Error::Api { status: 401, .. } => ErrorKind::Authentication,
            Error::Api { status: 403, .. } => ErrorKind::Permission,
            Error::Api { status, .. } if *status >= 500 => ErrorKind::Transport,
            Error::Api { .. } => ErrorKind::Protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> Error {
        Error::Api {
            status,
            method: "GET".into(),
            url: "https://storage.googleapis.com/storage/v1/b?project=p".into(),
            message: "nope".into(),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            api(403).to_string(),
            "403 GET https://storage.googleapis.com/storage/v1/b?project=p: nope"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(api(401).kind(), ErrorKind::Authentication);
        assert_eq!(api(403).kind(), ErrorKind::Permission);
        assert_eq!(api(503).kind(), ErrorKind::Transport);
        assert_eq!(api(404).kind(), ErrorKind::Protocol);
        assert_eq!(Error::Config("x".into()).kind(), ErrorKind::Configuration);
    }
}
