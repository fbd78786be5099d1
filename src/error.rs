// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    /// Transport-level failure (DNS, TLS, connection reset, body decoding).
    Http(String),
    /// The remote service answered with a non-success status.
    Api {
        status: u16,
        message: String,
    },
    Store(StoreError),
    /// The operation was aborted through its cancellation token.
    Cancelled,
}

/// Failures reported by the interaction store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The row-level policy refused the operation.
    PermissionDenied(String),

    /// The store answered with an unexpected status.
    Status { code: u16, body: String },

    /// The request never reached the store or the reply could not be read.
    Transport(String),

    /// The store is not configured (missing URL or key).
    NotConfigured,
}

impl StoreError {
    /// Maps an HTTP status and body to the matching store error.
    pub fn from_status(code: u16, body: String) -> Self {
        match code {
            401 | 403 => StoreError::PermissionDenied(body),
            _ => StoreError::Status { code, body },
        }
    }

    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            StoreError::PermissionDenied(_) => "error-store-permission-denied",
            StoreError::Status { .. } => "error-store-status",
            StoreError::Transport(_) => "error-store-transport",
            StoreError::NotConfigured => "error-store-not-configured",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            StoreError::Status { code, body } => write!(f, "HTTP {}: {}", code, body),
            StoreError::Transport(msg) => write!(f, "{}", msg),
            StoreError::NotConfigured => write!(f, "Interaction store is not configured"),
        }
    }
}

impl Error {
    /// Returns `true` when the error only reports a cancelled operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "error-io",
            Error::Config(_) => "error-config",
            Error::Http(_) => "error-network",
            Error::Api { .. } => "error-photo-api",
            Error::Store(e) => e.i18n_key(),
            Error::Cancelled => "error-cancelled",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Http(e) => write!(f, "Network Error: {}", e),
            Error::Api { status, message } => write!(f, "API Error ({}): {}", status, message),
            Error::Store(e) => write!(f, "Store Error: {}", e),
            Error::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Error::Http(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn api_error_includes_status() {
        let err = Error::Api {
            status: 429,
            message: "Rate Limit Exceeded".into(),
        };
        assert_eq!(format!("{}", err), "API Error (429): Rate Limit Exceeded");
    }

    #[test]
    fn store_status_maps_auth_codes_to_permission_denied() {
        assert!(matches!(
            StoreError::from_status(403, "policy".into()),
            StoreError::PermissionDenied(_)
        ));
        assert!(matches!(
            StoreError::from_status(401, "jwt".into()),
            StoreError::PermissionDenied(_)
        ));
        assert!(matches!(
            StoreError::from_status(500, "boom".into()),
            StoreError::Status { code: 500, .. }
        ));
    }

    #[test]
    fn store_error_converts_into_crate_error() {
        let err: Error = StoreError::NotConfigured.into();
        assert_eq!(err.i18n_key(), "error-store-not-configured");
    }

    #[test]
    fn cancelled_is_detected() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::Http("x".into()).is_cancelled());
    }
}
