/// Centralized error type.
/// Structured error handling with a kind, a code, a message, and context.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Abstract error kind, used for propagation-policy decisions (retry vs.
/// abort vs. degrade) rather than for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Dependency,
    Io,
    Parse,
    Store,
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Configuration => "CONFIGURATION",
            ErrorKind::Dependency => "DEPENDENCY",
            ErrorKind::Io => "IO",
            ErrorKind::Parse => "PARSE",
            ErrorKind::Store => "STORE",
            ErrorKind::Fatal => "FATAL",
        };
        write!(f, "{}", s)
    }
}

/// Application error with structured information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    /// Error code, e.g. "SCAN_FAILED", "NETWORK_ERROR"
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, code: &str, message: &str) -> Self {
        Self {
            kind,
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_details(kind: ErrorKind, code: &str, message: &str, details: &str) -> Self {
        Self {
            kind,
            code: code.to_string(),
            message: message.to_string(),
            details: Some(details.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn configuration(reason: &str) -> Self {
        Self::new(ErrorKind::Configuration, "CONFIGURATION_ERROR", reason)
    }

    pub fn dependency(command: &str) -> Self {
        Self::with_details(
            ErrorKind::Dependency,
            "DEPENDENCY_MISSING",
            &format!("external tool not available: {}", command),
            &format!("'{}' was not found in PATH; the feature depending on it is disabled for this run", command),
        )
    }

    pub fn validation(field: &str, reason: &str) -> Self {
        Self::new(
            ErrorKind::Configuration,
            "INVALID_INPUT",
            &format!("validation failed for {}: {}", field, reason),
        )
    }

    pub fn network(reason: &str) -> Self {
        Self::new(ErrorKind::Io, "NETWORK_ERROR", reason)
    }

    pub fn store(reason: &str) -> Self {
        Self::new(ErrorKind::Store, "STORE_ERROR", reason)
    }

    pub fn parse(source: &str, reason: &str) -> Self {
        Self::with_details(
            ErrorKind::Parse,
            "PARSE_ERROR",
            &format!("failed to parse {}", source),
            reason,
        )
    }

    pub fn timeout(operation: &str, seconds: u64) -> Self {
        Self::new(
            ErrorKind::Io,
            "TIMEOUT",
            &format!("{} timed out after {} seconds", operation, seconds),
        )
    }

    pub fn fatal(reason: &str) -> Self {
        Self::new(ErrorKind::Fatal, "FATAL_ERROR", reason)
    }

    pub fn internal(reason: &str) -> Self {
        Self::new(ErrorKind::Fatal, "INTERNAL_ERROR", reason)
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::Fatal
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

// Conversion implementations

impl From<String> for AppError {
    fn from(e: String) -> Self {
        AppError::internal(&e)
    }
}

impl From<&str> for AppError {
    fn from(e: &str) -> Self {
        AppError::internal(e)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::store(&e.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::store(&format!("connection pool: {}", e))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => {
                Self::new(ErrorKind::Io, "FILE_NOT_FOUND", &format!("file not found: {}", e))
            }
            std::io::ErrorKind::PermissionDenied => {
                Self::new(ErrorKind::Io, "PERMISSION_DENIED", &e.to_string())
            }
            _ => Self::new(ErrorKind::Io, "IO_ERROR", &e.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::parse("JSON", &e.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(e: chrono::ParseError) -> Self {
        AppError::parse("timestamp", &e.to_string())
    }
}

impl From<regex::Error> for AppError {
    fn from(e: regex::Error) -> Self {
        AppError::parse("regex", &e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::network(&e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_creation() {
        let error = AppError::new(ErrorKind::Fatal, "TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.details.is_none());
        assert!(!error.timestamp.is_empty());
    }

    #[test]
    fn test_app_error_with_details() {
        let error = AppError::with_details(ErrorKind::Parse, "TEST", "message", "extra context");
        assert_eq!(error.code, "TEST");
        assert_eq!(error.details, Some("extra context".to_string()));
    }

    #[test]
    fn test_app_error_display() {
        let error = AppError::new(ErrorKind::Fatal, "CODE", "message");
        assert_eq!(error.to_string(), "[CODE] message");
    }

    #[test]
    fn test_app_error_validation() {
        let error = AppError::validation("device_name", "too long");
        assert_eq!(error.code, "INVALID_INPUT");
        assert!(error.message.contains("device_name"));
    }

    #[test]
    fn test_app_error_dependency_is_not_fatal() {
        let error = AppError::dependency("snmpwalk");
        assert_eq!(error.kind, ErrorKind::Dependency);
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_app_error_store() {
        let error = AppError::store("table not found");
        assert_eq!(error.code, "STORE_ERROR");
    }

    #[test]
    fn test_from_string() {
        let error: AppError = "test error".into();
        assert_eq!(error.code, "INTERNAL_ERROR");
    }
}
