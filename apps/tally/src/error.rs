//! # App Error Type
//!
//! Unified error type for everything the terminal reports.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin line ──► parse ──► CommandError ─────────┐                       │
//! │                   │                             │                       │
//! │                   ▼                             ▼                       │
//! │              calculator ──► CoreError ──────► AppError ──► "[code] msg" │
//! │                                                 ▲                       │
//! │  tally snippet ──► SnippetError ────────────────┤                       │
//! │  startup ────────► ConfigError ─────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Command and cart errors are printed and the loop carries on. Snippet and
//! config errors end the process with a non-zero exit code.

use tally_core::CoreError;

use crate::commands::CommandError;
use crate::config::ConfigError;
use crate::snippet::SnippetError;

/// Error reported by the app: a machine-readable code and the text the user
/// sees.
#[derive(Debug, Clone)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A command named a line that isn't in the cart
    NotFound,

    /// Catalog or input validation failed
    ValidationError,

    /// A typed command couldn't be understood
    CommandError,

    /// Configuration couldn't be loaded
    ConfigError,

    /// The page couldn't be fetched, or had nothing matching
    FetchError,

    /// Terminal I/O and anything else unexpected
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::CommandError => "COMMAND_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::FetchError => "FETCH_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => AppError::not_found("Item", &id),
            CoreError::Validation(e) => AppError::new(ErrorCode::ValidationError, e.to_string()),
        }
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        AppError::new(ErrorCode::CommandError, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// The two fetch failures carry fixed user-facing text, passed through as-is.
impl From<SnippetError> for AppError {
    fn from(err: SnippetError) -> Self {
        match err {
            SnippetError::Client(e) => {
                tracing::error!("HTTP client setup failed: {}", e);
                AppError::internal("Couldn't set up the HTTP client.")
            }
            other => AppError::new(ErrorCode::FetchError, other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {}", err);
        AppError::internal(format!("I/O error: {}", err))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_maps_to_not_found() {
        let err: AppError = CoreError::ItemNotFound("BOOK-1".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Item not found: BOOK-1");
        assert_eq!(err.to_string(), "[NOT_FOUND] Item not found: BOOK-1");
    }

    #[test]
    fn test_snippet_messages_pass_through() {
        let err: AppError = SnippetError::NoData.into();
        assert_eq!(err.code, ErrorCode::FetchError);
        assert_eq!(err.message, "Couldn't load the page.");

        let err: AppError = SnippetError::NoMatch.into();
        assert_eq!(err.message, "Couldn't find that element on the page.");
    }

    #[test]
    fn test_command_error_maps() {
        let err: AppError = CommandError::Empty.into();
        assert_eq!(err.code, ErrorCode::CommandError);
    }
}
