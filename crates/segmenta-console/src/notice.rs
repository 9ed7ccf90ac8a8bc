//! User-facing notices.
//!
//! Every backend error surfaces as a transient notice instead of crashing
//! a view. Duplicate errors keep their specific message so the user knows
//! the keyword already exists; everything else collapses to a generic
//! failure line with the detail preserved for operators in the logs.

use segmenta_core::Error;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Convert an operation failure into the notice shown to the user.
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Validation(msg) => Self::warning(msg.clone()),
            Error::Duplicate(msg) => Self::warning(format!("Already exists: {msg}")),
            Error::NotFound(msg) => Self::warning(format!("Not found: {msg}")),
            Error::Request(_) | Error::Server { .. } => {
                Self::error("The request failed. Please try again.")
            }
            other => Self::error(format!("Something went wrong: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_becomes_warning() {
        let notice = Notice::from_error(&Error::Validation("keyword is empty".into()));
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "keyword is empty");
    }

    #[test]
    fn test_duplicate_keeps_specific_message() {
        let notice = Notice::from_error(&Error::Duplicate("keyword \"cmo\"".into()));
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.message.contains("cmo"));
        assert!(notice.message.starts_with("Already exists"));
    }

    #[test]
    fn test_transport_errors_become_generic() {
        let request = Notice::from_error(&Error::Request("connection reset".into()));
        let server = Notice::from_error(&Error::Server {
            status: 503,
            message: "unavailable".into(),
        });
        assert_eq!(request.level, NoticeLevel::Error);
        assert_eq!(request, server);
        // The backend detail never leaks into the toast
        assert!(!request.message.contains("connection reset"));
    }
}
