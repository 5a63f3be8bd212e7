//! Backend client error type.

/// Failure of a single backend call.
///
/// `Application` is the backend answering with a non-2xx status and a JSON
/// body; everything else means no usable answer arrived.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Application { status: u16, message: Option<String> },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The backend's own error text, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Application { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an application error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend answered with an application-level error.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_displays_server_message() {
        let err = ApiError::Application {
            status: 401,
            message: Some("bad credentials".to_string()),
        };
        assert_eq!(err.to_string(), "bad credentials");
        assert_eq!(err.server_message(), Some("bad credentials"));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn application_error_without_message_has_fallback_text() {
        let err = ApiError::Application {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "request failed");
        assert!(err.server_message().is_none());
    }

    #[test]
    fn transport_error_is_not_application() {
        let err = ApiError::Transport("connection refused".to_string());
        assert!(!err.is_application());
        assert!(err.to_string().contains("connection refused"));
    }
}
