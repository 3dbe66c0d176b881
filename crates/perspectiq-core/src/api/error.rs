use std::fmt;

/// Category of a failed backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Non-2xx response.
    HttpStatus,
    /// Request exceeded the configured timeout.
    Timeout,
    /// Connection refused, DNS failure, TLS error, etc.
    Transport,
    /// Response body was not the expected JSON.
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Error from a backend request.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status for `HttpStatus` errors.
    pub status: Option<u16>,
    /// One-line summary suitable for display.
    pub message: String,
}

impl ApiError {
    /// Creates an HTTP status error: `API Error: <status> - <body>`.
    pub fn http_status(status: u16, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::HttpStatus,
            status: Some(status),
            message: format!("API Error: {status} - {body}"),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Timeout,
            status: None,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: message.into(),
        }
    }

    /// True for 401 responses (expired or invalid token).
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Classifies a reqwest send error.
pub(crate) fn classify_reqwest_error(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::timeout(format!("Request timed out: {err}"))
    } else if err.is_decode() {
        ApiError::parse(format!("Failed to decode response: {err}"))
    } else {
        ApiError::transport(format!("Request failed: {err}"))
    }
}
