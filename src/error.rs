use reqwest::StatusCode;
use serde::Deserialize;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Azure services wrap failures as `{"error": {"code": ..., "message": ...}}`.
/// Translator uses numeric codes, Speech uses strings, so the code stays untyped.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: ServiceErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorDetail {
    #[serde(default)]
    code: serde_json::Value,
    #[serde(default)]
    message: String,
}

impl AppError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Internal(_) => 1,
            Self::InvalidInput(_) | Self::Configuration(_) => 2,
            Self::Authentication(_) => 3,
            Self::QuotaExceeded(_) => 4,
            Self::Network(_) => 5,
            Self::ExternalService(_) => 6,
            Self::Io(_) => 7,
        }
    }

    /// Short machine-readable category, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::Network(_) => "network",
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "configuration",
            Self::ExternalService(_) => "external_service",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }

    /// Only network failures are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Map a non-success HTTP response from a vendor API into the taxonomy
    pub fn from_http_status(service: &str, status: StatusCode, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<ServiceErrorBody>(body) {
            Ok(parsed) => {
                let code = match parsed.error.code {
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::String(s) => s,
                    _ => String::new(),
                };
                (code, parsed.error.message)
            }
            Err(_) => (String::new(), body.trim().to_string()),
        };

        let detail = if message.is_empty() {
            format!("{} returned {}", service, status)
        } else if code.is_empty() {
            format!("{} returned {}: {}", service, status, message)
        } else {
            format!("{} returned {} (code {}): {}", service, status, code, message)
        };

        match status {
            StatusCode::UNAUTHORIZED => Self::Authentication(detail),
            // Translator reports an exhausted free tier as 403001
            StatusCode::FORBIDDEN if code.starts_with("403001") => Self::QuotaExceeded(detail),
            StatusCode::FORBIDDEN => Self::Authentication(detail),
            StatusCode::TOO_MANY_REQUESTS => Self::QuotaExceeded(detail),
            StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => Self::InvalidInput(detail),
            StatusCode::REQUEST_TIMEOUT => Self::Network(detail),
            s if s.is_server_error() => Self::Network(detail),
            _ => Self::ExternalService(detail),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            AppError::Network(err.to_string())
        } else if err.is_builder() {
            AppError::Configuration(err.to_string())
        } else {
            AppError::ExternalService(err.to_string())
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
