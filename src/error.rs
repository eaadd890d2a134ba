use serde::Serialize;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Interrupted")]
    Interrupted,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error report printed in JSON output mode
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub exit_code: u8,
}

impl AppError {
    /// Process exit code for this error, following sysexits(3)
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::BadRequest(_) => 65,
            Self::UnsupportedFormat(_) => 64,
            Self::Unavailable(_) => 69,
            Self::Internal(_) => 70,
            Self::Io(_) => 74,
            Self::Timeout(_) => 75,
            Self::ExternalService(_) => 76,
            Self::Config(_) => 78,
            Self::Interrupted => 130,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
            exit_code: self.exit_code(),
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
