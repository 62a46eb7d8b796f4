use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifierError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Feed reader errors
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to fetch unread items: {0}")]
    Fetch(String),

    // Notification errors
    #[error("Failed to send notification: {0}")]
    Dispatch(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type NotifierResult<T> = Result<T, NotifierError>;
