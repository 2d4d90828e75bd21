//! Error types for the TED RAG client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Empty question or missing `question` field.
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Structured input that is not valid JSON.
    #[error("Invalid JSON input: {0}")]
    InputParse(String),

    /// The request could not complete (connect, DNS, reset, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, detail: Option<String> },

    /// The backend answered 2xx but with an `{"error": ...}` envelope.
    #[error("Backend error: {0}")]
    Backend(String),

    /// A 2xx body that does not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status code, when the backend returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short summary suitable for an alert or inline message.
    ///
    /// Diagnostic detail (server error bodies, transport messages) is left to
    /// the logs.
    pub fn user_message(&self) -> String {
        match self {
            Error::InputValidation(msg) => msg.clone(),
            Error::InputParse(_) => "Invalid JSON input".to_string(),
            Error::Network(_) => "Failed to reach the server".to_string(),
            Error::HttpStatus { status, .. } => format!("HTTP error! status: {}", status),
            Error::Backend(msg) => msg.clone(),
            Error::Decode(_) => "Unexpected response from the server".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
