use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Note has no fields to correct")]
    NoEditableFields,

    #[error("Could not reach completion endpoint: {0}")]
    Connection(String),

    #[error("Rate limited by completion endpoint: {0}")]
    RateLimited(String),

    #[error("Completion API error (status {status}): {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Model refused the request: {0}")]
    Refused(String),

    #[error("No content returned")]
    EmptyResponse,

    #[error("Response is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Response does not match the correction schema: {0}")]
    Validation(String),

    #[error("Snapshot could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification used for diagnostics and for picking the notice
/// shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Parse,
    Validation,
    Decode,
    Internal,
}

impl CorrectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::InvalidConfig(_) | Self::NoEditableFields => {
                ErrorKind::Config
            }
            Self::Connection(_)
            | Self::RateLimited(_)
            | Self::ApiStatus { .. }
            | Self::Request(_)
            | Self::Refused(_)
            | Self::EmptyResponse => ErrorKind::Transport,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Decode(_) => ErrorKind::Decode,
            Self::SerializationError(_) | Self::IoError(_) => ErrorKind::Internal,
        }
    }

    /// The notice shown to the user. Parse and validation failures collapse
    /// into one message; the detail only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey => "Please set your API key.".to_string(),
            Self::NoEditableFields => "This note has no fields to check.".to_string(),
            Self::EmptyResponse => "No content returned.".to_string(),
            Self::Parse(_) | Self::Validation(_) => {
                "Error parsing or validating the model's response.".to_string()
            }
            Self::Decode(_) => "Error decoding original content.".to_string(),
            other => format!("An error occurred: {}", other),
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for CorrectionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            CorrectionError::Connection(err.to_string())
        } else {
            CorrectionError::Request(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CorrectionError>;
