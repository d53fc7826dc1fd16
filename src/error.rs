use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("No input provided - empty text")]
    NoInput,

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("LLM client error: {0}")]
    LlmClientError(String),

    #[error("Completion endpoint returned {status}: {message}")]
    ProviderStatus { status: u16, message: String },

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
