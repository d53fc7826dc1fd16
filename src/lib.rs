pub mod analyzer;
pub mod cli;
pub mod error;
pub mod models;

pub use error::ChainError;

// Re-export commonly used types
pub use models::{
    AnalysisRequest, AnalysisResult, AnalysisType, ChainRun, CompletionQuery, FallbackReason,
    NamedEntities, Outcome,
};

pub use analyzer::{ChainOrchestrator, CompletionProvider, LlmConfig};

pub use cli::CliHandler;
