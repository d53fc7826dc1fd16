// Analyzer module - completion client, per-task analyzers and chain orchestration

pub mod aggregator;
pub mod llm_client;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod tasks;

pub use aggregator::{AnalysisAggregator, StageOutcomes};
pub use llm_client::{create_completion_client, CompletionProvider, LlmConfig};
pub use orchestrator::ChainOrchestrator;
pub use prompts::PromptTemplate;
pub use tasks::TextAnalyzer;
