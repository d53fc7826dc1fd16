pub mod analysis;
pub mod request;

pub use analysis::{
    AnalysisResult, AnalysisType, ChainRun, FallbackReason, NamedEntities, Outcome,
    StageDiagnostic, CATEGORY_FALLBACK, NOT_IDENTIFIED, SENTIMENT_FALLBACK, SUMMARY_FALLBACK,
};
pub use request::{
    default_category_labels, default_sentiment_labels, parse_label_list, AnalysisRequest,
    CompletionQuery, DEFAULT_CATEGORY_LABELS, DEFAULT_SENTIMENT_LABELS, DEFAULT_SUMMARY_LINES,
};
