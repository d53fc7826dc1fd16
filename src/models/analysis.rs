use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const NOT_IDENTIFIED: &str = "Not Identified";
pub const SUMMARY_FALLBACK: &str = "Fail to summarize";
pub const CATEGORY_FALLBACK: &str = "Other";
pub const SENTIMENT_FALLBACK: &str = "Neutral";

/// Entity-type label to the entities extracted for it.
pub type NamedEntities = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisType {
    LanguageDetection,
    Translation,
    Summarization,
    CategoryClassification,
    SentimentClassification,
    TopicExtraction,
    NamedEntityExtraction,
}

/// Result of one analyzer before it is collapsed to a plain value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FallbackReason {
    Transport(String),
    Timeout(u64),
    MalformedReply(String),
    MissingField(&'static str),
    UnexpectedFieldType(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AnalysisResult {
    pub original_text: String,
    pub translated_text: String,
    pub detected_language: String,
    pub translated_language: Option<String>,
    pub summarized_text: String,
    pub category: String,
    pub sentiment: String,
    pub topics: Vec<String>,
    pub ner: NamedEntities,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageDiagnostic {
    pub stage: AnalysisType,
    pub reason: FallbackReason,
}

/// An `AnalysisResult` together with what happened while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainRun {
    pub result: AnalysisResult,
    pub diagnostics: Vec<StageDiagnostic>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::LanguageDetection => "language_detection",
            AnalysisType::Translation => "translation",
            AnalysisType::Summarization => "summarization",
            AnalysisType::CategoryClassification => "category_classification",
            AnalysisType::SentimentClassification => "sentiment_classification",
            AnalysisType::TopicExtraction => "topic_extraction",
            AnalysisType::NamedEntityExtraction => "named_entity_extraction",
        }
    }

    /// JSON key the model is asked to answer with.
    pub fn reply_field(&self) -> &'static str {
        match self {
            AnalysisType::LanguageDetection => "Language",
            AnalysisType::Translation => "Translation",
            AnalysisType::Summarization => "Summary",
            AnalysisType::CategoryClassification => "Category",
            AnalysisType::SentimentClassification => "Sentiment",
            AnalysisType::TopicExtraction => "Topic",
            AnalysisType::NamedEntityExtraction => "NER",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisType::LanguageDetection => "Language detection",
            AnalysisType::Translation => "Translation",
            AnalysisType::Summarization => "Summarization",
            AnalysisType::CategoryClassification => "Category classification",
            AnalysisType::SentimentClassification => "Sentiment classification",
            AnalysisType::TopicExtraction => "Topic extraction",
            AnalysisType::NamedEntityExtraction => "Named entity extraction",
        }
    }
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Fallback(reason) => Some(reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Fallback(reason) => Outcome::Fallback(reason),
        }
    }

    /// Collapses to the plain value, substituting `fallback` on failure.
    pub fn into_value_or_else<F: FnOnce() -> T>(self, fallback: F) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Fallback(_) => fallback(),
        }
    }
}

impl<T> From<Result<T, FallbackReason>> for Outcome<T> {
    fn from(result: Result<T, FallbackReason>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(reason) => Outcome::Fallback(reason),
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Transport(message) => write!(f, "completion call failed: {}", message),
            FallbackReason::Timeout(seconds) => {
                write!(f, "completion call timed out after {}s", seconds)
            }
            FallbackReason::MalformedReply(message) => {
                write!(f, "reply is not valid JSON: {}", message)
            }
            FallbackReason::MissingField(field) => write!(f, "reply has no \"{}\" field", field),
            FallbackReason::UnexpectedFieldType(field) => {
                write!(f, "reply field \"{}\" has an unexpected type", field)
            }
        }
    }
}

impl AnalysisResult {
    pub fn was_translated(&self) -> bool {
        self.translated_language.is_some() && self.translated_text != self.original_text
    }

    pub fn entity_count(&self) -> usize {
        self.ner.values().map(|entities| entities.len()).sum()
    }
}

impl ChainRun {
    pub fn fell_back(&self, stage: AnalysisType) -> bool {
        self.diagnostics.iter().any(|d| d.stage == stage)
    }
}
