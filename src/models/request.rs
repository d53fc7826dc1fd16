use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY_LABELS: [&str; 7] = [
    "News",
    "Review",
    "Tweet",
    "General",
    "Article",
    "Scientific Paper",
    "Other",
];

pub const DEFAULT_SENTIMENT_LABELS: [&str; 3] = ["Positive", "Neutral", "Negative"];

pub const DEFAULT_SUMMARY_LINES: usize = 1;

/// Input for one chain run. Nothing in the chain mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
    pub target_language: Option<String>,
    pub category_labels: Vec<String>,
    pub sentiment_labels: Vec<String>,
    pub summary_lines: usize,
}

/// A single prompt bound to a model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionQuery {
    pub prompt: String,
    pub model: String,
}

impl AnalysisRequest {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            target_language: None,
            category_labels: default_category_labels(),
            sentiment_labels: default_sentiment_labels(),
            summary_lines: DEFAULT_SUMMARY_LINES,
        }
    }

    pub fn with_target_language<S: Into<String>>(mut self, language: S) -> Self {
        self.target_language = Some(language.into());
        self
    }

    pub fn with_category_labels(mut self, labels: Vec<String>) -> Self {
        self.category_labels = labels;
        self
    }

    pub fn with_sentiment_labels(mut self, labels: Vec<String>) -> Self {
        self.sentiment_labels = labels;
        self
    }

    pub fn with_summary_lines(mut self, lines: usize) -> Self {
        self.summary_lines = lines;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn content_size(&self) -> usize {
        self.text.len()
    }
}

impl CompletionQuery {
    pub fn new<P: Into<String>, M: Into<String>>(prompt: P, model: M) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
        }
    }
}

pub fn default_category_labels() -> Vec<String> {
    DEFAULT_CATEGORY_LABELS.iter().map(|s| s.to_string()).collect()
}

pub fn default_sentiment_labels() -> Vec<String> {
    DEFAULT_SENTIMENT_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Splits a comma separated label list, dropping blanks.
pub fn parse_label_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .map(|label| label.to_string())
        .collect()
}
