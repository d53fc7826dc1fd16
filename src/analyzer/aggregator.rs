use crate::models::{
    AnalysisRequest, AnalysisResult, AnalysisType, ChainRun, FallbackReason, NamedEntities,
    Outcome, StageDiagnostic, CATEGORY_FALLBACK, NOT_IDENTIFIED, SENTIMENT_FALLBACK, SUMMARY_FALLBACK,
};
use std::time::Duration;

const MAX_TOPIC_WORDS: usize = 3;

/// Per-stage outcomes of one chain run, before collapsing.
#[derive(Debug, Clone)]
pub struct StageOutcomes {
    pub language: Outcome<String>,
    pub translation: Option<Outcome<String>>,
    pub summary: Outcome<String>,
    pub category: Outcome<String>,
    pub sentiment: Outcome<String>,
    pub topics: Outcome<Vec<String>>,
    pub entities: Outcome<NamedEntities>,
}

pub struct AnalysisAggregator;

impl AnalysisAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn detected_language(outcome: &Outcome<String>) -> String {
        match outcome {
            Outcome::Success(language) => language.clone(),
            Outcome::Fallback(_) => NOT_IDENTIFIED.to_string(),
        }
    }

    /// The text every post-translation stage reads.
    pub fn working_text(original: &str, translation: Option<&Outcome<String>>) -> String {
        match translation {
            None => original.to_string(),
            Some(Outcome::Success(translated)) => translated.clone(),
            Some(Outcome::Fallback(_)) => String::new(),
        }
    }

    pub fn aggregate(
        &self,
        request: &AnalysisRequest,
        outcomes: StageOutcomes,
        elapsed: Duration,
    ) -> ChainRun {
        let diagnostics = collect_diagnostics(&outcomes);

        let detected_language = Self::detected_language(&outcomes.language);
        let translated_text = Self::working_text(&request.text, outcomes.translation.as_ref());

        let result = AnalysisResult {
            original_text: request.text.clone(),
            translated_text,
            detected_language,
            translated_language: request.target_language.clone(),
            summarized_text: outcomes
                .summary
                .into_value_or_else(|| SUMMARY_FALLBACK.to_string()),
            category: outcomes
                .category
                .into_value_or_else(|| CATEGORY_FALLBACK.to_string()),
            sentiment: outcomes
                .sentiment
                .into_value_or_else(|| SENTIMENT_FALLBACK.to_string()),
            topics: outcomes.topics.into_value_or_else(Vec::new),
            ner: outcomes.entities.into_value_or_else(NamedEntities::new),
        };

        let warnings = self.validate_result_quality(request, &result);

        ChainRun {
            result,
            diagnostics,
            warnings,
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    /// Observations about a result that do not change it.
    pub fn validate_result_quality(
        &self,
        request: &AnalysisRequest,
        result: &AnalysisResult,
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        if !request.category_labels.contains(&result.category) {
            warnings.push(format!(
                "Category '{}' is not one of the candidate labels",
                result.category
            ));
        }

        if !request.sentiment_labels.contains(&result.sentiment) {
            warnings.push(format!(
                "Sentiment '{}' is not one of the candidate labels",
                result.sentiment
            ));
        }

        for topic in &result.topics {
            let words = topic.split_whitespace().count();
            if words > MAX_TOPIC_WORDS {
                warnings.push(format!("Topic '{}' is longer than {} words", topic, MAX_TOPIC_WORDS));
            }
        }

        if result.summarized_text.trim().is_empty() {
            warnings.push("Summary is empty".to_string());
        }

        if result.translated_language.is_some() && result.translated_text.is_empty() {
            warnings.push(
                "Translation was requested but produced no text; downstream stages ran on an empty string"
                    .to_string(),
            );
        }

        warnings
    }
}

fn collect_diagnostics(outcomes: &StageOutcomes) -> Vec<StageDiagnostic> {
    let mut diagnostics = Vec::new();

    let mut record = |stage: AnalysisType, reason: Option<&FallbackReason>| {
        if let Some(reason) = reason {
            diagnostics.push(StageDiagnostic {
                stage,
                reason: reason.clone(),
            });
        }
    };

    record(AnalysisType::LanguageDetection, outcomes.language.reason());
    if let Some(ref translation) = outcomes.translation {
        record(AnalysisType::Translation, translation.reason());
    }
    record(AnalysisType::Summarization, outcomes.summary.reason());
    record(AnalysisType::CategoryClassification, outcomes.category.reason());
    record(AnalysisType::SentimentClassification, outcomes.sentiment.reason());
    record(AnalysisType::TopicExtraction, outcomes.topics.reason());
    record(AnalysisType::NamedEntityExtraction, outcomes.entities.reason());

    diagnostics
}

impl Default for AnalysisAggregator {
    fn default() -> Self {
        Self::new()
    }
}
