use crate::analyzer::aggregator::{AnalysisAggregator, StageOutcomes};
use crate::analyzer::llm_client::{create_completion_client, CompletionProvider, LlmConfig};
use crate::analyzer::prompts::PromptTemplate;
use crate::analyzer::tasks::TextAnalyzer;
use crate::error::ChainError;
use crate::models::{
    default_category_labels, default_sentiment_labels, AnalysisRequest, AnalysisResult, ChainRun,
};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::Duration;
use tracing::{debug, info, warn};

const MAX_INPUT_TOKENS: usize = 100_000;

pub struct ChainOrchestrator {
    analyzer: TextAnalyzer,
    aggregator: AnalysisAggregator,
    max_concurrent_requests: usize,
}

impl ChainOrchestrator {
    pub fn new(config: LlmConfig, max_concurrent: usize) -> Result<Self, ChainError> {
        let timeout_seconds = config.timeout_seconds;
        let client = create_completion_client(config)?;

        Ok(Self::with_provider(client.into(), timeout_seconds, max_concurrent))
    }

    /// Builds an orchestrator around any completion provider.
    pub fn with_provider(
        llm_client: Arc<dyn CompletionProvider + Send + Sync>,
        timeout_seconds: u64,
        max_concurrent: usize,
    ) -> Self {
        let max_concurrent = max_concurrent.max(1);

        Self {
            analyzer: TextAnalyzer::new(
                llm_client,
                Duration::from_secs(timeout_seconds),
                max_concurrent,
            ),
            aggregator: AnalysisAggregator::new(),
            max_concurrent_requests: max_concurrent,
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        self.analyze_with_diagnostics(request).await.result
    }

    /// Runs the full chain: detect, translate, then the five independent
    /// stages on the working text. Every input yields a complete record.
    pub async fn analyze_with_diagnostics(&self, request: &AnalysisRequest) -> ChainRun {
        let prepared = self.prepare_request(request);
        let request: &AnalysisRequest = &prepared;

        let start_time = Instant::now();
        info!(
            model = self.analyzer.model_name(),
            text_len = request.content_size(),
            target_language = request.target_language.as_deref().unwrap_or("-"),
            "starting analysis chain"
        );

        let language = self.analyzer.detect_language(&request.text).await;
        let detected_language = AnalysisAggregator::detected_language(&language);
        debug!(language = %detected_language, "language detected");

        let translation = match request.target_language {
            Some(ref target) => Some(
                self.analyzer
                    .translate(&request.text, &detected_language, target)
                    .await,
            ),
            None => None,
        };

        let working_text = AnalysisAggregator::working_text(&request.text, translation.as_ref());
        let working_text = working_text.as_str();

        let (summary, category, sentiment, topics, entities) = futures::join!(
            self.analyzer.summarize(working_text, request.summary_lines),
            self.analyzer
                .classify_category(working_text, &request.category_labels),
            self.analyzer
                .classify_sentiment(working_text, &request.sentiment_labels),
            self.analyzer.extract_topics(working_text),
            self.analyzer.extract_entities(working_text),
        );

        let outcomes = StageOutcomes {
            language,
            translation,
            summary,
            category,
            sentiment,
            topics,
            entities,
        };

        let run = self
            .aggregator
            .aggregate(request, outcomes, start_time.elapsed());

        info!(
            duration_ms = run.duration_ms,
            fallbacks = run.diagnostics.len(),
            "analysis chain complete"
        );

        run
    }

    /// Replaces unusable request fields instead of rejecting the request.
    /// Empty label sets fall back to the defaults and a blank target language
    /// disables translation. Oversized text is only logged.
    pub fn prepare_request<'a>(&self, request: &'a AnalysisRequest) -> Cow<'a, AnalysisRequest> {
        if let Err(message) = PromptTemplate::validate_prompt_length(&request.text, MAX_INPUT_TOKENS) {
            warn!(%message, "input text is larger than most models accept");
        }

        let blank_target = request
            .target_language
            .as_deref()
            .is_some_and(|target| target.trim().is_empty());

        if !blank_target
            && !request.category_labels.is_empty()
            && !request.sentiment_labels.is_empty()
            && request.summary_lines > 0
        {
            return Cow::Borrowed(request);
        }

        let mut prepared = request.clone();
        if blank_target {
            debug!("blank target language, skipping translation");
            prepared.target_language = None;
        }
        if prepared.category_labels.is_empty() {
            debug!("no category labels given, using defaults");
            prepared.category_labels = default_category_labels();
        }
        if prepared.sentiment_labels.is_empty() {
            debug!("no sentiment labels given, using defaults");
            prepared.sentiment_labels = default_sentiment_labels();
        }
        prepared.summary_lines = prepared.summary_lines.max(1);

        Cow::Owned(prepared)
    }

    pub fn get_model_info(&self) -> String {
        format!(
            "Model: {}, Timeout: {}s, Max Concurrent: {}",
            self.analyzer.model_name(),
            self.analyzer.request_timeout().as_secs(),
            self.max_concurrent_requests
        )
    }
}
