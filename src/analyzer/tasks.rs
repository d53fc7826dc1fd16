use crate::analyzer::llm_client::CompletionProvider;
use crate::analyzer::parser::{parse_entity_map_field, parse_string_field, parse_string_list_field};
use crate::analyzer::prompts::PromptTemplate;
use crate::models::{
    AnalysisType, CompletionQuery, FallbackReason, NamedEntities, Outcome, NOT_IDENTIFIED,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

/// The seven per-task analyzers. Each one builds a prompt, sends it, and parses
/// the expected JSON field, reporting a fallback instead of failing.
pub struct TextAnalyzer {
    llm_client: Arc<dyn CompletionProvider + Send + Sync>,
    request_timeout: Duration,
    permits: Semaphore,
}

impl TextAnalyzer {
    pub fn new(
        llm_client: Arc<dyn CompletionProvider + Send + Sync>,
        request_timeout: Duration,
        max_concurrent: usize,
    ) -> Self {
        Self {
            llm_client,
            request_timeout,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    pub fn model_name(&self) -> &str {
        self.llm_client.get_model_name()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub async fn detect_language(&self, text: &str) -> Outcome<String> {
        let stage = AnalysisType::LanguageDetection;
        let prompt = PromptTemplate::build_language_detection_prompt(text);

        let result = match self.execute_completion(stage, prompt).await {
            Ok(reply) => parse_string_field(&reply, stage.reply_field()),
            Err(reason) => Err(reason),
        };

        settle(stage, result)
    }

    /// Same-language and unidentified-source cases never reach the endpoint.
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Outcome<String> {
        let stage = AnalysisType::Translation;

        if source_language == NOT_IDENTIFIED {
            debug!("source language not identified, translation is empty");
            return Outcome::Success(String::new());
        }

        if same_language(source_language, target_language) {
            debug!(language = source_language, "source equals target, skipping translation");
            return Outcome::Success(text.to_string());
        }

        let prompt = PromptTemplate::build_translation_prompt(text, source_language, target_language);
        let result = match self.execute_completion(stage, prompt).await {
            Ok(reply) => parse_string_field(&reply, stage.reply_field()),
            Err(reason) => Err(reason),
        };

        settle(stage, result)
    }

    pub async fn summarize(&self, text: &str, lines: usize) -> Outcome<String> {
        let stage = AnalysisType::Summarization;
        let prompt = PromptTemplate::build_summary_prompt(text, lines.max(1));

        let result = match self.execute_completion(stage, prompt).await {
            Ok(reply) => parse_string_field(&reply, stage.reply_field()),
            Err(reason) => Err(reason),
        };

        settle(stage, result)
    }

    pub async fn classify_category(&self, text: &str, labels: &[String]) -> Outcome<String> {
        let stage = AnalysisType::CategoryClassification;
        let prompt = PromptTemplate::build_category_prompt(text, labels);

        let result = match self.execute_completion(stage, prompt).await {
            Ok(reply) => parse_string_field(&reply, stage.reply_field()),
            Err(reason) => Err(reason),
        };

        settle(stage, result)
    }

    pub async fn classify_sentiment(&self, text: &str, labels: &[String]) -> Outcome<String> {
        let stage = AnalysisType::SentimentClassification;
        let prompt = PromptTemplate::build_sentiment_prompt(text, labels);

        let result = match self.execute_completion(stage, prompt).await {
            Ok(reply) => parse_string_field(&reply, stage.reply_field()),
            Err(reason) => Err(reason),
        };

        settle(stage, result)
    }

    pub async fn extract_topics(&self, text: &str) -> Outcome<Vec<String>> {
        let stage = AnalysisType::TopicExtraction;
        let prompt = PromptTemplate::build_topic_prompt(text);

        let result = match self.execute_completion(stage, prompt).await {
            Ok(reply) => parse_string_list_field(&reply, stage.reply_field()),
            Err(reason) => Err(reason),
        };

        settle(stage, result)
    }

    pub async fn extract_entities(&self, text: &str) -> Outcome<NamedEntities> {
        let stage = AnalysisType::NamedEntityExtraction;
        let prompt = PromptTemplate::build_ner_prompt(text);

        let result = match self.execute_completion(stage, prompt).await {
            Ok(reply) => parse_entity_map_field(&reply, stage.reply_field()),
            Err(reason) => Err(reason),
        };

        settle(stage, result)
    }

    async fn execute_completion(
        &self,
        stage: AnalysisType,
        prompt: String,
    ) -> Result<String, FallbackReason> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| FallbackReason::Transport(e.to_string()))?;

        let query = CompletionQuery::new(prompt, self.llm_client.get_model_name());
        debug!(stage = stage.as_str(), prompt_len = query.prompt.len(), "sending completion");

        match timeout(self.request_timeout, self.llm_client.complete(&query)).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(FallbackReason::Transport(e.to_string())),
            Err(_) => Err(FallbackReason::Timeout(self.request_timeout.as_secs())),
        }
    }
}

fn settle<T>(stage: AnalysisType, result: Result<T, FallbackReason>) -> Outcome<T> {
    if let Err(ref reason) = result {
        warn!(stage = stage.as_str(), %reason, "analyzer fell back");
    }
    result.into()
}

fn same_language(source: &str, target: &str) -> bool {
    source.trim().eq_ignore_ascii_case(target.trim())
}
