use crate::analyzer::llm_client::{
    is_claude_model, is_gemini_model, LlmConfig, DEFAULT_MODEL,
};
use crate::error::ChainError;
use crate::models::{
    default_category_labels, default_sentiment_labels, parse_label_list, AnalysisRequest,
};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Parser, Debug)]
#[command(name = "textchain")]
#[command(about = "Text analysis chain using LLMs - language, translation, summary, category, sentiment, topics and entities")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Text to analyze; read from stdin when omitted
    pub text: Option<String>,

    /// LLM model to use for every stage [default: gpt-3.5-turbo]
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Maximum time per completion request in seconds (10-300) [default: 60]
    #[arg(short = 't', long, value_parser = validate_timeout)]
    pub timeout: Option<u64>,

    /// Translate the text into this language before the remaining stages
    #[arg(short = 'T', long)]
    pub translate_to: Option<String>,

    /// Comma separated candidate categories
    #[arg(long)]
    pub categories: Option<String>,

    /// Comma separated candidate sentiments
    #[arg(long)]
    pub sentiments: Option<String>,

    /// Number of lines in the summary
    #[arg(long, default_value = "1")]
    pub summary_lines: usize,

    /// Maximum number of completion requests in flight
    #[arg(long, default_value = "5")]
    pub max_concurrent: usize,

    /// Upper bound on reply tokens; unlimited unless the provider requires one
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Base URL of an OpenAI-compatible server (e.g. http://localhost:11434/v1)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose output to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Enable debug output including completion traffic
    #[arg(short = 'd', long)]
    pub debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn parse_args() -> Result<Self, ChainError> {
        let cli = match Self::try_parse() {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => return Err(ChainError::InvalidArguments(e.to_string())),
        };

        cli.validate()?;

        Ok(cli)
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        if let Some(timeout) = self.timeout {
            if !(10..=300).contains(&timeout) {
                return Err(ChainError::InvalidArguments(
                    "Timeout must be between 10 and 300 seconds".to_string(),
                ));
            }
        }

        if self.summary_lines == 0 {
            return Err(ChainError::InvalidArguments(
                "Summary must have at least one line".to_string(),
            ));
        }

        if self.max_concurrent == 0 {
            return Err(ChainError::InvalidArguments(
                "At least one concurrent request is required".to_string(),
            ));
        }

        if self.max_tokens == Some(0) {
            return Err(ChainError::InvalidArguments(
                "Max tokens must be greater than zero".to_string(),
            ));
        }

        if self.categories.is_some() && self.get_category_labels().is_empty() {
            return Err(ChainError::InvalidArguments(
                "Category list cannot be empty".to_string(),
            ));
        }

        if self.sentiments.is_some() && self.get_sentiment_labels().is_empty() {
            return Err(ChainError::InvalidArguments(
                "Sentiment list cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn get_llm_model(&self) -> String {
        if let Some(ref model) = self.model {
            return model.clone();
        }
        std::env::var("TEXTCHAIN_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn get_timeout_seconds(&self) -> u64 {
        if let Some(timeout) = self.timeout {
            return timeout;
        }
        if let Ok(timeout_str) = std::env::var("TEXTCHAIN_TIMEOUT") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                if (10..=300).contains(&timeout) {
                    return timeout;
                }
            }
        }
        DEFAULT_TIMEOUT_SECONDS
    }

    pub fn get_api_base(&self) -> Option<String> {
        self.api_base
            .clone()
            .or_else(|| std::env::var("TEXTCHAIN_API_BASE").ok())
            .filter(|base| !base.trim().is_empty())
    }

    /// `TEXTCHAIN_API_KEY` first, then the provider's conventional variable.
    pub fn resolve_api_key(&self, model: &str) -> Option<String> {
        let provider_var = if is_claude_model(model) {
            "ANTHROPIC_API_KEY"
        } else if is_gemini_model(model) {
            "GEMINI_API_KEY"
        } else {
            "OPENAI_API_KEY"
        };

        ["TEXTCHAIN_API_KEY", provider_var]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
    }

    pub fn build_llm_config(&self) -> LlmConfig {
        let model = self.get_llm_model();
        let api_key = self.resolve_api_key(&model);

        LlmConfig::new(model)
            .with_api_key(api_key)
            .with_api_base(self.get_api_base())
            .with_timeout(self.get_timeout_seconds())
            .with_max_tokens(self.max_tokens)
    }

    pub fn build_request(&self, text: String) -> AnalysisRequest {
        let mut request = AnalysisRequest::new(text)
            .with_category_labels(self.get_category_labels())
            .with_sentiment_labels(self.get_sentiment_labels())
            .with_summary_lines(self.summary_lines);

        if let Some(ref target) = self.translate_to {
            request = request.with_target_language(target.trim());
        }

        request
    }

    pub fn get_category_labels(&self) -> Vec<String> {
        match self.categories {
            Some(ref raw) => parse_label_list(raw),
            None => default_category_labels(),
        }
    }

    pub fn get_sentiment_labels(&self) -> Vec<String> {
        match self.sentiments {
            Some(ref raw) => parse_label_list(raw),
            None => default_sentiment_labels(),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn should_use_color(&self) -> bool {
        std::env::var("NO_COLOR").is_err()
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "textchain=trace,info"
        } else if self.verbose {
            "textchain=debug,warn"
        } else {
            "warn"
        }
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.parse().map_err(|_| "Timeout must be a number")?;

    if (10..=300).contains(&timeout) {
        Ok(timeout)
    } else {
        Err("Timeout must be between 10 and 300 seconds".to_string())
    }
}
