use crate::cli::args::{Cli, OutputFormat};
use crate::error::ChainError;
use crate::models::{AnalysisResult, ChainRun};

pub struct ReportFormatter {
    use_colors: bool,
    verbose: bool,
    format: OutputFormat,
}

impl ReportFormatter {
    pub fn new(cli: &Cli) -> Self {
        Self {
            use_colors: cli.should_use_color(),
            verbose: cli.is_verbose(),
            format: cli.format,
        }
    }

    pub fn plain(format: OutputFormat, verbose: bool) -> Self {
        Self {
            use_colors: false,
            verbose,
            format,
        }
    }

    pub fn format_run(&self, run: &ChainRun) -> Result<String, ChainError> {
        match self.format {
            OutputFormat::Json => self.format_json(&run.result),
            OutputFormat::Text => Ok(self.format_analysis_report(run)),
        }
    }

    pub fn format_json(&self, result: &AnalysisResult) -> Result<String, ChainError> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    pub fn format_analysis_report(&self, run: &ChainRun) -> String {
        let result = &run.result;
        let mut output = String::new();

        output.push_str(&self.format_header(result));
        output.push_str("\n\n");

        if let Some(ref target) = result.translated_language {
            output.push_str(&self.format_section(
                &format!("TRANSLATION ({})", target),
                &display_or_placeholder(&result.translated_text),
            ));
            output.push_str("\n\n");
        }

        output.push_str(&self.format_section("SUMMARY", &result.summarized_text));
        output.push_str("\n\n");

        output.push_str(&self.format_section(
            "CLASSIFICATION",
            &format!(
                "Category: {}\nSentiment: {}",
                result.category, result.sentiment
            ),
        ));
        output.push_str("\n\n");

        let topics = if result.topics.is_empty() {
            "(none)".to_string()
        } else {
            result
                .topics
                .iter()
                .map(|topic| format!("- {}", topic))
                .collect::<Vec<_>>()
                .join("\n")
        };
        output.push_str(&self.format_section("TOPICS", &topics));
        output.push_str("\n\n");

        let entities = if result.ner.is_empty() {
            "(none)".to_string()
        } else {
            result
                .ner
                .iter()
                .map(|(label, values)| format!("{}: {}", label, values.join(", ")))
                .collect::<Vec<_>>()
                .join("\n")
        };
        output.push_str(&self.format_section("NAMED ENTITIES", &entities));

        if self.verbose {
            output.push_str("\n\n");
            output.push_str(&self.format_diagnostics(run));
        }

        output
    }

    fn format_header(&self, result: &AnalysisResult) -> String {
        let title = "TEXT ANALYSIS REPORT";
        let info = format!(
            "Language: {} ({} chars)",
            result.detected_language,
            result.original_text.chars().count()
        );

        if self.use_colors {
            format!("\x1b[1m\x1b[36m═══ {} ═══\x1b[0m\n{}", title, info)
        } else {
            format!("=== {} ===\n{}", title, info)
        }
    }

    fn format_section(&self, title: &str, content: &str) -> String {
        if self.use_colors {
            format!("\x1b[1m\x1b[37m{}\x1b[0m\n{}", title, content)
        } else {
            format!("{}\n{}\n{}", title, "─".repeat(title.chars().count()), content)
        }
    }

    fn format_diagnostics(&self, run: &ChainRun) -> String {
        let mut lines = vec![format!("Completed in {}ms", run.duration_ms)];

        for diagnostic in &run.diagnostics {
            lines.push(format!(
                "Fallback in {}: {}",
                diagnostic.stage.description(),
                diagnostic.reason
            ));
        }

        for warning in &run.warnings {
            lines.push(format!("Warning: {}", warning));
        }

        self.format_section("DIAGNOSTICS", &lines.join("\n"))
    }
}

fn display_or_placeholder(text: &str) -> String {
    if text.is_empty() {
        "(translation unavailable)".to_string()
    } else {
        text.to_string()
    }
}
