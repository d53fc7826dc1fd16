use std::time::Duration;
use textchain::analyzer::{AnalysisAggregator, StageOutcomes};
use textchain::cli::{OutputFormat, ReportFormatter};
use textchain::models::{
    AnalysisType, FallbackReason, NamedEntities, Outcome, CATEGORY_FALLBACK, NOT_IDENTIFIED,
    SENTIMENT_FALLBACK, SUMMARY_FALLBACK,
};
use textchain::AnalysisRequest;

fn successful_outcomes() -> StageOutcomes {
    let mut entities = NamedEntities::new();
    entities.insert("PERSON".to_string(), vec!["Marie Curie".to_string()]);
    entities.insert("LOCATION".to_string(), vec!["Paris".to_string(), "Warsaw".to_string()]);

    StageOutcomes {
        language: Outcome::Success("French".to_string()),
        translation: Some(Outcome::Success(
            "Marie Curie worked in Paris.".to_string(),
        )),
        summary: Outcome::Success("A physicist's career.".to_string()),
        category: Outcome::Success("Article".to_string()),
        sentiment: Outcome::Success("Neutral".to_string()),
        topics: Outcome::Success(vec!["physics".to_string(), "history".to_string()]),
        entities: Outcome::Success(entities),
    }
}

fn french_request() -> AnalysisRequest {
    AnalysisRequest::new("Marie Curie a travaillé à Paris.").with_target_language("English")
}

#[test]
fn aggregate_collects_successful_stages() {
    let aggregator = AnalysisAggregator::new();
    let run = aggregator.aggregate(
        &french_request(),
        successful_outcomes(),
        Duration::from_millis(1250),
    );

    let result = &run.result;
    assert_eq!(result.original_text, "Marie Curie a travaillé à Paris.");
    assert_eq!(result.translated_text, "Marie Curie worked in Paris.");
    assert_eq!(result.detected_language, "French");
    assert_eq!(result.translated_language.as_deref(), Some("English"));
    assert_eq!(result.category, "Article");
    assert_eq!(result.topics, vec!["physics", "history"]);
    assert_eq!(result.entity_count(), 3);
    assert!(result.was_translated());

    assert!(run.diagnostics.is_empty());
    assert!(run.warnings.is_empty());
    assert_eq!(run.duration_ms, 1250);
}

#[test]
fn aggregate_substitutes_fallback_values() {
    let outcomes = StageOutcomes {
        language: Outcome::Fallback(FallbackReason::MissingField("Language")),
        translation: None,
        summary: Outcome::Fallback(FallbackReason::Timeout(60)),
        category: Outcome::Fallback(FallbackReason::MalformedReply("eof".to_string())),
        sentiment: Outcome::Fallback(FallbackReason::Transport("refused".to_string())),
        topics: Outcome::Fallback(FallbackReason::UnexpectedFieldType("Topic")),
        entities: Outcome::Fallback(FallbackReason::MissingField("NER")),
    };

    let run = AnalysisAggregator::new().aggregate(
        &AnalysisRequest::new("Hello"),
        outcomes,
        Duration::ZERO,
    );

    assert_eq!(run.result.detected_language, NOT_IDENTIFIED);
    assert_eq!(run.result.translated_text, "Hello");
    assert_eq!(run.result.summarized_text, SUMMARY_FALLBACK);
    assert_eq!(run.result.category, CATEGORY_FALLBACK);
    assert_eq!(run.result.sentiment, SENTIMENT_FALLBACK);
    assert!(run.result.topics.is_empty());
    assert!(run.result.ner.is_empty());

    assert_eq!(run.diagnostics.len(), 6);
    assert!(!run.fell_back(AnalysisType::Translation));
    assert!(run.fell_back(AnalysisType::Summarization));
    assert_eq!(run.diagnostics[0].stage, AnalysisType::LanguageDetection);
}

#[test]
fn working_text_follows_translation_outcome() {
    assert_eq!(AnalysisAggregator::working_text("Hola", None), "Hola");
    assert_eq!(
        AnalysisAggregator::working_text("Hola", Some(&Outcome::Success("Hello".to_string()))),
        "Hello"
    );
    assert_eq!(
        AnalysisAggregator::working_text(
            "Hola",
            Some(&Outcome::Fallback(FallbackReason::MissingField("Translation")))
        ),
        ""
    );
}

#[test]
fn quality_warnings_leave_the_result_untouched() {
    let mut outcomes = successful_outcomes();
    outcomes.sentiment = Outcome::Success("Ecstatic".to_string());
    outcomes.topics = Outcome::Success(vec!["a very long topic phrase".to_string()]);

    let run = AnalysisAggregator::new().aggregate(&french_request(), outcomes, Duration::ZERO);

    assert_eq!(run.result.sentiment, "Ecstatic");
    assert_eq!(run.result.topics, vec!["a very long topic phrase"]);
    assert_eq!(run.warnings.len(), 2);
    assert!(run.diagnostics.is_empty());
}

#[test]
fn json_output_uses_upper_case_keys() {
    let run = AnalysisAggregator::new().aggregate(
        &french_request(),
        successful_outcomes(),
        Duration::ZERO,
    );

    let formatter = ReportFormatter::plain(OutputFormat::Json, false);
    let json = formatter.format_run(&run).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    for key in [
        "ORIGINAL_TEXT",
        "TRANSLATED_TEXT",
        "DETECTED_LANGUAGE",
        "TRANSLATED_LANGUAGE",
        "SUMMARIZED_TEXT",
        "CATEGORY",
        "SENTIMENT",
        "TOPICS",
        "NER",
    ] {
        assert!(value.get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(value["NER"]["LOCATION"][1], "Warsaw");
}

#[test]
fn text_report_lists_every_section() {
    let run = AnalysisAggregator::new().aggregate(
        &french_request(),
        successful_outcomes(),
        Duration::from_millis(40),
    );

    let report = ReportFormatter::plain(OutputFormat::Text, true)
        .format_run(&run)
        .unwrap();

    assert!(report.contains("TEXT ANALYSIS REPORT"));
    assert!(report.contains("Language: French"));
    assert!(report.contains("TRANSLATION (English)"));
    assert!(report.contains("Category: Article"));
    assert!(report.contains("- physics"));
    assert!(report.contains("LOCATION: Paris, Warsaw"));
    assert!(report.contains("Completed in 40ms"));
}
