use crate::models::AnalysisType;

pub struct PromptTemplate;

impl PromptTemplate {
    pub fn build_language_detection_prompt(text: &str) -> String {
        format!(
            r#"Detect the language of the text delimited by ```:
```{}```

Instructions:
- Format the result as a JSON object with "{}" as its only key and the detected language as value.
- The value must be the full written-out name of the language (e.g. "English", not "en").
- Detect only a single language.
- The text may contain noise such as special characters; ignore it when deciding.
- Enclose property names in double quotes."#,
            text,
            AnalysisType::LanguageDetection.reply_field()
        )
    }

    pub fn build_translation_prompt(text: &str, source_language: &str, target_language: &str) -> String {
        format!(
            r#"Translate the following text from {} to {}. The text is delimited by ```:
```{}```

Instructions:
- Format the result as a JSON object with "{}" as its only key.
- The value must contain only the translated text, nothing else.
- Enclose property names in double quotes."#,
            source_language,
            target_language,
            text,
            AnalysisType::Translation.reply_field()
        )
    }

    pub fn build_summary_prompt(text: &str, lines: usize) -> String {
        format!(
            r#"Summarize the text delimited by ```:
```{}```

Instructions:
- The summary must be exactly {} {}.
- Format the result as a JSON object with "{}" as its only key and the summary as value.
- Enclose property names in double quotes."#,
            text,
            lines,
            if lines == 1 { "line" } else { "lines" },
            AnalysisType::Summarization.reply_field()
        )
    }

    pub fn build_category_prompt(text: &str, labels: &[String]) -> String {
        Self::build_classification_prompt(
            "category",
            text,
            labels,
            AnalysisType::CategoryClassification.reply_field(),
        )
    }

    pub fn build_sentiment_prompt(text: &str, labels: &[String]) -> String {
        Self::build_classification_prompt(
            "sentiment",
            text,
            labels,
            AnalysisType::SentimentClassification.reply_field(),
        )
    }

    fn build_classification_prompt(kind: &str, text: &str, labels: &[String], field: &str) -> String {
        format!(
            r#"Detect the {} of the text delimited by ```:
```{}```

Instructions:
- Only classify the text into exactly one of the following: {}
- Format the result as a JSON object with "{}" as its only key and the chosen {} as value.
- Enclose property names in double quotes."#,
            kind,
            text,
            Self::format_label_list(labels),
            field,
            kind
        )
    }

    pub fn build_topic_prompt(text: &str) -> String {
        format!(
            r#"Detect the topics of the text delimited by ```:
```{}```

Instructions:
- Each topic must be at most 3 words long.
- Format the result as a JSON object with "{}" as its only key and the topics as a list of strings.
- Enclose property names in double quotes."#,
            text,
            AnalysisType::TopicExtraction.reply_field()
        )
    }

    pub fn build_ner_prompt(text: &str) -> String {
        format!(
            r#"Detect the named entities in the text delimited by ```:
```{}```

Instructions:
- Format the result as a JSON object with "{}" as its only key.
- Its value must be a JSON object whose keys are named entity types (e.g. "PERSON", "ORG", "LOCATION")
  and whose values are lists of the entities of that type found in the text.
- Enclose property names in double quotes."#,
            text,
            AnalysisType::NamedEntityExtraction.reply_field()
        )
    }

    fn format_label_list(labels: &[String]) -> String {
        let quoted: Vec<String> = labels.iter().map(|label| format!("\"{}\"", label)).collect();
        format!("[{}]", quoted.join(", "))
    }

    /// Rejects prompts whose rough token estimate (4 chars per token) exceeds `max_tokens`.
    pub fn validate_prompt_length(prompt: &str, max_tokens: usize) -> Result<(), String> {
        let estimated_tokens = estimate_tokens(prompt);

        if estimated_tokens > max_tokens {
            Err(format!(
                "Prompt too long: {} estimated tokens (max: {})",
                estimated_tokens, max_tokens
            ))
        } else {
            Ok(())
        }
    }
}

pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}
