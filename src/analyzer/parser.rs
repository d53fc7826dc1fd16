// Reply-shape parsing: every analyzer expects a JSON object with one known key.

use crate::models::{FallbackReason, NamedEntities};
use serde_json::{Map, Value};

/// Parses a reply into a JSON object, tolerating markdown code fences around it.
pub fn parse_reply_object(reply: &str) -> Result<Map<String, Value>, FallbackReason> {
    let candidate = extract_json(reply);

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| FallbackReason::MalformedReply(e.to_string()))?;

    match value {
        Value::Object(object) => Ok(object),
        other => Err(FallbackReason::MalformedReply(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

pub fn parse_string_field(reply: &str, field: &'static str) -> Result<String, FallbackReason> {
    let object = parse_reply_object(reply)?;

    match object.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(FallbackReason::UnexpectedFieldType(field)),
        None => Err(FallbackReason::MissingField(field)),
    }
}

pub fn parse_string_list_field(
    reply: &str,
    field: &'static str,
) -> Result<Vec<String>, FallbackReason> {
    let object = parse_reply_object(reply)?;

    match object.get(field) {
        Some(Value::Array(items)) => string_items(items, field),
        Some(_) => Err(FallbackReason::UnexpectedFieldType(field)),
        None => Err(FallbackReason::MissingField(field)),
    }
}

/// Entity labels are kept verbatim. A bare string is taken as a one-entity list.
pub fn parse_entity_map_field(
    reply: &str,
    field: &'static str,
) -> Result<NamedEntities, FallbackReason> {
    let object = parse_reply_object(reply)?;

    let entity_object = match object.get(field) {
        Some(Value::Object(entity_object)) => entity_object,
        Some(_) => return Err(FallbackReason::UnexpectedFieldType(field)),
        None => return Err(FallbackReason::MissingField(field)),
    };

    let mut entities = NamedEntities::new();
    for (label, value) in entity_object {
        let values = match value {
            Value::Array(items) => string_items(items, field)?,
            Value::String(single) => vec![single.clone()],
            Value::Null => Vec::new(),
            _ => return Err(FallbackReason::UnexpectedFieldType(field)),
        };
        entities.insert(label.clone(), values);
    }

    Ok(entities)
}

fn string_items(items: &[Value], field: &'static str) -> Result<Vec<String>, FallbackReason> {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(FallbackReason::UnexpectedFieldType(field)),
        })
        .collect()
}

/// Extract JSON from a reply (handles markdown code blocks)
fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();

    if let Some(start) = trimmed.find("```json") {
        if let Some(end) = trimmed[start + 7..].find("```") {
            return trimmed[start + 7..start + 7 + end].trim();
        }
    }

    if trimmed.starts_with("```") {
        if let Some(end) = trimmed[3..].find("```") {
            let content = trimmed[3..3 + end].trim();
            if let Some(newline) = content.find('\n') {
                let first_line = &content[..newline];
                if !first_line.trim_start().starts_with('{') {
                    return content[newline + 1..].trim();
                }
            }
            return content;
        }
    }

    trimmed
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
