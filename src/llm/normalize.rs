use serde_json::{ Map, Value as JsonValue };
use super::{ AssistantError, NormalizedReply };

/// Reduces a raw webhook body to `{text, image_url}`.
///
/// Accepts a single object or an array whose first element is an object.
/// `content` wins over `output` unless it is absent, null or empty.
pub fn normalize(raw: &JsonValue) -> Result<NormalizedReply, AssistantError> {
    let object = match raw {
        JsonValue::Object(map) => map,
        JsonValue::Array(items) =>
            match items.first() {
                Some(JsonValue::Object(map)) => map,
                Some(other) => {
                    return Err(
                        AssistantError::MalformedReply(
                            format!("expected an object as first element, got {}", kind(other))
                        )
                    );
                }
                None => {
                    return Err(AssistantError::MalformedReply("empty reply array".to_string()));
                }
            }
        other => {
            return Err(
                AssistantError::MalformedReply(
                    format!("expected an object or array, got {}", kind(other))
                )
            );
        }
    };

    Ok(from_object(object))
}

pub fn normalize_body(body: &str) -> Result<NormalizedReply, AssistantError> {
    let raw: JsonValue = serde_json
        ::from_str(body)
        .map_err(|e| AssistantError::MalformedReply(format!("invalid JSON: {}", e)))?;
    normalize(&raw)
}

fn from_object(object: &Map<String, JsonValue>) -> NormalizedReply {
    NormalizedReply {
        text: field(object, "content").or_else(|| field(object, "output")),
        image_url: field(object, "url"),
    }
}

fn field(object: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match object.get(key)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        value @ (JsonValue::Number(_) | JsonValue::Bool(_)) => Some(value.to_string()),
        _ => None,
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
