use crate::error::{CorrectionError, Result};
use crate::note::CorrectionResult;
use crate::schema::CorrectionSchema;
use serde_json::Value;

const JSON_FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Returns the body of the first ```` ```json ```` fenced block, or the whole
/// text if there is none. Surrounding whitespace is trimmed either way.
pub fn strip_code_fence(raw: &str) -> &str {
    if let Some(start) = raw.find(JSON_FENCE_OPEN) {
        let after = &raw[start + JSON_FENCE_OPEN.len()..];
        let body = after
            .strip_prefix("\r\n")
            .or_else(|| after.strip_prefix('\n'));
        if let Some(body) = body {
            if let Some(end) = body.find(FENCE_CLOSE) {
                return body[..end].trim();
            }
        }
    }
    raw.trim()
}

/// Turns the model's raw output into a [`CorrectionResult`].
///
/// The result may name fewer fields than the schema, never more, and every
/// value must be a string.
pub fn parse_correction(raw: &str, schema: &CorrectionSchema) -> Result<CorrectionResult> {
    let json = strip_code_fence(raw);
    let value: Value = serde_json::from_str(json).map_err(CorrectionError::Parse)?;

    let object = match value {
        Value::Object(map) => map,
        other => {
            return Err(CorrectionError::Validation(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut result = CorrectionResult::new();
    for (name, value) in object {
        if !schema.contains(&name) {
            return Err(CorrectionError::Validation(format!(
                "unexpected field '{}'",
                name
            )));
        }
        match value {
            Value::String(text) => {
                result.insert(name, text);
            }
            other => {
                return Err(CorrectionError::Validation(format!(
                    "field '{}' must be a string, got {}",
                    name,
                    json_type_name(&other)
                )))
            }
        }
    }
    Ok(result)
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
