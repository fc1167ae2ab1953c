use serde::de::DeserializeOwned;

use crate::engine::gateway::GatewayError;

/// Remove markdown code fences the model likes to wrap JSON in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Decode raw LLM output into `T`.
///
/// The whole (fence-stripped) body is tried first. Failing that, every `[` or `{`
/// is treated as a candidate start in text order, and the first well-formed JSON
/// value found there that also fits `T` wins. Prose before or after the payload
/// is ignored.
pub fn decode_payload<T: DeserializeOwned>(text: &str) -> Result<T, GatewayError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(GatewayError::EmptyResponse);
    }

    if let Ok(value) = serde_json::from_str::<T>(&cleaned) {
        return Ok(value);
    }

    for (start, ch) in cleaned.char_indices() {
        if ch != '[' && ch != '{' {
            continue;
        }

        let mut stream = serde_json::Deserializer::from_str(&cleaned[start..]).into_iter::<T>();
        if let Some(Ok(value)) = stream.next() {
            return Ok(value);
        }
    }

    Err(GatewayError::Malformed(format!(
        "no usable JSON payload in {} bytes of output",
        text.len()
    )))
}
