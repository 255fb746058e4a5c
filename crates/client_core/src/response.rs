//! Recovering an `AssessmentResult` from free-form model output.

use shared::assessment::AssessmentResult;

use crate::gateway::GatewayError;

/// Parses model text, tolerating markdown code fences and chatter around the
/// JSON object.
pub fn parse_assessment(text: &str) -> Result<AssessmentResult, GatewayError> {
    let cleaned = strip_code_fences(text);
    match serde_json::from_str(cleaned) {
        Ok(result) => Ok(result),
        Err(direct) => {
            let Some(object) = first_json_object(cleaned) else {
                return Err(GatewayError::Parse(direct.to_string()));
            };
            serde_json::from_str(object).map_err(|err| GatewayError::Parse(err.to_string()))
        }
    }
}

/// Removes a surrounding markdown code fence, language tag included.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// First balanced top-level `{...}` span, ignoring braces inside strings.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}
