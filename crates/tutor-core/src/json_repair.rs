//! Cleanup of near-JSON verdicts from models.
//!
//! Even with a `json_schema` response format, some OpenAI-compatible
//! servers wrap verdicts in markdown fences, surround them with a sentence
//! of prose, or leave a trailing comma. This module handles exactly those
//! three cases before handing the text to `serde_json`. Truncated or
//! otherwise broken output is not patched: it fails to decode.

/// Clean up a model verdict so it can be decoded as a JSON object.
///
/// 1. **Strip markdown fences** (`` ```json `` / `` ``` ``).
/// 2. **Isolate the object**: keep the text from the first `{` to its
///    matching `}`.
/// 3. **Drop trailing commas** before `]` and `}`.
pub fn repair_json(input: &str) -> String {
    let stripped = strip_markdown_fences(input);
    let object = isolate_object(&stripped);
    fix_trailing_commas(object)
}

/// Parse as-is, falling back to [`repair_json`] when that fails.
pub fn parse_with_repair(input: &str) -> Result<serde_json::Value, serde_json::Error> {
    if let Ok(val) = serde_json::from_str(input) {
        return Ok(val);
    }
    serde_json::from_str(&repair_json(input))
}

fn strip_markdown_fences(input: &str) -> String {
    let trimmed = input.trim();

    let after_open = if let Some(stripped) = trimmed.strip_prefix("```json") {
        stripped
    } else if let Some(stripped) = trimmed.strip_prefix("```") {
        stripped
    } else {
        return trimmed.to_string();
    };

    let after_open = after_open.trim_start();
    after_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(after_open)
        .trim_end()
        .to_string()
}

/// The first balanced `{...}` in `input`, or `input` unchanged when there
/// is none.
fn isolate_object(input: &str) -> &str {
    let Some(start) = input.find('{') else {
        return input;
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in input[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return &input[start..start + offset + 1];
                }
            }
            _ => {}
        }
    }

    input
}

/// Remove commas that directly precede `]` or `}` outside string literals.
fn fix_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::with_capacity(chars.len());
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &c) in chars.iter().enumerate() {
        if escape_next {
            escape_next = false;
            result.push(c);
            continue;
        }
        if in_string {
            match c {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            result.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some(']') | Some('}')) {
                continue;
            }
        }
        result.push(c);
    }

    result
}
