// Best-effort JSON extraction from command output

use crate::executor::types::Stdout;

/// Extract a JSON object from captured stdout.
///
/// Takes the text between the first `{` and the last `}` (inclusive) and
/// tries to parse it. Any failure falls back to the trimmed raw text, so
/// log lines around the payload are tolerated but several objects in one
/// output are not.
pub fn parse_stdout(raw: &str) -> Stdout {
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&raw[start..=end]) {
                return Stdout::Json(value);
            }
        }
    }

    Stdout::Text(raw.trim().to_string())
}

/// Cap `text` at `max_bytes`, backing off to a char boundary
pub fn truncate_utf8(text: &mut String, max_bytes: usize) -> bool {
    if text.len() <= max_bytes {
        return false;
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
    true
}
