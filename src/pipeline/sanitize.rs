// Response sanitizer: reduce raw model text to a JSON-array candidate.
//
// Models often wrap their answer in a markdown fence or surround it with
// prose. We strip fence markers from both ends, then keep everything from the
// first '[' to the last ']'. The extraction is greedy: if the model emits
// more than one bracketed list, the span covering all of them is taken.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::SanitizeFailure;

const FENCE: &str = "```";

/// Opening fence with an optional language tag (```json, ```JSON, ```js ...).
fn leading_fence() -> &'static Regex {
    static LEADING_FENCE: OnceLock<Regex> = OnceLock::new();
    LEADING_FENCE.get_or_init(|| {
        Regex::new(r"^```[A-Za-z0-9_+.\-]*").expect("leading fence pattern is valid")
    })
}

/// Strip fences and surrounding prose from raw model output.
///
/// Returns a borrowed slice of `raw`. Applying it to its own output returns
/// the same slice contents. Fails only when nothing is left.
pub fn sanitize(raw: &str) -> Result<&str, SanitizeFailure> {
    let text = strip_fences(raw.trim());
    let text = outermost_array(text).unwrap_or(text);

    if text.is_empty() {
        return Err(SanitizeFailure);
    }
    Ok(text)
}

/// Remove fence markers from both ends until none remain.
fn strip_fences(mut text: &str) -> &str {
    loop {
        let before = text.len();

        if let Some(m) = leading_fence().find(text) {
            text = text[m.end()..].trim_start();
        }
        if let Some(rest) = text.strip_suffix(FENCE) {
            text = rest.trim_end();
        }

        if text.len() == before {
            return text;
        }
    }
}

/// The span from the first '[' to the last ']', if both exist in that order.
fn outermost_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}
