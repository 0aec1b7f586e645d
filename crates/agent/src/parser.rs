//! Response parser — extracts JSON actions embedded in free model text.
//!
//! The model replies in prose ("Thought: ... Action: {...} PAUSE"), so the
//! action has to be fished out of arbitrary surrounding text. A naive
//! first-`{`-to-first-`}` regex breaks as soon as `function_params` contains
//! a nested object, so extraction is a two-phase scan: candidate boundaries
//! are found by tracking brace nesting depth, then each candidate is handed
//! to serde_json. Candidates that fail to parse are silently discarded —
//! this is best-effort extraction, not validation of model output.

use reactclaw_core::action::ParsedAction;
use serde_json::Value;

/// Extract every parseable JSON object from `text`, in order of appearance.
///
/// An empty result means "no actions found" — the loop treats the reply as
/// a final answer in that case.
pub fn extract_json_objects(text: &str) -> Vec<Value> {
    let mut objects = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    // Braces are ASCII, so a byte scan never lands inside a multi-byte
    // UTF-8 sequence and candidate slices stay on char boundaries.
    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }

        let (end, _closed) = scan_balanced(bytes, i);
        if let Ok(value) = serde_json::from_str::<Value>(&text[i..end]) {
            objects.push(value);
            // Resume after the candidate: objects nested inside an
            // already-extracted one are not re-reported.
            i = end;
        } else {
            i += 1;
        }
    }

    objects
}

/// Find the end of a candidate object starting at the `{` at `start`.
///
/// Tracks nesting depth (+1 on `{`, −1 on `}`) beginning at depth 1. The
/// candidate ends where depth returns to 0. If it never does, the candidate
/// is truncated at the last position where a `}` matched.
fn scan_balanced(bytes: &[u8], start: usize) -> (usize, bool) {
    let mut depth = 1usize;
    let mut last_match = start + 1;

    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                last_match = i + 1;
                if depth == 0 {
                    return (i + 1, true);
                }
            }
            _ => {}
        }
        i += 1;
    }

    (last_match, false)
}

/// Pull the first action out of a model reply.
///
/// Only the first extracted object is consulted; later objects in the same
/// reply are ignored. An object that does not carry the
/// `function_name`/`function_params` shape is a protocol deviation and
/// counts as "no action found".
pub fn first_action(text: &str) -> Option<ParsedAction> {
    let first = extract_json_objects(text).into_iter().next()?;
    serde_json::from_value(first).ok()
}
