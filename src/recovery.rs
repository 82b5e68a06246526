//! Salvaging JSON from model output that is supposed to be pure JSON but often is not.

use log::{ debug, warn };
use serde_json::Value;

use crate::models::stage::StageResult;

/// Recover a JSON document from raw model text.
///
/// 1. Parse the whole text.
/// 2. Parse the slice from the first `{` to the last `}` inclusive (by index, no brace matching).
/// 3. Otherwise yield [`StageResult::Unparseable`] carrying the raw text.
///
/// Never fails.
pub fn recover_json(raw: &str) -> StageResult {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            debug!("Model output parsed directly as JSON");
            return StageResult::Parsed(value);
        }
        Err(e) => debug!("Direct JSON parse failed: {}", e),
    }

    if let Some(candidate) = brace_slice(raw) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => {
                debug!(
                    "Recovered JSON from a {} character slice of {} characters of output",
                    candidate.len(),
                    raw.len()
                );
                return StageResult::Parsed(value);
            }
            Err(e) => debug!("Brace-slice JSON parse failed: {}", e),
        }
    }

    warn!("Could not recover JSON from model output ({} characters)", raw.len());
    StageResult::Unparseable { raw: raw.to_string() }
}

/// Text between the first `{` and the last `}`, when the latter follows the former.
fn brace_slice(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    // Both braces are single-byte, so these are char boundaries.
    Some(&raw[start..=end])
}
