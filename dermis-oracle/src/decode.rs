use tracing::warn;

use crate::types::AnalysisResult;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Outcome of decoding a classification reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Parsed(AnalysisResult),
    /// The reply did not match the schema; callers get the empty result.
    Fallback,
}

impl Decoded {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Fallback)
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            Decoded::Parsed(result) => result,
            Decoded::Fallback => AnalysisResult::default(),
        }
    }
}

/// Removes ```` ```json ```` and bare ```` ``` ```` markers; all other text,
/// including text between fences, is kept.
pub fn strip_fences(text: &str) -> String {
    text.replace(JSON_FENCE, "").replace(FENCE, "").trim().to_string()
}

/// Decodes a reply, keeping track of whether the fallback was used.
pub fn try_decode(raw: &str) -> Decoded {
    let cleaned = strip_fences(raw);

    match serde_json::from_str::<AnalysisResult>(&cleaned) {
        Ok(result) => Decoded::Parsed(result),
        Err(e) => {
            warn!(
                error = %e,
                preview = %preview(&cleaned),
                "oracle reply does not match the analysis schema, using empty result"
            );
            Decoded::Fallback
        }
    }
}

/// Decodes a classification reply. Never fails: anything that does not
/// parse against the schema yields `AnalysisResult::default()`.
pub fn decode_analysis(raw: &str) -> AnalysisResult {
    try_decode(raw).into_result()
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(80) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
