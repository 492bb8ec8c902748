//! Response decoding: free-text model reply → [`MindMap`].
//!
//! DESIGN
//! ======
//! Pulling structured data out of prose is fragile, so decoding sits behind
//! the [`ResponseDecoder`] trait. [`FencedJsonDecoder`] implements the text
//! contract below; a provider with a native structured-output mode can get
//! its own decoder without touching the generation pipeline.
//!
//! DELIMITER CONTRACT
//! ==================
//! - Line endings are normalized (`\r\n` → `\n`) before matching.
//! - Tree: the first block opened by ```` ```json ```` (optional trailing
//!   spaces) and a newline, closed by a newline and ```` ``` ````. Its body
//!   must deserialize as a [`MindMapNode`].
//! - Summary: the heading line `## Summary` followed by a blank line. The
//!   summary runs until the next `\n##`, the next `\n```` ` or end of text,
//!   and is trimmed. Missing or blank summaries decode as `None`.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use super::node::{MindMap, MindMapNode, ensure_unique_ids};

pub const SUMMARY_HEADING: &str = "## Summary";

// =============================================================================
// ERRORS
// =============================================================================

/// Decoding failures. Every variant is terminal: the same reply decodes the
/// same way on every attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("could not find mind map data in the response")]
    MissingBlock,
    #[error("mind map data is malformed: {0}")]
    MalformedPayload(String),
}

impl crate::error::ErrorCode for DecodeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingBlock => "E_MISSING_BLOCK",
            Self::MalformedPayload(_) => "E_MALFORMED_PAYLOAD",
        }
    }
}

// =============================================================================
// DECODER
// =============================================================================

pub trait ResponseDecoder: Send + Sync {
    /// Decode one model reply into a mind map.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the reply does not satisfy the
    /// decoder's contract.
    fn decode(&self, reply: &str) -> Result<MindMap, DecodeError>;
}

/// Decoder for replies holding a ```` ```json ```` fenced tree and an
/// optional `## Summary` section.
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedJsonDecoder;

impl ResponseDecoder for FencedJsonDecoder {
    fn decode(&self, reply: &str) -> Result<MindMap, DecodeError> {
        let text = reply.replace("\r\n", "\n");

        let payload = json_block_re()
            .captures(&text)
            .and_then(|c| c.get(1))
            .ok_or(DecodeError::MissingBlock)?
            .as_str();

        let mut data: MindMapNode =
            serde_json::from_str(payload).map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;

        let rekeyed = ensure_unique_ids(&mut data);
        if rekeyed > 0 {
            warn!(rekeyed, "decode: re-keyed blank or duplicate node ids");
        }

        Ok(MindMap { data, summary: extract_summary(&text) })
    }
}

fn json_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json[ \t]*\n(.*?)\n```").expect("json block pattern is valid"))
}

fn summary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?s){}\n\n(.*?)(?:\n##|\n```|$)", regex::escape(SUMMARY_HEADING));
        Regex::new(&pattern).expect("summary pattern is valid")
    })
}

fn extract_summary(text: &str) -> Option<String> {
    let summary = summary_re().captures(text)?.get(1)?.as_str().trim();
    if summary.is_empty() { None } else { Some(summary.to_string()) }
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
