//! Streaming chunk shape
//!
//! Providers that stream emit a sequence of chunks. Only the text delta and
//! the terminal flag are interpreted; anything backend-specific rides along
//! untouched in `payload`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One increment of a streamed response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Text delta carried by this chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Set on the final chunk of a stream
    #[serde(default)]
    pub done: bool,

    /// Raw backend payload
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl StreamChunk {
    /// A chunk carrying a text delta
    pub fn delta(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// The terminal chunk
    pub fn done() -> Self {
        Self {
            done: true,
            ..Self::default()
        }
    }

    /// Attach the raw backend payload
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Concatenate the text deltas of a finished stream
pub fn collect_text<'a>(chunks: impl IntoIterator<Item = &'a StreamChunk>) -> String {
    chunks
        .into_iter()
        .filter_map(|chunk| chunk.content.as_deref())
        .collect()
}
