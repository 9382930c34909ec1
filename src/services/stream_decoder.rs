//! Server-sent-event framing for streamed chat completions.
//!
//! Bytes arrive in arbitrary network chunks; only complete lines are decoded,
//! so a UTF-8 sequence or a JSON payload split across chunks is reassembled
//! before it is looked at.

use serde::Deserialize;

use crate::error::{Error, Result};

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Fragment(String),
    Done,
}

#[derive(Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: Option<ChunkDelta>,
}

#[derive(Deserialize)]
struct ProviderFailure {
    message: Option<String>,
}

#[derive(Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<ProviderFailure>,
}

#[derive(Debug, Default)]
pub struct StreamDecoder {
    buffer: Vec<u8>,
}

impl StreamDecoder {
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<StreamEvent>> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = decode_line(&line)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Decodes whatever is left once the transport has closed.
    pub fn finish(mut self) -> Result<Option<StreamEvent>> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }
}

fn decode_line(raw: &[u8]) -> Result<Option<StreamEvent>> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\r', '\n']);

    let Some(payload) = line.strip_prefix("data:") else {
        // Blank separators, comments and `event:`/`id:` fields carry no text.
        return Ok(None);
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(None);
    }
    if payload == DONE_SENTINEL {
        return Ok(Some(StreamEvent::Done));
    }

    let chunk: CompletionChunk = serde_json::from_str(payload)
        .map_err(|e| Error::Provider(format!("unreadable stream event: {}", e)))?;

    if let Some(failure) = chunk.error {
        return Err(Error::Provider(
            failure
                .message
                .unwrap_or_else(|| "provider reported an error mid-stream".to_string()),
        ));
    }

    let fragment = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content)
        .unwrap_or_default();
    Ok(Some(StreamEvent::Fragment(fragment)))
}

/// Concatenates fragments in arrival order, stopping at the first `Done`.
pub fn assemble<I>(events: I) -> String
where
    I: IntoIterator<Item = StreamEvent>,
{
    events
        .into_iter()
        .take_while(|e| *e != StreamEvent::Done)
        .fold(String::new(), |mut acc, event| {
            if let StreamEvent::Fragment(text) = event {
                acc.push_str(&text);
            }
            acc
        })
}
