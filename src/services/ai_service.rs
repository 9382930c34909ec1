use crate::error::{Error, Result};
use crate::services::stream_decoder::{assemble, StreamDecoder, StreamEvent};
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Serialize;

pub const MODEL: &str = "llama-3.1-8b-instant";
pub const TEMPERATURE: f32 = 1.0;
pub const TOP_P: f32 = 1.0;
pub const MAX_COMPLETION_TOKENS: u32 = 1024;

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    top_p: f32,
    max_completion_tokens: u32,
    stream: bool,
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AIService {
    pub fn new(api_key: String, base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Sends one streamed completion request and returns the concatenated
    /// text once the stream ends. No retries.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let payload = CompletionRequest {
            model: MODEL,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            stream: true,
        };

        tracing::info!(model = MODEL, prompt_chars = prompt.len(), "requesting quiz completion");
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            tracing::warn!(%status, "completion request rejected");
            return Err(provider_failure(status, &text));
        }

        let mut decoder = StreamDecoder::default();
        let mut events = Vec::new();
        let mut stream = res.bytes_stream();

        'read: while let Some(chunk) = stream.next().await {
            for event in decoder.push(&chunk?)? {
                let done = event == StreamEvent::Done;
                events.push(event);
                if done {
                    break 'read;
                }
            }
        }
        events.extend(decoder.finish()?);

        let fragments = events.len();
        let output = assemble(events);
        tracing::info!(fragments, output_chars = output.len(), "completion stream finished");
        tracing::debug!(raw_output = %output, "raw provider output");
        Ok(output)
    }
}

fn provider_failure(status: StatusCode, body: &str) -> Error {
    let reason = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authentication rejected",
        StatusCode::TOO_MANY_REQUESTS => "rate limited",
        s if s.is_server_error() => "provider unavailable",
        _ => "request rejected",
    };
    Error::Provider(format!("{} ({}): {}", reason, status, body.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_the_wire_contract() {
        let payload = CompletionRequest {
            model: MODEL,
            messages: vec![Msg {
                role: "user",
                content: "Make a quiz",
            }],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            stream: true,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "messages": [{"role": "user", "content": "Make a quiz"}],
                "temperature": 1.0,
                "top_p": 1.0,
                "max_completion_tokens": 1024,
                "stream": true
            })
        );
    }

    #[test]
    fn failures_name_the_reason() {
        let auth = provider_failure(StatusCode::UNAUTHORIZED, "{\"error\":\"bad key\"}");
        assert!(auth.to_string().contains("authentication rejected"));

        let limited = provider_failure(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(limited, Error::Provider(msg) if msg.starts_with("rate limited (429")));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let service = AIService::new("gsk".into(), "http://localhost:9999/v1/", Client::new());
        assert_eq!(service.base_url, "http://localhost:9999/v1");
    }
}
