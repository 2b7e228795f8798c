//! OpenAI-compatible client
//!
//! Pass-through adapter for any provider speaking the chat-completions
//! protocol. The request body stays minimal (`model`, `messages`,
//! `stream`), a non-success status is surfaced untouched for the caller to
//! relay, and the SSE response is reduced to the shared chunk abstraction.

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::types::ChatCommand;
use crate::model::adapter::MessageAdapter;
use crate::model::router::ResolvedTarget;
use crate::model::sse::SseParser;
use crate::model::traits::ChatAdapter;
use crate::model::types::{ChatError, ChatStream, StreamFault};

/// End-of-stream marker in the chat-completions SSE protocol.
const DONE_MARKER: &str = "[DONE]";

/// Client for OpenAI-compatible providers.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    target: ResolvedTarget,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, target: ResolvedTarget) -> Self {
        Self { http, target }
    }
}

#[async_trait]
impl ChatAdapter for OpenAiClient {
    async fn stream_chat(&self, command: ChatCommand) -> Result<ChatStream, ChatError> {
        let payload = ChatCompletionRequest {
            model: command.model.clone(),
            messages: MessageAdapter::to_openai_format(&command.messages),
            stream: true,
        };

        info!(
            model = command.model.as_str(),
            url = self.target.url.as_str(),
            messages = command.messages.len(),
            "Sending streaming request to OpenAI-compatible provider"
        );

        let response = self
            .http
            .post(&self.target.url)
            .header(reqwest::header::AUTHORIZATION, &self.target.authorization)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatError::network("openai-compatible", e))?;

        let status = response.status();
        if !status.is_success() {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ChatError::network("openai-compatible", e))?;
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                content_type,
                body: bytes,
            });
        }

        debug!("OpenAI-compatible stream established");

        let chunks = stream! {
            let mut parser = SseParser::new();
            let mut body = response.bytes_stream();

            while let Some(item) = body.next().await {
                let bytes = match item {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        yield Err(StreamFault::Transport(err.to_string()));
                        return;
                    }
                };
                let Ok(text) = std::str::from_utf8(&bytes) else {
                    continue;
                };
                for payload in parser.feed(text) {
                    if payload.trim() == DONE_MARKER {
                        return;
                    }
                    if let Some(delta) = parse_delta(&payload) {
                        yield Ok(delta);
                    }
                }
            }
        };

        Ok(Box::pin(chunks))
    }
}

/// Pull the text delta out of one chat-completions stream event.
fn parse_delta(payload: &str) -> Option<String> {
    let event: ChatCompletionChunk = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(err) => {
            warn!(%err, "skipping undecodable chat-completions stream event");
            return None;
        }
    };

    event
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty())
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: Option<ChunkDelta>,
}

#[derive(Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_delta_content() {
        let delta = parse_delta(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#);
        assert_eq!(delta.as_deref(), Some("Hi"));
    }

    #[test]
    fn role_only_and_empty_deltas_are_skipped() {
        assert!(parse_delta(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).is_none());
        assert!(parse_delta(r#"{"choices":[{"delta":{"content":""}}]}"#).is_none());
        assert!(parse_delta(r#"{"choices":[{"finish_reason":"stop"}]}"#).is_none());
        assert!(parse_delta(r#"{"object":"chat.completion.chunk"}"#).is_none());
        assert!(parse_delta("not json").is_none());
    }
}
