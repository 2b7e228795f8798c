//! Native Gemini client
//!
//! Speaks the Generative Language API directly: `streamGenerateContent`
//! with `alt=sse`, inline binary parts for uploads, and the conversation
//! replayed as `contents` history. A safety-filtered delta surfaces as a
//! recoverable stream fault, never as a transport error.

use async_stream::stream;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::StreamExt;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::attachment;
use crate::config::GatewayConfig;
use crate::constants::{GEMINI_API_BASE, INVALID_CONVERSATION};
use crate::domain::types::{ChatCommand, ChatMessage};
use crate::model::adapter::MessageAdapter;
use crate::model::sse::SseParser;
use crate::model::traits::ChatAdapter;
use crate::model::types::{ChatError, ChatStream, StreamFault};

/// Safety thresholds sent with every request: the most permissive setting
/// for all four standard harm categories, so the filter never truncates a
/// response the caller asked for. Blocked content is still reported by the
/// API and degraded to the sentinel downstream.
static SAFETY_SETTINGS: Lazy<Value> = Lazy::new(|| {
    json!([
        {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE"},
        {"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_NONE"},
        {"category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_NONE"},
        {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_NONE"},
    ])
});

/// Client for the native multimodal provider.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &GatewayConfig) -> Self {
        Self::new(http, config.gemini_api_key.clone())
    }

    fn build_url(model: &str) -> String {
        format!("{GEMINI_API_BASE}/models/{model}:streamGenerateContent")
    }

    /// Build the request body for either invocation mode.
    ///
    /// The first message is the context turn and never replays. With
    /// attachments the last turn becomes a single user content whose parts
    /// combine the prompt text with each upload; without them the turns in
    /// between replay as history.
    fn build_request_body(command: &ChatCommand) -> Result<Value, ChatError> {
        let turns: &[ChatMessage] = command.messages.get(1..).unwrap_or_default();
        let Some((prompt, history)) = turns.split_last() else {
            return Err(ChatError::validation(INVALID_CONVERSATION));
        };

        let contents = if command.attachments.is_empty() {
            let mut contents = MessageAdapter::to_gemini_history(history);
            contents.push(json!({
                "role": "user",
                "parts": [{"text": prompt.content.clone()}]
            }));
            contents
        } else {
            let mut parts = vec![json!({"text": prompt.content.clone()})];
            for upload in &command.attachments {
                if upload.is_document() {
                    parts.push(json!({"text": attachment::document_text(upload)}));
                } else {
                    parts.push(json!({
                        "inlineData": {
                            "mimeType": upload.mime_type.clone(),
                            "data": BASE64.encode(&upload.bytes),
                        }
                    }));
                }
            }
            vec![json!({"role": "user", "parts": parts})]
        };

        Ok(json!({
            "contents": contents,
            "safetySettings": SAFETY_SETTINGS.clone(),
        }))
    }
}

#[async_trait]
impl ChatAdapter for GeminiClient {
    async fn stream_chat(&self, command: ChatCommand) -> Result<ChatStream, ChatError> {
        let url = Self::build_url(&command.model);
        let body = Self::build_request_body(&command)?;

        info!(
            model = command.model.as_str(),
            messages = command.messages.len(),
            attachments = command.attachments.len(),
            "Sending streaming request to Gemini"
        );

        let response = self
            .http
            .post(&url)
            .query(&[("alt", "sse"), ("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::network("gemini", e))?;

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
                .map_err(|e| ChatError::network("gemini", e))?;
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                content_type,
                body: bytes,
            });
        }

        debug!("Gemini stream established");

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
                    for delta in parse_payload(&payload) {
                        yield delta;
                    }
                }
            }
            for payload in parser.finish() {
                for delta in parse_payload(&payload) {
                    yield delta;
                }
            }
        };

        Ok(Box::pin(chunks))
    }
}

/// Interpret one SSE event payload as zero or more chunk results.
fn parse_payload(payload: &str) -> Vec<Result<String, StreamFault>> {
    let event: GeminiStreamEvent = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(err) => {
            warn!(%err, "skipping undecodable Gemini stream event");
            return Vec::new();
        }
    };

    let text: String = event
        .candidates
        .iter()
        .flatten()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter().flatten())
        .filter_map(|part| part.text.as_deref())
        .collect();

    if !text.is_empty() {
        return vec![Ok(text)];
    }

    if event.blocked() {
        return vec![Err(StreamFault::SafetyBlocked)];
    }

    Vec::new()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiStreamEvent {
    candidates: Option<Vec<GeminiCandidate>>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

impl GeminiStreamEvent {
    /// A textless event is a safety trip when the prompt feedback carries a
    /// block reason or a candidate finished with the SAFETY reason.
    fn blocked(&self) -> bool {
        if self
            .prompt_feedback
            .as_ref()
            .is_some_and(|feedback| feedback.block_reason.is_some())
        {
            return true;
        }
        self.candidates.iter().flatten().any(|candidate| {
            candidate
                .finish_reason
                .as_deref()
                .is_some_and(|reason| reason == "SAFETY")
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
