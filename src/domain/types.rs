use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::DOCX_MIME;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Raw uploaded file, as received from the multipart boundary.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub bytes: Bytes,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Word documents get their text extracted; everything else is passed
    /// through as inline binary where the provider supports it.
    pub fn is_document(&self) -> bool {
        self.mime_type == DOCX_MIME
    }
}

/// Normalized chat request, independent of the inbound encoding.
///
/// Optional fields are per-request overrides; absent values fall back to
/// the registry entry and then the process configuration during routing.
#[derive(Debug, Clone)]
pub struct ChatCommand {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub api_key_env: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl ChatCommand {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            api_key: None,
            base_url: None,
            endpoint: None,
            api_key_env: None,
            attachments: Vec::new(),
        }
    }
}
