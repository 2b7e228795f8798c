use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header;
use axum::response::Response;
use axum::Json;
use tracing::{debug, info};

use super::super::dto::{ErrorResponse, GenericChatBody};
use super::super::error::chat_error_response;
use super::super::state::AppState;
use super::super::stream::stream_response;
use crate::attachment;
use crate::domain::types::{Attachment, ChatCommand, ChatMessage};
use crate::model::{
    ChatAdapter, ChatError, GeminiClient, OpenAiClient, ProviderKind, resolve_target,
};

/// Streaming chat against the native multimodal provider.
///
/// Multipart only: `model`, `messages` (JSON-encoded array), and zero or
/// more `files` parts that ride along as inline multimodal content.
#[utoipa::path(
    post,
    path = "/chat/multimodal",
    tag = "chat",
    responses(
        (status = 200, description = "Streamed response text", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn multimodal_chat(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    let command = match parse_multipart(multipart).await.and_then(FormFields::into_command) {
        Ok(command) => command,
        Err(err) => return chat_error_response(err),
    };

    info!(
        model = command.model.as_str(),
        messages = command.messages.len(),
        attachments = command.attachments.len(),
        "Received /chat/multimodal request"
    );

    let client = GeminiClient::from_config(state.http.clone(), &state.config);
    match client.stream_chat(command).await {
        Ok(chunks) => stream_response(chunks),
        Err(err) => chat_error_response(err),
    }
}

/// Streaming chat against an OpenAI-compatible provider.
///
/// Accepts multipart form data (with optional document uploads merged into
/// the conversation) or, for older clients, a plain JSON body.
#[utoipa::path(
    post,
    path = "/chat/generic",
    tag = "chat",
    request_body = GenericChatBody,
    responses(
        (status = 200, description = "Streamed response text", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn generic_chat(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let mut command = match ingest_generic(request).await {
        Ok(command) => command,
        Err(err) => return chat_error_response(err),
    };

    info!(
        model = command.model.as_str(),
        messages = command.messages.len(),
        attachments = command.attachments.len(),
        "Received /chat/generic request"
    );

    // Text-only upstream: documents fold into the conversation, other
    // binaries are dropped here.
    let attachments = std::mem::take(&mut command.attachments);
    attachment::merge_documents(&mut command.messages, &attachments);

    let entry = state.registry.lookup(&command.model);
    if entry.is_some_and(|entry| entry.kind == ProviderKind::Multimodal) {
        // No registry base URL for these; resolution falls through to the
        // global fallbacks.
        debug!(
            model = command.model.as_str(),
            "multimodal model requested through the generic endpoint"
        );
    }
    let target = match resolve_target(&command, entry, &state.config, &state.env) {
        Ok(target) => target,
        Err(err) => return chat_error_response(err),
    };
    debug!(url = target.url.as_str(), "Resolved upstream target");

    let client = OpenAiClient::new(state.http.clone(), target);
    match client.stream_chat(command).await {
        Ok(chunks) => stream_response(chunks),
        Err(err) => chat_error_response(err),
    }
}

/// Decode the generic endpoint's body in either supported encoding.
async fn ingest_generic(request: Request) -> Result<ChatCommand, ChatError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|err| ChatError::validation(format!("unreadable multipart body: {err}")))?;
        return parse_multipart(multipart).await?.into_command();
    }

    let Json(body) = Json::<GenericChatBody>::from_request(request, &())
        .await
        .map_err(|err| ChatError::validation(format!("undecodable request body: {err}")))?;

    let mut command = validated_command(body.model, body.messages)?;
    command.api_key = explicit_key(body.key);
    command.endpoint = non_empty(body.endpoint);
    Ok(command)
}

/// Raw named fields of a multipart chat request.
#[derive(Debug, Default)]
struct FormFields {
    model: Option<String>,
    messages: Option<String>,
    key: Option<String>,
    endpoint: Option<String>,
    base_url: Option<String>,
    api_key_env: Option<String>,
    attachments: Vec<Attachment>,
}

impl FormFields {
    fn into_command(self) -> Result<ChatCommand, ChatError> {
        let model = self
            .model
            .filter(|model| !model.trim().is_empty())
            .ok_or_else(|| ChatError::validation("missing model field"))?;
        let raw_messages = self
            .messages
            .ok_or_else(|| ChatError::validation("missing messages field"))?;
        let messages: Vec<ChatMessage> = serde_json::from_str(&raw_messages)
            .map_err(|err| ChatError::validation(format!("undecodable messages field: {err}")))?;

        let mut command = validated_command(model, messages)?;
        command.api_key = explicit_key(self.key);
        command.endpoint = non_empty(self.endpoint);
        command.base_url = non_empty(self.base_url);
        command.api_key_env = non_empty(self.api_key_env);
        command.attachments = self.attachments;
        Ok(command)
    }
}

async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, ChatError> {
    let mut fields = FormFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ChatError::validation(format!("unreadable multipart body: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "model" => fields.model = Some(field_text(field).await?),
            "messages" => fields.messages = Some(field_text(field).await?),
            "key" => fields.key = Some(field_text(field).await?),
            "endpoint" => fields.endpoint = Some(field_text(field).await?),
            "baseUrl" => fields.base_url = Some(field_text(field).await?),
            "apiKeyEnv" => fields.api_key_env = Some(field_text(field).await?),
            "files" => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    ChatError::validation(format!("unreadable file part: {err}"))
                })?;
                fields.attachments.push(Attachment::new(mime_type, bytes));
            }
            _ => debug!(field = name.as_str(), "ignoring unknown multipart field"),
        }
    }

    Ok(fields)
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ChatError> {
    field
        .text()
        .await
        .map_err(|err| ChatError::validation(format!("unreadable multipart field: {err}")))
}

fn validated_command(
    model: String,
    messages: Vec<ChatMessage>,
) -> Result<ChatCommand, ChatError> {
    if model.trim().is_empty() {
        return Err(ChatError::validation("missing model field"));
    }
    if messages.is_empty() {
        return Err(ChatError::validation("messages must not be empty"));
    }
    Ok(ChatCommand::new(model, messages))
}

/// A key is only explicit when it is non-empty and not the literal
/// `"undefined"` some clients serialize for an absent value.
fn explicit_key(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != "undefined")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MessageRole;

    #[test]
    fn undefined_key_literal_is_treated_as_absent() {
        assert_eq!(explicit_key(Some("undefined".to_string())), None);
        assert_eq!(explicit_key(Some("".to_string())), None);
        assert_eq!(explicit_key(None), None);
        assert_eq!(explicit_key(Some("sk-live".to_string())), Some("sk-live".to_string()));
    }

    #[test]
    fn form_fields_decode_messages_json() {
        let fields = FormFields {
            model: Some("zai-org/GLM-4.6".to_string()),
            messages: Some(r#"[{"role":"user","content":"hi"}]"#.to_string()),
            key: Some("undefined".to_string()),
            ..FormFields::default()
        };
        let command = fields.into_command().unwrap();
        assert_eq!(command.model, "zai-org/GLM-4.6");
        assert_eq!(command.messages[0].role, MessageRole::User);
        assert_eq!(command.api_key, None);
    }

    #[test]
    fn undecodable_messages_are_a_validation_error() {
        let fields = FormFields {
            model: Some("m".to_string()),
            messages: Some("not json".to_string()),
            ..FormFields::default()
        };
        assert!(matches!(
            fields.into_command(),
            Err(ChatError::Validation { .. })
        ));
    }

    #[test]
    fn empty_message_list_is_rejected() {
        let fields = FormFields {
            model: Some("m".to_string()),
            messages: Some("[]".to_string()),
            ..FormFields::default()
        };
        assert!(matches!(
            fields.into_command(),
            Err(ChatError::Validation { .. })
        ));
    }

    #[test]
    fn missing_model_is_rejected() {
        let fields = FormFields {
            messages: Some(r#"[{"role":"user","content":"hi"}]"#.to_string()),
            ..FormFields::default()
        };
        assert!(matches!(
            fields.into_command(),
            Err(ChatError::Validation { .. })
        ));
    }
}
