use utoipa::OpenApi;

use super::dto::{ErrorResponse, GenericChatBody};
use crate::domain::types::{ChatMessage, MessageRole};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::routes::chat::multimodal_chat,
        super::routes::chat::generic_chat,
    ),
    components(schemas(GenericChatBody, ErrorResponse, ChatMessage, MessageRole)),
    tags((name = "chat", description = "Streaming chat endpoints"))
)]
pub(super) struct ApiDoc;
