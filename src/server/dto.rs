use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::types::ChatMessage;

/// JSON body accepted by the generic endpoint for clients that do not
/// upload files.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenericChatBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub key: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
