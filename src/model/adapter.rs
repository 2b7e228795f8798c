//! Message adapters - convert between different API formats

use serde_json::{Value, json};

use crate::domain::types::{ChatMessage, MessageRole};

/// Adapter for converting messages to provider wire formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format
    /// Returns: [{"role": "...", "content": "..."}]
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content.clone()
                })
            })
            .collect()
    }

    /// Convert replayed history turns to Gemini `contents` entries.
    ///
    /// Role mapping: assistant turns replay as the model role, user turns
    /// as the user role, anything else as the generic function role.
    pub fn to_gemini_history(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": Self::gemini_role(msg.role),
                    "parts": [{"text": msg.content.clone()}]
                })
            })
            .collect()
    }

    pub fn gemini_role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::Assistant => "model",
            MessageRole::User => "user",
            _ => "function",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_format_keeps_roles_and_order() {
        let messages = vec![
            ChatMessage::new(MessageRole::System, "ctx"),
            ChatMessage::new(MessageRole::User, "hi"),
        ];
        let formatted = MessageAdapter::to_openai_format(&messages);
        assert_eq!(formatted[0]["role"], "system");
        assert_eq!(formatted[1]["role"], "user");
        assert_eq!(formatted[1]["content"], "hi");
    }

    #[test]
    fn gemini_history_maps_roles() {
        let messages = vec![
            ChatMessage::new(MessageRole::User, "q"),
            ChatMessage::new(MessageRole::Assistant, "a"),
            ChatMessage::new(MessageRole::System, "s"),
        ];
        let history = MessageAdapter::to_gemini_history(&messages);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[1]["role"], "model");
        assert_eq!(history[2]["role"], "function");
        assert_eq!(history[1]["parts"][0]["text"], "a");
    }
}
