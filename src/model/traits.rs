//! Adapter traits

use async_trait::async_trait;

use super::types::{ChatError, ChatStream};
use crate::domain::types::ChatCommand;

/// Shared streaming contract over heterogeneous provider backends.
///
/// An adapter issues the upstream call and exposes the response as a lazy
/// chunk sequence; everything provider-specific (wire format, auth style,
/// fault detection) stays inside the implementation.
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Invoke the upstream in streaming mode.
    async fn stream_chat(&self, command: ChatCommand) -> Result<ChatStream, ChatError>;
}
