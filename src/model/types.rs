//! Model types - chunk stream, fault, and error types

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use thiserror::Error;

/// Lazy, single-pass sequence of text deltas pulled from an upstream call.
///
/// Chunks arrive in provider order; a fault item is recoverable and does
/// not terminate the sequence by itself.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, StreamFault>> + Send>>;

/// Recoverable fault raised while a response stream is already open.
#[derive(Debug, Error)]
pub enum StreamFault {
    /// The provider's content filter withheld a delta.
    #[error("content withheld by the provider safety filter")]
    SafetyBlocked,
    /// The upstream transport failed mid-stream.
    #[error("upstream transport failed mid-stream: {0}")]
    Transport(String),
}

/// Failures raised before the response stream opens.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid request: {reason}")]
    Validation { reason: String },
    #[error("upstream returned status {status}")]
    Upstream {
        status: u16,
        content_type: Option<String>,
        body: Bytes,
    },
    #[error("network error calling '{provider}': {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("no upstream base URL configured for model '{model}'")]
    Unroutable { model: String },
}

impl ChatError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn network(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Network { provider, source }
    }

    pub fn unroutable(model: impl Into<String>) -> Self {
        Self::Unroutable {
            model: model.into(),
        }
    }

    /// User-facing message for failures that are not passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Validation { reason } => reason.clone(),
            ChatError::Upstream { status, .. } => format!("上游服务返回错误（{status}）"),
            ChatError::Network { .. } => "无法连接上游服务，请稍后重试".to_string(),
            ChatError::Unroutable { model } => {
                format!("模型 '{model}' 未配置可用的上游地址")
            }
        }
    }
}
