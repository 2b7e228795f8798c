use std::net::SocketAddr;

use axum::Json;
use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use super::dto::ErrorResponse;
use crate::model::ChatError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Translate a pre-stream failure into the client-visible response.
///
/// Upstream non-success responses relay their original status and body;
/// everything else becomes a local error with a short message.
pub(crate) fn chat_error_response(err: ChatError) -> Response {
    match err {
        ChatError::Upstream {
            status,
            content_type,
            body,
        } => {
            error!(status, "relaying upstream error response");
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            let mut builder = Response::builder().status(status);
            if let Some(content_type) = content_type {
                builder = builder.header(header::CONTENT_TYPE, content_type);
            }
            builder
                .body(Body::from(body))
                .unwrap_or_else(|_| status.into_response())
        }
        ChatError::Validation { .. } => {
            error!(%err, "rejecting invalid chat request");
            reply(StatusCode::BAD_REQUEST, err.user_message())
        }
        ChatError::Network { .. } => {
            error!(%err, "upstream call failed before the stream opened");
            reply(StatusCode::BAD_GATEWAY, err.user_message())
        }
        ChatError::Unroutable { .. } => {
            error!(%err, "no upstream target could be resolved");
            reply(StatusCode::INTERNAL_SERVER_ERROR, err.user_message())
        }
    }
}

fn reply(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}
