//! Stream normalization
//!
//! Turns an adapter's chunk sequence into the response body: chunks are
//! forwarded in arrival order as raw UTF-8 bytes, a safety fault degrades
//! to an inline sentinel message, and a transport fault closes the body
//! cleanly. Once headers are out nothing here can fail the response.
//!
//! The body pulls chunks on demand, so backpressure and client-disconnect
//! cancellation propagate to the upstream call for free: a slow reader
//! stalls the adapter stream, and dropping the connection drops it.

use std::convert::Infallible;

use async_stream::stream;
use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::warn;

use crate::constants::SAFETY_NOTICE;
use crate::model::{ChatStream, StreamFault};

/// Flatten a chunk sequence into response-body frames.
pub fn normalize(chunks: ChatStream) -> impl Stream<Item = Bytes> {
    stream! {
        let mut chunks = chunks;
        while let Some(item) = chunks.next().await {
            match item {
                Ok(text) => yield Bytes::from(text),
                Err(StreamFault::SafetyBlocked) => {
                    warn!("safety filter tripped mid-stream, substituting sentinel");
                    yield Bytes::from_static(SAFETY_NOTICE.as_bytes());
                }
                Err(StreamFault::Transport(reason)) => {
                    warn!(%reason, "upstream stream failed mid-response, closing body");
                    return;
                }
            }
        }
    }
}

/// Wrap a chunk sequence as the streamed HTTP response.
///
/// The anti-buffering headers keep reverse proxies from holding deltas
/// back until the stream completes.
pub fn stream_response(chunks: ChatStream) -> Response {
    let frames = normalize(chunks).map(Ok::<_, Infallible>);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .header("x-accel-buffering", "no")
        .body(Body::from_stream(frames))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
