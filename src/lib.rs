//! unichat-server
//!
//! Streaming chat gateway: a single pair of HTTP endpoints in front of the
//! native Gemini API and any number of OpenAI-compatible providers. The
//! gateway resolves the upstream target and credentials per request,
//! normalizes uploaded files into provider-acceptable payloads, and relays
//! the upstream's streamed deltas as one uniform text byte-stream.

pub mod attachment;
pub mod config;
pub mod constants;
pub mod domain;
pub mod model;
pub mod server;
