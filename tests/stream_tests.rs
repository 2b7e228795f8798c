// Stream normalizer tests - ordering and fault degradation
//
// The normalizer sits between a provider adapter and the response body;
// these tests drive it with stub adapter streams.

use bytes::Bytes;
use futures::StreamExt;
use futures::stream;

use unichat_server::constants::SAFETY_NOTICE;
use unichat_server::model::{ChatStream, StreamFault};
use unichat_server::server::stream::normalize;

fn stub_stream(items: Vec<Result<String, StreamFault>>) -> ChatStream {
    Box::pin(stream::iter(items))
}

async fn collect_text(chunks: ChatStream) -> (Vec<Bytes>, String) {
    let frames: Vec<Bytes> = normalize(chunks).collect().await;
    let combined = frames
        .iter()
        .map(|frame| std::str::from_utf8(frame).unwrap())
        .collect::<String>();
    (frames, combined)
}

#[tokio::test]
async fn chunks_are_forwarded_in_order() {
    let chunks = stub_stream(vec![
        Ok("a".to_string()),
        Ok("b".to_string()),
        Ok("c".to_string()),
    ]);

    let (frames, combined) = collect_text(chunks).await;
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], Bytes::from("a"));
    assert_eq!(frames[1], Bytes::from("b"));
    assert_eq!(frames[2], Bytes::from("c"));
    assert_eq!(combined, "abc");
}

#[tokio::test]
async fn safety_fault_degrades_to_sentinel_and_continues() {
    let chunks = stub_stream(vec![
        Ok("a".to_string()),
        Err(StreamFault::SafetyBlocked),
        Ok("c".to_string()),
    ]);

    let (frames, combined) = collect_text(chunks).await;
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[1], Bytes::from(SAFETY_NOTICE));
    assert_eq!(combined, format!("a{SAFETY_NOTICE}c"));
}

#[tokio::test]
async fn transport_fault_closes_the_body_cleanly() {
    let chunks = stub_stream(vec![
        Ok("partial".to_string()),
        Err(StreamFault::Transport("connection reset".to_string())),
        Ok("never emitted".to_string()),
    ]);

    let (frames, combined) = collect_text(chunks).await;
    assert_eq!(frames.len(), 1);
    assert_eq!(combined, "partial");
}

#[tokio::test]
async fn empty_stream_closes_without_frames() {
    let (frames, combined) = collect_text(stub_stream(Vec::new())).await;
    assert!(frames.is_empty());
    assert_eq!(combined, "");
}
