use serde_json::json;

use super::*;

fn chunked(body: &str, chunk_size: usize) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let chunks = body
        .as_bytes()
        .chunks(chunk_size)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect::<Vec<_>>();
    futures::stream::iter(chunks)
}

async fn collect(mut events: ListEvents) -> Vec<Result<ListEvent, ClientError>> {
    let mut result = Vec::new();
    while let Some(event) = events.next().await {
        result.push(event);
    }

    result
}

#[tokio::test]
async fn parse_list_across_chunks_test() {
    let body = json!({
        "kind": "PodList",
        "apiVersion": "v1",
        "metadata": { "resourceVersion": "42" },
        "items": [
            { "metadata": { "name": "pod-1" } },
            { "metadata": { "name": "pod-2" } },
        ],
    })
    .to_string();

    let events = collect(parse_list(chunked(&body, 7))).await;
    let events = events.into_iter().map(Result::unwrap).collect::<Vec<_>>();

    assert_eq!(4, events.len());
    let ListEvent::Header(header) = &events[0] else {
        panic!("expected header, got {:?}", events[0]);
    };
    assert_eq!(Some(&json!("PodList")), header.get("kind"));
    assert_eq!(Some(&json!("42")), header.get("metadata").and_then(|m| m.get("resourceVersion")));
    assert_eq!(ListEvent::Item(json!({ "metadata": { "name": "pod-1" } })), events[1]);
    assert_eq!(ListEvent::Item(json!({ "metadata": { "name": "pod-2" } })), events[2]);
    assert_eq!(ListEvent::Done(Map::new()), events[3]);
}

#[tokio::test]
async fn parse_list_with_trailing_fields_test() {
    let body = r#"{"items":[{"a":1}],"kind":"List","metadata":{"continue":"abc"}}"#;

    let events = collect(parse_list(chunked(body, 3))).await;
    let events = events.into_iter().map(Result::unwrap).collect::<Vec<_>>();

    assert_eq!(ListEvent::Header(Map::new()), events[0]);
    assert_eq!(ListEvent::Item(json!({ "a": 1 })), events[1]);
    let ListEvent::Done(footer) = &events[2] else {
        panic!("expected done, got {:?}", events[2]);
    };
    assert_eq!(Some(&json!("List")), footer.get("kind"));
}

#[tokio::test]
async fn parse_list_with_null_items_test() {
    let events = collect(parse_list(chunked(r#"{"kind":"PodList","items":null}"#, 64))).await;
    let events = events.into_iter().map(Result::unwrap).collect::<Vec<_>>();

    assert_eq!(2, events.len());
    assert!(matches!(&events[1], ListEvent::Done(footer) if footer.is_empty()));
}

#[tokio::test]
async fn parse_list_malformed_body_test() {
    let events = collect(parse_list(chunked(r#"{"kind":"PodList","items":[{"a":1},{"b":"#, 5))).await;

    assert!(matches!(events.first(), Some(Ok(ListEvent::Header(_)))));
    assert!(matches!(events.get(1), Some(Ok(ListEvent::Item(_)))));
    assert!(matches!(events.last(), Some(Err(ClientError::Json(_)))));
}

#[tokio::test]
async fn parse_list_stream_error_test() {
    let chunks = vec![
        Ok(Bytes::from_static(b"{\"items\":[")),
        Err(std::io::Error::other("connection reset")),
    ];

    let events = collect(parse_list(futures::stream::iter(chunks))).await;

    assert!(matches!(events.last(), Some(Err(ClientError::Json(_)))));
}
