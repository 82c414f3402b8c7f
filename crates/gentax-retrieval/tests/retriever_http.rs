//! Integration tests for the HTTP retriever against a mocked retrieval API.

use gentax_retrieval::{HttpRetriever, NoRetriever, Retriever};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn retrieves_bare_snippet_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrieve"))
        .and(body_partial_json(serde_json::json!({
            "query": "gst rate",
            "top_k": 5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"source": "gst.json", "chunk_id": 0, "text": "GST is 18% for most services."},
            {"source": "gst.json", "chunk_id": 4, "text": "Some goods attract 5%."},
        ])))
        .mount(&server)
        .await;

    let retriever = HttpRetriever::new(format!("{}/retrieve", server.uri()));
    let snippets = retriever.retrieve("gst rate", 5).await.unwrap();

    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0].source.as_deref(), Some("gst.json"));
    assert_eq!(snippets[1].chunk_id, Some(4));
}

#[tokio::test]
async fn retrieves_wrapped_results_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"text": "Income tax slabs changed in FY24."}],
        })))
        .mount(&server)
        .await;

    let retriever = HttpRetriever::new(server.uri());
    let snippets = retriever.retrieve("income tax slabs", 3).await.unwrap();

    assert_eq!(snippets.len(), 1);
    // Provenance fields may be absent; the caller defaults them.
    assert!(snippets[0].source.is_none());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("index rebuilding"))
        .mount(&server)
        .await;

    let retriever = HttpRetriever::new(server.uri());
    let err = retriever.retrieve("anything", 5).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("503"), "unexpected error: {msg}");
    assert!(msg.contains("index rebuilding"), "unexpected error: {msg}");
}

#[tokio::test]
async fn malformed_payload_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!("just a string")))
        .mount(&server)
        .await;

    let retriever = HttpRetriever::new(server.uri());
    let err = retriever.retrieve("anything", 5).await.unwrap_err();
    assert!(err.to_string().contains("Unexpected retrieval payload"));
}

#[tokio::test]
async fn unreachable_endpoint_is_an_error() {
    // Nothing listens on this port.
    let retriever = HttpRetriever::new("http://127.0.0.1:1/retrieve");
    assert!(retriever.retrieve("anything", 5).await.is_err());
}

#[tokio::test]
async fn no_retriever_always_returns_empty() {
    let snippets = NoRetriever.retrieve("anything", 10).await.unwrap();
    assert!(snippets.is_empty());
}
