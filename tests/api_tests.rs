use anyhow::Result;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use privsearch::api::create_router;
use privsearch::data_models::Category;

mod common;
use common::*;

fn router(search: &Arc<FakeSearch>, completion: &Arc<FakeCompletion>) -> axum::Router {
    let origins = vec!["http://localhost:5173".to_string()];
    create_router(Arc::new(pipeline(search, completion)), &origins)
}

async fn send(app: axum::Router, request: Request<Body>) -> Result<(StatusCode, Vec<u8>)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, bytes.to_vec()))
}

fn chat_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_search_endpoint_defaults() -> Result<()> {
    let search = FakeSearch::returning(hits(9));
    let completion = FakeCompletion::healthy();
    let request = Request::get("/search?q=rust%20async").body(Body::empty())?;

    let (status, body) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body)?;
    assert_eq!(json["query"], "rust async");
    assert_eq!(json["results"].as_array().unwrap().len(), 5);
    assert_eq!(json["summary"], FAKE_SUMMARY);
    assert!(json.get("reply").is_none());
    assert_eq!(
        search.seen(),
        vec![("rust async".to_string(), Category::General, "en".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn test_search_endpoint_clamps_num_results_and_parses_category() -> Result<()> {
    let search = FakeSearch::returning(hits(30));
    let completion = FakeCompletion::healthy();
    let request =
        Request::get("/search?q=rust&category=News&language=de&num_results=50").body(Body::empty())?;

    let (status, body) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body)?;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 20);
    assert_eq!(results[0]["image"], Category::News.placeholder());
    assert_eq!(search.seen()[0].1, Category::News);
    assert_eq!(search.seen()[0].2, "de");
    Ok(())
}

#[tokio::test]
async fn test_search_endpoint_saturates_huge_num_results() -> Result<()> {
    let search = FakeSearch::returning(hits(30));
    let completion = FakeCompletion::healthy();
    let request =
        Request::get("/search?q=rust&num_results=99999999999999999999999").body(Body::empty())?;

    let (status, body) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body)?;
    assert_eq!(json["results"].as_array().unwrap().len(), 20);

    let request = chat_request(
        "/chat?num_results=-99999999999999999999999",
        json!({"message": "rust"}),
    );
    let (status, body) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body)?;
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_search_endpoint_rejects_missing_query() -> Result<()> {
    let search = FakeSearch::returning(hits(3));
    let completion = FakeCompletion::healthy();

    let request = Request::get("/search?q=%20%20").body(Body::empty())?;
    let (status, _) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::get("/search").body(Body::empty())?;
    let (status, _) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::get("/search?q=rust&num_results=lots").body(Body::empty())?;
    let (status, _) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(search.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_search_endpoint_upstream_failure_is_bad_gateway() -> Result<()> {
    let search = FakeSearch::failing("Error contacting SearXNG: connection refused");
    let completion = FakeCompletion::healthy();
    let request = Request::get("/search?q=rust").body(Body::empty())?;

    let (status, body) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(String::from_utf8(body)?.contains("connection refused"));
    assert_eq!(completion.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_chat_endpoint_with_history() -> Result<()> {
    let search = FakeSearch::returning(hits(3));
    let completion = FakeCompletion::healthy();
    let request = chat_request(
        "/chat?num_results=2&language=fr",
        json!({"messages": [
            {"role": "user", "content": "weather in Paris"},
            {"role": "assistant", "content": "Sunny."},
            {"role": "user", "content": "and tomorrow?"}
        ]}),
    );

    let (status, body) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body)?;
    assert_eq!(json["query"], "and tomorrow?");
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(json["reply"], FAKE_REPLY);
    assert_eq!(search.seen()[0].2, "fr");
    Ok(())
}

#[tokio::test]
async fn test_chat_endpoint_accepts_single_message() -> Result<()> {
    let search = FakeSearch::returning(hits(3));
    let completion = FakeCompletion::healthy();
    let request = chat_request("/chat", json!({"message": "weather in Paris"}));

    let (status, body) = send(router(&search, &completion), request).await?;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body)?;
    assert_eq!(json["query"], "weather in Paris");
    assert!(json["reply"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_chat_endpoint_rejects_bad_histories() -> Result<()> {
    let search = FakeSearch::returning(hits(3));
    let completion = FakeCompletion::healthy();

    for body in [
        json!({"messages": []}),
        json!({"messages": [{"role": "assistant", "content": "hi"}]}),
        json!({"message": "   "}),
        json!({"messages": [{"role": "wizard", "content": "hi"}]}),
        json!({"unexpected": true}),
    ] {
        let (status, _) = send(router(&search, &completion), chat_request("/chat", body)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    assert_eq!(search.calls(), 0);
    assert_eq!(completion.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() -> Result<()> {
    let search = FakeSearch::returning(hits(1));
    let completion = FakeCompletion::healthy();

    let request = Request::get("/search?q=rust")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())?;
    let response = router(&search, &completion).oneshot(request).await?;
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );

    let request = Request::get("/search?q=rust")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())?;
    let response = router(&search, &completion).oneshot(request).await?;
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
    Ok(())
}
