use bitlinks_core::{Shortener, ShortenerError, TaggedUrl};
use bitlinks_shortener::{BitlyConfig, BitlyShortener};
use mockito::{Matcher, Server};
use serde_json::json;

const LONG_URL: &str =
    "https://example.com/page?utm_source=telegram&utm_medium=social&utm_campaign=our-channel";

fn shortener_for(server: &Server) -> BitlyShortener {
    BitlyShortener::new(
        BitlyConfig::builder()
            .token("test-token")
            .api_base(server.url())
            .build(),
    )
    .expect("build shortener")
}

#[tokio::test]
async fn returns_link_from_created_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v4/shorten")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Json(json!({ "long_url": LONG_URL })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"link":"https://bit.ly/3abcDEF","id":"bit.ly/3abcDEF"}"#)
        .create_async()
        .await;

    let link = shortener_for(&server)
        .shorten(&TaggedUrl::new(LONG_URL))
        .await
        .unwrap();

    assert_eq!(link.as_str(), "https://bit.ly/3abcDEF");
    mock.assert_async().await;
}

#[tokio::test]
async fn sends_domain_and_group_when_configured() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v4/shorten")
        .match_body(Matcher::Json(json!({
            "long_url": LONG_URL,
            "domain": "go.example",
            "group_guid": "Ba1bc23dE4F",
        })))
        .with_status(200)
        .with_body(r#"{"link":"https://go.example/x"}"#)
        .create_async()
        .await;

    let shortener = BitlyShortener::new(
        BitlyConfig::builder()
            .token("test-token")
            .api_base(server.url())
            .domain("go.example")
            .group_guid("Ba1bc23dE4F")
            .build(),
    )
    .unwrap();

    let link = shortener.shorten(&TaggedUrl::new(LONG_URL)).await.unwrap();

    assert_eq!(link.as_str(), "https://go.example/x");
    mock.assert_async().await;
}

#[tokio::test]
async fn forbidden_is_unauthorized() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v4/shorten")
        .with_status(403)
        .with_body(r#"{"message":"FORBIDDEN"}"#)
        .create_async()
        .await;

    let err = shortener_for(&server)
        .shorten(&TaggedUrl::new(LONG_URL))
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::Unauthorized(ref body) if body.contains("FORBIDDEN")));
}

#[tokio::test]
async fn rate_limit_and_other_statuses() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v4/shorten")
        .with_status(429)
        .create_async()
        .await;

    let err = shortener_for(&server)
        .shorten(&TaggedUrl::new(LONG_URL))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortenerError::RateLimited(_)));

    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v4/shorten")
        .with_status(500)
        .create_async()
        .await;

    let err = shortener_for(&server)
        .shorten(&TaggedUrl::new(LONG_URL))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortenerError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn body_without_link_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v4/shorten")
        .with_status(200)
        .with_body(r#"{"id":"bit.ly/abc"}"#)
        .create_async()
        .await;

    let err = shortener_for(&server)
        .shorten(&TaggedUrl::new(LONG_URL))
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let shortener = BitlyShortener::new(
        BitlyConfig::builder()
            .token("test-token")
            .api_base("http://127.0.0.1:1")
            .build(),
    )
    .unwrap();

    let err = shortener
        .shorten(&TaggedUrl::new(LONG_URL))
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::Transport(_)));
}
