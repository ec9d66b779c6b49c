//! Integration tests for response classification
//!
//! Each test serves one canned response from a wiremock server and checks
//! the outcome kind produced by the fetcher.

use seoran::config::{FetchConfig, UserAgentConfig};
use seoran::crawler::{build_http_client, fetch_url, FailureKind, FetchOutcome};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIMIT: u64 = 5 * 1024 * 1024;

fn client(timeout_seconds: u64) -> reqwest::Client {
    let fetch = FetchConfig {
        timeout_seconds,
        max_content_length: LIMIT,
    };
    build_http_client(&UserAgentConfig::default(), &fetch).unwrap()
}

async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) -> Url {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
    Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
}

fn kind(outcome: &FetchOutcome) -> Option<FailureKind> {
    outcome.failure_kind()
}

#[tokio::test]
async fn test_success_reports_encoding_and_final_url() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/page",
        ResponseTemplate::new(200).set_body_raw("<p>سلام</p>", "text/html; charset=utf-8"),
    )
    .await;

    match fetch_url(&client(5), &url, LIMIT).await {
        FetchOutcome::Success {
            final_url,
            body,
            content_type,
            encoding,
        } => {
            assert_eq!(final_url, url);
            assert_eq!(body, "<p>سلام</p>");
            assert!(content_type.starts_with("text/html"));
            assert_eq!(encoding, "UTF-8");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_2xx_status() {
    let server = MockServer::start().await;
    let url = serve(&server, "/gone", ResponseTemplate::new(410)).await;

    let outcome = fetch_url(&client(5), &url, LIMIT).await;
    assert_eq!(kind(&outcome), Some(FailureKind::HttpStatus(410)));
}

#[tokio::test]
async fn test_status_checked_before_content_type() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/error",
        ResponseTemplate::new(503).set_body_raw("{}", "application/json"),
    )
    .await;

    let outcome = fetch_url(&client(5), &url, LIMIT).await;
    assert_eq!(kind(&outcome), Some(FailureKind::HttpStatus(503)));
}

#[tokio::test]
async fn test_non_html_content_type() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/file.bin",
        ResponseTemplate::new(200).set_body_raw(vec![0u8; 64], "application/pdf"),
    )
    .await;

    let outcome = fetch_url(&client(5), &url, LIMIT).await;
    assert_eq!(kind(&outcome), Some(FailureKind::UnsupportedContentType));
}

#[tokio::test]
async fn test_declared_length_over_limit() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/big",
        ResponseTemplate::new(200).set_body_raw("x".repeat(2048), "text/html"),
    )
    .await;

    let outcome = fetch_url(&client(5), &url, 1024).await;
    assert_eq!(kind(&outcome), Some(FailureKind::OversizeContent));
}

/// Serves one chunked response with no Content-Length header
async fn serve_chunked(chunks: Vec<String>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let mut response = String::from(
            "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ntransfer-encoding: chunked\r\nconnection: close\r\n\r\n",
        );
        for chunk in &chunks {
            response.push_str(&format!("{:x}\r\n{}\r\n", chunk.len(), chunk));
        }
        response.push_str("0\r\n\r\n");
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    Url::parse(&format!("http://{}/stream", addr)).unwrap()
}

#[tokio::test]
async fn test_streamed_body_over_limit() {
    let url = serve_chunked(vec!["x".repeat(600), "x".repeat(600)]).await;

    let outcome = fetch_url(&client(5), &url, 1024).await;
    assert_eq!(kind(&outcome), Some(FailureKind::OversizeContent));
}

#[tokio::test]
async fn test_streamed_body_under_limit() {
    let url = serve_chunked(vec!["<p>".to_string(), "سلام</p>".to_string()]).await;

    match fetch_url(&client(5), &url, 1024).await {
        FetchOutcome::Success { body, .. } => assert_eq!(body, "<p>سلام</p>"),
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_body_at_limit_is_accepted() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/exact",
        ResponseTemplate::new(200).set_body_raw("x".repeat(1024), "text/html"),
    )
    .await;

    let outcome = fetch_url(&client(5), &url, 1024).await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/slow",
        ResponseTemplate::new(200)
            .set_body_raw("<p>دیر</p>", "text/html")
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let outcome = fetch_url(&client(1), &url, LIMIT).await;
    assert_eq!(kind(&outcome), Some(FailureKind::Timeout));
}

#[tokio::test]
async fn test_redirect_loop() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/loop",
        ResponseTemplate::new(302).insert_header("location", "/loop"),
    )
    .await;

    let outcome = fetch_url(&client(5), &url, LIMIT).await;
    assert_eq!(kind(&outcome), Some(FailureKind::TooManyRedirects));
}

#[tokio::test]
async fn test_connection_refused() {
    let url = Url::parse("http://127.0.0.1:1/").unwrap();

    let outcome = fetch_url(&client(5), &url, LIMIT).await;
    assert_eq!(kind(&outcome), Some(FailureKind::ConnectionError));
}

#[tokio::test]
async fn test_corrupt_compression() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/broken",
        ResponseTemplate::new(200)
            .insert_header("content-encoding", "gzip")
            .set_body_raw(b"definitely not gzip".to_vec(), "text/html"),
    )
    .await;

    let outcome = fetch_url(&client(5), &url, LIMIT).await;
    assert_eq!(kind(&outcome), Some(FailureKind::DecodeError));
}

#[tokio::test]
async fn test_classification_is_deterministic() {
    let server = MockServer::start().await;
    let url = serve(&server, "/missing", ResponseTemplate::new(404)).await;
    let client = client(5);

    let first = fetch_url(&client, &url, LIMIT).await;
    let second = fetch_url(&client, &url, LIMIT).await;
    assert_eq!(kind(&first), kind(&second));
}
