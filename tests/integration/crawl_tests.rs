//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use seoran::config::Config;
use seoran::crawler::{Coordinator, FailureKind};
use seoran::state::CompletionReason;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HTML: &str = "text/html; charset=utf-8";

/// Creates a test configuration rooted at `output`, with no politeness delay
fn create_test_config(seed: &str, max_pages: u32, output: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.seed_url = seed.to_string();
    config.crawler.max_pages = max_pages;
    config.crawler.request_delay_seconds = 0.0;
    config.fetch.timeout_seconds = 5;
    config.output.directory = output.to_string_lossy().into_owned();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>صفحه</title></head><body>{}</body></html>", body),
        HTML,
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

/// All files under `dir`, recursively
fn saved_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(saved_files(&path));
        } else {
            files.push(path);
        }
    }
    files.sort();
    files
}

#[tokio::test]
async fn test_single_page_cap_saves_one_file() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"
        <a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>
        <a href="/d">d</a><a href="/e">e</a>
        <a href="http://other.invalid/x">x</a>
        <a href="http://another.invalid/y">y</a>
        "#,
        1,
    )
    .await;

    let config = create_test_config(&format!("{}/", server.uri()), 1, temp.path());
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.reason, CompletionReason::PageCapReached);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.visited, 1);
    assert!(report.pending <= 5);
    assert_eq!(report.saved.len(), 1);
    assert_eq!(saved_files(temp.path()).len(), 1);

    for pending in coordinator.session().frontier().pending_urls() {
        assert_eq!(pending.host_str(), Some("127.0.0.1"));
    }
}

#[tokio::test]
async fn test_breadth_first_order_and_scope_filtering() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"
        <a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>
        <a href="/d">d</a><a href="/e">e</a>
        <a href="http://other.invalid/x">x</a>
        <a href="http://another.invalid/y">y</a>
        "#,
        1,
    )
    .await;
    mount_page(&server, "/a", "<p>الف</p>", 1).await;
    mount_page(&server, "/b", "<p>ب</p>", 1).await;
    for never in ["/c", "/d", "/e"] {
        mount_page(&server, never, "", 0).await;
    }

    let config = create_test_config(&format!("{}/", server.uri()), 3, temp.path());
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.reason, CompletionReason::PageCapReached);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.visited, 3);
    assert_eq!(report.pending, 3);

    let pending: Vec<String> = coordinator
        .session()
        .frontier()
        .pending_urls()
        .map(|u| u.path().to_string())
        .collect();
    assert_eq!(pending, vec!["/c", "/d", "/e"]);
}

#[tokio::test]
async fn test_seed_404_exhausts_frontier() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let config = create_test_config(&seed, 10, temp.path());
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.reason, CompletionReason::FrontierExhausted);
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.visited, 1);
    assert_eq!(report.pending, 0);
    assert_eq!(report.failures.get(&FailureKind::HttpStatus(404)), Some(&1));
    assert!(coordinator.session().frontier().is_visited(&report.seed));
    assert!(saved_files(temp.path()).is_empty());
}

#[tokio::test]
async fn test_document_extensions_never_admitted() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/a.pdf">pdf</a><a href="/photo.jpg">jpg</a><a href="/doc.html">doc</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/doc.html", "<p>سند</p>", 1).await;
    mount_page(&server, "/a.pdf", "", 0).await;
    mount_page(&server, "/photo.jpg", "", 0).await;

    let config = create_test_config(&format!("{}/", server.uri()), 10, temp.path());
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.reason, CompletionReason::FrontierExhausted);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.visited, 2);
    assert_eq!(report.saved.len(), 2);
}

#[tokio::test]
async fn test_explicit_domains_exclude_unlisted_hosts() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    // The local link comes first, so the cap is reached before b.invalid is popped.
    mount_page(
        &server,
        "/",
        r#"
        <a href="/local">local</a>
        <a href="http://b.invalid/x">b</a>
        <a href="http://c.invalid/y">c</a>
        "#,
        1,
    )
    .await;
    mount_page(&server, "/local", "<p>محلی</p>", 1).await;

    let mut config = create_test_config(&format!("{}/", server.uri()), 2, temp.path());
    config.crawler.allowed_domains = vec!["127.0.0.1".to_string(), "b.invalid".to_string()];

    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.reason, CompletionReason::PageCapReached);
    assert_eq!(report.pages_fetched, 2);

    let pending: Vec<String> = coordinator
        .session()
        .frontier()
        .pending_urls()
        .map(|u| u.to_string())
        .collect();
    assert_eq!(pending, vec!["http://b.invalid/x"]);
    assert!(report.scope.contains_host("b.invalid"));
    assert!(!report.scope.contains_host("c.invalid"));
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r##"<a href="/a">1</a><a href="/a#part">2</a><a href="/">home</a>"##,
        1,
    )
    .await;
    mount_page(&server, "/a", r#"<a href="/">home</a><a href="/a">self</a>"#, 1).await;

    let config = create_test_config(&format!("{}/", server.uri()), 10, temp.path());
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.reason, CompletionReason::FrontierExhausted);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.visited, 2);
    assert_eq!(saved_files(temp.path()).len(), 2);
}

#[tokio::test]
async fn test_failures_do_not_stop_the_crawl() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/missing">1</a><a href="/data.json">2</a><a href="/ok">3</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>درست</p>", 1).await;

    let config = create_test_config(&format!("{}/", server.uri()), 10, temp.path());
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.reason, CompletionReason::FrontierExhausted);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.visited, 4);
    assert_eq!(report.total_failures(), 2);
    assert_eq!(report.failures.get(&FailureKind::HttpStatus(500)), Some(&1));
    assert_eq!(
        report.failures.get(&FailureKind::UnsupportedContentType),
        Some(&1)
    );
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/dir/new"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/dir/new", r#"<a href="child">child</a>"#, 1).await;
    mount_page(&server, "/dir/child", "<p>فرزند</p>", 1).await;

    let config = create_test_config(&format!("{}/old", server.uri()), 10, temp.path());
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.pages_fetched, 2);
    // Saved under the URL that was requested, not the redirect target.
    assert_eq!(report.saved[0].url, report.seed);
}

#[tokio::test]
async fn test_unreliable_charset_is_resniffed() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let persian = "زبان فارسی یکی از زبان‌های هندواروپایی است";

    Mock::given(method("GET"))
        .and(path("/fa"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!("<html><body><p>{}</p></body></html>", persian),
            "text/html; charset=windows-1256",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/fa", server.uri()), 1, temp.path());
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.saved.len(), 1);
    let saved = std::fs::read_to_string(&report.saved[0].path).unwrap();
    assert!(saved.contains(persian));
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "SeoranBot/1.0 (+http://sajjadakbari.ir/seoran-bot-info)",
        ))
        .respond_with(html_page("<p>سلام</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", server.uri()), 1, temp.path());
    let report = seoran::crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 1);
}

#[tokio::test]
async fn test_store_failure_keeps_crawling() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/next">next</a>"#, 1).await;
    mount_page(&server, "/next", "<p>بعدی</p>", 1).await;

    // A regular file where the output directory should be.
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();

    let config = create_test_config(&format!("{}/", server.uri()), 10, &blocker);
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.store_errors, 2);
    assert!(report.saved.is_empty());
}

#[tokio::test]
async fn test_saved_pages_feed_text_extraction() {
    let server = MockServer::start().await;
    let pages = TempDir::new().unwrap();
    let texts = TempDir::new().unwrap();
    let article = "این متن مقاله‌ای آزمایشی است که برای بررسی استخراج متن از صفحات ذخیره‌شده نوشته شده و باید به اندازه کافی بلند باشد.";

    mount_page(
        &server,
        "/post",
        &format!("<nav>فهرست</nav><article><p>{}</p></article>", article),
        1,
    )
    .await;

    let config = create_test_config(&format!("{}/post", server.uri()), 1, pages.path());
    let report = seoran::crawl(&config).await.unwrap();
    assert_eq!(report.saved.len(), 1);

    let stats = seoran::extract::extract_directory(pages.path(), texts.path(), 100).unwrap();
    assert_eq!(stats.total_files, 1);
    assert_eq!(stats.processed, 1);

    let outputs = saved_files(texts.path());
    assert_eq!(outputs.len(), 1);
    assert_eq!(std::fs::read_to_string(&outputs[0]).unwrap(), article);
}
