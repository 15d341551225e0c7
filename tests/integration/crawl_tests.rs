//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small documentation site and run
//! the full crawl cycle end-to-end.

use docquarry::config::{
    Config, CrawlerConfig, EmbeddingConfig, OutputConfig, RetrievalConfig, UserAgentConfig,
};
use docquarry::crawler::{crawl, Coordinator, FailureReason};
use docquarry::output::load_documents;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `{base}/docs` without delay
fn create_test_config(base: &str, documents_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_domain: base.to_string(),
            base_url: format!("{}/docs", base),
            seed_url: None,
            politeness_delay_ms: 0,
            max_pages: None,
            max_depth: None,
            title_placeholder: "No Title".to_string(),
            content_placeholder: "No Content".to_string(),
            title_selector: "h1".to_string(),
            content_selector: "main".to_string(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            documents_path: documents_path.to_string(),
        },
        embedding: EmbeddingConfig::default(),
        retrieval: RetrievalConfig::default(),
    }
}

/// Serves `body` as HTML at `page_path`, expecting exactly one request
async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><body><h1>{}</h1><main>{} body</main>{}</body></html>",
        title, title, anchors
    )
}

fn urls(config: &Config, docs: &[docquarry::ScrapedDocument]) -> Vec<String> {
    docs.iter()
        .map(|d| d.url.trim_start_matches(&config.crawler.base_url).to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs",
        format!(
            r#"<html><body>
            <h1> Overview </h1>
            <main>Welcome to the docs</main>
            <img src="/img/a.png">
            <a href="{base}/docs/sub">Sub</a>
            <a href="/docs/sub">Sub again</a>
            <a href="https://github.com/adobe">GitHub</a>
            <a href="mailto:team@example.com">Mail</a>
            </body></html>"#
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/sub",
        r#"<html><body>
        <h1>Sub</h1>
        <main>Details</main>
        <iframe src="https://www.youtube.com/embed/abc"></iframe>
        <a href="https://youtu.be/xyz">Watch</a>
        <a href="/docs">Back</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&base, "unused.json");
    let session = Coordinator::new(&config).unwrap().run().await;
    let docs = session.documents();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].url, format!("{}/docs", base));
    assert_eq!(docs[0].title, "Overview");
    assert_eq!(docs[0].content, "Welcome to the docs");
    assert_eq!(docs[0].images, vec![format!("{}/docs/img/a.png", base)]);
    assert!(docs[0].videos.is_empty());

    assert_eq!(docs[1].url, format!("{}/docs/sub", base));
    assert_eq!(
        docs[1].videos,
        vec!["https://www.youtube.com/embed/abc", "https://youtu.be/xyz"]
    );
    assert!(session.failures().is_empty());
}

#[tokio::test]
async fn test_depth_first_order() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", page("Root", &["/docs/a", "/docs/b"])).await;
    mount_page(&mock_server, "/docs/a", page("A", &["/docs/c"])).await;
    mount_page(&mock_server, "/docs/b", page("B", &[])).await;
    mount_page(&mock_server, "/docs/c", page("C", &[])).await;

    let config = create_test_config(&base, "unused.json");
    let session = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(
        urls(&config, session.documents()),
        vec!["", "/a", "/c", "/b"]
    );
}

#[tokio::test]
async fn test_cycles_and_diamonds_visit_each_page_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // Each mock expects exactly one request; wiremock verifies on drop
    mount_page(&mock_server, "/docs", page("Root", &["/docs/a", "/docs/b"])).await;
    mount_page(&mock_server, "/docs/a", page("A", &["/docs/b", "/docs"])).await;
    mount_page(&mock_server, "/docs/b", page("B", &["/docs/a", "/docs#top"])).await;

    let config = create_test_config(&base, "unused.json");
    let session = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(urls(&config, session.documents()), vec!["", "/a", "/b"]);
    assert_eq!(session.pages_visited(), 3);
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs",
        page("Root", &["/docs/missing", "/docs/ok"]),
    )
    .await;
    mount_page(&mock_server, "/docs/ok", page("Ok", &[])).await;
    Mock::given(method("GET"))
        .and(path("/docs/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base, "unused.json");
    let session = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(urls(&config, session.documents()), vec!["", "/ok"]);
    assert_eq!(session.failures().len(), 1);
    assert_eq!(session.failures()[0].url, format!("{}/docs/missing", base));
    assert_eq!(session.failures()[0].reason, FailureReason::Status(404));
}

#[tokio::test]
async fn test_missing_seed_yields_empty_collection() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let config = create_test_config(&base, "unused.json");
    let session = Coordinator::new(&config).unwrap().run().await;

    assert!(session.documents().is_empty());
    assert_eq!(session.pages_visited(), 1);
    assert_eq!(session.failures().len(), 1);
}

#[tokio::test]
async fn test_page_cap() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", page("Root", &["/docs/a", "/docs/b"])).await;
    mount_page(&mock_server, "/docs/a", page("A", &[])).await;
    Mock::given(method("GET"))
        .and(path("/docs/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("B", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base, "unused.json");
    config.crawler.max_pages = Some(2);
    let session = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(urls(&config, session.documents()), vec!["", "/a"]);
}

#[tokio::test]
async fn test_depth_cap() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", page("Root", &["/docs/a", "/docs/b"])).await;
    mount_page(&mock_server, "/docs/a", page("A", &["/docs/c"])).await;
    mount_page(&mock_server, "/docs/b", page("B", &[])).await;
    Mock::given(method("GET"))
        .and(path("/docs/c"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("C", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base, "unused.json");
    config.crawler.max_depth = Some(1);
    let session = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(urls(&config, session.documents()), vec!["", "/a", "/b"]);
    assert_eq!(session.skipped_by_depth(), 1);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    for (page_path, body) in [
        ("/docs", page("Root", &["/docs/a", "/docs/b"])),
        ("/docs/a", page("A", &["/docs/b"])),
        ("/docs/b", page("B", &["/docs"])),
    ] {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&base, "unused.json");
    let coordinator = Coordinator::new(&config).unwrap();
    let first = coordinator.run().await.into_documents();
    let second = coordinator.run().await.into_documents();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_crawl_writes_document_record() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", page("Root", &["/docs/a"])).await;
    mount_page(&mock_server, "/docs/a", page("A", &[])).await;

    let dir = tempdir().unwrap();
    let documents_path = dir.path().join("data").join("docs.json");
    let config = create_test_config(&base, documents_path.to_str().unwrap());

    let report = crawl(&config).await.unwrap();
    assert_eq!(report.documents, 2);
    assert_eq!(report.pages_visited, 2);
    assert!(report.failures.is_empty());
    assert!(report.finished_at.is_some());

    let loaded = load_documents(&documents_path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].title, "Root");
    assert_eq!(loaded[1].url, format!("{}/docs/a", base));
}
