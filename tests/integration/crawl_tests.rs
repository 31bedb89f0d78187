//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_audit::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use link_audit::crawler::{Coordinator, IssueCategory};
use link_audit::output::{CsvExporter, Exporter, ExportRow};
use link_audit::page::{Finding, PageAnalyzer, PageReport, ParsedPage, Severity};
use link_audit::{run_crawl, AuditError, CrawlReport};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay
fn create_test_config(max_pages: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages,
            politeness_delay_ms: 0,
            request_timeout_secs: 5,
            max_concurrent_fetches: 1,
            max_redirects: 10,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        output: OutputConfig::default(),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn fetched_paths(report: &CrawlReport) -> Vec<String> {
    report
        .records()
        .iter()
        .map(|record| record.url().url().path().to_string())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"
        <a href="/ok">OK</a>
        <a href="/missing">Missing</a>
        <a href="http://other.com/x">External</a>
        <a href="/slow">Slow</a>
        "#,
    )
    .await;
    mount_page(&mock_server, "/ok", "fine").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(10);
    config.crawler.request_timeout_secs = 1;

    let report = run_crawl(&mock_server.uri(), config).await.unwrap();
    let summary = report.summary();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.category_count(IssueCategory::Ok), 2);
    assert_eq!(summary.category_count(IssueCategory::Broken404), 1);
    assert_eq!(summary.category_count(IssueCategory::Timeout), 1);
    assert_eq!(summary.ok_count, 2);
    assert_eq!(summary.broken_count, 1);
    assert_eq!(summary.error_count, 1);

    assert!(report
        .records()
        .iter()
        .all(|record| !record.url().as_str().contains("other.com")));

    let slow = report
        .records()
        .iter()
        .find(|record| record.url().url().path() == "/slow")
        .unwrap();
    assert_eq!(slow.outcome().status_code(), None);
    assert!(slow.outcome().elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_bfs_order() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="/c">C</a>"#).await;
    mount_page(&mock_server, "/b", "leaf").await;
    mount_page(&mock_server, "/c", "leaf").await;

    let report = run_crawl(&mock_server.uri(), create_test_config(4))
        .await
        .unwrap();

    assert_eq!(fetched_paths(&report), vec!["/", "/a", "/b", "/c"]);
}

#[tokio::test]
async fn test_bfs_order_follows_source_order() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/b">B</a><a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="/c">C</a>"#).await;
    mount_page(&mock_server, "/b", "leaf").await;
    mount_page(&mock_server, "/c", "leaf").await;

    let report = run_crawl(&mock_server.uri(), create_test_config(4))
        .await
        .unwrap();

    assert_eq!(fetched_paths(&report), vec!["/", "/b", "/a", "/c"]);
}

#[tokio::test]
async fn test_budget_respected() {
    let mock_server = MockServer::start().await;

    let links: String = (1..=9)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 1..=9 {
        mount_page(&mock_server, &format!("/p{}", i), "leaf").await;
    }

    let report = run_crawl(&mock_server.uri(), create_test_config(5))
        .await
        .unwrap();

    // Enough pages exist, so the budget is used exactly
    assert_eq!(report.pages_crawled(), 5);
}

#[tokio::test]
async fn test_budget_respected_with_concurrency() {
    let mock_server = MockServer::start().await;

    let links: String = (1..=20)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 1..=20 {
        mount_page(&mock_server, &format!("/p{}", i), &links).await;
    }

    let mut config = create_test_config(7);
    config.crawler.max_concurrent_fetches = 4;

    let report = run_crawl(&mock_server.uri(), config).await.unwrap();
    assert_eq!(report.pages_crawled(), 7);
}

#[tokio::test]
async fn test_small_site_ends_when_frontier_empty() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/only">Only</a>"#).await;
    mount_page(&mock_server, "/only", r#"<a href="/">Home</a>"#).await;

    let report = run_crawl(&mock_server.uri(), create_test_config(100))
        .await
        .unwrap();

    assert_eq!(report.pages_crawled(), 2);
}

#[tokio::test]
async fn test_no_duplicate_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Every page links to every other page, in several spellings
    let links = format!(
        r##"
        <a href="/">Home</a>
        <a href="/a">A</a>
        <a href="/a#top">A again</a>
        <a href="{base}/b">B absolute</a>
        <a href="b">B relative</a>
        <a href="/c?x=1">C</a>
        <a href="/c?x=1#frag">C again</a>
        "##,
        base = base_url
    );

    for route in ["/", "/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html(&links))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(50);
    config.crawler.max_concurrent_fetches = 3;

    let report = run_crawl(&base_url, config).await.unwrap();

    let urls: Vec<_> = report.records().iter().map(|r| r.url().clone()).collect();
    let unique: HashSet<_> = urls.iter().collect();
    assert_eq!(urls.len(), unique.len());
    assert_eq!(urls.len(), 4);
}

#[tokio::test]
async fn test_scope_containment() {
    let mock_server = MockServer::start().await;
    let port = url::Url::parse(&mock_server.uri())
        .unwrap()
        .port()
        .unwrap();

    // "localhost" is a different host from "127.0.0.1", even on the same port
    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"
            <a href="http://localhost:{port}/elsewhere">Other host</a>
            <a href="https://example.org/">External</a>
            <a href="/inside">Inside</a>
            "#,
            port = port
        ),
    )
    .await;
    mount_page(&mock_server, "/inside", "leaf").await;
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(html("should not be fetched"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server.uri(), create_test_config(10))
        .await
        .unwrap();

    assert_eq!(fetched_paths(&report), vec!["/", "/inside"]);
    for record in report.records() {
        assert_eq!(record.url().host().as_deref(), Some("127.0.0.1"));
    }
}

#[tokio::test]
async fn test_other_port_same_host_is_in_scope() {
    let mock_server = MockServer::start().await;

    // Find a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_port = listener.local_addr().unwrap().port();
    drop(listener);

    mount_page(
        &mock_server,
        "/",
        &format!(r#"<a href="http://127.0.0.1:{}/down">Down</a>"#, closed_port),
    )
    .await;

    let report = run_crawl(&mock_server.uri(), create_test_config(10))
        .await
        .unwrap();

    assert_eq!(report.pages_crawled(), 2);
    let down = &report.records()[1];
    assert_eq!(down.category(), IssueCategory::ConnectionError);
    assert_eq!(down.outcome().status_code(), None);
}

#[tokio::test]
async fn test_redirect_chain_classified() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/r1">Chain</a><a href="/moved">Moved</a>"#,
    )
    .await;
    for (from, to) in [("/r1", "/r2"), ("/r2", "/r3"), ("/r3", "/final"), ("/moved", "/final")] {
        Mock::given(method("GET"))
            .and(path(from))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", to))
            .mount(&mock_server)
            .await;
    }
    mount_page(&mock_server, "/final", "landed").await;

    let report = run_crawl(&mock_server.uri(), create_test_config(10))
        .await
        .unwrap();

    let chain = report
        .records()
        .iter()
        .find(|record| record.url().url().path() == "/r1")
        .unwrap();
    assert_eq!(chain.category(), IssueCategory::RedirectChain);
    assert_eq!(chain.outcome().redirect_count(), 3);
    assert_eq!(chain.outcome().final_url().url().path(), "/final");

    let moved = report
        .records()
        .iter()
        .find(|record| record.url().url().path() == "/moved")
        .unwrap();
    assert_eq!(moved.category(), IssueCategory::Redirect);

    assert_eq!(report.summary().redirect_count, 2);
}

#[tokio::test]
async fn test_redirect_into_dead_port_reports_requested_url() {
    let mock_server = MockServer::start().await;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_port = listener.local_addr().unwrap().port();
    drop(listener);

    mount_page(&mock_server, "/", r#"<a href="/hop">Hop</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/hop"))
        .respond_with(ResponseTemplate::new(301).insert_header(
            "Location",
            format!("http://127.0.0.1:{}/dead", closed_port).as_str(),
        ))
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server.uri(), create_test_config(10))
        .await
        .unwrap();

    let hop = report
        .records()
        .iter()
        .find(|record| record.url().url().path() == "/hop")
        .unwrap();
    assert_eq!(hop.category(), IssueCategory::ConnectionError);

    let row = ExportRow::from_record(hop);
    assert_eq!(row.redirect_chain, 0);
    assert_eq!(row.final_url, row.url);
    assert_eq!(report.summary().redirect_count, 0);
}

#[tokio::test]
async fn test_links_resolve_against_final_url() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/old/">Old</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new/"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new/", r#"<a href="child">Child</a>"#).await;
    mount_page(&mock_server, "/new/child", "leaf").await;

    let report = run_crawl(&mock_server.uri(), create_test_config(10))
        .await
        .unwrap();

    assert_eq!(fetched_paths(&report), vec!["/", "/old/", "/new/child"]);
}

#[tokio::test]
async fn test_links_not_followed_from_error_pages() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/broken">Broken</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(r#"<a href="/hidden">Hidden</a>"#, "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html("leaf"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server.uri(), create_test_config(10))
        .await
        .unwrap();

    assert_eq!(fetched_paths(&report), vec!["/", "/broken"]);
}

#[tokio::test]
async fn test_invalid_start_url_fails_before_fetching() {
    let result = run_crawl("not a url", create_test_config(10)).await;
    assert!(matches!(result, Err(AuditError::Url(_))));

    let result = run_crawl("mailto:someone@example.com", create_test_config(10)).await;
    assert!(matches!(result, Err(AuditError::Url(_))));
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html("hello"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server.uri(), create_test_config(1))
        .await
        .unwrap();
    assert_eq!(report.records()[0].category(), IssueCategory::Ok);
}

#[tokio::test]
async fn test_politeness_delay_spaces_requests() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&mock_server, "/a", "leaf").await;
    mount_page(&mock_server, "/b", "leaf").await;

    let mut config = create_test_config(3);
    config.crawler.politeness_delay_ms = 200;
    config.crawler.max_concurrent_fetches = 3;

    let report = run_crawl(&mock_server.uri(), config).await.unwrap();

    assert_eq!(report.pages_crawled(), 3);
    assert!(report.elapsed >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_politeness_delay_spaces_sequential_requests() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="/b">B</a>"#).await;
    mount_page(&mock_server, "/b", "leaf").await;

    let mut config = create_test_config(3);
    config.crawler.politeness_delay_ms = 200;

    let report = run_crawl(&mock_server.uri(), config).await.unwrap();

    assert_eq!(fetched_paths(&report), vec!["/", "/a", "/b"]);
    assert!(report.elapsed >= Duration::from_millis(400));
}

struct TitleCheck;

impl PageAnalyzer for TitleCheck {
    fn name(&self) -> &str {
        "title-check"
    }

    fn analyze(&self, page: &ParsedPage) -> PageReport {
        let mut report = PageReport::new(self.name(), page.url.clone());
        if page.document.title().is_none() {
            report.push(Finding::new(Severity::Warning, "title", "missing title"));
        }
        report
    }
}

#[tokio::test]
async fn test_page_analyzers_run_on_parsed_pages() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/untitled">U</a><a href="/gone">G</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/untitled"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>no title</p>", "text/html"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let report = Coordinator::new(&mock_server.uri(), create_test_config(10))
        .unwrap()
        .with_analyzer(TitleCheck)
        .run()
        .await;

    // The 404 is never parsed, so only two reports
    assert_eq!(report.page_reports.len(), 2);
    let flagged: Vec<_> = report
        .page_reports
        .iter()
        .filter(|r| !r.is_clean())
        .map(|r| r.url.url().path().to_string())
        .collect();
    assert_eq!(flagged, vec!["/untitled"]);
}

struct StatusCheck;

impl PageAnalyzer for StatusCheck {
    fn name(&self) -> &str {
        "status-check"
    }

    fn analyze(&self, page: &ParsedPage) -> PageReport {
        let mut report = PageReport::new(self.name(), page.url.clone());
        if page.status_code != 200 {
            let message = format!("parsed with status {}", page.status_code);
            report.push(Finding::new(Severity::Error, "status", message));
        }
        report
    }
}

#[tokio::test]
async fn test_parsed_pages_carry_final_status() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/moved">Moved</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/landing"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/landing", "landed").await;

    let report = Coordinator::new(&mock_server.uri(), create_test_config(10))
        .unwrap()
        .with_analyzer(StatusCheck)
        .run()
        .await;

    // The redirected page is parsed once, under its final URL
    assert_eq!(report.pages_crawled(), 2);
    assert_eq!(report.page_reports.len(), 2);
    assert!(report.page_reports.iter().all(|r| r.is_clean()));
    assert!(report
        .page_reports
        .iter()
        .any(|r| r.url.url().path() == "/landing"));
}

#[tokio::test]
async fn test_csv_export_of_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/missing">M</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let report = run_crawl(&mock_server.uri(), create_test_config(10))
        .await
        .unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("report.csv");
    CsvExporter.export_to_path(&report.sink, &csv_path).unwrap();

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers: Vec<_> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, ExportRow::FIELDS);

    let rows: Vec<ExportRow> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].status_code, Some(404));
    assert_eq!(rows[1].issue_type, "Broken Link (404)");
    assert_eq!(rows[1].error, None);
}
