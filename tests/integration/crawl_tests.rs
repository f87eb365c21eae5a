//! Integration tests for the crawler
//!
//! These tests use wiremock to serve forum threads and run the full crawl
//! cycle end-to-end through the real HTTP fetcher and CSV output.

use std::path::Path;
use tempfile::TempDir;
use thread_scrape::config::Config;
use thread_scrape::crawler::crawl;
use thread_scrape::extract::GUEST_USERNAME;
use thread_scrape::output::COLUMNS;
use thread_scrape::state::Termination;
use thread_scrape::ScrapeError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock forum
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler.politeness_delay_ms = 100;
    config.crawler.request_timeout_secs = 5;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

/// Reads an output file back into its header and rows
fn read_output(file: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let bytes = std::fs::read(file).expect("Output file should exist");
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "Output should start with a BOM");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(&bytes[3..]);
    let headers = reader
        .headers()
        .expect("Header row should parse")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("Row should parse").iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn thread_page(ids: &[u32], next: Option<&str>) -> String {
    let mut page = String::from("<html><body>");
    for id in ids {
        page.push_str(&format!(
            r#"<div class="post" id="post{id}">
                 <div class="post-heading">2024-02-0{id}, 10:00</div>
                 <div class="post-user"><a class="post-user-username" href="/u{id}">User{id}</a></div>
                 <div id="post_message_{id}" class="post_message">Post number {id}</div>
               </div>"#
        ));
    }
    if let Some(next) = next {
        page.push_str(&format!(r#"<div class="pagination"><a href="{}">Nästa ›</a></div>"#, next));
    }
    page.push_str("</body></html>");
    page
}

#[tokio::test]
async fn test_single_page_thread_two_posts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let body = r#"<html><body>
        <div class="post" id="post100">
          <div class="post-heading">Kalle • 2023-11-05, 21:14</div>
          <div class="post-user">
            <a class="post-user-username" href="/u1">Kalle</a>
            <img class="avatar" src="/customavatars/1.jpg">
            <div>Reg: 2009-03</div>
            <div>Inlägg: 1 234</div>
          </div>
          <div id="post_message_100" class="post_message">Första raden<br>Andra raden</div>
        </div>
        <div class="post" id="post101">
          <div class="post-heading">2023-11-05, 21:20</div>
          <div id="post_message_101" class="post_message">Gästinlägg</div>
        </div>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/t100"))
        .respond_with(html(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("thread.csv");
    let config = create_test_config(&base_url);

    let report = crawl(config, &format!("{}/t100", base_url), Some(&output))
        .await
        .expect("Crawl should start");

    assert_eq!(report.termination, Termination::NoNextPage);
    assert_eq!(report.records_written, 2);
    assert_eq!(report.output_path.as_deref(), Some(output.as_path()));

    let (headers, rows) = read_output(&output);
    assert_eq!(headers, COLUMNS.to_vec());
    assert_eq!(rows.len(), 2);

    assert_eq!(
        rows[0],
        vec![
            "Kalle".to_string(),
            "2009-03".to_string(),
            "1234".to_string(),
            "2023-11-05, 21:14".to_string(),
            "100".to_string(),
            format!("{}/sp100", base_url),
            format!("{}/customavatars/1.jpg", base_url),
            "Första raden\nAndra raden".to_string(),
        ]
    );

    assert_eq!(rows[1][0], GUEST_USERNAME);
    assert_eq!(rows[1][1], "");
    assert_eq!(rows[1][2], "");
    assert_eq!(rows[1][4], "101");
    assert_eq!(rows[1][7], "Gästinlägg");
}

#[tokio::test]
async fn test_multi_page_thread_with_failing_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/t7"))
        .respond_with(html(&thread_page(&[1, 2], Some("/t7p2"))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/t7p2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Never reached: the crawl stops at the failing page
    Mock::given(method("GET"))
        .and(path("/t7p3"))
        .respond_with(html(&thread_page(&[5], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("t7.csv");
    let config = create_test_config(&base_url);

    let report = crawl(config, &format!("{}/t7", base_url), Some(&output))
        .await
        .expect("Crawl should start");

    assert!(report.is_fatal());
    assert!(matches!(
        &report.termination,
        Termination::Fatal { url, .. } if url.ends_with("/t7p2")
    ));
    assert_eq!(report.pages_processed, 1);

    let (_, rows) = read_output(&output);
    let ids: Vec<_> = rows.iter().map(|r| r[4].as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(rows[1][7], "Post number 2");
}

#[tokio::test]
async fn test_blocked_page_stops_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/t9"))
        .respond_with(html(
            r#"<html><head><title>Just a moment...</title></head>
               <body><p>Checking your browser before accessing the forum.</p>
               <p>Performance &amp; security by Cloudflare</p>
               <div class="post" id="post1">not a real post</div></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("t9.csv");
    let config = create_test_config(&base_url);

    let report = crawl(config, &format!("{}/t9", base_url), Some(&output))
        .await
        .expect("Crawl should start");

    assert!(!report.is_fatal());
    assert!(matches!(
        &report.termination,
        Termination::Blocked { marker, .. } if marker == "Cloudflare"
    ));

    let (headers, rows) = read_output(&output);
    assert_eq!(headers.len(), 8);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_follows_pagination_to_last_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Page 1 advertises its successor in <head>
    Mock::given(method("GET"))
        .and(path("/t3"))
        .respond_with(html(&format!(
            r#"<html><head><link rel="next" href="{}/t3p2"></head><body>{}</body></html>"#,
            base_url,
            thread_page(&[1], None)
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Page 2 only has a labelled anchor
    Mock::given(method("GET"))
        .and(path("/t3p2"))
        .respond_with(html(&thread_page(&[2, 3], Some("/t3p3"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Page 3 is served in Latin-1
    let mut latin1 = b"<html><body><div class=\"post\" id=\"post4\"><a class=\"username\">".to_vec();
    latin1.extend_from_slice(b"\xc5sa</a><div id=\"post_message_4\">H\xe4lsningar</div></div></body></html>");
    Mock::given(method("GET"))
        .and(path("/t3p3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(latin1, "text/html; charset=ISO-8859-1"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("t3.csv");
    let config = create_test_config(&base_url);

    let report = crawl(config, &format!("{}/t3", base_url), Some(&output))
        .await
        .expect("Crawl should start");

    assert_eq!(report.termination, Termination::NoNextPage);
    assert_eq!(report.pages_processed, 3);
    assert_eq!(report.records_written, 4);

    let (_, rows) = read_output(&output);
    let ids: Vec<_> = rows.iter().map(|r| r[4].as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(rows[3][0], "Åsa");
    assert_eq!(rows[3][7], "Hälsningar");
}

#[tokio::test]
async fn test_static_headers_are_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/t5"))
        .and(header("accept-language", "sv-SE,sv;q=0.9,en-US;q=0.8,en;q=0.7"))
        .and(header("x-test", "yes"))
        .respond_with(html(&thread_page(&[1], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("t5.csv");
    let mut config = create_test_config(&base_url);
    config
        .request
        .headers
        .insert("X-Test".to_string(), "yes".to_string());

    let report = crawl(config, &format!("{}/t5", base_url), Some(&output))
        .await
        .expect("Crawl should start");

    assert_eq!(report.termination, Termination::NoNextPage);
    assert_eq!(report.records_written, 1);
}

#[tokio::test]
async fn test_invalid_start_url_creates_no_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("never.csv");

    let result = crawl(Config::default(), "ftp://www.flashback.org/t1", Some(&output)).await;

    assert!(result.is_err());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_invalid_config_is_refused_before_crawling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(html(&thread_page(&[1], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("fast.csv");
    let mut config = create_test_config(&base_url);
    config.crawler.politeness_delay_ms = 10;

    let result = crawl(config, &format!("{}/t1", base_url), Some(&output)).await;

    assert!(matches!(result, Err(ScrapeError::Config(_))));
    assert!(!output.exists());
}
