//! Integration tests for paginated traversal
//!
//! These tests use wiremock to serve listing pages and drive the real
//! HTTP fetcher end-to-end.

use futures::TryStreamExt;
use paged_aggregator::config::{parse_config, Config, FetcherConfig};
use paged_aggregator::{
    AggregatorError, Article, DocumentFetcher, FetchError, HttpFetcher, SelectorSource, Traversal,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration with one source rooted at the mock server
fn create_test_config(base_url: &str) -> Config {
    parse_config(&format!(
        r#"
[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[[source]]
provider = "Mock Times"
default-address = "{base_url}/news"
article-selector = "article.post"
next-link = {{ selector = "a.next", disabled-class = "disabled" }}

[source.fields]
image = {{ selector = "img", attr = "src" }}
title = {{ selector = "h2" }}
content = {{ selector = "p" }}
link = {{ selector = "h2 a", attr = "href" }}
created-at = {{ selector = "time", attr = "datetime", format = "%Y-%m-%d" }}
"#
    ))
    .expect("Failed to parse test config")
}

fn post(title: &str, date: &str) -> String {
    format!(
        r#"<article class="post">
            <img src="/img/{title}.png">
            <h2><a href="/story/{title}">{title}</a></h2>
            <p>About   {title}</p>
            <time datetime="{date}">{date}</time>
        </article>"#
    )
}

fn page(posts: &[String], next: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><body>{}<nav>{}</nav></body></html>",
            posts.join("\n"),
            next
        ))
        .insert_header("content-type", "text/html")
}

fn traversal(config: &Config) -> Traversal<HttpFetcher, SelectorSource> {
    let fetcher = HttpFetcher::from_config(&config.fetcher, &config.user_agent)
        .expect("Failed to build fetcher");
    Traversal::new(fetcher, SelectorSource::new(config.sources[0].clone()))
        .with_config(&config.traversal)
}

#[tokio::test]
async fn test_multi_page_traversal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .and(query_param("page", "2"))
        .respond_with(page(
            &[post("gamma", "2024-01-01")],
            r#"<a class="next disabled" href="/news?page=3">Next</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(page(
            &[post("alpha", "2024-01-03"), post("beta", "2024-01-02")],
            r#"<a class="next" href="?page=2">Next</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let traversal = traversal(&config);

    let mut articles: Vec<Article> = Vec::new();
    let mut collect = |article: Article| articles.push(article);
    let stats = traversal
        .traverse(true, None, Some(&mut collect))
        .await
        .expect("Traversal failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.articles_extracted, 3);

    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["alpha", "beta", "gamma"]);

    let first = &articles[0];
    assert_eq!(first.provider, "Mock Times");
    assert_eq!(first.content, "About alpha");
    assert_eq!(first.image.as_deref(), Some("/img/alpha.png"));
    assert_eq!(first.link.as_deref(), Some("/story/alpha"));
    assert_eq!(first.created_at.to_rfc3339(), "2024-01-03T00:00:00+00:00");
    assert_eq!(first.updated_at, first.created_at);
}

#[tokio::test]
async fn test_fetched_page_reports_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/news", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(page(&[post("alpha", "2024-01-03")], ""))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let fetcher = HttpFetcher::from_config(&config.fetcher, &config.user_agent)
        .expect("Failed to build fetcher");

    let address = format!("{}/old", mock_server.uri());
    let fetched = fetcher.fetch(&address).await.expect("Fetch failed");

    assert_eq!(fetched.address, address);
    assert_eq!(fetched.final_url, format!("{}/news", mock_server.uri()));
    assert_eq!(fetched.status_code, 200);
    assert!(fetched.body.contains("alpha"));
}

#[tokio::test]
async fn test_single_page_mode_fetches_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(page(
            &[post("alpha", "2024-01-03")],
            r#"<a class="next" href="/news/2">Next</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/news/2"))
        .respond_with(page(&[post("beta", "2024-01-02")], ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let articles = traversal(&config)
        .collect(false, None)
        .await
        .expect("Traversal failed");

    assert_eq!(articles.len(), 1);
}

#[tokio::test]
async fn test_explicit_start_address() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(page(&[post("old", "2020-06-30")], ""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let start = format!("{}/archive", mock_server.uri());
    let articles: Vec<Article> = traversal(&config)
        .stream(true, Some(&start))
        .try_collect()
        .await
        .expect("Traversal failed");

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "old");
}

#[tokio::test]
async fn test_server_error_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut delivered = 0;
    let mut count = |_: Article| delivered += 1;
    let result = traversal(&config)
        .traverse(true, None, Some(&mut count))
        .await;

    assert!(matches!(
        result,
        Err(AggregatorError::Fetch(FetchError::Status { status: 500, .. }))
    ));
    assert_eq!(delivered, 0);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(page(&[post("late", "2024-01-01")], "").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetcher = FetcherConfig {
        timeout_ms: 200,
        connect_timeout_ms: Some(200),
    };

    let result = traversal(&config).collect(true, None).await;

    assert!(matches!(
        result,
        Err(AggregatorError::Fetch(FetchError::Timeout { .. }))
    ));
}

#[tokio::test]
async fn test_pagination_cycle_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(page(
            &[post("one", "2024-01-01")],
            r#"<a class="next" href="/news/b">Next</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/news/b"))
        .respond_with(page(
            &[post("two", "2024-01-01")],
            r#"<a class="next" href="/news?utm_source=loop">Next</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut titles = Vec::new();
    let mut collect = |article: Article| titles.push(article.title);
    let result = traversal(&config)
        .traverse(true, None, Some(&mut collect))
        .await;

    assert!(matches!(result, Err(AggregatorError::CycleDetected { .. })));
    assert_eq!(titles, vec!["one", "two"]);
}

#[tokio::test]
async fn test_bad_date_is_extraction_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(page(&[post("odd", "yesterday")], ""))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let result = traversal(&config).collect(true, None).await;

    assert!(matches!(result, Err(AggregatorError::Extraction(_))));
}
