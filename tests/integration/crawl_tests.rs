//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, plus scripted fetchers for timing and
//! budget behavior.

use async_trait::async_trait;
use gleaner::config::{parse_config, OutputConfig};
use gleaner::crawler::{
    CrawlConfig, Crawler, DemoFetcher, FetchConfig, FetchPipeline, HttpFetcher, PageFetcher,
    DEMO_SEEDS,
};
use gleaner::output::{configured_sinks, export_all};
use gleaner::state::CrawlState;
use gleaner::storage::{SqliteStorage, Storage};
use gleaner::{ErrorKind, FetchError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

fn fast_fetch_config() -> FetchConfig {
    FetchConfig {
        min_request_interval: Duration::from_millis(5),
        retry_delay: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
        ..FetchConfig::default()
    }
}

fn http_crawler(config: CrawlConfig, fetch: &FetchConfig) -> Crawler {
    let fetcher = HttpFetcher::new(reqwest::Client::new());
    Crawler::new(config, FetchPipeline::new(Arc::new(fetcher), fetch))
}

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Home</title>
            <meta name="description" content="Shop front"></head><body>
            <h1>Welcome</h1>
            <p>Questions? Write to help@shop-test.com or call 555-123-4567.</p>
            <a href="/page1">Page 1</a>
            <a href="/page2#reviews">Page 2</a>
            <a href="/page1">Page 1 again</a>
            </body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(
            r#"<html><head><title>Page 1</title></head><body>
            <p>Desk lamp for only $24.99 while stocks last.</p>
            <a href="/page3">Deeper</a>
            </body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html(
            r#"<html><head><title>Page 2</title></head><body>
            <p>Published on 01/15/2024 by the editorial team.</p>
            </body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(html("<html><head><title>Page 3</title></head></html>"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let mut crawler = http_crawler(CrawlConfig::default(), &fast_fetch_config());
    crawler.crawl(&[format!("{}/", base)]).unwrap();

    let mut urls = Vec::new();
    while let Some(item) = crawler.next_item().await {
        urls.push(item.url.clone());
    }

    assert_eq!(crawler.state(), CrawlState::Completed);
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/page1", base),
            format!("{}/page2", base),
            format!("{}/page3", base),
        ]
    );

    let session = crawler.aggregator();
    let home = &session.items()[0];
    assert_eq!(home.title, "Home");
    assert_eq!(home.depth, 0);
    assert_eq!(home.facts.meta_description, "Shop front");
    assert_eq!(home.facts.emails, vec!["help@shop-test.com".to_string()]);
    assert_eq!(home.facts.phones, vec!["555-123-4567".to_string()]);
    assert_eq!(
        home.facts.links,
        vec![format!("{}/page1", base), format!("{}/page2", base)]
    );

    assert_eq!(session.items()[1].facts.prices, vec!["24.99".to_string()]);
    assert_eq!(session.items()[2].facts.dates, vec!["01/15/2024".to_string()]);
    assert_eq!(session.items()[3].depth, 2);
    assert_eq!(session.stats().error_count, 0);
    assert!(session.stats().ended_at.is_some());
}

#[tokio::test]
async fn test_rate_limited_response_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(html("<title>Finally</title>"))
        .mount(&server)
        .await;

    let mut crawler = http_crawler(CrawlConfig::default(), &fast_fetch_config());
    crawler.crawl(&[format!("{}/busy", server.uri())]).unwrap();
    crawler.run().await;

    let session = crawler.aggregator();
    assert_eq!(session.stats().pages_scraped, 1);
    assert_eq!(session.items()[0].title, "Finally");
    assert_eq!(session.stats().error_count, 0);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_missing_page_is_recorded_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<title>Home</title><a href="/gone">Gone</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut crawler = http_crawler(CrawlConfig::default(), &fast_fetch_config());
    crawler.crawl(&[format!("{}/", server.uri())]).unwrap();
    assert_eq!(crawler.run().await, CrawlState::Completed);

    let session = crawler.aggregator();
    assert_eq!(session.stats().pages_scraped, 1);
    assert_eq!(session.errors().len(), 1);
    assert_eq!(session.errors()[0].kind, ErrorKind::Http);
    assert_eq!(session.errors()[0].url, format!("{}/gone", server.uri()));

    let report = session.generate_report();
    assert!(report.contains("Pages Scraped: 1"));
    assert!(report.contains("Errors: 1"));
    assert!(report.contains("Success Rate: 50.0%"));
}

#[tokio::test]
async fn test_non_html_response_is_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut crawler = http_crawler(CrawlConfig::default(), &fast_fetch_config());
    crawler.crawl(&[format!("{}/data", server.uri())]).unwrap();
    crawler.run().await;

    let session = crawler.aggregator();
    assert!(session.items().is_empty());
    assert_eq!(session.errors()[0].kind, ErrorKind::ContentMismatch);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seeds() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let config = CrawlConfig {
        max_depth: 0,
        ..CrawlConfig::default()
    };
    let mut crawler = http_crawler(config, &fast_fetch_config());
    crawler
        .crawl(&[
            format!("{}/", base),
            format!("{}/page2", base),
            format!("{}/page3", base),
        ])
        .unwrap();
    crawler.run().await;

    let session = crawler.aggregator();
    assert_eq!(session.stats().pages_scraped, 3);
    assert!(session.items().iter().all(|item| item.depth == 0));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_crawl_from_parsed_config_exports_to_sqlite() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let toml = format!(
        r#"
        seeds = ["{base}/"]

        [crawler]
        max-depth = 1
        max-pages = 10

        [fetch]
        requests-per-second = 100.0
        retry-delay-ms = 10

        [policy]
        blocked-patterns = ["page2"]
        "#,
        base = server.uri()
    );
    let config = parse_config(&toml).unwrap();

    let fetcher = HttpFetcher::from_config(&config.user_agent, Duration::from_secs(5)).unwrap();
    let pipeline = FetchPipeline::new(Arc::new(fetcher), &config.fetch_config());
    let mut crawler = Crawler::new(config.crawl_config(), pipeline);
    crawler.crawl(&config.seeds).unwrap();
    let final_state = crawler.run().await;
    let session = crawler.into_aggregator();

    assert_eq!(final_state, CrawlState::Completed);
    assert_eq!(session.stats().pages_scraped, 2);

    let db_path = dir.path().join("results.db");
    let output = OutputConfig {
        database_path: Some(db_path.to_string_lossy().into_owned()),
        csv_path: Some(dir.path().join("items.csv").to_string_lossy().into_owned()),
        ..OutputConfig::default()
    };
    let sinks = configured_sinks(&output, "hash", final_state);
    let (written, failures) = export_all(&sinks, &session);
    assert_eq!(failures, 0);
    assert_eq!(written.len(), 2);

    let storage = SqliteStorage::new(&db_path).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, CrawlState::Completed);
    assert_eq!(run.pages_scraped, 2);
    assert_eq!(storage.count_items(run.id).unwrap(), 2);
}

#[tokio::test]
async fn test_demo_crawl() {
    let pipeline = FetchPipeline::new(Arc::new(DemoFetcher::new()), &fast_fetch_config());
    let config = CrawlConfig {
        max_depth: 0,
        ..CrawlConfig::default()
    };
    let mut crawler = Crawler::new(config, pipeline);
    crawler.crawl(DEMO_SEEDS).unwrap();
    crawler.run().await;

    let session = crawler.aggregator();
    assert_eq!(session.stats().pages_scraped, DEMO_SEEDS.len());
    assert!(session.items().iter().all(|item| !item.title.is_empty()));
    assert!(session.fact_totals().prices > 0);
}

/// Serves a small page linking to `/0` .. `/9` and records when each fetch starts
#[derive(Default)]
struct TimedFetcher {
    starts: Mutex<Vec<(String, Instant)>>,
}

impl TimedFetcher {
    fn urls(&self) -> Vec<String> {
        self.starts
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    fn instants(&self) -> Vec<Instant> {
        self.starts.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl PageFetcher for TimedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.starts
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));

        let links: String = (0..10)
            .map(|i| format!("<a href=\"/{}\">page {}</a>", i, i))
            .collect();
        Ok(format!("<title>{}</title>{}", url, links))
    }
}

#[tokio::test]
async fn test_requests_to_one_host_are_spaced() {
    let fetcher = Arc::new(TimedFetcher::default());
    let fetch = FetchConfig {
        min_request_interval: Duration::from_millis(500),
        ..fast_fetch_config()
    };
    let config = CrawlConfig {
        max_pages: 3,
        ..CrawlConfig::default()
    };

    let mut crawler = Crawler::new(config, FetchPipeline::new(fetcher.clone(), &fetch));
    crawler.crawl(&["https://spaced.com/"]).unwrap();
    crawler.run().await;

    let instants = fetcher.instants();
    assert_eq!(instants.len(), 3);
    for pair in instants.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(480));
    }
}

#[tokio::test]
async fn test_page_budget_and_no_double_fetch() {
    let fetcher = Arc::new(TimedFetcher::default());
    let config = CrawlConfig {
        max_depth: 3,
        max_pages: 7,
        max_concurrent_fetches: 3,
        ..CrawlConfig::default()
    };

    let mut crawler = Crawler::new(
        config,
        FetchPipeline::new(fetcher.clone(), &fast_fetch_config()),
    );
    crawler.crawl(&["https://budget.com/"]).unwrap();

    assert_eq!(crawler.run().await, CrawlState::Exhausted);
    assert_eq!(crawler.aggregator().items().len(), 7);

    let mut urls = fetcher.urls();
    assert_eq!(urls.len(), 7);
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 7);
}

#[tokio::test]
async fn test_cancellation_stops_session() {
    let fetcher = Arc::new(TimedFetcher::default());
    let mut crawler = Crawler::new(
        CrawlConfig::default(),
        FetchPipeline::new(fetcher.clone(), &fast_fetch_config()),
    );
    crawler.crawl(&["https://cancel.com/"]).unwrap();

    let token = crawler.cancellation_token();
    let mut seen = 0;
    while crawler.next_item().await.is_some() {
        seen += 1;
        if seen == 2 {
            token.cancel();
        }
    }

    assert_eq!(crawler.state(), CrawlState::Cancelled);
    assert_eq!(seen, 2);
    assert_eq!(fetcher.urls().len(), 2);
}
