//! Integration tests for the site loader
//!
//! These tests use wiremock to serve small documentation sites and run
//! full crawls against them in both concurrent and sequential mode.

use mkdocs_site_loader::document::{RELATED_PATHS_KEY, RELATED_URLS_KEY, TITLES_KEY, URL_KEY};
use mkdocs_site_loader::{Document, SiteLoader};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML page with a heading and one anchor per href
fn html_page(title: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><h1>{}</h1>{}</body></html>",
        title, title, links
    )
}

/// Serves `body` at `route`, expecting exactly `times` requests
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// A loader that follows every in-site link
fn open_loader(server: &MockServer) -> SiteLoader {
    SiteLoader::new(&server.uri(), None, None)
        .expect("Failed to create loader")
        .allow_all_when_no_filter(true)
}

async fn load_blocking(loader: SiteLoader) -> Vec<Document> {
    tokio::task::spawn_blocking(move || loader.load())
        .await
        .expect("Blocking crawl panicked")
        .expect("Crawl failed")
}

fn urls(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|d| d.url().expect("document without url").to_string())
        .collect()
}

fn find<'a>(documents: &'a [Document], url: &str) -> &'a Document {
    documents
        .iter()
        .find(|d| d.url() == Some(url))
        .unwrap_or_else(|| panic!("No document for {}", url))
}

fn assert_unique(documents: &[Document]) {
    let all = urls(documents);
    let unique: HashSet<&String> = all.iter().collect();
    assert_eq!(all.len(), unique.len(), "duplicate documents: {:?}", all);
}

#[tokio::test]
async fn test_root_with_self_link_produces_two_documents() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", &["/guide", "https://external.com/x"]),
        1,
    )
    .await;
    mount_page(&server, "/guide", html_page("Guide", &["/"]), 1).await;

    let documents = open_loader(&server).aload().await.expect("Crawl failed");

    assert_eq!(
        urls(&documents),
        vec![format!("{}/", base), format!("{}/guide", base)]
    );

    let root = find(&documents, &format!("{}/", base));
    assert_eq!(
        root.metadata_list(RELATED_URLS_KEY),
        Some(vec!["https://external.com/x"])
    );
    assert_eq!(root.metadata_list(RELATED_PATHS_KEY), Some(vec!["/guide"]));
    assert!(root.page_content.contains("Home"));

    server.verify().await;
}

#[tokio::test]
async fn test_link_cycle_visits_each_page_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Root", &["/a/"]), 1).await;
    mount_page(&server, "/a/", html_page("A", &["../b/"]), 1).await;
    mount_page(&server, "/b/", html_page("B", &["../a/", "/"]), 1).await;

    let documents = open_loader(&server).aload().await.expect("Crawl failed");

    assert_eq!(documents.len(), 3);
    assert_unique(&documents);
    server.verify().await;
}

#[tokio::test]
async fn test_link_cycle_sequential() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Root", &["/a/"]), 1).await;
    mount_page(&server, "/a/", html_page("A", &["../b/"]), 1).await;
    mount_page(&server, "/b/", html_page("B", &["../a/", "/"]), 1).await;

    let documents = load_blocking(open_loader(&server)).await;

    assert_eq!(documents.len(), 3);
    assert_unique(&documents);
    server.verify().await;
}

#[tokio::test]
async fn test_sequential_visits_depth_first_in_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Root", &["/a/", "/b/"]), 1).await;
    mount_page(&server, "/a/", html_page("A", &["deep/", "/b/"]), 1).await;
    mount_page(&server, "/a/deep/", html_page("Deep", &[]), 1).await;
    mount_page(&server, "/b/", html_page("B", &[]), 1).await;

    let documents = load_blocking(open_loader(&server)).await;

    assert_eq!(
        urls(&documents),
        vec![
            format!("{}/", base),
            format!("{}/a/", base),
            format!("{}/a/deep/", base),
            format!("{}/b/", base),
        ]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_external_links_are_never_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    // An absolute link back to the same server still counts as external
    let absolute = format!("{}/absolute/", base);
    mount_page(
        &server,
        "/",
        html_page("Root", &[&absolute, "/internal/"]),
        1,
    )
    .await;
    mount_page(&server, "/internal/", html_page("Internal", &[]), 1).await;
    mount_page(&server, "/absolute/", html_page("Absolute", &[]), 0).await;

    let documents = open_loader(&server).aload().await.expect("Crawl failed");
    let root = find(&documents, &format!("{}/", base));

    assert_eq!(
        root.metadata_list(RELATED_URLS_KEY),
        Some(vec![absolute.as_str()])
    );
    assert_eq!(root.metadata_list(RELATED_PATHS_KEY), Some(vec!["/internal/"]));
    assert_eq!(documents.len(), 2);
    server.verify().await;
}

#[tokio::test]
async fn test_sections_filter_gates_recursion() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Root", &["/docs/intro", "/blog/post"]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/docs/intro",
        html_page("Intro", &["/docs/more/", "/blog/other"]),
        1,
    )
    .await;
    mount_page(&server, "/docs/more/", html_page("More", &[]), 1).await;
    mount_page(&server, "/blog/post", html_page("Post", &[]), 0).await;
    mount_page(&server, "/blog/other", html_page("Other", &[]), 0).await;

    let loader = SiteLoader::new(&base, Some(vec!["/docs/".to_string()]), None)
        .expect("Failed to create loader");
    let documents = loader.aload().await.expect("Crawl failed");

    let mut visited = urls(&documents);
    visited.sort();
    assert_eq!(
        visited,
        vec![
            format!("{}/", base),
            format!("{}/docs/intro", base),
            format!("{}/docs/more/", base),
        ]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_sections_exclude_skips_sections() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Root", &["/strategies/", "/release-notes/1.0/"]),
        1,
    )
    .await;
    mount_page(&server, "/strategies/", html_page("Strategies", &[]), 1).await;
    mount_page(&server, "/release-notes/1.0/", html_page("Notes", &[]), 0).await;

    let loader = open_loader(&server).sections_exclude(vec!["/release-notes/".to_string()]);
    let documents = loader.aload().await.expect("Crawl failed");

    assert_eq!(documents.len(), 2);
    server.verify().await;
}

#[tokio::test]
async fn test_empty_filter_loads_only_root_by_default() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Root", &["/guide/"]), 1).await;
    mount_page(&server, "/guide/", html_page("Guide", &[]), 0).await;

    let loader = SiteLoader::new(&server.uri(), None, None).expect("Failed to create loader");
    let documents = loader.aload().await.expect("Crawl failed");

    assert_eq!(documents.len(), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_metadata_filter_drops_related_urls() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Root", &["#top", "/guide/", "https://github.com/x"]),
        1,
    )
    .await;
    mount_page(&server, "/guide/", html_page("Guide", &["#setup"]), 1).await;

    let loader = SiteLoader::new(
        &server.uri(),
        Some(vec!["/guide/".to_string()]),
        Some(vec!["related_urls".to_string()]),
    )
    .expect("Failed to create loader");
    let documents = loader.aload().await.expect("Crawl failed");

    assert_eq!(documents.len(), 2);
    for document in &documents {
        assert!(!document.metadata.contains_key(RELATED_URLS_KEY));
        assert!(document.metadata.contains_key(TITLES_KEY));
        assert!(document.metadata.contains_key(RELATED_PATHS_KEY));
        assert!(document.metadata.contains_key(URL_KEY));
    }

    let guide = find(&documents, &format!("{}/guide/", server.uri()));
    assert_eq!(guide.titles(), Some("#setup"));
}

#[tokio::test]
async fn test_http_error_becomes_degraded_document() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Root", &["/broken/", "/sibling/"]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/sibling/", html_page("Sibling", &[]), 1).await;

    let documents = open_loader(&server).aload().await.expect("Crawl failed");
    assert_eq!(documents.len(), 3);

    let broken = find(&documents, &format!("{}/broken/", base));
    assert!(broken.page_content.contains("500"));
    assert_eq!(broken.titles(), Some(""));
    assert_eq!(broken.metadata_list(RELATED_PATHS_KEY), Some(vec![]));
    assert_eq!(broken.metadata_list(RELATED_URLS_KEY), Some(vec![]));

    let sibling = find(&documents, &format!("{}/sibling/", base));
    assert!(sibling.page_content.contains("Sibling"));
    server.verify().await;
}

#[tokio::test]
async fn test_http_error_sequential() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Root", &["/missing/", "/sibling/"]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/sibling/", html_page("Sibling", &[]), 1).await;

    let documents = load_blocking(open_loader(&server)).await;

    assert_eq!(documents.len(), 3);
    let missing = find(&documents, &format!("{}/missing/", base));
    assert!(missing.page_content.contains("404"));
    server.verify().await;
}

#[tokio::test]
async fn test_unreachable_site_is_not_fatal() {
    // Port 9 (discard) is closed on test machines
    let loader = SiteLoader::new("http://127.0.0.1:9", None, None)
        .expect("Failed to create loader")
        .connect_timeout(Duration::from_secs(2));

    let documents = loader.aload().await.expect("Crawl should not fail");

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].url(), Some("http://127.0.0.1:9/"));
    assert!(!documents[0].page_content.is_empty());
}

#[tokio::test]
async fn test_fragments_share_one_document() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Root", &["/docs/#install", "/docs/", "/docs/#usage"]),
        1,
    )
    .await;
    mount_page(&server, "/docs/", html_page("Docs", &["#install"]), 1).await;

    let documents = open_loader(&server).aload().await.expect("Crawl failed");

    assert_eq!(documents.len(), 2);
    assert_unique(&documents);
    server.verify().await;
}

#[tokio::test]
async fn test_bounded_concurrency_visits_every_page_once() {
    let server = MockServer::start().await;

    let children: Vec<String> = (0..20).map(|i| format!("/page-{}/", i)).collect();
    let hrefs: Vec<&str> = children.iter().map(String::as_str).collect();
    mount_page(&server, "/", html_page("Root", &hrefs), 1).await;

    for child in &children {
        Mock::given(method("GET"))
            .and(path(child.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(html_page(child, &["/", "/page-0/"]))
                    .set_delay(Duration::from_millis(20)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let loader = open_loader(&server).max_in_flight(3);
    let documents = loader.aload().await.expect("Crawl failed");

    assert_eq!(documents.len(), 21);
    assert_unique(&documents);
    server.verify().await;
}

#[tokio::test]
async fn test_repeated_loads_are_independent() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Root", &["/guide/"]), 2).await;
    mount_page(&server, "/guide/", html_page("Guide", &[]), 2).await;

    let loader = open_loader(&server);
    let first = loader.aload().await.expect("First crawl failed");
    let second = loader.aload().await.expect("Second crawl failed");

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    server.verify().await;
}

#[tokio::test]
async fn test_crawl_deadline_returns_partial_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Root", &["/slow/"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", &[]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let loader = open_loader(&server).crawl_deadline(Some(Duration::from_millis(500)));
    let documents = loader.aload().await.expect("Crawl failed");

    assert_eq!(urls(&documents), vec![format!("{}/", base)]);
}

#[tokio::test]
async fn test_crawl_deadline_sequential_stops_between_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Root", &["/slow/", "/after/"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", &[]))
                .set_delay(Duration::from_secs(1)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/after/", html_page("After", &[]), 0).await;

    let loader = open_loader(&server).crawl_deadline(Some(Duration::from_millis(500)));
    let documents = load_blocking(loader).await;

    assert_eq!(
        urls(&documents),
        vec![format!("{}/", base), format!("{}/slow/", base)]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_expired_deadline_fetches_nothing() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Root", &["/guide/"]), 0).await;

    let loader = open_loader(&server).crawl_deadline(Some(Duration::ZERO));
    let documents = loader.aload().await.expect("Crawl failed");
    assert!(documents.is_empty());

    let loader = open_loader(&server).crawl_deadline(Some(Duration::ZERO));
    let documents = load_blocking(loader).await;
    assert!(documents.is_empty());

    server.verify().await;
}

#[tokio::test]
async fn test_sections_filter_sequential() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Root", &["/docs/intro", "/blog/post"]),
        1,
    )
    .await;
    mount_page(&server, "/docs/intro", html_page("Intro", &["/blog/other"]), 1).await;
    mount_page(&server, "/blog/post", html_page("Post", &[]), 0).await;
    mount_page(&server, "/blog/other", html_page("Other", &[]), 0).await;

    let loader = SiteLoader::new(&base, Some(vec!["/docs/".to_string()]), None)
        .expect("Failed to create loader");
    let documents = load_blocking(loader).await;

    assert_eq!(
        urls(&documents),
        vec![format!("{}/", base), format!("{}/docs/intro", base)]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_metadata_filter_sequential() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Root", &["#top", "/guide/", "https://github.com/x"]),
        1,
    )
    .await;
    mount_page(&server, "/guide/", html_page("Guide", &[]), 1).await;

    let loader = SiteLoader::new(
        &server.uri(),
        Some(vec!["/guide/".to_string()]),
        Some(vec![TITLES_KEY.to_string(), RELATED_PATHS_KEY.to_string()]),
    )
    .expect("Failed to create loader");
    let documents = load_blocking(loader).await;

    assert_eq!(documents.len(), 2);
    for document in &documents {
        assert!(!document.metadata.contains_key(TITLES_KEY));
        assert!(!document.metadata.contains_key(RELATED_PATHS_KEY));
        assert!(document.metadata.contains_key(RELATED_URLS_KEY));
        assert!(document.metadata.contains_key(URL_KEY));
    }
    server.verify().await;
}

/// Serves a permanent redirect from `route` to `location`
async fn mount_redirect(server: &MockServer, route: &str, location: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_redirect_is_degraded_and_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Root", &["/guide"]), 1).await;
    mount_redirect(&server, "/guide", "/guide/").await;
    mount_page(&server, "/guide/", html_page("Guide", &["install/"]), 0).await;
    mount_page(&server, "/guide/install/", html_page("Install", &[]), 0).await;
    mount_page(&server, "/install/", html_page("Install", &[]), 0).await;

    let documents = open_loader(&server).aload().await.expect("Crawl failed");

    assert_eq!(
        urls(&documents),
        vec![format!("{}/", base), format!("{}/guide", base)]
    );
    let guide = find(&documents, &format!("{}/guide", base));
    assert!(guide.page_content.contains("301"));
    assert_eq!(guide.metadata_list(RELATED_PATHS_KEY), Some(vec![]));
    server.verify().await;
}

#[tokio::test]
async fn test_redirect_sequential() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Root", &["/guide"]), 1).await;
    mount_redirect(&server, "/guide", "/guide/").await;
    mount_page(&server, "/guide/", html_page("Guide", &["install/"]), 0).await;
    mount_page(&server, "/install/", html_page("Install", &[]), 0).await;

    let documents = load_blocking(open_loader(&server)).await;

    assert_eq!(
        urls(&documents),
        vec![format!("{}/", base), format!("{}/guide", base)]
    );
    assert!(find(&documents, &format!("{}/guide", base))
        .page_content
        .contains("301"));
    server.verify().await;
}

#[tokio::test]
async fn test_user_agent_is_sent_with_every_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "docs-indexer/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Page", &["/guide/"])))
        .expect(2)
        .mount(&server)
        .await;

    let loader = open_loader(&server).user_agent("docs-indexer/1.0");
    let documents = loader.aload().await.expect("Crawl failed");

    assert_eq!(documents.len(), 2);
    assert!(documents.iter().all(|d| d.page_content.contains("Page")));
    server.verify().await;
}

#[tokio::test]
async fn test_request_timeout_degrades_slow_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html_page("Root", &["/slow/", "/fast/"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", &[]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fast/", html_page("Fast", &[]), 1).await;

    let loader = open_loader(&server).request_timeout(Duration::from_millis(300));
    let documents = loader.aload().await.expect("Crawl failed");

    assert_eq!(documents.len(), 3);
    let slow = find(&documents, &format!("{}/slow/", base));
    assert!(!slow.page_content.contains("Slow"));
    assert_eq!(slow.titles(), Some(""));
    assert!(find(&documents, &format!("{}/fast/", base))
        .page_content
        .contains("Fast"));
    server.verify().await;
}

#[test]
fn test_malformed_site_url_is_a_configuration_error() {
    assert!(SiteLoader::new("not a url", None, None).is_err());
}
