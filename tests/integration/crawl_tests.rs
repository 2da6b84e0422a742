//! Integration tests for the mirror
//!
//! These tests use wiremock to create mock HTTP servers and tempfile for the
//! output directory, and run the full crawl cycle end-to-end against disk.

use site_mirror::config::Config;
use site_mirror::crawler::Coordinator;
use site_mirror::mirror;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that writes into `output_dir`
fn create_test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.crawler.request_timeout = 5;
    config.crawler.connect_timeout = 2;
    config.output.directory = output_dir.to_string_lossy().into_owned();
    config
}

/// Mounts an HTML page, optionally asserting how often it is fetched
async fn mount_page(server: &MockServer, route: &str, html: String, expected: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"));
    let mock = match expected {
        Some(n) => mock.expect(n),
        None => mock,
    };
    mock.mount(server).await;
}

/// Mounts a binary asset that must be fetched exactly `expected` times
async fn mount_asset(server: &MockServer, route: &str, body: &[u8], expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(expected)
        .mount(server)
        .await;
}

fn read(dir: &TempDir, relative: &str) -> Vec<u8> {
    std::fs::read(dir.path().join(relative))
        .unwrap_or_else(|e| panic!("expected {} to exist: {}", relative, e))
}

#[tokio::test]
async fn test_full_mirror_with_assets() {
    let site = MockServer::start().await;
    let cdn = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &site,
        "/",
        format!(
            r#"<html><head>
                <title>Home</title>
                <link rel="stylesheet" href="/css/site.css">
                <link rel="icon" href="favicon.ico">
            </head><body>
                <img src="{cdn}/img/banner.png">
                <a href="/about/">About</a>
                <a href="/docs/guide.html">Guide</a>
                <a href="{cdn}/elsewhere">Elsewhere</a>
            </body></html>"#,
            cdn = cdn.uri()
        ),
        Some(1),
    )
    .await;
    mount_page(
        &site,
        "/about/",
        r#"<html><body>
            <script src="/js/app.js"></script>
            <link rel="stylesheet" href="/css/site.css">
            <a href="/">Home</a>
        </body></html>"#
            .to_string(),
        Some(1),
    )
    .await;
    mount_page(
        &site,
        "/docs/guide.html",
        "<p>guide</p>".to_string(),
        Some(1),
    )
    .await;
    mount_asset(&site, "/css/site.css", b"body{}", 1).await;
    mount_asset(&site, "/favicon.ico", b"ico", 1).await;
    mount_asset(&site, "/js/app.js", b"app()", 1).await;
    mount_asset(&cdn, "/img/banner.png", b"png", 1).await;
    // External pages are never followed
    mount_page(&cdn, "/elsewhere", "<p>away</p>".to_string(), Some(0)).await;

    let mut coordinator =
        Coordinator::new(create_test_config(out.path()), &format!("{}/", site.uri()))
            .expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Mirror should succeed");

    assert!(read(&out, "index.html").starts_with(b"<html>"));
    assert!(read(&out, "about/index.html").starts_with(b"<html>"));
    assert_eq!(read(&out, "css/site.css"), b"body{}");
    assert_eq!(read(&out, "favicon.ico"), b"ico");
    assert_eq!(read(&out, "js/app.js"), b"app()");
    assert_eq!(read(&out, "cached_external_assets/img/banner.png"), b"png");
    assert!(!out.path().join("docs/guide.html").exists());

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pages_saved, 2);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.assets_downloaded, 4);
    assert!(report.is_complete());
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_mutual_links_visited_once() {
    let site = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(&site, "/", r#"<a href="/b">B</a>"#.to_string(), Some(1)).await;
    mount_page(
        &site,
        "/b",
        r#"<a href="/">A</a><a href="/b#again">B</a>"#.to_string(),
        Some(1),
    )
    .await;

    let report = mirror(create_test_config(out.path()), &format!("{}/", site.uri()))
        .await
        .expect("Mirror should terminate");

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.frontier_remaining, 0);
    assert!(out.path().join("index.html").exists());
    assert!(out.path().join("b/index.html").exists());
}

#[tokio::test]
async fn test_asset_failure_does_not_abort_page() {
    let site = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &site,
        "/",
        r#"<img src="/missing.png"><img src="/ok.png"><a href="/next">next</a>"#.to_string(),
        None,
    )
    .await;
    mount_page(&site, "/next", "<p>next</p>".to_string(), Some(1)).await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;
    mount_asset(&site, "/ok.png", b"ok", 1).await;

    let report = mirror(create_test_config(out.path()), &site.uri())
        .await
        .expect("Asset failures must not fail the run");

    assert_eq!(report.asset_failures, 1);
    assert_eq!(report.assets_downloaded, 1);
    assert_eq!(report.pages_visited, 2);
    assert!(!out.path().join("missing.png").exists());
    assert_eq!(read(&out, "ok.png"), b"ok");
    assert!(out.path().join("next/index.html").exists());
}

#[tokio::test]
async fn test_page_failure_is_recovered() {
    let site = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &site,
        "/",
        r#"<a href="/gone">gone</a><a href="/ok">ok</a>"#.to_string(),
        None,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;
    mount_page(&site, "/ok", "<p>ok</p>".to_string(), Some(1)).await;

    let mut coordinator =
        Coordinator::new(create_test_config(out.path()), &format!("{}/", site.uri())).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(coordinator.state().failed_len(), 1);
    assert!(out.path().join("ok/index.html").exists());
    assert!(!out.path().join("gone").exists());
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_rerun_skips_assets_on_disk() {
    let site = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &site,
        "/",
        r#"<link rel="stylesheet" href="/a.css"><script src="/a.js"></script>"#.to_string(),
        Some(2),
    )
    .await;
    mount_asset(&site, "/a.css", b"a{}", 1).await;
    mount_asset(&site, "/a.js", b"a()", 1).await;

    let root = format!("{}/", site.uri());
    let first = mirror(create_test_config(out.path()), &root).await.unwrap();
    let second = mirror(create_test_config(out.path()), &root).await.unwrap();

    assert_eq!(first.assets_downloaded, 2);
    assert_eq!(second.assets_downloaded, 0);
    assert_eq!(second.assets_present, 2);
    assert_eq!(read(&out, "a.css"), b"a{}");
}

#[tokio::test]
async fn test_shared_asset_downloaded_once_per_run() {
    let site = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &site,
        "/",
        r#"<link rel="stylesheet" href="/shared.css"><a href="/two">two</a>"#.to_string(),
        None,
    )
    .await;
    mount_page(
        &site,
        "/two",
        r#"<link rel="stylesheet" href="shared.css">"#.to_string(),
        None,
    )
    .await;
    mount_asset(&site, "/shared.css", b"shared", 1).await;

    let report = mirror(create_test_config(out.path()), &site.uri())
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.assets_downloaded, 1);
}

#[tokio::test]
async fn test_max_pages_bounds_crawl() {
    let site = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &site,
        "/",
        r#"<a href="/1">1</a><a href="/2">2</a><a href="/3">3</a>"#.to_string(),
        None,
    )
    .await;
    mount_page(&site, "/1", "one".to_string(), None).await;
    mount_page(&site, "/2", "two".to_string(), Some(0)).await;
    mount_page(&site, "/3", "three".to_string(), Some(0)).await;

    let mut config = create_test_config(out.path());
    config.crawler.max_pages = 2;
    let report = mirror(config, &site.uri()).await.unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.frontier_remaining, 2);
}

#[tokio::test]
async fn test_file_pages_saved_when_enabled() {
    let site = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &site,
        "/",
        r#"<a href="/docs/guide.html">Guide</a>"#.to_string(),
        None,
    )
    .await;
    mount_page(&site, "/docs/guide.html", "<p>guide</p>".to_string(), None).await;

    let mut config = create_test_config(out.path());
    config.output.save_file_pages = true;
    mirror(config, &site.uri()).await.unwrap();

    assert_eq!(read(&out, "docs/guide.html"), b"<p>guide</p>");
}

#[tokio::test]
async fn test_unreachable_root_is_not_fatal() {
    let out = TempDir::new().unwrap();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let report = mirror(
        create_test_config(out.path()),
        &format!("http://127.0.0.1:{}/", port),
    )
    .await
    .expect("Transport failures are recovered");

    assert_eq!(report.pages_failed, 1);
    assert!(!out.path().join("index.html").exists());
}

#[tokio::test]
async fn test_page_write_failure_still_processes_page() {
    let site = MockServer::start().await;
    let out = TempDir::new().unwrap();
    // A file where the page's directory should go makes the write fail
    std::fs::write(out.path().join("about"), b"in the way").unwrap();

    mount_page(&site, "/", r#"<a href="/about/">About</a>"#.to_string(), Some(1)).await;
    mount_page(
        &site,
        "/about/",
        r#"<img src="/pic.png"><a href="/team/">Team</a>"#.to_string(),
        Some(1),
    )
    .await;
    mount_page(&site, "/team/", "<p>team</p>".to_string(), Some(1)).await;
    mount_asset(&site, "/pic.png", b"pic", 1).await;

    let mut coordinator =
        Coordinator::new(create_test_config(out.path()), &format!("{}/", site.uri())).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.page_write_failures, 1);
    assert_eq!(report.assets_downloaded, 1);
    assert_eq!(coordinator.state().failed_len(), 0);
    assert_eq!(read(&out, "pic.png"), b"pic");
    assert!(out.path().join("team/index.html").exists());
    assert_eq!(read(&out, "about"), b"in the way");
    assert!(!report.is_complete());
}
