//! Integration tests for the mirror
//!
//! These tests use wiremock to serve small documentation sites and run
//! the full fetch, extract and write cycle end-to-end.

use docmirror::config::Config;
use docmirror::run_mirror;
use docmirror::state::PageOutcome;
use docmirror::url::extract_domain;
use docmirror::OutputFormat;
use std::path::PathBuf;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir` with a negligible delay
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.output.directory = dir.path().to_path_buf();
    config.crawler.requests_per_second = 1000.0;
    config.crawler.request_timeout_secs = 5;
    config
}

fn page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<li><a href="{}">{}</a></li>"#, l, l))
        .collect();
    format!(
        r#"<html><head><title>{title}</title></head>
        <body>
          <nav><a href="/nav-only">Navigation</a></nav>
          <main><h1>{title}</h1><p>About {title}.</p><ul>{anchors}</ul></main>
        </body></html>"#
    )
}

async fn mount_html(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .mount(server)
        .await;
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|l| format!("<url><loc>{}</loc></url>", l))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn seed(server: &MockServer, at: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), at)).expect("Failed to parse seed URL")
}

fn site_dir(dir: &TempDir, seed: &Url) -> PathBuf {
    dir.path()
        .join(extract_domain(seed).expect("Failed to extract host"))
}

#[tokio::test]
async fn test_sitemap_mirror_writes_in_scope_pages() {
    let server = MockServer::start().await;
    let uri = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/docs/a", uri),
            format!("{}/docs/b", uri),
            "https://elsewhere.example/docs/c".to_string(),
        ]),
    )
    .await;
    mount_html(&server, "/docs/a", page("Alpha", &[])).await;
    mount_html(&server, "/docs/b", page("Beta", &[])).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawler.prefer_sitemap = true;
    let seed = seed(&server, "/docs/");

    let summary = run_mirror(config, &[seed.clone()]).await.unwrap();

    assert_eq!(summary.files_written, 2);
    assert_eq!(summary.output_dir, dir.path());

    let site = site_dir(&dir, &seed);
    let alpha = std::fs::read_to_string(site.join("a.md")).unwrap();
    assert!(alpha.starts_with("---\ntitle: Alpha\n"));
    assert!(alpha.contains(&format!("url: {}/docs/a\n", uri)));
    assert!(alpha.contains("# Alpha"));
    assert!(!alpha.contains("Navigation"));
    assert!(site.join("b.md").exists());

    let summary_file = dir.path().join("summary.txt");
    summary.write_to(&summary_file).unwrap();
    let written = std::fs::read_to_string(summary_file).unwrap();
    assert_eq!(
        written,
        format!("count: 2\nout: {}\n", dir.path().display())
    );
}

#[tokio::test]
async fn test_frontier_respects_robots() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/", page("Home", &["/public", "/private"])).await;
    mount_html(&server, "/public", page("Public", &[])).await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page("Private", &[]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let seed = seed(&server, "/");

    let summary = run_mirror(create_test_config(&dir), &[seed.clone()])
        .await
        .unwrap();

    assert_eq!(summary.files_written, 2);
    assert_eq!(summary.stats.count(PageOutcome::RobotsDenied), 1);
    let site = site_dir(&dir, &seed);
    assert!(site.join("index.md").exists());
    assert!(site.join("public.md").exists());
    assert!(!site.join("private.md").exists());
}

#[tokio::test]
async fn test_depth_limit() {
    let server = MockServer::start().await;

    mount_html(&server, "/", page("Home", &["/one"])).await;
    mount_html(&server, "/one", page("One", &["/two"])).await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page("Two", &[]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawler.max_depth = 1;

    let summary = run_mirror(config, &[seed(&server, "/")]).await.unwrap();

    assert_eq!(summary.files_written, 2);
}

#[tokio::test]
async fn test_max_pages_cap() {
    let server = MockServer::start().await;

    mount_html(&server, "/", page("Home", &["/p1", "/p2", "/p3", "/p4", "/p5"])).await;
    for i in 1..=5 {
        mount_html(&server, &format!("/p{}", i), page(&format!("Page {}", i), &[])).await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawler.max_pages = 3;

    let summary = run_mirror(config, &[seed(&server, "/")]).await.unwrap();

    assert_eq!(summary.files_written, 3);
}

#[tokio::test]
async fn test_duplicate_content_written_once_but_followed() {
    let server = MockServer::start().await;

    let shared = page("Shared", &["/c"]);
    mount_html(&server, "/", page("Home", &["/a", "/b"])).await;
    mount_html(&server, "/a", shared.clone()).await;
    mount_html(&server, "/b", shared).await;
    mount_html(&server, "/c", page("Leaf", &[])).await;

    let dir = TempDir::new().unwrap();
    let seed = seed(&server, "/");

    let summary = run_mirror(create_test_config(&dir), &[seed.clone()])
        .await
        .unwrap();

    assert_eq!(summary.files_written, 3);
    assert_eq!(summary.stats.count(PageOutcome::DuplicateContent), 1);
    let site = site_dir(&dir, &seed);
    assert!(site.join("a.md").exists());
    assert!(!site.join("b.md").exists());
    assert!(site.join("c.md").exists());
}

#[tokio::test]
async fn test_non_html_content_skipped() {
    let server = MockServer::start().await;

    mount_html(&server, "/", page("Home", &["/data.json", "/guide"])).await;
    mount_html(&server, "/guide", page("Guide", &[])).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let seed = seed(&server, "/");

    let summary = run_mirror(create_test_config(&dir), &[seed.clone()])
        .await
        .unwrap();

    assert_eq!(summary.files_written, 2);
    assert_eq!(summary.stats.count(PageOutcome::NotHtml), 1);
    assert!(!site_dir(&dir, &seed).join("data-json.md").exists());
}

#[tokio::test]
async fn test_sitemap_index_with_failing_child() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let index = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap><loc>{uri}/sitemap-docs.xml</loc></sitemap>
          <sitemap><loc>{uri}/sitemap-broken.xml</loc></sitemap>
        </sitemapindex>"#
    );
    mount_xml(&server, "/sitemap.xml", index).await;
    mount_xml(
        &server,
        "/sitemap-docs.xml",
        urlset(&[format!("{}/guide", uri), format!("{}/api", uri)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(&server, "/guide", page("Guide", &[])).await;
    mount_html(&server, "/api", page("API", &[])).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawler.prefer_sitemap = true;
    config.output.format = OutputFormat::Json;
    let seed = seed(&server, "/");

    let summary = run_mirror(config, &[seed.clone()]).await.unwrap();

    assert_eq!(summary.files_written, 2);
    let json = std::fs::read_to_string(site_dir(&dir, &seed).join("guide.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["title"], "Guide");
    assert_eq!(value["url"], format!("{}/guide", uri));
    assert!(value["content"].as_str().unwrap().contains("# Guide"));
    assert!(value["date_scraped"].is_i64());
}

#[tokio::test]
async fn test_missing_sitemap_falls_back_to_links() {
    let server = MockServer::start().await;

    mount_html(&server, "/", page("Home", &["/next"])).await;
    mount_html(&server, "/next", page("Next", &[])).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawler.prefer_sitemap = true;
    let seed = seed(&server, "/");

    let summary = run_mirror(config, &[seed.clone()]).await.unwrap();

    assert_eq!(summary.files_written, 2);
    assert!(site_dir(&dir, &seed).join("next.md").exists());
}

#[tokio::test]
async fn test_diff_mode_second_run_leaves_files_untouched() {
    let server = MockServer::start().await;

    mount_html(&server, "/", page("Home", &["/stable"])).await;
    mount_html(&server, "/stable", page("Stable", &[])).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.output.diff = true;
    let seed = seed(&server, "/");

    let first = run_mirror(config.clone(), &[seed.clone()]).await.unwrap();
    assert_eq!(first.files_written, 2);

    let file = site_dir(&dir, &seed).join("stable.md");
    let before = std::fs::read_to_string(&file).unwrap();

    let second = run_mirror(config, &[seed.clone()]).await.unwrap();
    assert_eq!(second.files_written, 0);
    assert_eq!(second.stats.count(PageOutcome::Unchanged), 2);
    assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
}

#[tokio::test]
async fn test_multiple_seeds_summed() {
    let docs = MockServer::start().await;
    let api = MockServer::start().await;

    mount_html(&docs, "/docs/", page("Docs", &["intro"])).await;
    mount_html(&docs, "/docs/intro", page("Intro", &[])).await;
    mount_html(&api, "/", page("API", &[])).await;

    let dir = TempDir::new().unwrap();
    let seeds = vec![seed(&docs, "/docs/"), seed(&api, "/")];

    let summary = run_mirror(create_test_config(&dir), &seeds).await.unwrap();

    assert_eq!(summary.files_written, 3);
    assert_eq!(summary.to_string(), format!("Wrote 3 files to {}", dir.path().display()));

    let docs_site = site_dir(&dir, &seeds[0]);
    let api_site = site_dir(&dir, &seeds[1]);
    assert_ne!(docs_site, api_site);

    let docs_index = std::fs::read_to_string(docs_site.join("index.md")).unwrap();
    assert!(docs_index.contains("title: Docs\n"));
    assert!(docs_site.join("intro.md").exists());

    let api_index = std::fs::read_to_string(api_site.join("index.md")).unwrap();
    assert!(api_index.contains("title: API\n"));
}
