//! HTML parser for link discovery
//!
//! This module finds the outgoing links of a fetched page:
//! - The target of a `<meta http-equiv="refresh">` redirect, if any
//! - Every `<a href="...">` in document order
//!
//! Scope and visited checks are left to the frontier crawler.

use crate::url::normalize;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static META_REFRESH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[http-equiv][content]").expect("valid selector"));
static REFRESH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*\d*(?:\.\d*)?\s*[;,]\s*url\s*=\s*['"]?([^'"]+?)['"]?\s*$"#)
        .expect("valid regex")
});

/// Discovers the crawlable links of a page
///
/// The meta-refresh target comes first, followed by every anchor. Each link
/// is resolved against `base` with [`normalize`]; links that do not resolve
/// to an http(s) URL are dropped. Duplicates are kept, the caller's visited
/// set takes care of them.
///
/// # Arguments
///
/// * `html` - The raw HTML of the page
/// * `base` - The final URL of the response, after redirects
///
/// # Example
///
/// ```
/// use docmirror::crawler::discover_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/docs/a">A</a><a href="mailto:x@y.z">M</a></body></html>"#;
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let links = discover_links(html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/docs/a");
/// ```
pub fn discover_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Some(target) = meta_refresh_target(&document) {
        links.extend(normalize(base, &target));
    }

    for element in document.select(&ANCHOR) {
        if let Some(href) = element.value().attr("href") {
            links.extend(normalize(base, href));
        }
    }

    links
}

/// Extracts the URL of the first `<meta http-equiv="refresh">` tag
fn meta_refresh_target(document: &Html) -> Option<String> {
    document
        .select(&META_REFRESH)
        .filter(|meta| {
            meta.value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .find_map(|meta| {
            let content = meta.value().attr("content")?;
            REFRESH_URL
                .captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
}
