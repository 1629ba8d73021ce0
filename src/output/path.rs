use super::OutputFormat;
use std::path::PathBuf;
use url::Url;

/// Derives a page's file path, relative to the seed's output directory
///
/// # Rules
///
/// 1. Take the page path relative to the seed path
/// 2. A trailing `/` becomes `/index`; a `.html` suffix is dropped
/// 3. `<dir>/index` collapses to `<dir>`, except at the seed root
/// 4. Characters outside `[A-Za-z0-9/_-]` become `-`
/// 5. An empty result becomes `index`; the format extension is appended
///
/// The query string is ignored, so URLs that differ only by query share a
/// path.
///
/// # Examples
///
/// ```
/// use docmirror::output::{relative_output_path, OutputFormat};
/// use std::path::PathBuf;
/// use url::Url;
///
/// let seed = Url::parse("https://ex.com/docs/").unwrap();
/// let page = Url::parse("https://ex.com/docs/guide/intro/").unwrap();
/// assert_eq!(
///     relative_output_path(&seed, &page, OutputFormat::Markdown),
///     PathBuf::from("guide/intro.md")
/// );
/// ```
pub fn relative_output_path(seed: &Url, page: &Url, format: OutputFormat) -> PathBuf {
    let page_path = page.path();
    let mut path = match page_path.strip_prefix(seed.path()) {
        Some(rest) => format!("/{}", rest),
        None => page_path.to_string(),
    };

    if path.ends_with('/') {
        path.push_str("index");
    }
    if let Some(stripped) = path.strip_suffix(".html") {
        path = stripped.to_string();
    }
    if let Some(parent) = path.strip_suffix("/index") {
        if !parent.is_empty() {
            path = parent.to_string();
        }
    }

    let safe: String = path
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let safe = safe.trim_matches('/');
    let safe = if safe.is_empty() { "index" } else { safe };

    PathBuf::from(format!("{}.{}", safe, format.extension()))
}
