use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Resolves a link target against the page it was found on
///
/// # Normalization Steps
///
/// 1. Reject empty or whitespace-only hrefs
/// 2. Resolve `href` against `base` (relative, absolute and protocol-relative forms)
/// 3. Reject anything that is not `http` or `https` after resolution
/// 4. Remove the fragment (everything after #)
/// 5. Lowercase the host
///
/// Query strings and path casing are left untouched: documentation sites
/// frequently serve distinct pages that differ only by query.
///
/// # Arguments
///
/// * `base` - The URL of the page the link was found on
/// * `href` - The raw attribute value
///
/// # Returns
///
/// * `Some(Url)` - The absolute, defragmented URL
/// * `None` - The link cannot be crawled
///
/// # Examples
///
/// ```
/// use docmirror::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let url = normalize(&base, "../api#section").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/api");
///
/// assert!(normalize(&base, "mailto:someone@example.com").is_none());
/// ```
pub fn normalize(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut url = base.join(href).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);

    let host = url.host_str()?.to_string();
    let lowered = host.to_lowercase();
    if lowered != host {
        url.set_host(Some(&lowered)).ok()?;
    }

    Some(url)
}

/// Normalizes a caller-supplied seed URL
///
/// A seed defines the crawl scope, so its path always ends with `/`; the query
/// and fragment are dropped. A bare host such as `docs.rs/foo` is read as
/// `https://docs.rs/foo/`. Any other scheme, and embedded credentials, are
/// rejected.
///
/// # Examples
///
/// ```
/// use docmirror::url::normalize_seed;
///
/// let seed = normalize_seed("https://Example.com/docs").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/docs/");
/// ```
pub fn normalize_seed(raw: &str) -> UrlResult<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let mut url = match Url::parse(raw) {
        Ok(url) if raw.contains("://") || !is_host_with_port(&url) => url,
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", raw)).map_err(|e| UrlError::Parse(e.to_string()))?
        }
        Err(e) => return Err(UrlError::Parse(e.to_string())),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlError::Malformed(
            "Credentials are not allowed in a seed URL".to_string(),
        ));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?.to_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    url.set_fragment(None);
    url.set_query(None);

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// True for inputs like `localhost:8080/docs`, which parse as a `localhost:` scheme
fn is_host_with_port(url: &Url) -> bool {
    url.cannot_be_a_base()
        && url
            .path()
            .split('/')
            .next()
            .is_some_and(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}
