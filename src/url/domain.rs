use url::Url;

/// Extracts the site name of a URL: its lowercase host, plus `_<port>` when
/// the URL carries a non-default port
///
/// The site name is the per-seed output directory, so two seeds on the same
/// host and port write into the same tree while servers on different ports
/// stay apart. `_` stands in for `:`, which is not a portable file name
/// character.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docmirror::url::extract_domain;
///
/// let url = Url::parse("https://Docs.Example.COM/guide/").unwrap();
/// assert_eq!(extract_domain(&url), Some("docs.example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("localhost_8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_port_kept_in_domain() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("127.0.0.1_8080".to_string()));
    }

    #[test]
    fn test_default_port_dropped() {
        let url = Url::parse("https://example.com:443/docs/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }
}
