use url::Url;

/// Checks whether a candidate URL falls inside a seed's crawl scope
///
/// A candidate is in scope when its scheme, host and port are identical to
/// the seed's and its path starts with the seed's path. This is a plain
/// string prefix test: there is no cross-subdomain or cross-path traversal.
///
/// # Examples
///
/// ```
/// use docmirror::url::in_scope;
/// use url::Url;
///
/// let seed = Url::parse("https://example.com/docs/").unwrap();
/// assert!(in_scope(&seed, &Url::parse("https://example.com/docs/intro").unwrap()));
/// assert!(!in_scope(&seed, &Url::parse("https://example.com/blog/").unwrap()));
/// assert!(!in_scope(&seed, &Url::parse("https://api.example.com/docs/").unwrap()));
/// ```
pub fn in_scope(seed: &Url, candidate: &Url) -> bool {
    seed.scheme() == candidate.scheme()
        && seed.host_str() == candidate.host_str()
        && seed.port_or_known_default() == candidate.port_or_known_default()
        && candidate.path().starts_with(seed.path())
}
