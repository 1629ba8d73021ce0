//! URL handling module for docmirror
//!
//! This module provides link resolution, seed normalization, crawl scoping and
//! domain extraction. Everything here is a pure function over `url::Url`.

mod domain;
mod normalize;
mod scope;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{normalize, normalize_seed};
pub use scope::in_scope;

/// Origin of a URL (`scheme://host[:port]`) as a base for absolute paths
///
/// # Examples
///
/// ```
/// use docmirror::url::origin_of;
/// use url::Url;
///
/// let seed = Url::parse("http://127.0.0.1:8080/docs/").unwrap();
/// assert_eq!(origin_of(&seed).as_str(), "http://127.0.0.1:8080/");
/// ```
pub fn origin_of(url: &::url::Url) -> ::url::Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}
