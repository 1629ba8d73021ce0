use sitemap::reader::{SiteMapEntity, SiteMapReader};
use std::io::Cursor;
use thiserror::Error;
use url::Url;

/// Sitemap parsing errors
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Malformed sitemap XML: {0}")]
    Malformed(String),
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page locations
    UrlSet(Vec<Url>),
    /// `<sitemapindex>`: locations of child sitemaps
    Index(Vec<Url>),
}

impl SitemapDocument {
    /// Number of locations in the document
    pub fn len(&self) -> usize {
        match self {
            Self::UrlSet(urls) | Self::Index(urls) => urls.len(),
        }
    }

    /// True if the document lists no locations
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses sitemap XML
///
/// A document with at least one `<sitemap>` entry is an index; anything else,
/// including a document without entries, is a url-set. `<loc>` values that
/// are not absolute URLs are skipped.
///
/// # Errors
///
/// Returns [`SitemapError::Malformed`] at the first XML error.
pub fn parse_sitemap(xml: &[u8]) -> Result<SitemapDocument, SitemapError> {
    let mut pages = Vec::new();
    let mut children = Vec::new();

    for entity in SiteMapReader::new(Cursor::new(xml)) {
        match entity {
            SiteMapEntity::Url(entry) => pages.extend(entry.loc.get_url()),
            SiteMapEntity::SiteMap(entry) => children.extend(entry.loc.get_url()),
            // The underlying xml reader repeats its last error forever
            SiteMapEntity::Err(e) => return Err(SitemapError::Malformed(e.to_string())),
        }
    }

    if children.is_empty() {
        Ok(SitemapDocument::UrlSet(pages))
    } else {
        Ok(SitemapDocument::Index(children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/docs/a</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc> https://example.com/docs/b </loc></url>
</urlset>"#;
        let doc = parse_sitemap(xml.as_bytes()).unwrap();
        match doc {
            SitemapDocument::UrlSet(urls) => {
                let urls: Vec<&str> = urls.iter().map(Url::as_str).collect();
                assert_eq!(
                    urls,
                    vec!["https://example.com/docs/a", "https://example.com/docs/b"]
                );
            }
            other => panic!("expected url-set, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_index() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
  <sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>
</sitemapindex>"#;
        let doc = parse_sitemap(xml.as_bytes()).unwrap();
        assert!(matches!(doc, SitemapDocument::Index(_)));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_parse_empty_urlset() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
        let doc = parse_sitemap(xml.as_bytes()).unwrap();
        assert_eq!(doc, SitemapDocument::UrlSet(vec![]));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_skips_relative_loc() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>/docs/relative</loc></url>
  <url><loc>https://example.com/docs/ok</loc></url>
</urlset>"#;
        let doc = parse_sitemap(xml.as_bytes()).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_parse_truncated_xml() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://example.com/a</loc>"#;
        assert!(matches!(
            parse_sitemap(xml.as_bytes()),
            Err(SitemapError::Malformed(_))
        ));
    }
}
