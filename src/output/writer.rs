use super::{relative_output_path, OutputError, OutputFormat, OutputResult};
use crate::extract::ExtractedPage;
use crate::url::extract_domain;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// What a write did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or overwritten
    Written(PathBuf),
    /// Diff mode found identical content; the file was not touched
    Unchanged(PathBuf),
}

impl WriteOutcome {
    /// Path of the target file
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Unchanged(path) => path,
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    url: &'a str,
    date_scraped: i64,
    content: &'a str,
}

/// Writes extracted pages under `<root>/<domain>/`
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
    format: OutputFormat,
    diff: bool,
}

impl OutputWriter {
    /// Creates a writer
    ///
    /// # Arguments
    ///
    /// * `root` - The output directory of the run
    /// * `format` - Serialization of every page
    /// * `diff` - Leave files alone when their content did not change
    pub fn new(root: impl Into<PathBuf>, format: OutputFormat, diff: bool) -> Self {
        Self {
            root: root.into(),
            format,
            diff,
        }
    }

    /// The output directory of the run
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory a seed's pages are written to
    pub fn site_dir(&self, seed: &Url) -> PathBuf {
        self.root
            .join(extract_domain(seed).unwrap_or_else(|| "unknown".to_string()))
    }

    /// Full path of a page's output file
    pub fn path_for(&self, seed: &Url, page_url: &Url) -> PathBuf {
        self.site_dir(seed)
            .join(relative_output_path(seed, page_url, self.format))
    }

    /// Path of a file relative to the run's output directory, for progress lines
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Serializes a page and writes it to its output file
    ///
    /// In diff mode an existing file is compared with the new document,
    /// rendered with the existing file's `date_scraped`; on equal SHA-256
    /// digests the file is left untouched. An unreadable existing file is
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// cannot be written.
    pub fn write(
        &self,
        seed: &Url,
        page_url: &Url,
        page: &ExtractedPage,
    ) -> OutputResult<WriteOutcome> {
        let path = self.path_for(seed, page_url);
        let now = chrono::Utc::now().timestamp();

        if self.diff && path.exists() {
            match fs::read_to_string(&path) {
                Ok(existing) => {
                    let scraped_at = scraped_at(self.format, &existing).unwrap_or(now);
                    let candidate = render_document(self.format, page, scraped_at)?;
                    if sha256_hex(&existing) == sha256_hex(&candidate) {
                        tracing::debug!("Unchanged: {}", path.display());
                        return Ok(WriteOutcome::Unchanged(path));
                    }
                }
                Err(e) => {
                    tracing::debug!("Cannot read {} for comparison: {}", path.display(), e);
                }
            }
        }

        let document = render_document(self.format, page, now)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| OutputError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, document).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote {}", path.display());
        Ok(WriteOutcome::Written(path))
    }
}

/// Serializes a page in the given format
///
/// `date_scraped` is a Unix timestamp in seconds; it only appears in the
/// Markdown front matter and the JSON object.
pub fn render_document(
    format: OutputFormat,
    page: &ExtractedPage,
    date_scraped: i64,
) -> OutputResult<String> {
    let document = match format {
        OutputFormat::Markdown => format!(
            "---\ntitle: {}\nurl: {}\ndate_scraped: {}\n---\n\n{}",
            page.title.replace(':', "-").replace('\n', " "),
            page.url,
            date_scraped,
            page.markdown
        ),
        OutputFormat::Json => serde_json::to_string_pretty(&JsonDocument {
            title: &page.title,
            url: &page.url,
            date_scraped,
            content: &page.markdown,
        })?,
        OutputFormat::Text => page.text.clone(),
        OutputFormat::Html => page.html.clone(),
    };
    Ok(document)
}

/// Reads the `date_scraped` value back from a written document
fn scraped_at(format: OutputFormat, document: &str) -> Option<i64> {
    match format {
        OutputFormat::Markdown => {
            let front_matter = document.strip_prefix("---\n")?;
            let (front_matter, _) = front_matter.split_once("\n---\n")?;
            front_matter
                .lines()
                .find_map(|line| line.strip_prefix("date_scraped: "))
                .and_then(|value| value.trim().parse().ok())
        }
        OutputFormat::Json => serde_json::from_str::<serde_json::Value>(document)
            .ok()?
            .get("date_scraped")?
            .as_i64(),
        OutputFormat::Text | OutputFormat::Html => None,
    }
}

fn sha256_hex(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn page(markdown: &str) -> ExtractedPage {
        ExtractedPage {
            title: "Guide: Setup".to_string(),
            url: "https://ex.com/docs/setup".to_string(),
            markdown: markdown.to_string(),
            text: "Setup\n".to_string(),
            html: "<main><h1>Setup</h1></main>".to_string(),
        }
    }

    fn seed() -> Url {
        Url::parse("https://ex.com/docs/").unwrap()
    }

    fn setup_url() -> Url {
        Url::parse("https://ex.com/docs/setup").unwrap()
    }

    #[test]
    fn test_render_markdown() {
        let doc = render_document(OutputFormat::Markdown, &page("# Setup\n"), 1700000000).unwrap();
        assert_eq!(
            doc,
            "---\ntitle: Guide- Setup\nurl: https://ex.com/docs/setup\ndate_scraped: 1700000000\n---\n\n# Setup\n"
        );
    }

    #[test]
    fn test_render_json() {
        let doc = render_document(OutputFormat::Json, &page("Grüße\n"), 42).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["title"], "Guide: Setup");
        assert_eq!(value["url"], "https://ex.com/docs/setup");
        assert_eq!(value["date_scraped"], 42);
        assert_eq!(value["content"], "Grüße\n");
        assert!(doc.contains("Grüße"));
        assert!(doc.find("\"title\"").unwrap() < doc.find("\"content\"").unwrap());
    }

    #[test]
    fn test_render_text_and_html() {
        let p = page("ignored");
        assert_eq!(render_document(OutputFormat::Text, &p, 0).unwrap(), "Setup\n");
        assert_eq!(
            render_document(OutputFormat::Html, &p, 0).unwrap(),
            "<main><h1>Setup</h1></main>"
        );
    }

    #[test]
    fn test_scraped_at_roundtrip() {
        let md = render_document(OutputFormat::Markdown, &page("x"), 123).unwrap();
        assert_eq!(scraped_at(OutputFormat::Markdown, &md), Some(123));
        let json = render_document(OutputFormat::Json, &page("x"), 456).unwrap();
        assert_eq!(scraped_at(OutputFormat::Json, &json), Some(456));
        assert_eq!(scraped_at(OutputFormat::Markdown, "no front matter"), None);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Markdown, false);
        let page_url = Url::parse("https://ex.com/docs/guide/intro/").unwrap();

        let outcome = writer.write(&seed(), &page_url, &page("body\n")).unwrap();
        let expected = dir.path().join("ex.com").join("guide").join("intro.md");
        assert_eq!(outcome, WriteOutcome::Written(expected.clone()));
        assert!(fs::read_to_string(expected).unwrap().ends_with("\n\nbody\n"));
        assert_eq!(
            writer.display_path(outcome.path()),
            Path::new("ex.com/guide/intro.md")
        );
    }

    #[test]
    fn test_without_diff_always_writes() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Text, false);
        let first = writer.write(&seed(), &setup_url(), &page("a")).unwrap();
        let second = writer.write(&seed(), &setup_url(), &page("a")).unwrap();
        assert!(matches!(first, WriteOutcome::Written(_)));
        assert!(matches!(second, WriteOutcome::Written(_)));
    }

    #[test]
    fn test_diff_skips_identical_content() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Markdown, true);
        let path = writer.path_for(&seed(), &setup_url());

        // Pretend the file was written long ago
        let old = render_document(OutputFormat::Markdown, &page("same\n"), 1000).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &old).unwrap();
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        let outcome = writer.write(&seed(), &setup_url(), &page("same\n")).unwrap();
        assert_eq!(outcome, WriteOutcome::Unchanged(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), old);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_diff_overwrites_changed_content() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Json, true);
        let path = writer.path_for(&seed(), &setup_url());

        let old = render_document(OutputFormat::Json, &page("old\n"), 1000).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &old).unwrap();

        let outcome = writer.write(&seed(), &setup_url(), &page("new\n")).unwrap();
        assert_eq!(outcome, WriteOutcome::Written(path.clone()));
        assert!(fs::read_to_string(&path).unwrap().contains("new\\n"));
    }

    #[test]
    fn test_diff_text_format() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Text, true);
        let first = writer.write(&seed(), &setup_url(), &page("x")).unwrap();
        let second = writer.write(&seed(), &setup_url(), &page("x")).unwrap();
        assert!(matches!(first, WriteOutcome::Written(_)));
        assert!(matches!(second, WriteOutcome::Unchanged(_)));
    }

    #[test]
    fn test_write_failure() {
        let dir = TempDir::new().unwrap();
        // A file where the site directory should be
        fs::write(dir.path().join("ex.com"), "not a directory").unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Markdown, false);

        let result = writer.write(&seed(), &setup_url(), &page("x"));
        assert!(matches!(result, Err(OutputError::Write { .. })));
    }
}
