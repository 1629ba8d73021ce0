//! Content extraction module
//!
//! Turns the raw HTML of a documentation page into its readable content:
//! boilerplate is removed, the main content element is selected, code blocks
//! are fenced, and the rest is converted to Markdown with `htmd` and put
//! through the cleanup steps in [`transforms`].
//!
//! # Example
//!
//! ```
//! use docmirror::extract::extract;
//! use url::Url;
//!
//! let html = r#"<html><head><title>Intro</title></head>
//!     <body><nav>Menu</nav><main><h1>Hello</h1><p>World</p></main></body></html>"#;
//! let page = extract(html, &Url::parse("https://example.com/docs/").unwrap());
//! assert_eq!(page.title, "Intro");
//! assert!(page.markdown.contains("# Hello"));
//! assert!(!page.markdown.contains("Menu"));
//! ```

mod code_blocks;
mod text;
pub mod transforms;

pub use code_blocks::{clean_code_text, CodeBlock};
pub use text::render_plain_text;
pub use transforms::CleanupStep;

use code_blocks::{is_outermost_pre, placeholder};
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use transforms::{apply_all, POST_SPLICE, PRE_SPLICE};
use url::Url;

static BOILERPLATE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("nav, aside, script, style, header, footer, form, img")
        .expect("valid selector")
});
static ROOT_CANDIDATES: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "main",
        "article",
        "div.content",
        "div.document",
        "div.theme-default-content",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("valid selector"))
    .collect()
});
static DIV_WITH_ID: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div[id]").expect("valid selector"));
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static PRE: Lazy<Selector> = Lazy::new(|| Selector::parse("pre").expect("valid selector"));

/// Readable content of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Trimmed `<title>` text, empty if absent
    pub title: String,
    /// The page URL
    pub url: String,
    /// Cleaned Markdown body
    pub markdown: String,
    /// Plain-text body
    pub text: String,
    /// The content root after boilerplate removal, as HTML
    pub html: String,
}

/// Extracts the readable content of a page
///
/// Deterministic: the same input always produces the same page.
///
/// # Arguments
///
/// * `html` - Raw HTML of the page
/// * `page_url` - The URL the page was fetched from
pub fn extract(html: &str, page_url: &Url) -> ExtractedPage {
    let mut document = Html::parse_document(html);
    remove_boilerplate(&mut document);

    let title = extract_title(&document);
    let root = content_root(&document);
    let cleaned_html = root.html();

    let (substituted, fences) = substitute_code_blocks(root, &cleaned_html);
    let converted = match to_markdown(&substituted) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!("Markdown conversion failed for {}: {}", page_url, e);
            render_plain_text(root)
        }
    };

    let markdown = clean_up(&converted, &fences);

    tracing::trace!(
        "Extracted {} ({} code blocks, {} bytes of Markdown)",
        page_url,
        fences.len(),
        markdown.len()
    );

    ExtractedPage {
        title,
        url: page_url.to_string(),
        markdown: finish_body(&markdown),
        text: render_plain_text(root),
        html: cleaned_html,
    }
}

/// Detaches boilerplate elements from the tree
fn remove_boilerplate(document: &mut Html) {
    let ids: Vec<_> = document.select(&BOILERPLATE).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Picks the element holding the page content
///
/// A candidate without any text falls back to the whole document.
fn content_root(document: &Html) -> ElementRef<'_> {
    let candidate = ROOT_CANDIDATES
        .iter()
        .find_map(|selector| document.select(selector).next())
        .or_else(|| {
            document.select(&DIV_WITH_ID).find(|div| {
                div.value().id().is_some_and(|id| {
                    let id = id.to_lowercase();
                    id.starts_with("content") || id.starts_with("main")
                })
            })
        })
        .or_else(|| document.select(&BODY).next());

    match candidate {
        Some(root) if root.text().any(|t| !t.trim().is_empty()) => root,
        _ => document.root_element(),
    }
}

/// Replaces each outermost `<pre>` in `html` with a placeholder paragraph
///
/// Returns the rewritten HTML and the `(token, fenced block)` pairs in
/// document order.
fn substitute_code_blocks(root: ElementRef<'_>, html: &str) -> (String, Vec<(String, String)>) {
    let mut html = html.to_string();
    let mut fences = Vec::new();

    for (index, pre) in root
        .select(&PRE)
        .filter(|pre| is_outermost_pre(*pre))
        .enumerate()
    {
        let token = placeholder(index);
        html = html.replacen(&pre.html(), &format!("<p>{}</p>", token), 1);
        fences.push((token, CodeBlock::from_pre(pre).fenced()));
    }

    (html, fences)
}

/// Runs the cleanup steps around the splicing of `blocks` into `body`
///
/// Shared by the Markdown and plain-text bodies so both get the same rewrites.
pub(crate) fn clean_up(body: &str, blocks: &[(String, String)]) -> String {
    let mut body = apply_all(body, &PRE_SPLICE);
    for (token, block) in blocks {
        body = body.replace(token.as_str(), block);
    }
    apply_all(&body, &POST_SPLICE)
}

fn to_markdown(html: &str) -> std::io::Result<String> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["head", "script", "style"])
        .options(Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        })
        .build();
    converter.convert(html)
}

fn finish_body(markdown: &str) -> String {
    let body = markdown.trim_matches('\n');
    if body.is_empty() {
        String::new()
    } else {
        format!("{}\n", body)
    }
}
