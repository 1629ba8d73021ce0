//! Code block extraction
//!
//! `<pre>` blocks bypass the HTML to Markdown conversion: their text is
//! cleaned here and emitted as a fenced block with a language hint.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

/// Class names accepted as a language hint without a `language-` prefix
const KNOWN_LANGUAGES: [&str; 10] = [
    "bash", "shell", "sh", "nix", "json", "yaml", "toml", "python", "js", "ts",
];

static CODE: Lazy<Selector> = Lazy::new(|| Selector::parse("code").expect("valid selector"));
static LINE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d{1,3}\s*$").expect("Invalid line number regex"));
static GLYPH_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\s│└├┬─›>•·`~\\/|:_-]+$").expect("Invalid glyph line regex")
});

/// A cleaned `<pre>` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language hint, empty when unknown
    pub language: String,
    /// Cleaned code text
    pub code: String,
}

impl CodeBlock {
    /// Builds a code block from a `<pre>` element
    pub fn from_pre(pre: ElementRef<'_>) -> Self {
        let code = pre.select(&CODE).next();
        let source = code.unwrap_or(pre);
        let text: String = source.text().collect();

        Self {
            language: language_hint(pre, code),
            code: clean_code_text(&text),
        }
    }

    /// Markdown fenced block, padded with blank lines
    pub fn fenced(&self) -> String {
        format!("\n\n```{}\n{}\n```\n\n", self.language, self.code)
    }
}

/// Placeholder standing in for the `index`-th code block during cleanup
///
/// Alphanumeric so neither the converter nor the cleanup steps touch it.
pub fn placeholder(index: usize) -> String {
    format!("DOCMIRRORFENCE{}X", index)
}

/// True if `element` is a `<pre>` not nested in another `<pre>`
pub fn is_outermost_pre(element: ElementRef<'_>) -> bool {
    element.value().name() == "pre"
        && !element
            .ancestors()
            .any(|node| node.value().as_element().is_some_and(|e| e.name() == "pre"))
}

/// Language hint from the classes of the inner `<code>`, or of the `<pre>`
/// when the `<code>` has no class attribute
///
/// The first `language-*` class wins; otherwise the last known language name.
/// Classes are read in attribute order.
fn language_hint(pre: ElementRef<'_>, code: Option<ElementRef<'_>>) -> String {
    let source = match code {
        Some(code) if code.value().attr("class").is_some() => code,
        _ => pre,
    };

    let mut language = "";
    for class in source.value().attr("class").unwrap_or("").split_whitespace() {
        if let Some(name) = class.strip_prefix("language-") {
            language = name;
            break;
        }
        if KNOWN_LANGUAGES.contains(&class) {
            language = class;
        }
    }
    language.to_string()
}

/// Cleans raw code text
///
/// - trailing whitespace is removed from every line
/// - lines holding only a 1 to 3 digit number (rendered line numbers) are dropped
/// - a line of only tree-drawing or decoration glyphs is joined with the next line
/// - leading and trailing newlines are removed
pub fn clean_code_text(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim_end();
        if LINE_NUMBER.is_match(line) {
            i += 1;
            continue;
        }
        if GLYPH_LINE.is_match(line) && i + 1 < lines.len() {
            let merged = format!("{} {}", line.trim(), lines[i + 1].trim_start());
            cleaned.push(merged.trim_end().to_string());
            i += 2;
            continue;
        }
        cleaned.push(line.to_string());
        i += 1;
    }

    cleaned.join("\n").trim_matches('\n').to_string()
}
