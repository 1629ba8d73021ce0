//! Plain-text rendering of the content root

use super::clean_up;
use super::code_blocks::{is_outermost_pre, placeholder, CodeBlock};
use scraper::{ElementRef, Node};

/// Elements followed by a blank line
const PARAGRAPH_TAGS: [&str; 19] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "dl", "table", "blockquote", "section",
    "article", "main", "header", "footer", "figure", "hr",
];

/// Elements that start and end on their own line
const LINE_TAGS: [&str; 9] = [
    "div", "li", "tr", "dt", "dd", "summary", "details", "figcaption", "caption",
];

/// Elements whose content is never rendered
const HIDDEN_TAGS: [&str; 5] = ["head", "title", "template", "noscript", "svg"];

/// Renders an element as plain text
///
/// Inline whitespace is collapsed and block elements start new lines. Code
/// blocks keep their cleaned text verbatim; the rest goes through the same
/// cleanup steps as the Markdown body.
pub fn render_plain_text(root: ElementRef<'_>) -> String {
    let mut out = TextBuffer::default();
    walk(root, &mut out);
    out.finish()
}

fn walk(element: ElementRef<'_>, out: &mut TextBuffer) {
    let name = element.value().name();

    if HIDDEN_TAGS.contains(&name) {
        return;
    }
    if is_outermost_pre(element) {
        out.push_block(&CodeBlock::from_pre(element).code);
        return;
    }
    if name == "br" {
        out.break_line();
        return;
    }

    let paragraph = PARAGRAPH_TAGS.contains(&name);
    let line = paragraph || LINE_TAGS.contains(&name);
    if line {
        out.end_line();
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_inline(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    walk(child, out);
                }
            }
            _ => {}
        }
    }

    if matches!(name, "td" | "th") {
        out.push_inline(" ");
    }
    if line {
        out.end_line();
    }
    if paragraph {
        out.blank_line();
    }
}

#[derive(Default)]
struct TextBuffer {
    done: String,
    line: String,
    /// `(placeholder, code)` pairs spliced back in by `finish`
    blocks: Vec<(String, String)>,
}

impl TextBuffer {
    /// Appends inline text with whitespace runs collapsed to one space
    fn push_inline(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                if !self.line.is_empty() && !self.line.ends_with(' ') {
                    self.line.push(' ');
                }
            } else {
                self.line.push(c);
            }
        }
    }

    /// Finishes the current line if it has content
    fn end_line(&mut self) {
        let line = self.line.trim();
        if !line.is_empty() {
            self.done.push_str(line);
            self.done.push('\n');
        }
        self.line.clear();
    }

    /// Finishes the current line unconditionally
    fn break_line(&mut self) {
        self.done.push_str(self.line.trim());
        self.done.push('\n');
        self.line.clear();
    }

    fn blank_line(&mut self) {
        if !self.done.is_empty() && !self.done.ends_with("\n\n") {
            self.done.push('\n');
        }
    }

    fn push_block(&mut self, block: &str) {
        let token = placeholder(self.blocks.len());
        self.end_line();
        self.blank_line();
        self.done.push_str(&token);
        self.done.push('\n');
        self.blank_line();
        self.blocks.push((token, block.to_string()));
    }

    fn finish(mut self) -> String {
        self.end_line();
        let text = clean_up(&self.done, &self.blocks);
        let text = text.trim_matches('\n');
        if text.is_empty() {
            String::new()
        } else {
            format!("{}\n", text)
        }
    }
}
