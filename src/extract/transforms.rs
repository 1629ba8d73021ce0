//! Markdown cleanup steps
//!
//! Conversion output goes through a fixed sequence of named rewrites. Steps in
//! [`PRE_SPLICE`] run before code-block placeholders are replaced by their
//! fenced blocks, steps in [`POST_SPLICE`] after.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static ICON_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#x[0-9a-fA-F]+;|[\x{E000}-\x{F8FF}]").expect("Invalid icon entity regex")
});
static BOLD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\*\*([^*\n]+?)\*\*[ \t]*$").expect("Invalid bold line regex")
});
static DOC_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\n)(note\(|s\()").expect("Invalid doc call regex"));
static LINE_NUMBER_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\n)(?:\s*\d+\s*\n){3,}").expect("Invalid line number run regex")
});
static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid blank run regex"));

/// A named Markdown rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStep {
    /// Removes icon-font glyphs: Private Use Area characters and any
    /// `&#x...;` hex references that survived as text
    StripIconEntities,
    /// Turns a line made only of `**text**` into `## text`
    PromoteBoldHeadings,
    /// Puts a blank line before lines starting with `note(` or `s(`
    SpaceDocCalls,
    /// Replaces 3+ consecutive digit-only lines with one blank line
    CollapseLineNumberRuns,
    /// Reduces 3+ newlines to exactly one blank line
    CollapseBlankLines,
}

/// Steps applied to the converted Markdown while code blocks are placeholders
pub const PRE_SPLICE: [CleanupStep; 3] = [
    CleanupStep::StripIconEntities,
    CleanupStep::PromoteBoldHeadings,
    CleanupStep::SpaceDocCalls,
];

/// Steps applied once the fenced code blocks are back in place
pub const POST_SPLICE: [CleanupStep; 2] = [
    CleanupStep::CollapseLineNumberRuns,
    CleanupStep::CollapseBlankLines,
];

impl CleanupStep {
    /// Kebab-case name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::StripIconEntities => "strip-icon-entities",
            Self::PromoteBoldHeadings => "promote-bold-headings",
            Self::SpaceDocCalls => "space-doc-calls",
            Self::CollapseLineNumberRuns => "collapse-line-number-runs",
            Self::CollapseBlankLines => "collapse-blank-lines",
        }
    }

    /// Applies the step to `markdown`
    pub fn apply(&self, markdown: &str) -> String {
        let rewritten: Cow<'_, str> = match self {
            Self::StripIconEntities => ICON_ENTITY.replace_all(markdown, ""),
            Self::PromoteBoldHeadings => BOLD_LINE.replace_all(markdown, "## ${1}"),
            Self::SpaceDocCalls => DOC_CALL.replace_all(markdown, "${1}\n\n${2}"),
            Self::CollapseLineNumberRuns => LINE_NUMBER_RUN.replace_all(markdown, "\n"),
            Self::CollapseBlankLines => BLANK_RUN.replace_all(markdown, "\n\n"),
        };
        rewritten.into_owned()
    }
}

/// Runs `steps` in order
pub fn apply_all(markdown: &str, steps: &[CleanupStep]) -> String {
    steps.iter().fold(markdown.to_string(), |text, step| {
        let next = step.apply(&text);
        if next != text {
            tracing::trace!("Cleanup step {} rewrote the document", step.name());
        }
        next
    })
}
