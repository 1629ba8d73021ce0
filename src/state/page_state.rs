/// Page outcome definitions for tracking crawl progress
///
/// This module defines every way the processing of a single page can end.
use std::fmt;

/// Reason a dequeued or listed page ended where it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    // ===== Success States =====
    /// Page was extracted and its output file written
    Written,

    /// Diff mode found identical output on disk; the file was left alone
    Unchanged,

    // ===== Skip States =====
    /// URL was already visited during this seed's crawl
    AlreadyVisited,

    /// robots.txt disallows the URL
    RobotsDenied,

    /// URL failed the include or exclude pattern
    FilteredOut,

    /// Same raw HTML was already written under another URL
    DuplicateContent,

    // ===== Error States =====
    /// Network failure (connection, timeout, body read)
    FetchFailed,

    /// Final response status was not 200
    HttpError,

    /// Content-Type does not mention html
    NotHtml,

    /// Output file could not be written
    WriteFailed,
}

impl PageOutcome {
    /// All outcomes, in reporting order
    pub const ALL: [PageOutcome; 10] = [
        Self::Written,
        Self::Unchanged,
        Self::AlreadyVisited,
        Self::RobotsDenied,
        Self::FilteredOut,
        Self::DuplicateContent,
        Self::FetchFailed,
        Self::HttpError,
        Self::NotHtml,
        Self::WriteFailed,
    ];

    /// Returns true if the page reached the write step successfully
    ///
    /// These are the pages that count against the page budget.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Written | Self::Unchanged)
    }

    /// Returns true if a network request was made for this page
    pub fn made_request(&self) -> bool {
        !matches!(
            self,
            Self::AlreadyVisited | Self::RobotsDenied | Self::FilteredOut
        )
    }

    /// Stable snake_case name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Unchanged => "unchanged",
            Self::AlreadyVisited => "already_visited",
            Self::RobotsDenied => "robots_denied",
            Self::FilteredOut => "filtered_out",
            Self::DuplicateContent => "duplicate_content",
            Self::FetchFailed => "fetch_failed",
            Self::HttpError => "http_error",
            Self::NotHtml => "not_html",
            Self::WriteFailed => "write_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
