//! Annotation policy for flagged anchors.
//!
//! Computes the structural mutation for one anchor as a plain value; the
//! markup editor applies it to the document.

use crate::options::CheckOptions;

/// Archive lookup prefix; the original href is appended literally, with no
/// encoding.
const ARCHIVE_URL: &str = "http://web.archive.org/web/*/";

/// Badge severity, mapped to a fixed CSS class pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Danger,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Warning => "label label-warning",
            Severity::Danger => "label label-danger",
        }
    }
}

/// A status badge inserted immediately after a flagged anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub severity: Severity,
    pub text: String,
}

impl Badge {
    /// Render the badge as a span element, with the text escaped.
    pub fn to_html(&self) -> String {
        format!(
            r#"<span class="{}">{}</span>"#,
            self.severity.css_class(),
            escape_text(&self.text)
        )
    }
}

/// The mutation to apply to one flagged anchor.
///
/// Application is cumulative: annotating the same anchor twice appends the
/// classes and badge again. That is accepted behavior, not guarded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Classes appended to the anchor's existing class attribute, in order.
    pub classes: Vec<String>,
    /// Badge inserted after the anchor, when labels are enabled.
    pub badge: Option<Badge>,
    /// Replacement href, when archive redirection is enabled.
    pub href: Option<String>,
}

/// Annotation for an anchor whose target could not be reached at all.
pub fn connection_error(href: &str, opts: &CheckOptions) -> Annotation {
    flag(
        href,
        opts,
        Badge {
            severity: Severity::Danger,
            text: "not available".to_string(),
        },
    )
}

/// Annotation for an anchor whose target answered with an error status
/// (403, 404, ...).
pub fn access_error(href: &str, code: u16, opts: &CheckOptions) -> Annotation {
    flag(
        href,
        opts,
        Badge {
            severity: Severity::Warning,
            text: code.to_string(),
        },
    )
}

fn flag(href: &str, opts: &CheckOptions, badge: Badge) -> Annotation {
    Annotation {
        classes: opts.classes.clone(),
        badge: opts.labels.then_some(badge),
        href: opts.archive.then(|| archive_url(href)),
    }
}

/// The archive lookup URL for an original href.
pub fn archive_url(href: &str) -> String {
    format!("{ARCHIVE_URL}{href}")
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
