use std::path::PathBuf;

use serde::Deserialize;

use crate::error::AppError;

/// Per-invocation link-checking options.
///
/// Resolution is per-key: missing keys fall back to their defaults and
/// unrecognized keys are ignored, so a host can supply a partial mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    /// Rewrite flagged hrefs to a web-archive lookup URL.
    pub archive: bool,
    /// CSS classes appended to flagged anchors.
    pub classes: Vec<String>,
    /// Insert a status badge element after each flagged anchor.
    pub labels: bool,
    /// Request timeout budget, in milliseconds.
    pub timeout_duration_ms: u64,
    /// Treat a timeout like a connection error for annotation purposes.
    pub timeout_is_error: bool,
    /// Cache database path; persistence is disabled when unset.
    pub cache_file: Option<PathBuf>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            archive: true,
            classes: Vec::new(),
            labels: false,
            timeout_duration_ms: 1000,
            timeout_is_error: false,
            cache_file: None,
        }
    }
}

impl CheckOptions {
    /// Resolve options from a host-provided JSON mapping.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, AppError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

/// Host settings consumed by the document processor.
///
/// Mirrors the host's settings mapping: `DEADLINK_VALIDATION` gates the
/// whole pass, `SITEURL` marks internal links, `DEADLINK_OPTS` carries the
/// per-invocation options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master gate; nothing is checked while this is false.
    #[serde(rename = "DEADLINK_VALIDATION")]
    pub deadlink_validation: bool,
    /// The site's own base URL; links under it are never checked.
    #[serde(rename = "SITEURL")]
    pub site_url: String,
    #[serde(rename = "DEADLINK_OPTS")]
    pub opts: CheckOptions,
}

impl Settings {
    /// Resolve settings from a host-provided JSON mapping.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, AppError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Settings with validation enabled.
    pub fn enabled(site_url: impl Into<String>, opts: CheckOptions) -> Self {
        Self {
            deadlink_validation: true,
            site_url: site_url.into(),
            opts,
        }
    }
}
