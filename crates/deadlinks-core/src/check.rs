use std::time::Duration;

use crate::annotate::{self, Annotation};
use crate::error::AppError;
use crate::options::{CheckOptions, Settings};
use crate::outcome::{Availability, Outcome, ProbeResult, Success};
use crate::traits::{MarkupEditor, OutcomeStore, Probe};

/// Orchestrates one document pass: enumerate anchors, classify each target,
/// annotate the flagged ones, re-serialize.
///
/// Generic over all external dependencies via traits, enabling dependency
/// injection and testability without real HTTP or a real database.
pub struct CheckService<P, M, S>
where
    P: Probe,
    M: MarkupEditor,
    S: OutcomeStore,
{
    probe: P,
    editor: M,
    store: Option<S>,
}

impl<P, M, S> CheckService<P, M, S>
where
    P: Probe,
    M: MarkupEditor,
    S: OutcomeStore,
{
    /// Create a new CheckService without outcome persistence.
    pub fn new(probe: P, editor: M) -> Self {
        Self {
            probe,
            editor,
            store: None,
        }
    }

    /// Create a new CheckService with a persistent outcome store.
    pub fn with_store(probe: P, editor: M, store: S) -> Self {
        Self {
            probe,
            editor,
            store: Some(store),
        }
    }

    /// Classify one URL: a stored outcome is returned unchanged (no
    /// staleness check); otherwise a single GET determines the outcome,
    /// which is persisted when a store is wired.
    pub async fn classify(&self, url: &str, opts: &CheckOptions) -> Result<Outcome, AppError> {
        if let Some(store) = &self.store {
            if let Some(cached) = store.load(url).await? {
                tracing::debug!(%url, "Cached outcome");
                return Ok(cached);
            }
        }

        let timeout = Duration::from_millis(opts.timeout_duration_ms);
        let result = self.probe.probe(url, timeout).await;
        if let ProbeResult::Failed(reason) = &result {
            tracing::debug!(%url, %reason, "Transport failure");
        }
        let outcome = Outcome::from(result);

        if let Some(store) = &self.store {
            store.store(url, &outcome).await?;
        }

        Ok(outcome)
    }

    /// Run one full pass over a rendered document and return the rewritten
    /// markup.
    ///
    /// Anchors are processed strictly in document order; the check for one
    /// anchor completes before the next is considered. A transport failure
    /// only affects that anchor's annotation; a store failure aborts the
    /// pass.
    pub async fn process(&self, html: &str, settings: &Settings) -> Result<String, AppError> {
        if html.is_empty() {
            return Ok(String::new());
        }
        if !settings.deadlink_validation {
            tracing::debug!("Configured not to validate links");
            return Ok(html.to_string());
        }

        let opts = &settings.opts;
        if let Some(store) = &self.store {
            store.initialize().await?;
        }

        let links = self.editor.links(html)?;
        let mut annotations: Vec<Option<Annotation>> = Vec::with_capacity(links.len());

        for href in &links {
            if !href.starts_with("http")
                || (!settings.site_url.is_empty() && href.starts_with(&settings.site_url))
            {
                annotations.push(None);
                continue;
            }

            let outcome = self.classify(href, opts).await?;
            tracing::debug!(%href, ?outcome, "Checked link");

            if outcome.availability != Availability::Reachable {
                // A timeout (success unknown) always flags; any other
                // transport failure flags only under timeout_is_error.
                if opts.timeout_is_error || outcome.success == Success::Unknown {
                    annotations.push(Some(annotate::connection_error(href, opts)));
                } else {
                    annotations.push(None);
                }
                continue;
            }

            match outcome.code {
                Some(code) if outcome.success != Success::Ok => {
                    annotations.push(Some(annotate::access_error(href, code, opts)));
                }
                _ => annotations.push(None),
            }
        }

        self.editor.annotate(html, &annotations)
    }
}
