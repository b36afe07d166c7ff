use std::future::Future;
use std::time::Duration;

use crate::annotate::Annotation;
use crate::error::AppError;
use crate::outcome::{Outcome, ProbeResult};

/// Issues a single GET against a URL with a wall-clock timeout.
///
/// Transport failures are reported as a [`ProbeResult`], never as an error:
/// one unreachable target must not abort a document pass.
pub trait Probe: Send + Sync + Clone {
    fn probe(&self, url: &str, timeout: Duration) -> impl Future<Output = ProbeResult> + Send;
}

/// Persists and retrieves per-URL check outcomes.
pub trait OutcomeStore: Send + Sync + Clone {
    /// Ensure the backing table exists. Idempotent — safe to call on every
    /// document pass.
    fn initialize(&self) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Stored outcome for a URL, if any. Absence is distinct from a stored
    /// unknown outcome.
    fn load(&self, url: &str) -> impl Future<Output = Result<Option<Outcome>, AppError>> + Send;

    /// Upsert the outcome for a URL. Last write wins.
    fn store(
        &self,
        url: &str,
        outcome: &Outcome,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Enumerates candidate link elements in a document and applies annotations
/// to them.
///
/// Candidates are `<a>` and `<object>` elements carrying an `href`
/// attribute. Both methods walk them in document order, so the slice passed
/// to `annotate` lines up index-for-index with the hrefs returned by
/// `links`.
pub trait MarkupEditor: Send + Sync + Clone {
    /// Hrefs of every candidate element, in document order.
    fn links(&self, html: &str) -> Result<Vec<String>, AppError>;

    /// Apply one optional annotation per candidate element and return the
    /// re-serialized markup. `None` leaves the element untouched.
    fn annotate(
        &self,
        html: &str,
        annotations: &[Option<Annotation>],
    ) -> Result<String, AppError>;
}

/// A no-op OutcomeStore for use when caching is disabled.
#[derive(Debug, Clone)]
pub struct NullStore;

impl OutcomeStore for NullStore {
    async fn initialize(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn load(&self, _url: &str) -> Result<Option<Outcome>, AppError> {
        Ok(None)
    }

    async fn store(&self, _url: &str, _outcome: &Outcome) -> Result<(), AppError> {
        Ok(())
    }
}
