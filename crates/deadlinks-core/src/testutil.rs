//! Test utilities: mock implementations of the capability traits.
//!
//! Handwritten mocks for dependency injection in unit tests. All mocks use
//! `Arc<Mutex<_>>` for interior mutability, allowing test assertions on
//! recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::annotate::Annotation;
use crate::error::AppError;
use crate::outcome::{Outcome, ProbeResult};
use crate::traits::{MarkupEditor, OutcomeStore, Probe};

// ---------------------------------------------------------------------------
// MockProbe
// ---------------------------------------------------------------------------

/// Mock probe that returns queued results and records the URLs it was asked
/// to check.
#[derive(Clone)]
pub struct MockProbe {
    /// Queue of results. Each call pops the first element; when empty, a
    /// 200 response is returned.
    results: Arc<Mutex<Vec<ProbeResult>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockProbe {
    pub fn new(result: ProbeResult) -> Self {
        Self::with_results(vec![result])
    }

    pub fn with_results(results: Vec<ProbeResult>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Probe for MockProbe {
    async fn probe(&self, url: &str, _timeout: Duration) -> ProbeResult {
        self.calls.lock().unwrap().push(url.to_string());
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            ProbeResult::Response(200)
        } else {
            results.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// Mock outcome store backed by an in-memory map, with error injection.
#[derive(Clone)]
pub struct MockStore {
    entries: Arc<Mutex<HashMap<String, Outcome>>>,
    /// Every write, in order.
    pub stored: Arc<Mutex<Vec<(String, Outcome)>>>,
    /// Returned (once) by the next store call, whichever method it is.
    error: Arc<Mutex<Option<AppError>>>,
}

impl MockStore {
    /// Empty store — every URL is a cache miss.
    pub fn empty() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            stored: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
        }
    }

    /// Store pre-seeded with one cached outcome.
    pub fn with_entry(url: &str, outcome: Outcome) -> Self {
        let store = Self::empty();
        store
            .entries
            .lock()
            .unwrap()
            .insert(url.to_string(), outcome);
        store
    }

    /// Store whose next call fails.
    pub fn with_error(error: AppError) -> Self {
        let store = Self::empty();
        *store.error.lock().unwrap() = Some(error);
        store
    }

    fn take_error(&self) -> Result<(), AppError> {
        match self.error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl OutcomeStore for MockStore {
    async fn initialize(&self) -> Result<(), AppError> {
        self.take_error()
    }

    async fn load(&self, url: &str) -> Result<Option<Outcome>, AppError> {
        self.take_error()?;
        Ok(self.entries.lock().unwrap().get(url).copied())
    }

    async fn store(&self, url: &str, outcome: &Outcome) -> Result<(), AppError> {
        self.take_error()?;
        self.entries
            .lock()
            .unwrap()
            .insert(url.to_string(), *outcome);
        self.stored
            .lock()
            .unwrap()
            .push((url.to_string(), *outcome));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockEditor
// ---------------------------------------------------------------------------

/// Mock markup editor with a configured candidate list; records the
/// annotation slices it is asked to apply and passes markup through.
#[derive(Clone)]
pub struct MockEditor {
    links: Arc<Mutex<Vec<String>>>,
    pub annotated: Arc<Mutex<Vec<Vec<Option<Annotation>>>>>,
}

impl MockEditor {
    pub fn with_links(links: &[&str]) -> Self {
        Self {
            links: Arc::new(Mutex::new(
                links.iter().map(|s| s.to_string()).collect(),
            )),
            annotated: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The annotation slice from the most recent `annotate` call.
    pub fn last_annotations(&self) -> Vec<Option<Annotation>> {
        self.annotated
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

impl MarkupEditor for MockEditor {
    fn links(&self, _html: &str) -> Result<Vec<String>, AppError> {
        Ok(self.links.lock().unwrap().clone())
    }

    fn annotate(
        &self,
        html: &str,
        annotations: &[Option<Annotation>],
    ) -> Result<String, AppError> {
        self.annotated.lock().unwrap().push(annotations.to_vec());
        Ok(html.to_string())
    }
}
