use serde::{Deserialize, Serialize};

/// Whether an HTTP response was obtained at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Reachable,
    Unreachable,
    /// Transport failed for a reason other than timeout.
    Unknown,
}

/// Whether the obtained response (if any) was the canonical 200 OK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Success {
    Ok,
    NotOk,
    /// The request timed out before any response arrived.
    Unknown,
}

/// The (availability, success, status code) triple computed for one URL at
/// one point in time.
///
/// `code` is present if and only if `availability` is `Reachable`; the
/// constructors enforce this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub availability: Availability,
    pub success: Success,
    pub code: Option<u16>,
}

impl Outcome {
    /// A response arrived with the given status code.
    pub fn from_status(code: u16) -> Self {
        Self {
            availability: Availability::Reachable,
            success: if code == 200 {
                Success::Ok
            } else {
                Success::NotOk
            },
            code: Some(code),
        }
    }

    /// The request hit the timeout budget before any response arrived.
    pub fn timed_out() -> Self {
        Self {
            availability: Availability::Unreachable,
            success: Success::Unknown,
            code: None,
        }
    }

    /// Transport failed for a reason other than timeout (DNS failure,
    /// refused connection, TLS error, malformed URL).
    pub fn transport_failed() -> Self {
        Self {
            availability: Availability::Unknown,
            success: Success::NotOk,
            code: None,
        }
    }
}

/// Raw result of a single GET attempt, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// A response arrived with this status code.
    Response(u16),
    /// The request hit the timeout budget.
    TimedOut,
    /// Any other transport failure, with a human-readable reason.
    Failed(String),
}

impl From<ProbeResult> for Outcome {
    fn from(result: ProbeResult) -> Self {
        match result {
            ProbeResult::Response(code) => Outcome::from_status(code),
            ProbeResult::TimedOut => Outcome::timed_out(),
            ProbeResult::Failed(_) => Outcome::transport_failed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_ok() {
        let outcome = Outcome::from_status(200);
        assert_eq!(outcome.availability, Availability::Reachable);
        assert_eq!(outcome.success, Success::Ok);
        assert_eq!(outcome.code, Some(200));
    }

    #[test]
    fn test_from_status_not_ok() {
        let outcome = Outcome::from_status(404);
        assert_eq!(outcome.availability, Availability::Reachable);
        assert_eq!(outcome.success, Success::NotOk);
        assert_eq!(outcome.code, Some(404));
    }

    #[test]
    fn test_code_present_iff_reachable() {
        assert!(Outcome::from_status(301).code.is_some());
        assert!(Outcome::timed_out().code.is_none());
        assert!(Outcome::transport_failed().code.is_none());
    }

    #[test]
    fn test_timeout_maps_to_unreachable_unknown() {
        let outcome = Outcome::from(ProbeResult::TimedOut);
        assert_eq!(outcome.availability, Availability::Unreachable);
        assert_eq!(outcome.success, Success::Unknown);
    }

    #[test]
    fn test_transport_failure_maps_to_unknown_not_ok() {
        let outcome = Outcome::from(ProbeResult::Failed("dns error".into()));
        assert_eq!(outcome.availability, Availability::Unknown);
        assert_eq!(outcome.success, Success::NotOk);
    }
}
