pub mod annotate;
pub mod check;
pub mod error;
pub mod options;
pub mod outcome;
pub mod testutil;
pub mod traits;

pub use check::CheckService;
pub use error::AppError;
pub use options::{CheckOptions, Settings};
pub use outcome::{Availability, Outcome, ProbeResult, Success};
pub use traits::{MarkupEditor, NullStore, OutcomeStore, Probe};
