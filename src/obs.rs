//! Optional observability helpers for admission and submission calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `crpt_api.op` with the `op` (operation) and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `crpt_api_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`, and to record how long admitted
//!   callers waited in the `crpt_api_admission_wait_seconds` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Passing the rate limiter.
	Admission,
	/// Obtaining a bearer token.
	Auth,
	/// Sending a document to the document API.
	Submit,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Admission => "admission",
			OpKind::Auth => "auth",
			OpKind::Submit => "submit",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a client helper.
	Attempt,
	/// The caller had to join the admission queue.
	Queued,
	/// The caller stopped waiting before it was admitted.
	Abandoned,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Queued => "queued",
			OpOutcome::Abandoned => "abandoned",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
