// self
use crate::{
	_prelude::*,
	obs::{OpKind, OpOutcome},
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"crpt_api_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records how long an admitted caller spent queued at the rate limiter.
pub fn record_admission_wait(waited: Duration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("crpt_api_admission_wait_seconds").record(waited.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = waited;
	}
}
