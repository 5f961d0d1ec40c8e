// self
use crate::obs::{OpKind, OpOutcome};

#[cfg(test)]
thread_local! {
	static RECORDED: std::cell::RefCell<Vec<(OpKind, OpOutcome)>> =
		const { std::cell::RefCell::new(Vec::new()) };
}

/// Drains the outcomes recorded on the current thread.
#[cfg(test)]
pub(crate) fn take_recorded_outcomes() -> Vec<(OpKind, OpOutcome)> {
	RECORDED.with_borrow_mut(std::mem::take)
}

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(test)]
	RECORDED.with_borrow_mut(|recorded| recorded.push((kind, outcome)));

	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"lms_client_op_total",
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

/// Records a forced session termination (when enabled).
pub fn record_session_terminated() {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("lms_client_session_terminated_total").increment(1);
	}
}
