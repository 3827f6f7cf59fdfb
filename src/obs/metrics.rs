// self
use crate::{
	client::RecoveryOutcome,
	obs::{FlowKind, FlowOutcome},
};

/// Increments `travel_booking_flow_total{flow, outcome}` (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"travel_booking_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Increments `travel_booking_recovery_total{outcome}` once per finished recovery cycle.
pub fn record_recovery(outcome: RecoveryOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("travel_booking_recovery_total", "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Increments `travel_booking_login_redirect_total` each time a user is sent to login.
pub fn record_login_redirect() {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("travel_booking_login_redirect_total").increment(1);
	}
}
