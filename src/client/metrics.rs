// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// How a credential recovery cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecoveryOutcome {
	/// Another caller had already replaced the rejected credential; it was reused as-is.
	Reused,
	/// The principal issued a forced-fresh credential.
	Refreshed,
	/// Nobody was signed in, so the user was sent to the login surface.
	ExpiredSignedOut,
	/// The principal refused or failed to issue a credential; the user was sent to login.
	ExpiredRefreshFailed,
}
impl RecoveryOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RecoveryOutcome::Reused => "reused",
			RecoveryOutcome::Refreshed => "refreshed",
			RecoveryOutcome::ExpiredSignedOut => "expired_signed_out",
			RecoveryOutcome::ExpiredRefreshFailed => "expired_refresh_failed",
		}
	}

	/// Returns `true` when the cycle produced a credential for the replay.
	pub const fn is_recovered(self) -> bool {
		matches!(self, RecoveryOutcome::Reused | RecoveryOutcome::Refreshed)
	}
}
impl Display for RecoveryOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Per-client counters for credential recovery after a `401`.
///
/// Shared by every clone of an [`ApiClient`](crate::client::ApiClient).
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	reused: AtomicU64,
	refreshed: AtomicU64,
	expired_signed_out: AtomicU64,
	expired_refresh_failed: AtomicU64,
}
impl RefreshMetrics {
	/// Recovery cycles started.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Number of cycles that ended with `outcome`.
	pub fn count(&self, outcome: RecoveryOutcome) -> u64 {
		self.counter(outcome).load(Ordering::Relaxed)
	}

	/// Cycles that replayed the request, whether the credential was reused or refreshed.
	pub fn recovered(&self) -> u64 {
		self.count(RecoveryOutcome::Reused) + self.count(RecoveryOutcome::Refreshed)
	}

	/// Cycles that redirected to the login surface.
	pub fn expired(&self) -> u64 {
		self.count(RecoveryOutcome::ExpiredSignedOut)
			+ self.count(RecoveryOutcome::ExpiredRefreshFailed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record(&self, outcome: RecoveryOutcome) {
		self.counter(outcome).fetch_add(1, Ordering::Relaxed);
	}

	fn counter(&self, outcome: RecoveryOutcome) -> &AtomicU64 {
		match outcome {
			RecoveryOutcome::Reused => &self.reused,
			RecoveryOutcome::Refreshed => &self.refreshed,
			RecoveryOutcome::ExpiredSignedOut => &self.expired_signed_out,
			RecoveryOutcome::ExpiredRefreshFailed => &self.expired_refresh_failed,
		}
	}
}
