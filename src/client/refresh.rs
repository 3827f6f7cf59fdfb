//! Credential recovery after the API rejects a bearer token.
//!
//! Recovery runs under the client's refresh guard. Once inside, it snapshots the session's
//! principal (waiting for the first resolution if needed), reuses a credential another caller
//! already rotated, or asks the principal for a forced-fresh token. Any dead end clears the
//! cached credential, routes the user to the login surface, and yields
//! [`Error::AuthorizationExpired`].

// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	client::{ApiClient, RecoveryOutcome},
	http::ApiHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Produces a credential to replace `rejected`, or signs the user out.
	pub(crate) async fn recover_credential(&self, rejected: Option<&str>) -> Result<BearerToken> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "recover_credential");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let (outcome, result) = span
			.instrument(async move {
				let _singleflight = self.refresh_guard.lock().await;
				let Some(principal) = self.session.resolved_principal().await else {
					return self
						.expire(RecoveryOutcome::ExpiredSignedOut, "no principal is signed in")
						.await;
				};

				// Another caller may have rotated the credential while this one waited.
				if let Ok(Some(current)) = self.session.cached_token().await {
					if Some(current.expose()) != rejected {
						return (RecoveryOutcome::Reused, Ok(current));
					}
				}

				match principal.token(true).await {
					Ok(token) => {
						if self.session.store_token(&token).await.is_err() {
							obs::record_warning(
								KIND,
								"refreshed credential could not be persisted",
							);
						}

						(RecoveryOutcome::Refreshed, Ok(token))
					},
					Err(err) => {
						let reason = format!("token refresh failed: {err}");

						self.expire(RecoveryOutcome::ExpiredRefreshFailed, reason).await
					},
				}
			})
			.await;

		self.refresh_metrics.record(outcome);
		obs::record_recovery(outcome);
		obs::record_flow_outcome(
			KIND,
			if outcome.is_recovered() { FlowOutcome::Success } else { FlowOutcome::Failure },
		);

		result
	}

	async fn expire(
		&self,
		outcome: RecoveryOutcome,
		reason: impl Into<String>,
	) -> (RecoveryOutcome, Result<BearerToken>) {
		obs::record_warning(FlowKind::Refresh, "authorization expired, redirecting to login");

		if self.session.clear_token().await.is_err() {
			obs::record_warning(FlowKind::Refresh, "stale credential could not be cleared");
		}

		self.navigator.redirect_to(&self.config.login_path);
		obs::record_login_redirect();

		(outcome, Err(Error::AuthorizationExpired { reason: reason.into() }))
	}
}
