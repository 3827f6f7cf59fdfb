//! Authenticated request pipeline with one-shot credential recovery.
//!
//! [`ApiClient::send`] attaches the cached bearer credential, dispatches the request, and on
//! `401` runs a single recovery cycle: wait for the session's first resolution, ask the
//! signed-in principal for a forced-fresh token, persist it, and replay a clone of the request
//! exactly once. Every other status, and every transport failure, reaches the caller untouched.

mod metrics;
mod refresh;

pub use metrics::{RecoveryOutcome, RefreshMetrics};

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::Session,
	config::ClientConfig,
	http::{ApiHttpClient, ApiRequest, ApiResponse},
	navigation::Navigator,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Dispatch position within a single [`ApiClient::send`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
	/// First dispatch with whatever credential was cached.
	Initial,
	/// The only replay, carrying a recovered credential.
	Retry,
}

/// Bearer-authenticated client for the booking API.
///
/// Clones share the transport, session, navigator, metrics, and the refresh guard, so
/// concurrent `401`s on clones of one client run at most one identity-provider refresh at a
/// time.
pub struct ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for every dispatch.
	pub http_client: Arc<C>,
	/// Session providing the cached credential and the signed-in principal.
	pub session: Arc<Session>,
	/// Navigation surface used when authorization cannot be recovered.
	pub navigator: Arc<dyn Navigator>,
	/// Validated pipeline settings.
	pub config: ClientConfig,
	/// Shared counters for recovery outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		session: Arc<Session>,
		navigator: Arc<dyn Navigator>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			session,
			navigator,
			config,
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Sends `request`, recovering once from a rejected credential.
	///
	/// Returns the response for any status other than `401`, unchanged. After a `401` the
	/// outcome of the single replay is final, including a second `401`.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Send;

		let span = FlowSpan::new(KIND, "send");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.dispatch(request)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Sends `request`, requires a 2xx status, and decodes the JSON body.
	pub async fn send_json<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.send(request).await?.error_for_status()?.json()
	}

	/// Shorthand for [`ApiClient::send_json`] with a `GET` request.
	pub async fn get_json<T>(&self, path: impl Into<String>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.send_json(ApiRequest::get(path)).await
	}

	/// Shorthand for [`ApiClient::send_json`] with a `POST` request carrying `body` as JSON.
	pub async fn post_json<B, T>(&self, path: impl Into<String>, body: &B) -> Result<T>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		let body = serde_json::to_value(body).map_err(|source| Error::Encode { source })?;

		self.send_json(ApiRequest::post(path).with_body(body)).await
	}

	async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
		let url = self.config.resolve(&request)?;
		let mut outbound = match self.session.cached_token().await {
			Ok(Some(token)) => request.clone().with_bearer(&token),
			Ok(None) => request.clone(),
			Err(_) => {
				obs::record_warning(
					FlowKind::Send,
					"credential store unreadable, sending anonymously",
				);

				request.clone()
			},
		};
		let mut attempt = Attempt::Initial;

		loop {
			let response = self.http_client.execute(url.clone(), &outbound).await?;

			if !response.is_unauthorized() {
				return Ok(response);
			}

			match attempt {
				Attempt::Initial => {
					let token = self.recover_credential(outbound.bearer()).await?;

					outbound = request.clone().with_bearer(&token);
					attempt = Attempt::Retry;
				},
				Attempt::Retry => return Ok(response),
			}
		}
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client backed by a reqwest transport built from `config`.
	pub fn new(
		config: ClientConfig,
		session: Arc<Session>,
		navigator: Arc<dyn Navigator>,
	) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self::with_http_client(config, session, navigator, http_client))
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			session: Arc::clone(&self.session),
			navigator: Arc::clone(&self.navigator),
			config: self.config.clone(),
			refresh_metrics: Arc::clone(&self.refresh_metrics),
			refresh_guard: Arc::clone(&self.refresh_guard),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("session", &self.session)
			.finish()
	}
}
