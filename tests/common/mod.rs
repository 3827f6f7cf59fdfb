#![allow(dead_code)]

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use parking_lot::Mutex;
use url::Url;
// self
use travel_booking_core::{
	auth::{BearerToken, IdentityError, Principal, PrincipalFuture, Session},
	client::ApiClient,
	config::ClientConfig,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, TransportFuture},
	id::PrincipalId,
	navigation::QueuedNavigator,
	store::{CredentialStore, MemoryStore, StoreError, StoreFuture},
};

pub const BASE_URL: &str = "https://api.travel.test/v1/";

#[derive(Debug)]
pub struct FakeTimeout;
impl Display for FakeTimeout {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Deadline elapsed.")
	}
}
impl StdError for FakeTimeout {}

/// What the fake transport does for one dispatch.
pub enum Step {
	Respond(u16, &'static str),
	Timeout,
}

type Rule = Box<dyn Fn(&ApiRequest) -> Step + Send + Sync>;

/// Transport that answers from a rule and records every dispatch.
pub struct ScriptedTransport {
	rule: Rule,
	calls: Mutex<Vec<(Url, ApiRequest)>>,
}
impl ScriptedTransport {
	pub fn new(rule: impl Fn(&ApiRequest) -> Step + Send + Sync + 'static) -> Self {
		Self { rule: Box::new(rule), calls: Mutex::new(Vec::new()) }
	}

	/// Answers 200 only to requests carrying `token`, 401 otherwise.
	pub fn accepting(token: &'static str) -> Self {
		Self::new(move |request| match request.bearer() {
			Some(bearer) if bearer == token => Step::Respond(200, r#"{"ok":true}"#),
			_ => Step::Respond(401, r#"{"error":"token expired"}"#),
		})
	}

	pub fn always(status: u16, body: &'static str) -> Self {
		Self::new(move |_| Step::Respond(status, body))
	}

	pub fn calls(&self) -> Vec<(Url, ApiRequest)> {
		self.calls.lock().clone()
	}

	pub fn bearers(&self) -> Vec<Option<String>> {
		self.calls.lock().iter().map(|(_, request)| request.bearer().map(str::to_owned)).collect()
	}
}
impl ApiHttpClient for ScriptedTransport {
	fn execute<'a>(&'a self, url: Url, request: &'a ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			self.calls.lock().push((url, request.clone()));

			match (self.rule)(request) {
				Step::Respond(status, body) => Ok(ApiResponse::new(status, body)),
				Step::Timeout => Err(TransportError::timeout(FakeTimeout)),
			}
		})
	}
}

/// Principal whose cached token is fixed and whose forced refresh is scripted.
pub struct ScriptedPrincipal {
	id: PrincipalId,
	cached: &'static str,
	refreshed: Option<&'static str>,
	fetch_delay: Option<StdDuration>,
	refresh_delay: Option<StdDuration>,
	forced: AtomicUsize,
}
impl ScriptedPrincipal {
	pub fn new(cached: &'static str, refreshed: Option<&'static str>) -> Self {
		Self {
			id: PrincipalId::new("traveler-42").expect("Principal fixture should be valid."),
			cached,
			refreshed,
			fetch_delay: None,
			refresh_delay: None,
			forced: AtomicUsize::new(0),
		}
	}

	/// Delays non-forced token reads, as a provider fetching its cached token would.
	pub fn with_fetch_delay(mut self, delay: StdDuration) -> Self {
		self.fetch_delay = Some(delay);

		self
	}

	pub fn with_refresh_delay(mut self, delay: StdDuration) -> Self {
		self.refresh_delay = Some(delay);

		self
	}

	pub fn forced_refreshes(&self) -> usize {
		self.forced.load(Ordering::SeqCst)
	}
}
impl Principal for ScriptedPrincipal {
	fn id(&self) -> &PrincipalId {
		&self.id
	}

	fn token(&self, force_refresh: bool) -> PrincipalFuture<'_, BearerToken> {
		Box::pin(async move {
			if !force_refresh {
				if let Some(delay) = self.fetch_delay {
					tokio::time::sleep(delay).await;
				}

				return Ok(BearerToken::new(self.cached));
			}

			self.forced.fetch_add(1, Ordering::SeqCst);

			if let Some(delay) = self.refresh_delay {
				tokio::time::sleep(delay).await;
			}

			self.refreshed
				.map(BearerToken::new)
				.ok_or_else(|| IdentityError::Rejected { reason: "session revoked".into() })
		})
	}
}

/// Store operation that [`FlakyStore`] can be told to fail.
#[derive(Clone, Copy, Debug)]
pub enum StoreOp {
	Get,
	Set,
	Remove,
}

/// Memory-backed store whose operations can be switched to fail individually.
#[derive(Debug, Default)]
pub struct FlakyStore {
	inner: MemoryStore,
	fail_get: AtomicBool,
	fail_set: AtomicBool,
	fail_remove: AtomicBool,
}
impl FlakyStore {
	pub fn fail(&self, op: StoreOp) {
		self.flag(op).store(true, Ordering::SeqCst);
	}

	/// Reads the backing map directly, bypassing any injected failure.
	pub async fn peek(&self, key: &str) -> Option<String> {
		self.inner.get(key).await.expect("Memory store reads should succeed.")
	}

	fn flag(&self, op: StoreOp) -> &AtomicBool {
		match op {
			StoreOp::Get => &self.fail_get,
			StoreOp::Set => &self.fail_set,
			StoreOp::Remove => &self.fail_remove,
		}
	}

	fn check(&self, op: StoreOp) -> Result<(), StoreError> {
		if self.flag(op).load(Ordering::SeqCst) {
			Err(StoreError::Backend { message: format!("{op:?} unavailable") })
		} else {
			Ok(())
		}
	}
}
impl CredentialStore for FlakyStore {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
		Box::pin(async move {
			self.check(StoreOp::Get)?;
			self.inner.get(key).await
		})
	}

	fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.check(StoreOp::Set)?;
			self.inner.set(key, value).await
		})
	}

	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.check(StoreOp::Remove)?;
			self.inner.remove(key).await
		})
	}
}

pub struct Harness {
	pub client: ApiClient<ScriptedTransport>,
	pub transport: Arc<ScriptedTransport>,
	pub session: Arc<Session>,
	pub store: Arc<FlakyStore>,
	pub navigator: QueuedNavigator,
}
impl Harness {
	pub fn new(transport: ScriptedTransport) -> Self {
		let store = Arc::new(FlakyStore::default());
		let session = Arc::new(Session::new(store.clone()));
		let navigator = QueuedNavigator::default();
		let transport = Arc::new(transport);
		let client = ApiClient::<ScriptedTransport>::with_http_client(
			config(),
			session.clone(),
			Arc::new(navigator.clone()),
			transport.clone(),
		);

		Self { client, transport, session, store, navigator }
	}

	/// Resolves the session as signed in, which caches the principal's current token.
	pub async fn sign_in(&self, principal: Arc<ScriptedPrincipal>) {
		self.session
			.on_state_change(Some(principal as Arc<dyn Principal>))
			.await
			.expect("Sign-in notification should succeed.");
	}

	pub async fn sign_out(&self) {
		self.session.sign_out().await.expect("Sign-out notification should succeed.");
	}

	pub async fn stored_token(&self) -> Option<String> {
		self.store.peek("token").await
	}
}

pub fn config() -> ClientConfig {
	ClientConfig::builder(Url::parse(BASE_URL).expect("Base URL fixture should parse."))
		.build()
		.expect("Client config fixture should build.")
}
