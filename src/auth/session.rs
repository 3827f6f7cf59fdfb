//! Owned sign-in session: current principal, first-resolution signal, and cached credential.
//!
//! A [`Session`] replaces a process-wide "current user" global. The application creates one at
//! startup, bridges its identity provider's state-change stream into
//! [`Session::on_state_change`], and shares the session (behind `Arc`) with every
//! [`ApiClient`](crate::client::ApiClient) that needs credentials. Until the provider reports
//! its first state, callers that need to know whether anyone is signed in suspend on
//! [`Session::resolved_principal`] instead of assuming a signed-out user.

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Principal},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::CredentialStore,
};

/// Storage key used for the cached bearer credential unless overridden.
pub const DEFAULT_CREDENTIAL_KEY: &str = "token";

/// Observable lifecycle of a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
	/// The identity provider has not reported any state yet.
	Uninitialized,
	/// A principal is signed in.
	Authenticated,
	/// The provider reported that nobody is signed in.
	Unauthenticated,
}
impl AuthState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthState::Uninitialized => "uninitialized",
			AuthState::Authenticated => "authenticated",
			AuthState::Unauthenticated => "unauthenticated",
		}
	}
}
impl Display for AuthState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Sign-in session shared by request pipelines.
pub struct Session {
	identity: RwLock<Option<Arc<dyn Principal>>>,
	ready: OnceCell<()>,
	store: Arc<dyn CredentialStore>,
	credential_key: String,
}
impl Session {
	/// Creates an unresolved session persisting credentials in `store`.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self {
			identity: RwLock::new(None),
			ready: OnceCell::new(),
			store,
			credential_key: DEFAULT_CREDENTIAL_KEY.into(),
		}
	}

	/// Overrides the storage key used for the cached credential.
	pub fn with_credential_key(mut self, key: impl Into<String>) -> Self {
		self.credential_key = key.into();

		self
	}

	/// Storage key holding the cached credential.
	pub fn credential_key(&self) -> &str {
		&self.credential_key
	}

	/// Credential store backing this session.
	pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
		&self.store
	}

	/// Returns the current lifecycle state without waiting.
	pub fn state(&self) -> AuthState {
		if !self.ready.is_initialized() {
			return AuthState::Uninitialized;
		}

		match self.identity.read().as_ref() {
			Some(_) => AuthState::Authenticated,
			None => AuthState::Unauthenticated,
		}
	}

	/// Returns `true` once the identity provider has reported at least one state.
	pub fn is_ready(&self) -> bool {
		self.ready.is_initialized()
	}

	/// Suspends until the identity provider has reported its first state.
	pub async fn wait_until_ready(&self) {
		self.ready.wait().await;
	}

	/// Waits for the first resolution, then snapshots the current principal.
	pub async fn resolved_principal(&self) -> Option<Arc<dyn Principal>> {
		self.wait_until_ready().await;

		self.identity.read().clone()
	}

	/// Applies an identity-provider notification (sign-in, sign-out, or token rotation).
	///
	/// A signed-in principal has its current credential written to the store; a sign-out clears
	/// it. The first call resolves the session regardless of outcome, so waiters never hang on a
	/// provider whose token fetch failed. A failed fetch clears the cached credential and is
	/// returned to the notifier.
	pub async fn on_state_change(&self, principal: Option<Arc<dyn Principal>>) -> Result<()> {
		const KIND: FlowKind = FlowKind::StateChange;

		let span = FlowSpan::new(KIND, "on_state_change");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				*self.identity.write() = principal.clone();

				let outcome = match principal {
					Some(principal) => self.persist_current_token(principal).await,
					None => self.clear_token().await,
				};

				self.mark_ready().await;

				outcome
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Tears the session down as if the provider had reported a sign-out.
	pub async fn sign_out(&self) -> Result<()> {
		self.on_state_change(None).await
	}

	/// Reads the cached credential, if any.
	pub async fn cached_token(&self) -> Result<Option<BearerToken>> {
		let value = self.store.get(&self.credential_key).await?;

		Ok(value.map(BearerToken::new))
	}

	/// Writes `token` into the credential store.
	pub async fn store_token(&self, token: &BearerToken) -> Result<()> {
		self.store.set(&self.credential_key, token.expose().to_owned()).await?;

		Ok(())
	}

	/// Removes the cached credential.
	pub async fn clear_token(&self) -> Result<()> {
		self.store.remove(&self.credential_key).await?;

		Ok(())
	}

	async fn persist_current_token(&self, principal: Arc<dyn Principal>) -> Result<()> {
		match principal.token(false).await {
			// A newer notification may have replaced this principal while the token was in flight.
			Ok(token) if self.is_current(&principal) => self.store_token(&token).await,
			Ok(_) => Ok(()),
			Err(err) => {
				obs::record_warning(FlowKind::StateChange, "token fetch after sign-in failed");

				if self.is_current(&principal) {
					self.clear_token().await?;
				}

				Err(err.into())
			},
		}
	}

	fn is_current(&self, principal: &Arc<dyn Principal>) -> bool {
		self.identity.read().as_ref().is_some_and(|current| Arc::ptr_eq(current, principal))
	}

	async fn mark_ready(&self) {
		// Later notifications find the cell already set.
		let _ = self.ready.set(()).await;
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("state", &self.state())
			.field("credential_key", &self.credential_key)
			.finish()
	}
}
