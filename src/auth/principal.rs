//! Contracts for the external identity provider's signed-in principal.

// self
use crate::{_prelude::*, auth::BearerToken, id::PrincipalId};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`Principal::token`].
pub type PrincipalFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, IdentityError>> + 'a + Send>>;

/// A signed-in principal owned by the identity provider.
///
/// The crate never mints credentials itself. It asks the principal for one, either from the
/// provider's cache (`force_refresh = false`) or freshly issued (`force_refresh = true`).
pub trait Principal
where
	Self: Send + Sync,
{
	/// Opaque identifier assigned by the identity provider.
	fn id(&self) -> &PrincipalId;

	/// Requests a bearer credential for this principal.
	fn token(&self, force_refresh: bool) -> PrincipalFuture<'_, BearerToken>;
}
impl Debug for dyn Principal {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Principal").field(self.id()).finish()
	}
}

/// Failures reported by the identity provider.
#[derive(Debug, ThisError)]
pub enum IdentityError {
	/// The provider refused to issue a credential (revoked session, disabled account).
	#[error("Identity provider refused to issue a token: {reason}.")]
	Rejected {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// The provider could not be reached.
	#[error("Identity provider is unavailable.")]
	Unavailable {
		/// Provider-specific failure.
		#[source]
		source: BoxError,
	},
}
impl IdentityError {
	/// Wraps a provider-specific connectivity failure.
	pub fn unavailable(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Unavailable { source: Box::new(src) }
	}
}
