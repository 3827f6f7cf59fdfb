//! Crate-level error types shared by the request pipeline, session, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Identity provider failed to issue a token outside the refresh path.
	#[error(transparent)]
	Identity(#[from] crate::auth::IdentityError),

	/// The API rejected the credential and no fresh one could be obtained.
	#[error("Authorization expired: {reason}.")]
	AuthorizationExpired {
		/// Why the refresh protocol gave up.
		reason: String,
	},
	/// The API answered with a non-success status.
	#[error("API responded with HTTP {status}.")]
	Upstream {
		/// HTTP status code.
		status: u16,
		/// Raw response body, lossily decoded as UTF-8.
		body: String,
	},
	/// A request body could not be serialized as JSON.
	#[error("Request body could not be encoded as JSON.")]
	Encode {
		/// Serializer failure.
		#[source]
		source: serde_json::Error,
	},
	/// The API returned a body that does not match the expected shape.
	#[error("API returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl Error {
	/// Returns `true` if the error should send the user back to the login surface.
	pub fn is_authorization_expired(&self) -> bool {
		matches!(self, Self::AuthorizationExpired { .. })
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be used as a join root.
	#[error("Base URL `{url}` cannot carry relative API paths.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Request path cannot be joined onto the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path resolves outside the base URL's origin or path.
	#[error("Request path `{path}` escapes the API base URL.")]
	PathOutsideBase {
		/// Offending path.
		path: String,
	},
	/// Login path must be an absolute in-app path.
	#[error("Login path `{path}` must start with `/`.")]
	InvalidLoginPath {
		/// Offending path.
		path: String,
	},
	/// Timeout must be positive and representable by the transport.
	#[error("Request timeout must be positive.")]
	InvalidTimeout,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within the configured timeout.
	#[error("Request to the API timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
