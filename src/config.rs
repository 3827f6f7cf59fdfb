//! Validated settings for the request pipeline.

// self
use crate::{_prelude::*, error::ConfigError, http::ApiRequest};

/// Immutable pipeline configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Root every request path is resolved against; always ends with `/`.
	pub base_url: Url,
	/// Upper bound for a single dispatch; expiry surfaces as a transport timeout.
	pub timeout: Duration,
	/// In-app path the navigator is sent to when authorization cannot be recovered.
	pub login_path: String,
	/// Optional `User-Agent` applied by the built-in transport.
	pub user_agent: Option<String>,
}
impl ClientConfig {
	/// Default dispatch timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(10);
	/// Default login surface.
	pub const DEFAULT_LOGIN_PATH: &'static str = "/login";

	/// Creates a new builder rooted at `base_url`.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Resolves the absolute URL for `request`, including its query pairs.
	///
	/// Paths are always relative to [`ClientConfig::base_url`], so `/tours` under
	/// `https://api.example.com/v1/` becomes `https://api.example.com/v1/tours`. A path that
	/// carries its own scheme or host, or climbs above the base path through dot segments, is
	/// rejected before any credential can be attached to it.
	pub fn resolve(&self, request: &ApiRequest) -> Result<Url, ConfigError> {
		let relative = request.path.trim_start_matches('/');
		let mut url = self.base_url.join(relative).map_err(|source| ConfigError::InvalidPath {
			path: request.path.clone(),
			source,
		})?;

		if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
		{
			return Err(ConfigError::PathOutsideBase { path: request.path.clone() });
		}

		if !request.query.is_empty() {
			url.query_pairs_mut().extend_pairs(request.query.iter());
		}

		Ok(url)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// API root.
	pub base_url: Url,
	/// Dispatch timeout.
	pub timeout: Duration,
	/// Login surface path.
	pub login_path: String,
	/// Optional `User-Agent`.
	pub user_agent: Option<String>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with defaults.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			timeout: ClientConfig::DEFAULT_TIMEOUT,
			login_path: ClientConfig::DEFAULT_LOGIN_PATH.into(),
			user_agent: None,
		}
	}

	/// Overrides the dispatch timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the login surface path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Sets the `User-Agent` header value.
	pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
		self.user_agent = Some(agent.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if self.base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl { url: self.base_url.to_string() });
		}
		if !self.timeout.is_positive() {
			return Err(ConfigError::InvalidTimeout);
		}
		if !self.login_path.starts_with('/') {
			return Err(ConfigError::InvalidLoginPath { path: self.login_path });
		}

		let mut base_url = self.base_url;

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		Ok(ClientConfig {
			base_url,
			timeout: self.timeout,
			login_path: self.login_path,
			user_agent: self.user_agent,
		})
	}
}
