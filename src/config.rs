//! Client configuration: backend base URL, credential endpoint paths, and timeouts.
//!
//! [`ClientConfig`] values are immutable once built; use [`ClientConfig::builder`] (or
//! [`ClientConfig::from_env`]) so every path and URL is validated up front.

/// Builder API for assembling client configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "LMS_API_BASE_URL";
/// Base URL used when nothing else is configured (local development backend).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";

/// Backend paths, relative to the base URL, that the client treats specially.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// Credential-issuing endpoint (`POST {username, password}` -> `{access, refresh}`).
	pub login: String,
	/// Refresh endpoint (`POST {refresh}` -> `{access}`).
	pub refresh: String,
	/// Account registration endpoint.
	pub register: String,
	/// Current-user endpoint.
	pub me: String,
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			login: "accounts/login/".into(),
			refresh: "token/refresh/".into(),
			register: "accounts/register/".into(),
			me: "accounts/me/".into(),
		}
	}
}

/// Immutable client configuration consumed by the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API root; always ends with `/` so relative paths join beneath it.
	pub base_url: Url,
	/// Endpoint paths.
	pub endpoints: Endpoints,
	/// Client-side login entry point used when a session is terminated.
	pub login_route: String,
	/// Timeout applied to ordinary requests, if any.
	pub request_timeout: Option<Duration>,
	/// Timeout applied to the refresh call, if any.
	pub refresh_timeout: Option<Duration>,
}
impl ClientConfig {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Builds a configuration from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let base = std::env::var(BASE_URL_ENV)
			.ok()
			.filter(|v| !v.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_BASE_URL.into());

		Self::builder(base).build()
	}

	/// Resolves a relative request path against the base URL.
	pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(normalize_path(path))
			.map_err(|source| ConfigError::InvalidPath { path: path.into(), source })
	}

	/// Whether `path` targets the credential-issuing endpoint.
	pub fn is_login_endpoint(&self, path: &str) -> bool {
		targets(path, &self.endpoints.login)
	}

	/// Whether `path` targets the refresh endpoint.
	pub fn is_refresh_endpoint(&self, path: &str) -> bool {
		targets(path, &self.endpoints.refresh)
	}
}

/// Strips leading slashes so the path joins beneath the base URL instead of replacing it.
pub(crate) fn normalize_path(path: &str) -> &str {
	path.trim_start_matches('/')
}

fn targets(path: &str, endpoint: &str) -> bool {
	let path = path.split(['?', '#']).next().unwrap_or_default();

	normalize_path(path).ends_with(normalize_path(endpoint))
}
