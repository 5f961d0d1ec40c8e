// self
use crate::{
	_prelude::*,
	config::{ClientConfig, Endpoints, normalize_path},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Raw base URL; parsed and normalized by [`ClientConfigBuilder::build`].
	pub base_url: String,
	/// Endpoint paths.
	pub endpoints: Endpoints,
	/// Client-side login entry point.
	pub login_route: String,
	/// Timeout for ordinary requests.
	pub request_timeout: Option<Duration>,
	/// Timeout for the refresh call.
	pub refresh_timeout: Option<Duration>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided base URL and default endpoints.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			endpoints: Endpoints::default(),
			login_route: "/login".into(),
			request_timeout: None,
			refresh_timeout: None,
		}
	}

	/// Overrides the credential-issuing endpoint path.
	pub fn login_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.login = path.into();

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.refresh = path.into();

		self
	}

	/// Overrides the registration endpoint path.
	pub fn register_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.register = path.into();

		self
	}

	/// Overrides the current-user endpoint path.
	pub fn me_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.me = path.into();

		self
	}

	/// Overrides the client-side login route (defaults to `/login`).
	pub fn login_route(mut self, route: impl Into<String>) -> Self {
		self.login_route = route.into();

		self
	}

	/// Applies a timeout to ordinary requests.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Applies a timeout to the refresh call.
	pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
		self.refresh_timeout = Some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let raw = self.base_url.trim();
		let mut base_url = Url::parse(raw)
			.map_err(|source| ConfigError::InvalidBaseUrl { url: raw.into(), source })?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { scheme: base_url.scheme().into() });
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		base_url.set_query(None);
		base_url.set_fragment(None);

		let endpoints = Endpoints {
			login: validate_endpoint("login", self.endpoints.login)?,
			refresh: validate_endpoint("refresh", self.endpoints.refresh)?,
			register: validate_endpoint("register", self.endpoints.register)?,
			me: validate_endpoint("me", self.endpoints.me)?,
		};

		if !self.login_route.starts_with('/') {
			return Err(ConfigError::InvalidLoginRoute { route: self.login_route });
		}

		Ok(ClientConfig {
			base_url,
			endpoints,
			login_route: self.login_route,
			request_timeout: self.request_timeout,
			refresh_timeout: self.refresh_timeout,
		})
	}
}

fn validate_endpoint(name: &'static str, path: String) -> Result<String, ConfigError> {
	let normalized = normalize_path(path.trim());

	if normalized.is_empty() {
		Err(ConfigError::EmptyEndpoint { endpoint: name })
	} else {
		Ok(normalized.to_owned())
	}
}
