//! The request descriptor the gateway enriches, dispatches, and (at most once) replays.

// crates.io
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Outbound call description: method, relative path, query, headers, and body.
///
/// The gateway only ever mutates the `Authorization` header and the private retried marker,
/// so a descriptor can be replayed verbatim after a credential refresh.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the configured base URL.
	pub path: String,
	/// Query string pairs, appended in order.
	pub query: Vec<(String, String)>,
	/// Request headers.
	pub headers: HeaderMap,
	/// Serialized JSON body, if any.
	pub body: Option<Vec<u8>>,
	/// Per-request timeout override.
	pub timeout: Option<Duration>,
	retried: bool,
}
impl ApiRequest {
	/// Creates a descriptor for `method` + `path` with no headers or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: HeaderMap::new(),
			body: None,
			timeout: None,
			retried: false,
		}
	}

	/// `GET path`.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// `POST path`.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// `PUT path`.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// `PATCH path`.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// `DELETE path`.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Serializes `body` as JSON and sets the matching content type.
	pub fn json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let bytes = serde_json::to_vec(body).map_err(Error::Encode)?;

		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		self.body = Some(bytes);

		Ok(self)
	}

	/// Appends a query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Sets an arbitrary header.
	pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self> {
		let value = HeaderValue::from_str(value)
			.map_err(|_| ConfigError::InvalidHeader { name: name.to_string() })?;

		self.headers.insert(name, value);

		Ok(self)
	}

	/// Overrides the timeout for this request.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Replaces the `Authorization` header with `Bearer <secret>`.
	pub fn set_bearer(&mut self, secret: &TokenSecret) -> Result<()> {
		let mut value = HeaderValue::from_str(&secret.bearer())
			.map_err(|_| ConfigError::InvalidHeader { name: AUTHORIZATION.to_string() })?;

		value.set_sensitive(true);
		self.headers.insert(AUTHORIZATION, value);

		Ok(())
	}

	/// Current `Authorization` header, if any.
	pub fn authorization(&self) -> Option<&str> {
		self.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
	}

	/// Whether the gateway has already replayed this request once.
	pub fn is_retried(&self) -> bool {
		self.retried
	}

	/// Marks the request as replayed so a second `401` is never recovered.
	pub fn mark_retried(&mut self) {
		self.retried = true;
	}
}
