//! Client-level error types shared across the gateway, session, and typed API layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential storage failure.
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
	/// Explicit refresh attempt failed.
	#[error(transparent)]
	Refresh(#[from] RefreshFailure),
	/// Identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::lms::IdentifierError),

	/// Backend answered with a non-success status.
	#[error("Backend responded with HTTP {status}{}.", detail_suffix(.detail))]
	Api {
		/// HTTP status code.
		status: u16,
		/// `detail` message extracted from the error body, when present.
		detail: Option<String>,
		/// Raw response body.
		body: String,
	},
	/// Backend answered with a body that does not match the expected shape.
	#[error("Backend returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code the body arrived with.
		status: u16,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode(#[source] serde_json::Error),
	/// Quiz submission skipped questions.
	#[error("Quiz submission answers {answered} of {expected} questions.")]
	IncompleteSubmission {
		/// Number of questions answered.
		answered: usize,
		/// Number of questions in the quiz.
		expected: usize,
	},
}
impl Error {
	/// HTTP status attached to the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } | Self::Decode { status, .. } => Some(*status),
			Self::Refresh(RefreshFailure::Rejected { status }) => Some(*status),
			_ => None,
		}
	}

	/// Whether the backend rejected the request with `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Api { status: 401, .. })
	}
}

fn detail_suffix(detail: &Option<String>) -> String {
	detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Raw value that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than HTTP(S).
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// Endpoint path was empty once normalized.
	#[error("The {endpoint} endpoint path cannot be empty.")]
	EmptyEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
	},
	/// Login route must be an absolute client path.
	#[error("Login route `{route}` must start with `/`.")]
	InvalidLoginRoute {
		/// Offending route.
		route: String,
	},
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` cannot be resolved against the base URL.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header value contains characters HTTP does not allow.
	#[error("Header value for `{name}` is invalid.")]
	InvalidHeader {
		/// Header name.
		name: String,
	},
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

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded its configured timeout.
	#[error("Request to the backend timed out.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Outcome of a failed refresh, shared by every caller waiting on the same attempt.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefreshFailure {
	/// Refresh endpoint rejected the refresh credential.
	#[error("Refresh endpoint rejected the refresh token with HTTP {status}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
	},
	/// Refresh call never produced a response.
	#[error("Refresh call failed: {message}.")]
	Network {
		/// Rendered transport failure.
		message: String,
	},
	/// Refresh endpoint answered with an unusable body.
	#[error("Refresh endpoint returned a malformed body: {message}.")]
	Malformed {
		/// Rendered decode failure.
		message: String,
	},
	/// Credential storage failed while applying the refresh.
	#[error("Credential storage failed during refresh: {message}.")]
	Storage {
		/// Rendered storage failure.
		message: String,
	},
	/// No refresh credential is stored.
	#[error("No refresh token is stored.")]
	MissingRefreshToken,
}
