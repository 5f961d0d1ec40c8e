//! Transport primitives for backend calls.
//!
//! The module exposes [`HttpTransport`] alongside the [`ApiRequest`] descriptor and
//! [`ApiResponse`] so downstream crates can plug in custom HTTP stacks (or in-process fakes)
//! without touching the gateway's credential handling. The gateway resolves every request to
//! an absolute [`Url`] before calling [`HttpTransport::send`], and never asks a transport to
//! interpret status codes.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of dispatching [`ApiRequest`]s.
///
/// Implementations must be `Send + Sync + 'static` so the gateway can share them with the
/// detached refresh future. Any response that arrives, whatever its status, is returned as
/// `Ok`; only failures that prevent a response (DNS, TLS, timeouts) map to
/// [`TransportError`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Dispatches `request` to `url` and buffers the response.
	fn send<'a>(&'a self, url: Url, request: &'a ApiRequest) -> TransportFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send<'a>(&'a self, url: Url, request: &'a ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut builder = self.0.request(request.method.clone(), url);

			if !request.query.is_empty() {
				builder = builder.query(&request.query);
			}

			builder = builder.headers(request.headers.clone());

			if let Some(body) = request.body.as_ref() {
				builder = builder.body(body.clone());
			}
			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}
