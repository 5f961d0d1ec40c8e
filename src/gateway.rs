//! Authenticated request gateway: bearer attachment on the way out, single-flight refresh and
//! one-shot replay on the way back.
//!
//! [`Gateway::execute`] is the only path application code uses to reach the backend. Each
//! request passes through two interception points:
//!
//! - outbound, the stored access credential is attached as `Authorization: Bearer <token>`
//!   unless the request targets the credential-issuing endpoint;
//! - inbound, a `401` from any endpoint other than login or refresh triggers (or joins) the
//!   single in-flight refresh and, once it resolves, replays the request exactly once with the
//!   new credential. A request whose credential was already replaced by a settled refresh
//!   is replayed with the current credential without refreshing again.
//!
//! Every other failure is handed back untouched as [`Error::Api`] or a transport error.

mod refresh;

// crates.io
use futures::FutureExt;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ClientConfig,
	error::RefreshFailure,
	nav::Navigator,
	obs::{self, OpKind, OpSpan},
	session::{RefreshOutcome, SessionManager},
	transport::{ApiRequest, ApiResponse, HttpTransport},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestTransport>;

/// Wraps a transport with credential attachment and expiry recovery.
pub struct Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request, including the refresh call.
	pub transport: Arc<T>,
	/// Session manager owning the credentials and the pending-refresh handle.
	pub session: Arc<SessionManager>,
	/// Host navigation hook used when a session is terminated.
	pub navigator: Arc<dyn Navigator>,
	/// Validated client configuration.
	pub config: Arc<ClientConfig>,
}
impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a gateway over the provided transport, session, and navigator.
	pub fn new(
		config: impl Into<Arc<ClientConfig>>,
		transport: impl Into<Arc<T>>,
		session: Arc<SessionManager>,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		Self { transport: transport.into(), session, navigator, config: config.into() }
	}

	/// Dispatches `request`, attaching credentials and recovering once from an expired one.
	pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
		obs::observe(OpKind::Request, "execute", self.execute_inner(request)).await
	}

	/// Dispatches `request` and decodes a successful body as `R`.
	pub async fn execute_json<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: for<'de> Deserialize<'de>,
	{
		self.execute(request).await?.json()
	}

	/// Forces a refresh of the access credential, joining one already in flight.
	///
	/// Failure carries the same session-termination side effects as an implicit refresh.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		// Outcomes are counted by the refresh call itself; only the span is added here.
		let span = OpSpan::new(OpKind::Refresh, "refresh_access_token");

		span.instrument(async {
			let used =
				self.session.refresh_token().await?.ok_or(RefreshFailure::MissingRefreshToken)?;

			Ok::<_, Error>(self.await_refresh(used).await?)
		})
		.await
	}

	/// Outbound interception: attaches the stored access credential when appropriate.
	///
	/// Returns the credential that was attached. Never fails; a missing or unreadable
	/// credential leaves the request unchanged.
	pub async fn authorize(&self, request: &mut ApiRequest) -> Option<TokenSecret> {
		if self.config.is_login_endpoint(&request.path) {
			return None;
		}

		let access = self.session.access_token().await.ok().flatten()?;

		request.set_bearer(&access).ok().map(|_| access)
	}

	async fn execute_inner(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		let sent = self.authorize(&mut request).await;
		let response = self.dispatch(&request).await?;

		if response.is_success() {
			return Ok(response);
		}
		if !self.is_recoverable(&request, &response) {
			return Err(response.into_error());
		}

		request.mark_retried();

		let access = match self.session.access_token().await {
			// The credential was already replaced after this request went out.
			Ok(Some(current)) if sent.as_ref() != Some(&current) => current,
			_ => {
				let Ok(Some(used)) = self.session.refresh_token().await else {
					return Err(response.into_error());
				};
				let Ok(access) = self.await_refresh(used).await else {
					return Err(response.into_error());
				};

				access
			},
		};

		request.set_bearer(&access)?;

		let replay = self.dispatch(&request).await?;

		if replay.is_success() { Ok(replay) } else { Err(replay.into_error()) }
	}

	fn is_recoverable(&self, request: &ApiRequest, response: &ApiResponse) -> bool {
		response.status == StatusCode::UNAUTHORIZED
			&& !request.is_retried()
			&& !self.config.is_login_endpoint(&request.path)
			&& !self.config.is_refresh_endpoint(&request.path)
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
		let url = self.config.endpoint_url(&request.path)?;

		if request.timeout.is_none()
			&& let Some(timeout) = self.config.request_timeout
		{
			let timed = request.clone().timeout(timeout);

			return Ok(self.transport.send(url, &timed).await?);
		}

		Ok(self.transport.send(url, request).await?)
	}

	/// Joins the in-flight refresh or starts one exchanging `used`.
	async fn await_refresh(&self, used: TokenSecret) -> RefreshOutcome {
		let (pending, _started) = self.session.join_or_start_refresh(|| {
			let transport = self.transport.clone();
			let session = self.session.clone();
			let navigator = self.navigator.clone();
			let config = self.config.clone();

			async move {
				let outcome =
					refresh::run(transport.as_ref(), &session, navigator.as_ref(), &config, used)
						.await;

				session.settle_refresh();

				outcome
			}
			.boxed()
		});

		pending.await
	}
}
impl<T> Clone for Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			session: self.session.clone(),
			navigator: self.navigator.clone(),
			config: self.config.clone(),
		}
	}
}
impl<T> Debug for Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("base_url", &self.config.base_url.as_str())
			.field("session", &self.session)
			.finish()
	}
}
