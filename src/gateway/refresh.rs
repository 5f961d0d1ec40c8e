//! The refresh call itself and what happens to the session when it settles.
//!
//! Exactly one instance of [`run`] executes per expiry window; every caller that hit a `401`
//! meanwhile awaits the shared handle wrapping it.

// self
use crate::{
	_prelude::*,
	auth::{RefreshRequest, RefreshedToken, TokenSecret},
	config::ClientConfig,
	error::RefreshFailure,
	nav::{self, Navigator},
	obs::{self, OpKind, OpOutcome, OpSpan},
	session::{CompareAndSwapOutcome, RefreshOutcome, SessionManager},
	transport::{ApiRequest, HttpTransport},
};

/// Exchanges `used` for a new access credential and applies the outcome to the session.
pub(super) async fn run<T>(
	transport: &T,
	session: &SessionManager,
	navigator: &dyn Navigator,
	config: &ClientConfig,
	used: TokenSecret,
) -> RefreshOutcome
where
	T: ?Sized + HttpTransport,
{
	const KIND: OpKind = OpKind::Refresh;

	let span = OpSpan::new(KIND, "refresh_call");

	obs::record_op_outcome(KIND, OpOutcome::Attempt);
	session.refresh_metrics.record_attempt();

	let outcome = span
		.instrument(async {
			match call_refresh_endpoint(transport, config, &used).await {
				Ok(refreshed) => persist(session, &used, refreshed).await,
				Err(failure) => {
					terminate(session, navigator, config, &used, &failure).await;

					Err(failure)
				},
			}
		})
		.await;

	match &outcome {
		Ok(_) => {
			session.refresh_metrics.record_success();
			obs::record_op_outcome(KIND, OpOutcome::Success);
		},
		Err(_) => {
			session.refresh_metrics.record_failure();
			obs::record_op_outcome(KIND, OpOutcome::Failure);
		},
	}

	outcome
}

async fn call_refresh_endpoint<T>(
	transport: &T,
	config: &ClientConfig,
	used: &TokenSecret,
) -> Result<RefreshedToken, RefreshFailure>
where
	T: ?Sized + HttpTransport,
{
	let mut request = ApiRequest::post(config.endpoints.refresh.as_str())
		.json(&RefreshRequest { refresh: used.expose() })
		.map_err(|e| RefreshFailure::Malformed { message: e.to_string() })?;

	if let Some(timeout) = config.refresh_timeout.or(config.request_timeout) {
		request = request.timeout(timeout);
	}

	let url = config
		.endpoint_url(&request.path)
		.map_err(|e| RefreshFailure::Network { message: e.to_string() })?;
	let response = transport
		.send(url, &request)
		.await
		.map_err(|e| RefreshFailure::Network { message: e.to_string() })?;

	if !response.is_success() {
		return Err(RefreshFailure::Rejected { status: response.status.as_u16() });
	}

	response.json::<RefreshedToken>().map_err(|e| match e {
		Error::Decode { source, .. } => RefreshFailure::Malformed { message: source.to_string() },
		other => RefreshFailure::Malformed { message: other.to_string() },
	})
}

async fn persist(
	session: &SessionManager,
	used: &TokenSecret,
	refreshed: RefreshedToken,
) -> RefreshOutcome {
	let outcome = session
		.apply_refresh(used, &refreshed)
		.await
		.map_err(|e| RefreshFailure::Storage { message: e.to_string() })?;

	match outcome {
		CompareAndSwapOutcome::Updated => Ok(refreshed.access),
		// A newer login replaced the session mid-flight; replay with its credential instead.
		CompareAndSwapOutcome::RefreshMismatch => Ok(session
			.access_token()
			.await
			.ok()
			.flatten()
			.unwrap_or(refreshed.access)),
		CompareAndSwapOutcome::Missing => Err(RefreshFailure::MissingRefreshToken),
	}
}

async fn terminate(
	session: &SessionManager,
	navigator: &dyn Navigator,
	config: &ClientConfig,
	used: &TokenSecret,
	failure: &RefreshFailure,
) {
	// Storage errors leave the session as it is; the caller still sees the original 401.
	let Ok(true) = session.terminate_if_current(used).await else {
		return;
	};
	let redirected = nav::redirect_to_login(navigator, &config.login_route);

	session.refresh_metrics.record_termination();
	obs::record_session_terminated();
	obs::trace_session_terminated(failure, redirected);
}
