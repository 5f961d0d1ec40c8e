// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	gateway::Gateway,
	nav::Navigator,
	session::SessionManager,
	store::CredentialStore,
	transport::{ApiRequest, HttpTransport},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// LMS client specialized for the crate's default reqwest transport.
pub type ReqwestLmsClient = LmsClient<ReqwestTransport>;

/// Typed facade over the LMS REST API.
///
/// Every call goes through [`Gateway::execute`], so each one carries the stored access
/// credential and shares the gateway's single-flight refresh. Operations are grouped by
/// resource in the sibling modules (`account`, `course`, `lesson`, `enrollment`, `quiz`).
pub struct LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	gateway: Gateway<T>,
}
impl<T> LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps an existing gateway.
	pub fn from_gateway(gateway: Gateway<T>) -> Self {
		Self { gateway }
	}

	/// Builds a client around `transport`, persisting credentials in `store`.
	pub fn with_transport(
		config: ClientConfig,
		transport: impl Into<Arc<T>>,
		store: Arc<dyn CredentialStore>,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		let session = Arc::new(SessionManager::new(store));

		Self::from_gateway(Gateway::new(config, transport, session, navigator))
	}

	/// Underlying authenticated gateway.
	pub fn gateway(&self) -> &Gateway<T> {
		&self.gateway
	}

	/// Session manager shared with the gateway.
	pub fn session(&self) -> &Arc<SessionManager> {
		&self.gateway.session
	}

	/// Client configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.gateway.config
	}

	pub(crate) async fn get_json<R>(&self, path: impl Into<String>) -> Result<R>
	where
		R: for<'de> Deserialize<'de>,
	{
		self.gateway.execute_json(ApiRequest::get(path)).await
	}

	pub(crate) async fn send_json<B, R>(
		&self,
		method: Method,
		path: impl Into<String>,
		body: &B,
	) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: for<'de> Deserialize<'de>,
	{
		self.gateway.execute_json(ApiRequest::new(method, path).json(body)?).await
	}
}
#[cfg(feature = "reqwest")]
impl LmsClient<ReqwestTransport> {
	/// Builds a reqwest-backed client.
	pub fn new(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		Self::with_transport(config, ReqwestTransport::default(), store, navigator)
	}
}
impl<T> Clone for LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { gateway: self.gateway.clone() }
	}
}
impl<T> Debug for LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LmsClient").field("gateway", &self.gateway).finish()
	}
}
