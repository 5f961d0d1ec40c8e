//! Session manager: the credential pair, the single pending-refresh handle, and the lock that
//! keeps login, logout, and refresh bookkeeping from interleaving.
//!
//! One [`SessionManager`] is constructed per process (or per isolated test) and shared with the
//! gateway behind an [`Arc`]. All credential reads and writes go through it so a refresh that
//! settles after a concurrent login or logout can detect the change by comparing the refresh
//! credential it started with against the one currently stored.

mod metrics;

pub use metrics::RefreshMetrics;

// crates.io
use futures::future::{BoxFuture, FutureExt, Shared};
// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, RefreshedToken, TokenSecret},
	error::RefreshFailure,
	store::{ACCESS_TOKEN_KEY, CredentialStore, REFRESH_TOKEN_KEY, StoreError},
};

/// Outcome every waiter of a refresh observes.
pub type RefreshOutcome = Result<TokenSecret, RefreshFailure>;
/// Shared handle to the refresh currently in flight.
pub type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Result of applying a refresh against the stored session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareAndSwapOutcome {
	/// The stored refresh credential matched and the new access credential was persisted.
	Updated,
	/// A different session was stored meanwhile; nothing was written.
	RefreshMismatch,
	/// No session is stored anymore; nothing was written.
	Missing,
}

/// Owns the stored credential pair and the single-flight refresh guard.
pub struct SessionManager {
	store: Arc<dyn CredentialStore>,
	pending: Mutex<Option<PendingRefresh>>,
	session_lock: AsyncMutex<()>,
	/// Counters describing refresh activity.
	pub refresh_metrics: Arc<RefreshMetrics>,
}
impl SessionManager {
	/// Creates a manager persisting credentials in `store`.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self {
			store,
			pending: Mutex::new(None),
			session_lock: AsyncMutex::new(()),
			refresh_metrics: Default::default(),
		}
	}

	/// Backing credential store.
	pub fn store(&self) -> &Arc<dyn CredentialStore> {
		&self.store
	}

	/// Persists a freshly issued credential pair (login).
	pub async fn begin(&self, pair: CredentialPair) -> Result<()> {
		let _session = self.session_lock.lock().await;

		self.store.set(ACCESS_TOKEN_KEY, pair.access.expose().to_owned()).await?;
		self.store.set(REFRESH_TOKEN_KEY, pair.refresh.expose().to_owned()).await?;

		Ok(())
	}

	/// Deletes both stored credentials (logout).
	pub async fn end(&self) -> Result<()> {
		let _session = self.session_lock.lock().await;

		self.clear_locked().await?;

		Ok(())
	}

	/// Stored access credential, if any.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.get(ACCESS_TOKEN_KEY).await?.map(TokenSecret::new))
	}

	/// Stored refresh credential, if any.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.get(REFRESH_TOKEN_KEY).await?.map(TokenSecret::new))
	}

	/// Whether an access credential is stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.access_token().await?.is_some())
	}

	/// Persists a refresh result, provided the session that requested it is still current.
	///
	/// `used` is the refresh credential the refresh call was made with. A rotated refresh
	/// credential in `refreshed` replaces the stored one alongside the access credential.
	pub async fn apply_refresh(
		&self,
		used: &TokenSecret,
		refreshed: &RefreshedToken,
	) -> Result<CompareAndSwapOutcome, StoreError> {
		let _session = self.session_lock.lock().await;
		let outcome = match self.store.get(REFRESH_TOKEN_KEY).await? {
			Some(current) if current == used.expose() => CompareAndSwapOutcome::Updated,
			Some(_) => CompareAndSwapOutcome::RefreshMismatch,
			None => CompareAndSwapOutcome::Missing,
		};

		if matches!(outcome, CompareAndSwapOutcome::Updated) {
			self.store.set(ACCESS_TOKEN_KEY, refreshed.access.expose().to_owned()).await?;

			if let Some(rotated) = refreshed.refresh.as_ref() {
				self.store.set(REFRESH_TOKEN_KEY, rotated.expose().to_owned()).await?;
			}
		}

		Ok(outcome)
	}

	/// Clears both credentials if the stored refresh credential still equals `used`.
	///
	/// Returns whether the session was cleared. A mismatch means another login or logout
	/// happened while the failed refresh was in flight, and that session is left alone.
	pub async fn terminate_if_current(&self, used: &TokenSecret) -> Result<bool, StoreError> {
		let _session = self.session_lock.lock().await;

		match self.store.get(REFRESH_TOKEN_KEY).await? {
			Some(current) if current == used.expose() => {
				self.clear_locked().await?;

				Ok(true)
			},
			_ => Ok(false),
		}
	}

	/// Whether a refresh is currently in flight.
	pub fn is_refresh_pending(&self) -> bool {
		self.pending.lock().is_some()
	}

	/// Returns the in-flight refresh, starting one with `start` when none exists.
	///
	/// The boolean reports whether this call started the refresh. The future built by `start`
	/// must call [`SessionManager::settle_refresh`] once it has an outcome.
	pub fn join_or_start_refresh<F>(&self, start: F) -> (PendingRefresh, bool)
	where
		F: FnOnce() -> BoxFuture<'static, RefreshOutcome>,
	{
		let mut pending = self.pending.lock();

		if let Some(existing) = pending.as_ref() {
			self.refresh_metrics.record_join();

			return (existing.clone(), false);
		}

		let shared = start().shared();

		*pending = Some(shared.clone());

		(shared, true)
	}

	/// Drops the pending handle so the next authorization failure can start a new refresh.
	pub fn settle_refresh(&self) {
		self.pending.lock().take();
	}

	async fn clear_locked(&self) -> Result<(), StoreError> {
		self.store.remove(ACCESS_TOKEN_KEY).await?;
		self.store.remove(REFRESH_TOKEN_KEY).await
	}
}
impl Debug for SessionManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionManager")
			.field("refresh_pending", &self.is_refresh_pending())
			.field("refresh_metrics", &self.refresh_metrics)
			.finish()
	}
}
