//! Typed client for the LMS REST backend: bearer credentials on every call, single-flight
//! token refresh on expiry, and durable session storage that survives restarts.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lms;
pub mod nav;
pub mod obs;
pub mod session;
pub mod store;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ClientConfig,
		gateway::Gateway,
		lms::LmsClient,
		nav::MemoryNavigator,
		session::SessionManager,
		store::{CredentialStore, MemoryStore},
		transport::ReqwestTransport,
	};

	/// Gateway type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGateway = Gateway<ReqwestTransport>;

	/// Handles returned alongside a test gateway so assertions can inspect side effects.
	#[derive(Clone, Debug)]
	pub struct TestHarness {
		/// Backing credential store.
		pub store: Arc<MemoryStore>,
		/// Navigator recording redirects.
		pub navigator: Arc<MemoryNavigator>,
		/// Session manager shared with the gateway.
		pub session: Arc<SessionManager>,
	}

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Builds a [`ClientConfig`] pointing at `base` (typically an `httpmock` server URL).
	pub fn test_config(base: &str) -> ClientConfig {
		ClientConfig::builder(base).build().expect("Test client configuration should be valid.")
	}

	/// Constructs a reqwest-backed [`Gateway`] with an in-memory store and navigator parked on
	/// `location`.
	pub fn build_reqwest_test_gateway(
		base: &str,
		location: &str,
	) -> (ReqwestTestGateway, TestHarness) {
		let store = Arc::new(MemoryStore::default());
		let backend: Arc<dyn CredentialStore> = store.clone();
		let session = Arc::new(SessionManager::new(backend));
		let navigator = Arc::new(MemoryNavigator::at(location));
		let gateway = Gateway::new(
			test_config(base),
			test_reqwest_transport(),
			session.clone(),
			navigator.clone(),
		);

		(gateway, TestHarness { store, navigator, session })
	}

	/// Same as [`build_reqwest_test_gateway`] but wrapped in the typed [`LmsClient`] facade.
	pub fn build_reqwest_test_client(
		base: &str,
		location: &str,
	) -> (LmsClient<ReqwestTransport>, TestHarness) {
		let (gateway, harness) = build_reqwest_test_gateway(base, location);

		(LmsClient::from_gateway(gateway), harness)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use http::{HeaderMap, HeaderValue, Method, StatusCode};
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use httpmock as _;
