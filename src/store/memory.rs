//! Thread-safe in-memory [`CredentialStore`] for tests and short-lived processes.

// self
use crate::{
	_prelude::*,
	store::{CredentialStore, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<String, String>>>;

/// Storage backend that keeps values in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Synchronous read, handy for assertions.
	pub fn get_now(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	/// Synchronous write, handy for seeding fixtures.
	pub fn set_now(&self, key: &str, value: impl Into<String>) {
		self.0.write().insert(key.to_owned(), value.into());
	}

	/// Synchronous delete.
	pub fn remove_now(&self, key: &str) {
		self.0.write().remove(key);
	}
}
impl CredentialStore for MemoryStore {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
		Box::pin(async move { Ok(self.get_now(key)) })
	}

	fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.set_now(key, value);

			Ok(())
		})
	}

	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.remove_now(key);

			Ok(())
		})
	}
}
