//! Navigation hook invoked when the gateway terminates a session.
//!
//! The gateway never renders anything; it only asks the host to move to the login entry point.
//! Browser hosts map [`Navigator::navigate`] onto their router, headless hosts can use
//! [`MemoryNavigator`] to observe the request.

// self
use crate::_prelude::*;

/// Host-provided access to the client's current location.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Path the client is currently showing (e.g. `/courses`).
	fn current_path(&self) -> String;

	/// Moves the client to `path`.
	fn navigate(&self, path: &str);
}

/// In-process navigator that tracks the current path and every navigation it was asked for.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
	location: RwLock<String>,
	history: Mutex<Vec<String>>,
}
impl MemoryNavigator {
	/// Creates a navigator parked on `path`.
	pub fn at(path: impl Into<String>) -> Self {
		Self { location: RwLock::new(path.into()), history: Mutex::default() }
	}

	/// Moves the current location without recording a navigation.
	pub fn set_location(&self, path: impl Into<String>) {
		*self.location.write() = path.into();
	}

	/// Navigations requested so far, oldest first.
	pub fn history(&self) -> Vec<String> {
		self.history.lock().clone()
	}
}
impl Navigator for MemoryNavigator {
	fn current_path(&self) -> String {
		self.location.read().clone()
	}

	fn navigate(&self, path: &str) {
		self.set_location(path);
		self.history.lock().push(path.to_owned());
	}
}

/// Sends the client to `login_route` unless it is already there.
///
/// Returns whether a navigation was issued.
pub fn redirect_to_login(navigator: &dyn Navigator, login_route: &str) -> bool {
	if navigator.current_path() == login_route {
		return false;
	}

	navigator.navigate(login_route);

	true
}
