//! Credential pair held by a session and the payloads the credential endpoints exchange.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access + refresh credentials persisted for the active session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialPair {
	/// Short-lived bearer credential.
	pub access: TokenSecret,
	/// Longer-lived credential exchanged for new access credentials.
	pub refresh: TokenSecret,
}
impl CredentialPair {
	/// Builds a pair from raw token strings.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access: access.into(), refresh: refresh.into() }
	}
}
impl From<TokenPair> for CredentialPair {
	fn from(value: TokenPair) -> Self {
		Self { access: value.access, refresh: value.refresh }
	}
}

/// Login response body: `{"access": "...", "refresh": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Newly issued access credential.
	pub access: TokenSecret,
	/// Newly issued refresh credential.
	pub refresh: TokenSecret,
}

/// Refresh request body: `{"refresh": "..."}`.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshRequest<'a> {
	/// Refresh credential being exchanged.
	pub refresh: &'a str,
}

/// Refresh response body. `refresh` is only present when the backend rotates refresh tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshedToken {
	/// Newly minted access credential.
	pub access: TokenSecret,
	/// Rotated refresh credential, if the backend issued one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh: Option<TokenSecret>,
}

/// Login request body.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
	/// Account name.
	pub username: &'a str,
	/// Account password.
	pub password: &'a str,
}
impl Debug for LoginRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}
