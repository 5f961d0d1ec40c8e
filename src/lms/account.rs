//! Accounts: login, logout, registration, the current user, and admin user management.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, LoginRequest, TokenPair},
	lms::{LmsClient, Listing, UserId},
	obs::{self, OpKind},
	transport::{ApiRequest, HttpTransport},
};

/// Role assigned to an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	#[default]
	/// Learner; the backend default.
	Student,
	/// Course author.
	Teacher,
	/// Platform administrator.
	Admin,
}
impl Role {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Student => "student",
			Role::Teacher => "teacher",
			Role::Admin => "admin",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Account as returned by the current-user and user-management endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Primary key.
	pub id: UserId,
	/// Login name.
	pub username: String,
	/// Contact address, when exposed.
	#[serde(default)]
	pub email: Option<String>,
	/// Declared role, when exposed.
	#[serde(default)]
	pub role: Option<Role>,
	/// Staff flag.
	#[serde(default)]
	pub is_staff: bool,
	/// Superuser flag.
	#[serde(default)]
	pub is_superuser: bool,
}
impl UserProfile {
	/// Whether the account has administrative powers through its role or its flags.
	pub fn is_admin(&self) -> bool {
		self.is_staff || self.is_superuser || self.role == Some(Role::Admin)
	}

	/// Role used for routing, folding the staff flags into [`Role::Admin`].
	pub fn effective_role(&self) -> Role {
		if self.is_admin() { Role::Admin } else { self.role.unwrap_or_default() }
	}

	/// Landing route for the account's dashboard.
	pub fn home_route(&self) -> &'static str {
		match self.effective_role() {
			Role::Admin => "/admin-dashboard",
			Role::Teacher => "/teacher-dashboard",
			Role::Student => "/profile",
		}
	}
}

/// Registration request body.
#[derive(Clone, Serialize)]
pub struct NewAccount {
	/// Requested login name.
	pub username: String,
	/// Contact address.
	pub email: String,
	/// Initial password.
	pub password: String,
}
impl NewAccount {
	/// Builds a registration request.
	pub fn new(
		username: impl Into<String>,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self { username: username.into(), email: email.into(), password: password.into() }
	}
}
impl Debug for NewAccount {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NewAccount")
			.field("username", &self.username)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Registration response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
	/// Primary key of the new account.
	pub id: UserId,
	/// Login name.
	pub username: String,
	/// Contact address.
	pub email: String,
}

/// Partial update applied by administrators; unset fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
	/// New role.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<Role>,
	/// New staff flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_staff: Option<bool>,
	/// New superuser flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_superuser: Option<bool>,
}
impl UserPatch {
	/// Resets an account to a plain student without staff flags.
	pub fn demote() -> Self {
		Self { role: Some(Role::Student), is_staff: Some(false), is_superuser: Some(false) }
	}
}

impl<T> LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges username + password for a credential pair and stores it as the session.
	pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
		obs::observe(OpKind::Login, "login", async {
			let path = self.config().endpoints.login.clone();
			let pair: TokenPair = self
				.send_json(Method::POST, path, &LoginRequest { username, password })
				.await?;

			self.session().begin(CredentialPair::from(pair.clone())).await?;

			Ok::<_, Error>(pair)
		})
		.await
	}

	/// Deletes the stored session credentials.
	pub async fn logout(&self) -> Result<()> {
		obs::observe(OpKind::Logout, "logout", self.session().end()).await
	}

	/// Creates a new account.
	pub async fn register(&self, account: &NewAccount) -> Result<RegisteredUser> {
		let path = self.config().endpoints.register.clone();

		self.send_json(Method::POST, path, account).await
	}

	/// Fetches the authenticated account.
	pub async fn me(&self) -> Result<UserProfile> {
		self.get_json(self.config().endpoints.me.clone()).await
	}

	/// Landing route for the authenticated account.
	pub async fn home_route(&self) -> Result<&'static str> {
		Ok(self.me().await?.home_route())
	}

	/// Lists accounts, optionally filtered by role (administrators only).
	pub async fn users(&self, role: Option<Role>) -> Result<Listing<UserProfile>> {
		let mut request = ApiRequest::get("accounts/users/");

		if let Some(role) = role {
			request = request.query("role", role.as_str());
		}

		let mut listing: Listing<UserProfile> = self.gateway().execute_json(request).await?;

		// The filter is advisory on some backend revisions.
		if let Some(role) = role {
			listing.items.retain(|user| user.role == Some(role));
		}

		Ok(listing)
	}

	/// Applies `patch` to an account (administrators only).
	pub async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<UserProfile> {
		self.send_json(Method::PATCH, format!("accounts/users/{id}/"), patch).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn profile(role: Option<Role>, is_staff: bool, is_superuser: bool) -> UserProfile {
		UserProfile {
			id: UserId::new(1).expect("User id fixture should be valid."),
			username: "someone".into(),
			email: None,
			role,
			is_staff,
			is_superuser,
		}
	}

	#[test]
	fn home_route_follows_effective_role() {
		assert_eq!(profile(Some(Role::Teacher), false, false).home_route(), "/teacher-dashboard");
		assert_eq!(profile(Some(Role::Student), false, false).home_route(), "/profile");
		assert_eq!(profile(None, false, false).home_route(), "/profile");
		assert_eq!(profile(Some(Role::Admin), false, false).home_route(), "/admin-dashboard");
		assert_eq!(profile(Some(Role::Teacher), true, false).home_route(), "/admin-dashboard");
		assert_eq!(profile(None, false, true).home_route(), "/admin-dashboard");
	}

	#[test]
	fn profile_decodes_minimal_payload() {
		let user: UserProfile = serde_json::from_str(r#"{"id": 3, "username": "stud"}"#)
			.expect("Minimal profile should decode.");

		assert_eq!(user.effective_role(), Role::Student);
		assert!(!user.is_admin());
		assert_eq!(user.email, None);
	}

	#[test]
	fn patch_skips_unset_fields() {
		let patch = UserPatch { is_staff: Some(true), ..Default::default() };

		assert_eq!(
			serde_json::to_value(&patch).expect("Patch should serialize."),
			serde_json::json!({ "is_staff": true })
		);
		assert_eq!(
			serde_json::to_value(UserPatch::demote()).expect("Demotion should serialize."),
			serde_json::json!({ "role": "student", "is_staff": false, "is_superuser": false })
		);
	}

	#[test]
	fn new_account_debug_hides_password() {
		let account = NewAccount::new("stud", "stud@example.com", "hunter2");

		assert!(!format!("{account:?}").contains("hunter2"));
	}
}
