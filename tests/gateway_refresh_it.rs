#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use lms_client::{
	_preludet::*,
	store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY},
	transport::ApiRequest,
};

const REFRESH_PATH: &str = "/api/token/refresh/";

fn seed(harness: &TestHarness, access: &str, refresh: &str) {
	harness.store.set_now(ACCESS_TOKEN_KEY, access);
	harness.store.set_now(REFRESH_TOKEN_KEY, refresh);
}

#[tokio::test]
async fn concurrent_expiries_share_one_refresh() {
	let server = MockServer::start_async().await;
	let (gateway, harness) = build_reqwest_test_gateway(&server.url("/api/"), "/courses");

	seed(&harness, "A1", "R1");

	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/courses/").header("authorization", "Bearer A1");
			then.status(401)
				.header("content-type", "application/json")
				.json_body(json!({ "detail": "Given token not valid for any token type" }));
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/courses/").header("authorization", "Bearer A2");
			then.status(200).header("content-type", "application/json").json_body(json!([]));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH).json_body(json!({ "refresh": "R1" }));
			then.status(200)
				.header("content-type", "application/json")
				.delay(Duration::from_millis(300))
				.json_body(json!({ "access": "A2" }));
		})
		.await;
	let (first, second, third) = futures::join!(
		gateway.execute(ApiRequest::get("courses/")),
		gateway.execute(ApiRequest::get("courses/")),
		gateway.execute(ApiRequest::get("courses/")),
	);

	for response in [first, second, third] {
		let response = response.expect("Replayed request should succeed.");

		assert_eq!(response.status, StatusCode::OK);
	}

	refresh.assert_calls_async(1).await;
	expired.assert_calls_async(3).await;
	fresh.assert_calls_async(3).await;

	assert_eq!(harness.store.get_now(ACCESS_TOKEN_KEY).as_deref(), Some("A2"));
	assert_eq!(harness.store.get_now(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
	assert!(!harness.session.is_refresh_pending());
	assert!(harness.navigator.history().is_empty());
}

#[tokio::test]
async fn rotated_refresh_token_is_persisted() {
	let server = MockServer::start_async().await;
	let (gateway, harness) = build_reqwest_test_gateway(&server.url("/api/"), "/profile");

	seed(&harness, "A1", "R1");

	server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access": "A2", "refresh": "R2" }));
		})
		.await;

	let access = gateway.refresh_access_token().await.expect("Explicit refresh should succeed.");

	assert_eq!(access.expose(), "A2");
	assert_eq!(harness.store.get_now(ACCESS_TOKEN_KEY).as_deref(), Some("A2"));
	assert_eq!(harness.store.get_now(REFRESH_TOKEN_KEY).as_deref(), Some("R2"));
}

#[tokio::test]
async fn rejected_refresh_clears_session_and_redirects_once() {
	let server = MockServer::start_async().await;
	let (gateway, harness) = build_reqwest_test_gateway(&server.url("/api/"), "/courses");

	seed(&harness, "A1", "R1");

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/courses/");
			then.status(401)
				.header("content-type", "application/json")
				.json_body(json!({ "detail": "Token is invalid or expired" }));
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.delay(Duration::from_millis(200))
				.json_body(json!({ "detail": "Token is blacklisted" }));
		})
		.await;
	let (first, second) = futures::join!(
		gateway.execute(ApiRequest::get("courses/")),
		gateway.execute(ApiRequest::get("courses/")),
	);

	for result in [first, second] {
		let err = result.expect_err("Requests should fail once the refresh is rejected.");

		assert!(err.is_unauthorized(), "Original 401 should surface, got {err:?}.");
	}

	refresh.assert_calls_async(1).await;

	assert_eq!(harness.store.get_now(ACCESS_TOKEN_KEY), None);
	assert_eq!(harness.store.get_now(REFRESH_TOKEN_KEY), None);
	assert_eq!(harness.navigator.history(), ["/login"]);
	assert_eq!(harness.session.refresh_metrics.terminations(), 1);
}

#[tokio::test]
async fn termination_on_login_page_does_not_navigate() {
	let server = MockServer::start_async().await;
	let (gateway, harness) = build_reqwest_test_gateway(&server.url("/api/"), "/login");

	seed(&harness, "A1", "R1");

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/accounts/me/");
			then.status(401);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(401);
		})
		.await;

	let err = gateway
		.execute(ApiRequest::get("accounts/me/"))
		.await
		.expect_err("Request should fail after the refresh is rejected.");

	assert!(err.is_unauthorized());
	assert_eq!(harness.store.get_now(REFRESH_TOKEN_KEY), None);
	assert!(harness.navigator.history().is_empty());
}

#[tokio::test]
async fn login_endpoint_401_is_not_recovered() {
	let server = MockServer::start_async().await;
	let (gateway, harness) = build_reqwest_test_gateway(&server.url("/api/"), "/login");

	seed(&harness, "A1", "R1");

	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/accounts/login/");
			then.status(401)
				.header("content-type", "application/json")
				.json_body(json!({ "detail": "No active account found with the given credentials" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(200).json_body(json!({ "access": "A2" }));
		})
		.await;
	let request = ApiRequest::post("accounts/login/")
		.json(&json!({ "username": "stud", "password": "wrong" }))
		.expect("Login body should serialize.");
	let err = gateway.execute(request).await.expect_err("Bad credentials should fail.");

	match err {
		Error::Api { status, detail, .. } => {
			assert_eq!(status, 401);
			assert_eq!(detail.as_deref(), Some("No active account found with the given credentials"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	login.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(harness.store.get_now(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
}

#[tokio::test]
async fn login_request_carries_no_bearer() {
	let server = MockServer::start_async().await;
	let (gateway, harness) = build_reqwest_test_gateway(&server.url("/api/"), "/login");

	seed(&harness, "stale", "R1");

	let with_bearer = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/accounts/login/").header_exists("authorization");
			then.status(500);
		})
		.await;
	let without_bearer = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/accounts/login/");
			then.status(200).json_body(json!({ "access": "A9", "refresh": "R9" }));
		})
		.await;

	gateway
		.execute(ApiRequest::post("accounts/login/"))
		.await
		.expect("Login without a bearer header should succeed.");

	with_bearer.assert_calls_async(0).await;
	without_bearer.assert_calls_async(1).await;
}

#[tokio::test]
async fn missing_refresh_token_surfaces_original_401() {
	let server = MockServer::start_async().await;
	let (gateway, harness) = build_reqwest_test_gateway(&server.url("/api/"), "/courses");

	harness.store.set_now(ACCESS_TOKEN_KEY, "A1");

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/courses/");
			then.status(401);
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(200).json_body(json!({ "access": "A2" }));
		})
		.await;
	let err = gateway
		.execute(ApiRequest::get("courses/"))
		.await
		.expect_err("Request without a refresh token should fail.");

	assert!(err.is_unauthorized());

	refresh.assert_calls_async(0).await;

	assert_eq!(harness.store.get_now(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
	assert!(harness.navigator.history().is_empty());
}

#[tokio::test]
async fn other_failures_pass_through_untouched() {
	let server = MockServer::start_async().await;
	let (gateway, harness) = build_reqwest_test_gateway(&server.url("/api/"), "/courses");

	seed(&harness, "A1", "R1");

	let forbidden = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/accounts/users/").header("authorization", "Bearer A1");
			then.status(403)
				.header("content-type", "application/json")
				.json_body(json!({ "detail": "You do not have permission to perform this action." }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(200).json_body(json!({ "access": "A2" }));
		})
		.await;
	let err = gateway
		.execute(ApiRequest::get("accounts/users/"))
		.await
		.expect_err("Forbidden request should fail.");

	assert_eq!(err.status(), Some(403));

	forbidden.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(harness.store.get_now(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
}

#[tokio::test]
async fn anonymous_requests_go_out_without_authorization() {
	let server = MockServer::start_async().await;
	let (gateway, _harness) = build_reqwest_test_gateway(&server.url("/api/"), "/");
	let anonymous = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/courses/");
			then.status(200).json_body(json!([]));
		})
		.await;
	let response =
		gateway.execute(ApiRequest::get("courses/")).await.expect("Anonymous call should succeed.");

	assert!(response.is_success());

	anonymous.assert_calls_async(1).await;
}
