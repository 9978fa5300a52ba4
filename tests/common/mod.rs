//! IdP mocks shared by the integration suites.

#![allow(dead_code)]

// crates.io
use httpmock::{Mock, prelude::*};
use serde_json::json;
// self
use idp_broker::{_preludet::*, config::Configuration, http::AGENTS_API_VERSION};

pub const SESSION_TOKEN: &str = "AQIC5wM2LY4Sfcw-session";
pub const COOKIE_NAME: &str = "iplanetdirectorypro";

/// Root-realm configuration aimed at `/openam` on the mock server.
pub fn configuration(server: &MockServer) -> Configuration {
	test_configuration(&server.url("/openam"), &["read", "write"])
}

pub async fn mock_authenticate(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/openam/json/authenticate")
				.query_param("authTokenType", "module")
				.query_param("authIndexValue", "Application")
				.header("x-openam-username", TEST_ADMIN_USERNAME)
				.header("x-openam-password", TEST_ADMIN_PASSWORD);
			then.status(200).header("content-type", "application/json").json_body(json!({
				"tokenId": SESSION_TOKEN,
				"successUrl": "/openam/console",
			}));
		})
		.await
}

pub async fn mock_authenticate_rejected(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/openam/json/authenticate");
			then.status(401).header("content-type", "application/json").json_body(json!({
				"code": 401,
				"reason": "Unauthorized",
				"message": "Authentication Failed",
			}));
		})
		.await
}

pub async fn mock_server_info(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/openam/json/serverinfo/*")
				.header("accept-api-version", "protocol=1.0, resource=1.1");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"domains": [],
				"cookieName": COOKIE_NAME,
				"secureCookie": false,
			}));
		})
		.await
}

/// Agent query answering with one record per username.
pub async fn mock_list_agents<'a>(server: &'a MockServer, usernames: &[&str]) -> Mock<'a> {
	let records = usernames
		.iter()
		.map(|username| json!({ "_id": username, "username": username }))
		.collect::<Vec<_>>();
	let count = records.len();

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/openam/json/agents")
				.query_param("_queryId", "*")
				.header("accept-api-version", AGENTS_API_VERSION)
				.header(COOKIE_NAME, SESSION_TOKEN);
			then.status(200).header("content-type", "application/json").json_body(json!({
				"result": records,
				"resultCount": count,
				"remainingPagedResults": -1,
			}));
		})
		.await
}

/// Agent deletion answering with `status`.
pub async fn mock_delete_agent<'a>(server: &'a MockServer, username: &str, status: u16) -> Mock<'a> {
	mock_delete_agent_delayed(server, username, status, std::time::Duration::ZERO).await
}

/// Agent deletion answering with `status` after `delay`.
pub async fn mock_delete_agent_delayed<'a>(
	server: &'a MockServer,
	username: &str,
	status: u16,
	delay: std::time::Duration,
) -> Mock<'a> {
	let path = format!("/openam/json/agents/{username}");

	server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path(path)
				.header("accept-api-version", AGENTS_API_VERSION)
				.header(COOKIE_NAME, SESSION_TOKEN);
			then.status(status).delay(delay);
		})
		.await
}
