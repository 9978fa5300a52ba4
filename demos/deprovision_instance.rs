//! Deprovisions a service instance against a mocked IdP using the reqwest transport.
//!
//! The mock realm holds clients for two instances; only `orders-*` clients are deleted, and one
//! of them is already gone, which the broker tolerates.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use idp_broker::{
	auth::ScopeList,
	broker::{BrokerRequest, SERVICE_ID, ServiceBroker},
	config::Configuration,
	gateway::Gateway,
	http::ReqwestHttpClient,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _auth = server
		.mock_async(|when, then| {
			when.method(POST).path("/openam/json/customers/authenticate");
			then.status(200).json_body(json!({ "tokenId": "demo-session" }));
		})
		.await;
	let _info = server
		.mock_async(|when, then| {
			when.method(GET).path("/openam/json/serverinfo/*");
			then.status(200).json_body(json!({ "cookieName": "iplanetdirectorypro" }));
		})
		.await;
	let _list = server
		.mock_async(|when, then| {
			when.method(GET).path("/openam/json/customers/agents");
			then.status(200).json_body(json!({
				"result": [
					{ "username": "orders-web" },
					{ "username": "orders-worker" },
					{ "username": "billing-web" },
				],
			}));
		})
		.await;
	let web = server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path("/openam/json/customers/agents/orders-web")
				.header("iplanetdirectorypro", "demo-session");
			then.status(204);
		})
		.await;
	let worker = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/openam/json/customers/agents/orders-worker");
			then.status(400);
		})
		.await;
	let configuration = Configuration::builder()
		.base_url(server.url("/openam"))
		.realm("/customers/")
		.username("amadmin")
		.password("demo-admin-password")
		.scopes(ScopeList::new(["profile", "email"])?)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let gateway: Gateway<ReqwestHttpClient> = Gateway::with_http_client(configuration, http_client);
	let broker = ServiceBroker::new(Arc::new(gateway), "cf", "cf-secret");
	let response = broker
		.handle(
			BrokerRequest::delete("/v2/service_instances/orders")
				.with_query(format!("service_id={SERVICE_ID}"))
				.with_basic_auth("cf", "cf-secret"),
		)
		.await;

	println!("Deprovision answered {}.", response.status);

	web.assert_async().await;
	worker.assert_async().await;

	Ok(())
}
