//! Demonstrates plugging a custom transport into the gateway.
//!
//! 1. Implement [`IdpHttpClient`] and hand out an [`AsyncHttpClient`] handle per call.
//! 2. Build the gateway with [`Gateway::with_http_client`].
//! 3. Wrap it in a [`ServiceBroker`] and bind an application.
//!
//! The transport below answers from an in-process table instead of the network, and reports a
//! transport failure for any path it does not know.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use color_eyre::Result;
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{Method, StatusCode},
};
use serde_json::json;
// self
use idp_broker::{
	auth::{BindingId, InstanceId, ScopeList},
	broker::{BindRequest, BrokerOutcome, ServiceBroker},
	config::Configuration,
	gateway::Gateway,
	http::IdpHttpClient,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let configuration = Configuration::builder()
		.base_url("https://idp.internal/openam")
		.username("amadmin")
		.password("demo-admin-password")
		.scopes(ScopeList::new(["profile"])?)
		.build()?;
	let gateway: Gateway<TableHttpClient> = Gateway::with_http_client(configuration, TableHttpClient);
	let broker = ServiceBroker::new(Arc::new(gateway), "cf", "cf-secret");
	let request: BindRequest =
		serde_json::from_value(json!({ "bind_resource": { "app_guid": "app-1" } }))?;

	match broker.bind(&InstanceId::new("orders")?, &BindingId::new("web")?, &request).await? {
		BrokerOutcome::CreatedWithCredentials(credentials) =>
			println!("Bound client {} against {}.", credentials.username, credentials.uri),
		outcome => println!("Binding was not created: {outcome:?}."),
	}

	let response = broker.gateway.list_clients().await;

	println!("Unknown paths surface as status {}.", response.status());

	Ok(())
}

#[derive(Debug)]
struct UnroutedPath(String);
impl Display for UnroutedPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "No table entry for {}", self.0)
	}
}
impl StdError for UnroutedPath {}

struct TableHttpClient;
impl IdpHttpClient for TableHttpClient {
	type Handle = TableHttpHandle;
	type TransportError = UnroutedPath;

	fn handle(&self) -> Self::Handle {
		TableHttpHandle
	}
}

struct TableHttpHandle;
impl<'a> AsyncHttpClient<'a> for TableHttpHandle {
	type Error = HttpClientError<UnroutedPath>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			let path = request.uri().path().to_owned();
			let (status, body) = match (request.method(), path.as_str()) {
				(&Method::POST, "/openam/json/authenticate") =>
					(StatusCode::OK, json!({ "tokenId": "table-session" })),
				(&Method::GET, "/openam/json/serverinfo/*") =>
					(StatusCode::OK, json!({ "cookieName": "iPlanetDirectoryPro" })),
				(&Method::POST, "/openam/json/agents") => (StatusCode::CREATED, json!({})),
				// The oauth2 crate names this variant after reqwest, but it boxes any transport
				// error.
				_ => return Err(HttpClientError::Reqwest(Box::new(UnroutedPath(path)))),
			};
			let mut response = HttpResponse::new(body.to_string().into_bytes());

			*response.status_mut() = status;

			Ok(response)
		})
	}
}
