//! Transport primitives for IdP management calls.
//!
//! The module exposes [`IdpHttpClient`] so downstream crates can plug in their own HTTP stack.
//! Requests and responses use the `oauth2` crate's [`HttpRequest`]/[`HttpResponse`] aliases
//! (plain `http` types with `Vec<u8>` bodies), which keeps the gateway independent from any
//! particular client library.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, http::header::CONTENT_TYPE};
#[cfg(feature = "reqwest")] use reqwest::redirect::Policy;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::Configuration, error::ConfigError};

/// `Accept-API-Version` header understood by the IdP's REST endpoints.
pub const ACCEPT_API_VERSION: &str = "Accept-API-Version";
/// API version used for agent management calls.
pub const AGENTS_API_VERSION: &str = "protocol=1.0, resource=3.0";
/// API version used for the server info call.
pub const SERVER_INFO_API_VERSION: &str = "protocol=1.0, resource=1.1";

/// Abstraction over HTTP transports able to reach the IdP.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back a gateway shared
/// across concurrent broker requests. The handles they return must own whatever state the
/// request needs so their futures stay `Send` for the lifetime of the call.
pub trait IdpHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single outbound call.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Returns a handle ready to execute one request.
	fn handle(&self) -> Self::Handle;
}

/// Executes `request` on `client`, normalizing transport failures into [`TransportError`].
pub(crate) async fn execute<C>(client: &C, request: HttpRequest) -> Result<HttpResponse, TransportError>
where
	C: ?Sized + IdpHttpClient,
{
	let handle = client.handle();

	handle.call(request).await.map_err(map_transport_error)
}

fn map_transport_error<E>(err: HttpClientError<E>) -> TransportError
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner),
		HttpClientError::Io(inner) => TransportError::Io(inner),
		other => TransportError::network(other),
	}
}

/// Returns true for 2xx statuses.
pub fn is_success(response: &HttpResponse) -> bool {
	response.status().is_success()
}

/// Builds a body-less response carrying only `status`.
pub fn empty_response(status: StatusCode) -> HttpResponse {
	let mut response = HttpResponse::new(Vec::new());

	*response.status_mut() = status;

	response
}

/// Starts a request to `url` advertising the agents API version.
pub(crate) fn agents_request(method: Method, url: &Url) -> oauth2::http::request::Builder {
	oauth2::http::Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(ACCEPT_API_VERSION, AGENTS_API_VERSION)
}

/// Finishes a request builder with a JSON body.
pub(crate) fn with_json_body(
	builder: oauth2::http::request::Builder,
	body: Vec<u8>,
) -> Result<HttpRequest, oauth2::http::Error> {
	builder.header(CONTENT_TYPE, "application/json").body(body)
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// IdP management endpoints answer directly; the default client never follows redirects.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured per-call timeout.
	pub fn from_configuration(configuration: &Configuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.timeout(configuration.request_timeout.unsigned_abs())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl IdpHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`AsyncHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_response_carries_status_only() {
		let response = empty_response(StatusCode::UNAUTHORIZED);

		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
		assert!(response.body().is_empty());
		assert!(!is_success(&response));
		assert!(is_success(&empty_response(StatusCode::CREATED)));
	}

	#[test]
	fn agents_request_sets_version_header() {
		let url = Url::parse("https://idp.example.com/json/agents").expect("URL should parse.");
		let request = with_json_body(agents_request(Method::POST, &url), b"{}".to_vec())
			.expect("Request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://idp.example.com/json/agents");
		assert_eq!(request.headers()[ACCEPT_API_VERSION], AGENTS_API_VERSION);
		assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
	}
}
