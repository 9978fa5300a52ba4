//! Discovery of the header name the IdP expects session tokens under.

// crates.io
use oauth2::http::HeaderName;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ResolutionError},
	gateway::{self, Gateway},
	http::{self, ACCEPT_API_VERSION, IdpHttpClient, SERVER_INFO_API_VERSION},
	obs::{self, OperationKind, OperationOutcome, OperationSpan, log_event},
};

#[derive(Debug, Deserialize)]
struct ServerInfo {
	#[serde(rename = "cookieName", default)]
	cookie_name: Option<String>,
}

impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Returns the session identifier name, fetching server info on first use.
	///
	/// A successful answer is memoized for the lifetime of the gateway and later calls skip the
	/// network entirely. Failures are not cached, so the next call retries. Concurrent callers
	/// racing before the first success may each fetch; the first value written wins.
	pub async fn resolve_session_name(&self) -> Result<HeaderName> {
		const KIND: OperationKind = OperationKind::ResolveSessionName;

		let cached = self.cached_session_name();

		if let Some(name) = cached {
			return Ok(name);
		}

		let span = OperationSpan::new(KIND, "resolve_session_name");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.fetch_session_name()).await;

		obs::record_operation_outcome(KIND, OperationOutcome::from_success(result.is_ok()));

		let name = result?;
		let mut slot = self.session_name.write();

		Ok(slot.get_or_insert(name).clone())
	}

	async fn fetch_session_name(&self) -> Result<HeaderName> {
		let url = self.configuration.endpoints.server_info();

		log_event!(info, %url, "Retrieving IdP server info.");

		let request = oauth2::http::Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(ACCEPT_API_VERSION, SERVER_INFO_API_VERSION)
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let response = http::execute(self.http_client.as_ref(), request).await?;
		let status = response.status();

		if !status.is_success() {
			log_event!(error, status = status.as_u16(), "IdP server info call failed.");

			return Err(ResolutionError::UnexpectedStatus { status: status.as_u16() }.into());
		}

		let info: ServerInfo = gateway::parse_json(response.body())
			.map_err(|source| ResolutionError::MalformedResponse { source })?;
		let cookie_name = info
			.cookie_name
			.filter(|name| !name.is_empty())
			.ok_or(ResolutionError::MissingCookieName)?;
		let name = HeaderName::from_bytes(cookie_name.as_bytes())
			.map_err(|_| ResolutionError::InvalidHeaderName { name: cookie_name.clone() })?;

		log_event!(info, cookie_name = %cookie_name, "Resolved IdP session cookie name.");

		Ok(name)
	}
}
