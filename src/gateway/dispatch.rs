//! Session-decorated request dispatch.

// crates.io
use oauth2::http::HeaderValue;
// self
use crate::{
	_prelude::*,
	gateway::Gateway,
	http::{self, IdpHttpClient},
	obs::log_event,
};

impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Authenticates, resolves the session header name, and sends `request` with the session
	/// token attached.
	///
	/// Never fails: a rejected admin session yields an empty `401` without touching server info
	/// or the target; any other gateway problem (resolution failure, transport failure, timeout)
	/// yields an empty `500`. Upstream responses are returned unmodified.
	pub async fn dispatch(&self, mut request: HttpRequest) -> HttpResponse {
		let configuration = &self.configuration;
		let token = match self.authenticate(&configuration.username, &configuration.password).await
		{
			Ok(token) => token,
			Err(Error::Session(_)) => return http::empty_response(StatusCode::UNAUTHORIZED),
			Err(err) => {
				log_event!(error, error = %err, "IdP authentication could not complete.");

				return http::empty_response(StatusCode::INTERNAL_SERVER_ERROR);
			},
		};
		let name = match self.resolve_session_name().await {
			Ok(name) => name,
			Err(err) => {
				log_event!(error, error = %err, "Unable to resolve IdP session cookie name.");

				return http::empty_response(StatusCode::INTERNAL_SERVER_ERROR);
			},
		};
		let Ok(mut value) = HeaderValue::from_str(token.expose()) else {
			log_event!(error, "IdP issued a session token that is not a valid header value.");

			return http::empty_response(StatusCode::INTERNAL_SERVER_ERROR);
		};

		value.set_sensitive(true);
		request.headers_mut().append(name, value);

		match http::execute(self.http_client.as_ref(), request).await {
			Ok(response) => response,
			Err(err) => {
				log_event!(error, error = %err, "IdP request failed in transport.");

				http::empty_response(StatusCode::INTERNAL_SERVER_ERROR)
			},
		}
	}
}
