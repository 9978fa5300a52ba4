//! Admin session exchange against the realm's authenticate endpoint.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	error::{ConfigError, SessionError},
	gateway::{self, Gateway},
	http::{self, IdpHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan, log_event},
};

/// Header carrying the admin username on the authenticate call.
pub const USERNAME_HEADER: &str = "X-OpenAM-Username";
/// Header carrying the admin password on the authenticate call.
pub const PASSWORD_HEADER: &str = "X-OpenAM-Password";

#[derive(Debug, Deserialize)]
struct AuthenticateResponse {
	#[serde(rename = "tokenId", default)]
	token_id: Option<String>,
}

impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Exchanges admin credentials for a short-lived session token.
	///
	/// A non-successful status, an unparsable body, or a missing `tokenId` yields
	/// [`SessionError`]; transport problems yield [`TransportError`](crate::error::TransportError).
	/// No gateway state is touched.
	pub async fn authenticate(&self, username: &str, password: &Secret) -> Result<Secret> {
		const KIND: OperationKind = OperationKind::Authenticate;

		let span = OperationSpan::new(KIND, "authenticate");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result: Result<Secret> = span
			.instrument(async move {
				let url = self.configuration.endpoints.authenticate();

				log_event!(info, %url, "Creating IdP admin session.");

				let request = oauth2::http::Request::builder()
					.method(Method::POST)
					.uri(url.as_str())
					.header(USERNAME_HEADER, username)
					.header(PASSWORD_HEADER, password.expose())
					.body(Vec::new())
					.map_err(ConfigError::from)?;
				let response = http::execute(self.http_client.as_ref(), request).await?;
				let status = response.status();

				if !status.is_success() {
					log_event!(warn, status = status.as_u16(), "IdP rejected admin authentication.");

					return Err(SessionError::Rejected { status: status.as_u16() }.into());
				}

				let body: AuthenticateResponse = gateway::parse_json(response.body())
					.map_err(|source| SessionError::MalformedResponse { source })?;

				match body.token_id {
					Some(token) if !token.is_empty() => {
						log_event!(debug, "IdP admin session established.");

						Ok(Secret::new(token))
					},
					_ => {
						log_event!(warn, "IdP authentication response carried no session token.");

						Err(SessionError::MissingToken.into())
					},
				}
			})
			.await;

		obs::record_operation_outcome(KIND, OperationOutcome::from_success(result.is_ok()));

		result
	}
}
