//! OAuth2 client removal.

// self
use crate::{
	_prelude::*,
	auth::ClientUsername,
	error::ConfigError,
	gateway::Gateway,
	http::{self, IdpHttpClient},
	obs::{OperationKind, log_event},
};

impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Deletes the agent named `username` and returns the IdP's response.
	///
	/// The IdP answers `400` for unknown agents; callers treat that as "already gone" via
	/// [`DeleteClientOutcome`](crate::credentials::DeleteClientOutcome).
	pub async fn delete_client(&self, username: &ClientUsername) -> HttpResponse {
		log_event!(info, client = %username, "Deleting OAuth2 client.");

		let request = http::agents_request(Method::DELETE, &self.configuration.endpoints.agent(username))
			.body(Vec::new())
			.map_err(ConfigError::from);

		self.dispatch_operation(OperationKind::DeleteClient, request).await
	}
}
