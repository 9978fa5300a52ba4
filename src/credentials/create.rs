//! OAuth2 client creation.

// self
use crate::{
	_prelude::*,
	auth::{ClientUsername, ScopeList, Secret, scope},
	error::ConfigError,
	gateway::Gateway,
	http::{self, IdpHttpClient},
	obs::{OperationKind, log_event},
};

/// Agent type the IdP uses for OAuth2 clients.
pub const OAUTH2_CLIENT_AGENT_TYPE: &str = "OAuth2Client";

/// Agent creation payload in the IdP's attribute format.
#[derive(Debug, Serialize)]
pub struct CreateAgentPayload<'a> {
	/// Agent (client) username.
	pub username: &'a str,
	/// Agent (client) password.
	pub userpassword: &'a str,
	/// Always [`OAUTH2_CLIENT_AGENT_TYPE`].
	#[serde(rename = "AgentType")]
	pub agent_type: &'static str,
	/// Display name, indexed as `[0]=<username>`.
	#[serde(rename = "com.forgerock.openam.oauth2provider.name")]
	pub name: Vec<String>,
	/// Granted scopes, indexed as `[i]=<scope>` in configuration order.
	#[serde(rename = "com.forgerock.openam.oauth2provider.scopes")]
	pub scopes: Vec<String>,
}
impl<'a> CreateAgentPayload<'a> {
	/// Builds the payload for an OAuth2 client.
	pub fn oauth2_client(
		username: &'a ClientUsername,
		password: &'a Secret,
		scopes: &ScopeList,
	) -> Self {
		Self {
			username: username.as_ref(),
			userpassword: password.expose(),
			agent_type: OAUTH2_CLIENT_AGENT_TYPE,
			name: scope::indexed([username.as_ref()]),
			scopes: scopes.indexed(),
		}
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Creates an OAuth2 client agent and returns the IdP's response.
	///
	/// Callers interpret the status with
	/// [`CreateClientOutcome`](crate::credentials::CreateClientOutcome).
	pub async fn create_client(
		&self,
		username: &ClientUsername,
		password: &Secret,
		scopes: &ScopeList,
	) -> HttpResponse {
		log_event!(info, client = %username, "Creating OAuth2 client.");

		let request = serde_json::to_vec(&CreateAgentPayload::oauth2_client(username, password, scopes))
			.map_err(ConfigError::from)
			.and_then(|body| {
				http::with_json_body(
					http::agents_request(Method::POST, &self.configuration.endpoints.create_agent()),
					body,
				)
				.map_err(ConfigError::from)
			});

		self.dispatch_operation(OperationKind::CreateClient, request).await
	}
}
