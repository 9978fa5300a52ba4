//! OAuth2 client listing.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	gateway::{self, Gateway},
	http::{self, IdpHttpClient},
	obs::{OperationKind, log_event},
};

/// Body of the agent query response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AgentList {
	/// Agent records; only the username matters to the broker.
	pub result: Vec<AgentRecord>,
}
impl AgentList {
	/// Parses an agent query body.
	pub fn from_body(body: &[u8]) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		gateway::parse_json(body)
	}

	/// Usernames of every record that carries one.
	pub fn usernames(&self) -> impl Iterator<Item = &str> {
		self.result.iter().filter_map(|record| record.username.as_deref())
	}
}

/// One agent as reported by the IdP.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AgentRecord {
	/// Agent username, when present.
	#[serde(default)]
	pub username: Option<String>,
}

impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Lists every agent in the realm and returns the raw IdP response.
	pub async fn list_clients(&self) -> HttpResponse {
		log_event!(info, "Retrieving list of OAuth2 clients.");

		let request = http::agents_request(Method::GET, &self.configuration.endpoints.query_agents())
			.body(Vec::new())
			.map_err(ConfigError::from);

		self.dispatch_operation(OperationKind::ListClients, request).await
	}
}
