//! Binding lifecycle: one OAuth2 client per application binding.

// self
use crate::{
	_prelude::*,
	auth::{BindingId, ClientUsername, InstanceId},
	broker::{BrokerOutcome, Credentials, ServiceBroker},
	credentials::{CreateClientOutcome, DeleteClientOutcome},
	error::BrokerError,
	http::IdpHttpClient,
	obs::{self, OperationKind, OperationOutcome, OperationSpan, log_event},
};

/// Body of `PUT .../service_bindings/{binding_id}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BindRequest {
	/// Service the binding belongs to.
	#[serde(default)]
	pub service_id: Option<String>,
	/// Plan the instance was created with.
	#[serde(default)]
	pub plan_id: Option<String>,
	/// Resource being bound.
	#[serde(default)]
	pub bind_resource: Option<BindResource>,
	/// Arbitrary caller parameters; ignored.
	#[serde(default)]
	pub parameters: Option<serde_json::Value>,
}
impl BindRequest {
	/// Returns true when the request names an application to bind to.
	pub fn binds_app(&self) -> bool {
		self.bind_resource.as_ref().is_some_and(|resource| resource.app_guid.is_some())
	}
}

/// Resource a binding targets.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BindResource {
	/// Application GUID; bindings without one are refused.
	#[serde(default)]
	pub app_guid: Option<String>,
	/// Route for route-service bindings.
	#[serde(default)]
	pub route: Option<String>,
}

impl<C> ServiceBroker<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Creates the `{instance}-{binding}` client with a generated password.
	pub async fn bind(
		&self,
		instance: &InstanceId,
		binding: &BindingId,
		request: &BindRequest,
	) -> Result<BrokerOutcome, BrokerError> {
		const KIND: OperationKind = OperationKind::Bind;

		if !request.binds_app() {
			return Err(BrokerError::RequiresApp);
		}

		let username = ClientUsername::for_binding(instance, binding)?;
		let span = OperationSpan::new(KIND, "bind");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let outcome = span
			.instrument(async {
				let configuration = &self.gateway.configuration;
				let password = self.passwords.generate();
				let response =
					self.gateway.create_client(&username, &password, &configuration.scopes).await;

				match CreateClientOutcome::classify(response.status()) {
					CreateClientOutcome::Created => {
						log_event!(info, client = %username, "OAuth2 client created for binding.");

						BrokerOutcome::CreatedWithCredentials(Credentials {
							uri: configuration.endpoints.oauth2.to_string(),
							username: username.to_string(),
							password,
						})
					},
					CreateClientOutcome::AlreadyExists => BrokerOutcome::Conflict,
					CreateClientOutcome::Unauthorized => BrokerOutcome::Unauthorized,
					CreateClientOutcome::Failed { status } => {
						log_event!(error, client = %username, status, "IdP refused client creation.");

						BrokerOutcome::InternalError
					},
				}
			})
			.await;

		obs::record_operation_outcome(
			KIND,
			OperationOutcome::from_success(matches!(outcome, BrokerOutcome::CreatedWithCredentials(_))),
		);

		Ok(outcome)
	}

	/// Removes the `{instance}-{binding}` client.
	pub async fn unbind(
		&self,
		instance: &InstanceId,
		binding: &BindingId,
	) -> Result<BrokerOutcome, BrokerError> {
		const KIND: OperationKind = OperationKind::Unbind;

		let username = ClientUsername::for_binding(instance, binding)?;
		let span = OperationSpan::new(KIND, "unbind");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let outcome = span
			.instrument(async {
				let response = self.gateway.delete_client(&username).await;

				match DeleteClientOutcome::classify(response.status()) {
					DeleteClientOutcome::Deleted => BrokerOutcome::Ok,
					DeleteClientOutcome::AlreadyRemoved => BrokerOutcome::Gone,
					DeleteClientOutcome::Unauthorized => BrokerOutcome::Unauthorized,
					DeleteClientOutcome::Failed { status } => {
						log_event!(error, client = %username, status, "IdP refused client removal.");

						BrokerOutcome::InternalError
					},
				}
			})
			.await;

		obs::record_operation_outcome(
			KIND,
			OperationOutcome::from_success(outcome == BrokerOutcome::Ok),
		);

		Ok(outcome)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn app_guid_is_required() {
		let parse = |raw: &str| -> BindRequest {
			serde_json::from_str(raw).expect("Bind request fixture should parse.")
		};

		assert!(parse(r#"{"bind_resource":{"app_guid":"app"}}"#).binds_app());
		assert!(!parse(r#"{"bind_resource":{"route":"r.example.com"}}"#).binds_app());
		assert!(!parse(r#"{"service_id":"x"}"#).binds_app());
		assert!(!parse("{}").binds_app());
	}
}
