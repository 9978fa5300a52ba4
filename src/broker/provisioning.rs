//! Instance lifecycle. Instances are a naming convention only, so creation and update touch
//! nothing in the IdP; removal cleans up every client the instance owns.

// self
use crate::{
	_prelude::*,
	auth::InstanceId,
	broker::{BrokerOutcome, ServiceBroker},
	credentials::DeprovisionOutcome,
	http::IdpHttpClient,
	obs::log_event,
};

/// Body of `PUT`/`PATCH /v2/service_instances/{instance_id}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProvisionRequest {
	/// Service the instance belongs to.
	#[serde(default)]
	pub service_id: Option<String>,
	/// Selected plan.
	#[serde(default)]
	pub plan_id: Option<String>,
	/// Arbitrary caller parameters; ignored.
	#[serde(default)]
	pub parameters: Option<serde_json::Value>,
}

impl<C> ServiceBroker<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Accepts a new instance.
	pub fn provision(&self, instance: &InstanceId) -> BrokerOutcome {
		log_event!(info, %instance, "Provisioning service instance.");

		BrokerOutcome::Ok
	}

	/// Accepts an instance update.
	pub fn update(&self, instance: &InstanceId) -> BrokerOutcome {
		log_event!(info, %instance, "Updating service instance.");

		BrokerOutcome::Ok
	}

	/// Removes every client provisioned under `instance`.
	pub async fn deprovision(&self, instance: &InstanceId) -> BrokerOutcome {
		match self.gateway.deprovision(instance).await {
			DeprovisionOutcome::Ok => BrokerOutcome::Ok,
			DeprovisionOutcome::InternalError => BrokerOutcome::InternalError,
		}
	}
}
