//! Static service catalog advertised to the platform.

// self
use crate::_prelude::*;

/// Identifier of the single advertised service.
pub const SERVICE_ID: &str = "3997be2d-e262-438e-8a31-8c90fa7156e5";
/// Identifier of the single advertised plan.
pub const PLAN_ID: &str = "0140f6db-972a-466e-9e79-7845098a4ec7";

/// Catalog document served from `GET /v2/catalog`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Catalog {
	/// Offered services.
	pub services: Vec<ServiceOffering>,
}
impl Catalog {
	/// Returns true when `service_id` names an offered service.
	pub fn offers(&self, service_id: &str) -> bool {
		self.services.iter().any(|service| service.id == service_id)
	}
}
impl Default for Catalog {
	fn default() -> Self {
		Self {
			services: vec![ServiceOffering {
				id: SERVICE_ID.into(),
				name: "openam-oauth2".into(),
				description: "Uses ForgeRock OpenAM to provide OAuth 2.0 authorization".into(),
				tags: vec!["authentication".into(), "oauth2".into()],
				bindable: true,
				metadata: ServiceMetadata { display_name: "ForgeRock OpenAM".into() },
				plans: vec![ServicePlan {
					id: PLAN_ID.into(),
					name: "shared".into(),
					description: "Shared OpenAM server".into(),
				}],
			}],
		}
	}
}

/// One offered service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServiceOffering {
	/// Stable service identifier.
	pub id: String,
	/// CLI-friendly service name.
	pub name: String,
	/// Human-readable description.
	pub description: String,
	/// Marketplace tags.
	pub tags: Vec<String>,
	/// Whether applications may bind to instances.
	pub bindable: bool,
	/// Presentation metadata.
	pub metadata: ServiceMetadata,
	/// Offered plans.
	pub plans: Vec<ServicePlan>,
}

/// Presentation metadata of a service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServiceMetadata {
	/// Marketplace display name.
	#[serde(rename = "displayName")]
	pub display_name: String,
}

/// One plan of a service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServicePlan {
	/// Stable plan identifier.
	pub id: String,
	/// CLI-friendly plan name.
	pub name: String,
	/// Human-readable description.
	pub description: String,
}
