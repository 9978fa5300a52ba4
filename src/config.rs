//! Immutable IdP configuration shared by every gateway call.
//!
//! [`Configuration`] is assembled once at startup through [`ConfigurationBuilder`], which rejects
//! missing IdP coordinates up front so the gateway never has to treat them as runtime errors.

pub mod endpoints;
pub mod env;

pub use endpoints::*;
pub use env::*;

// self
use crate::{_prelude::*, auth::{ScopeList, Secret}, error::ConfigError};

/// Validated IdP configuration owned by a [`Gateway`](crate::gateway::Gateway).
#[derive(Clone, Debug)]
pub struct Configuration {
	/// Realm-scoped URLs derived from the base URL.
	pub endpoints: IdpEndpoints,
	/// Normalized realm path (empty for the root realm).
	pub realm: String,
	/// IdP admin username used to open sessions.
	pub username: String,
	/// IdP admin password used to open sessions.
	pub password: Secret,
	/// Scopes attached to every provisioned OAuth2 client.
	pub scopes: ScopeList,
	/// Per-call timeout applied to every IdP request.
	pub request_timeout: Duration,
	/// Optional cap on client deletions in flight during a bulk cleanup; `None` issues every
	/// deletion at once.
	pub fan_out_limit: Option<usize>,
}
impl Configuration {
	/// Default per-call IdP timeout.
	pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(30);

	/// Creates an empty builder.
	pub fn builder() -> ConfigurationBuilder {
		ConfigurationBuilder::default()
	}
}

/// Builder for [`Configuration`] values.
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
	/// IdP base URL (for example `https://idp.example.com/openam`).
	pub base_url: Option<String>,
	/// Realm path; blank selects the root realm.
	pub realm: Option<String>,
	/// IdP admin username.
	pub username: Option<String>,
	/// IdP admin password.
	pub password: Option<String>,
	/// Scopes for provisioned clients.
	pub scopes: ScopeList,
	/// Per-call timeout override.
	pub request_timeout: Option<Duration>,
	/// Bulk-deletion concurrency cap.
	pub fan_out_limit: Option<usize>,
}
impl ConfigurationBuilder {
	/// Sets the IdP base URL.
	pub fn base_url(mut self, value: impl Into<String>) -> Self {
		self.base_url = Some(value.into());

		self
	}

	/// Sets the realm path.
	pub fn realm(mut self, value: impl Into<String>) -> Self {
		self.realm = Some(value.into());

		self
	}

	/// Sets the IdP admin username.
	pub fn username(mut self, value: impl Into<String>) -> Self {
		self.username = Some(value.into());

		self
	}

	/// Sets the IdP admin password.
	pub fn password(mut self, value: impl Into<String>) -> Self {
		self.password = Some(value.into());

		self
	}

	/// Sets the scopes attached to provisioned clients.
	pub fn scopes(mut self, scopes: ScopeList) -> Self {
		self.scopes = scopes;

		self
	}

	/// Overrides the per-call timeout (defaults to 30 seconds).
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Caps concurrent deletions during a bulk cleanup (unbounded unless set).
	pub fn fan_out_limit(mut self, limit: usize) -> Self {
		self.fan_out_limit = Some(limit);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<Configuration, ConfigError> {
		let base_url = required(self.base_url, "OPENAM_BASE_URI")?;
		let username = required(self.username, "OPENAM_USERNAME")?;
		let password = required(self.password, "OPENAM_PASSWORD")?;
		let realm = normalize_realm(self.realm.as_deref().unwrap_or_default());
		let endpoints = IdpEndpoints::derive(base_url.trim(), &realm)?;
		let request_timeout =
			self.request_timeout.unwrap_or(Configuration::DEFAULT_REQUEST_TIMEOUT);

		if !request_timeout.is_positive() {
			return Err(ConfigError::InvalidSetting {
				key: "IDP_REQUEST_TIMEOUT_SECS",
				value: request_timeout.to_string(),
			});
		}
		if self.fan_out_limit == Some(0) {
			return Err(ConfigError::InvalidSetting {
				key: "IDP_FAN_OUT_LIMIT",
				value: 0.to_string(),
			});
		}

		Ok(Configuration {
			endpoints,
			realm,
			username,
			password: Secret::new(password),
			scopes: self.scopes,
			request_timeout,
			fan_out_limit: self.fan_out_limit,
		})
	}
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
	match value {
		Some(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(ConfigError::Missing { key }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn complete() -> ConfigurationBuilder {
		Configuration::builder()
			.base_url("https://idp.example.com/openam")
			.username("amadmin")
			.password("secret")
	}

	#[test]
	fn missing_coordinates_are_fatal() {
		let err = Configuration::builder()
			.username("amadmin")
			.password("secret")
			.build()
			.expect_err("Base URL is required.");

		assert!(matches!(err, ConfigError::Missing { key: "OPENAM_BASE_URI" }));

		let err = complete().username("   ").build().expect_err("Blank username is rejected.");

		assert!(matches!(err, ConfigError::Missing { key: "OPENAM_USERNAME" }));

		let err = complete().password("").build().expect_err("Blank password is rejected.");

		assert!(matches!(err, ConfigError::Missing { key: "OPENAM_PASSWORD" }));
	}

	#[test]
	fn defaults_apply() {
		let config = complete().build().expect("Complete builder should succeed.");

		assert_eq!(config.request_timeout, Configuration::DEFAULT_REQUEST_TIMEOUT);
		assert_eq!(config.fan_out_limit, None);
		assert!(config.scopes.is_empty());
		assert_eq!(config.realm, "");
		assert_eq!(format!("{:?}", config.password), "Secret(\"<redacted>\")");
	}

	#[test]
	fn rejects_invalid_limits() {
		assert!(matches!(
			complete().fan_out_limit(0).build(),
			Err(ConfigError::InvalidSetting { key: "IDP_FAN_OUT_LIMIT", .. })
		));
		assert!(matches!(
			complete().request_timeout(Duration::ZERO).build(),
			Err(ConfigError::InvalidSetting { key: "IDP_REQUEST_TIMEOUT_SECS", .. })
		));
	}

	#[test]
	fn rejects_unparsable_base_url() {
		assert!(matches!(
			complete().base_url("not a url").build(),
			Err(ConfigError::InvalidBaseUrl { .. })
		));
	}
}
