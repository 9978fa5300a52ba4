//! Process-environment loading for deployments that configure the broker through variables.

// self
use crate::{
	_prelude::*,
	auth::{ScopeList, Secret},
	config::Configuration,
	error::ConfigError,
};

/// IdP base URL.
pub const ENV_BASE_URI: &str = "OPENAM_BASE_URI";
/// IdP admin username.
pub const ENV_USERNAME: &str = "OPENAM_USERNAME";
/// IdP admin password.
pub const ENV_PASSWORD: &str = "OPENAM_PASSWORD";
/// Optional realm path.
pub const ENV_REALM: &str = "OPENAM_REALM";
/// Space-delimited scopes for provisioned clients.
pub const ENV_SCOPES: &str = "OAUTH2_SCOPES";
/// Username the platform must present to the broker API.
pub const ENV_BROKER_USERNAME: &str = "SECURITY_USER_NAME";
/// Password the platform must present to the broker API.
pub const ENV_BROKER_PASSWORD: &str = "SECURITY_USER_PASSWORD";
/// Optional per-call IdP timeout in whole seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "IDP_REQUEST_TIMEOUT_SECS";
/// Optional cap on concurrent deletions during bulk cleanup.
pub const ENV_FAN_OUT_LIMIT: &str = "IDP_FAN_OUT_LIMIT";

/// Everything a broker process needs at startup.
#[derive(Clone, Debug)]
pub struct EnvConfig {
	/// IdP-facing configuration.
	pub idp: Configuration,
	/// Username required on the broker's own API.
	pub broker_username: String,
	/// Password required on the broker's own API.
	pub broker_password: Secret,
}
impl EnvConfig {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads the configuration through an arbitrary key lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let scopes = lookup(ENV_SCOPES)
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::Missing { key: ENV_SCOPES })?
			.parse::<ScopeList>()?;
		let mut builder = Configuration::builder().scopes(scopes);

		if let Some(value) = lookup(ENV_BASE_URI) {
			builder = builder.base_url(value);
		}
		if let Some(value) = lookup(ENV_USERNAME) {
			builder = builder.username(value);
		}
		if let Some(value) = lookup(ENV_PASSWORD) {
			builder = builder.password(value);
		}
		if let Some(value) = lookup(ENV_REALM) {
			builder = builder.realm(value);
		}
		if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
			let secs = parse_setting::<u32>(ENV_REQUEST_TIMEOUT_SECS, &value)?;

			builder = builder.request_timeout(Duration::seconds(secs.into()));
		}
		if let Some(value) = lookup(ENV_FAN_OUT_LIMIT) {
			builder = builder.fan_out_limit(parse_setting(ENV_FAN_OUT_LIMIT, &value)?);
		}

		let idp = builder.build()?;
		let broker_username = non_blank(lookup(ENV_BROKER_USERNAME), ENV_BROKER_USERNAME)?;
		let broker_password = non_blank(lookup(ENV_BROKER_PASSWORD), ENV_BROKER_PASSWORD)?;

		Ok(Self { idp, broker_username, broker_password: Secret::new(broker_password) })
	}
}

fn non_blank(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
	value.filter(|value| !value.trim().is_empty()).ok_or(ConfigError::Missing { key })
}

fn parse_setting<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
	T: FromStr,
{
	raw.trim().parse().map_err(|_| ConfigError::InvalidSetting { key, value: raw.to_owned() })
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> =
			pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();

		move |key| map.get(key).cloned()
	}

	fn complete() -> Vec<(&'static str, &'static str)> {
		vec![
			(ENV_BASE_URI, "https://idp.example.com/openam"),
			(ENV_USERNAME, "amadmin"),
			(ENV_PASSWORD, "secret"),
			(ENV_REALM, "/customers/"),
			(ENV_SCOPES, "profile email"),
			(ENV_BROKER_USERNAME, "broker"),
			(ENV_BROKER_PASSWORD, "broker-secret"),
		]
	}

	#[test]
	fn loads_complete_environment() {
		let config =
			EnvConfig::from_lookup(lookup_from(&complete())).expect("Environment should load.");

		assert_eq!(config.idp.realm, "customers");
		assert_eq!(config.idp.scopes.as_slice(), ["profile", "email"]);
		assert_eq!(
			config.idp.endpoints.api_realm.as_str(),
			"https://idp.example.com/openam/json/customers/"
		);
		assert_eq!(config.broker_username, "broker");
		assert_eq!(config.broker_password.expose(), "broker-secret");
	}

	#[test]
	fn missing_required_values_are_reported_by_name() {
		for key in [
			ENV_BASE_URI,
			ENV_USERNAME,
			ENV_PASSWORD,
			ENV_SCOPES,
			ENV_BROKER_USERNAME,
			ENV_BROKER_PASSWORD,
		] {
			let pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != key).collect();
			let err = EnvConfig::from_lookup(lookup_from(&pairs))
				.expect_err("Missing required variable must fail.");

			assert!(
				matches!(err, ConfigError::Missing { key: missing } if missing == key),
				"Unexpected error for {key}: {err:?}"
			);
		}
	}

	#[test]
	fn optional_tuning_values_are_parsed() {
		let mut pairs = complete();

		pairs.push((ENV_REQUEST_TIMEOUT_SECS, "5"));
		pairs.push((ENV_FAN_OUT_LIMIT, "2"));

		let config = EnvConfig::from_lookup(lookup_from(&pairs)).expect("Environment should load.");

		assert_eq!(config.idp.request_timeout, Duration::seconds(5));
		assert_eq!(config.idp.fan_out_limit, Some(2));

		let mut pairs = complete();

		pairs.push((ENV_FAN_OUT_LIMIT, "many"));

		assert!(matches!(
			EnvConfig::from_lookup(lookup_from(&pairs)),
			Err(ConfigError::InvalidSetting { key: ENV_FAN_OUT_LIMIT, .. })
		));
	}
}
