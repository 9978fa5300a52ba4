//! Service broker core that provisions OAuth 2.0 clients inside an OpenAM-compatible identity
//! provider: session-authenticated IdP gateway, credential lifecycle operations, and bulk
//! instance cleanup with partial-failure semantics.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod broker;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod http;
pub mod obs;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests and demos.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Secret, ScopeList},
		broker::{PasswordGenerator, ServiceBroker},
		config::Configuration,
		gateway::ReqwestGateway,
		http::ReqwestHttpClient,
	};

	/// IdP admin username used by test configurations.
	pub const TEST_ADMIN_USERNAME: &str = "amadmin";
	/// IdP admin password used by test configurations.
	pub const TEST_ADMIN_PASSWORD: &str = "amadmin-password";
	/// Broker API username used by test brokers.
	pub const TEST_BROKER_USERNAME: &str = "broker";
	/// Broker API password used by test brokers.
	pub const TEST_BROKER_PASSWORD: &str = "broker-password";
	/// Password handed out by [`FixedPasswordGenerator`].
	pub const TEST_CLIENT_PASSWORD: &str = "generated-password";

	/// Builds a root-realm configuration pointing at `base_url` with the given scopes.
	pub fn test_configuration(base_url: &str, scopes: &[&str]) -> Configuration {
		Configuration::builder()
			.base_url(base_url)
			.username(TEST_ADMIN_USERNAME)
			.password(TEST_ADMIN_PASSWORD)
			.scopes(
				ScopeList::new(scopes.iter().copied())
					.expect("Test scopes should pass validation."),
			)
			.build()
			.expect("Test configuration should build successfully.")
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests while still honoring the configured per-call timeout.
	pub fn test_reqwest_http_client(configuration: &Configuration) -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.timeout(configuration.request_timeout.unsigned_abs())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a reqwest-backed gateway for the provided configuration.
	pub fn build_reqwest_test_gateway(configuration: Configuration) -> ReqwestGateway {
		let http_client = test_reqwest_http_client(&configuration);

		ReqwestGateway::with_http_client(configuration, http_client)
	}

	/// Password generator returning [`TEST_CLIENT_PASSWORD`] every time.
	#[derive(Clone, Copy, Debug, Default)]
	pub struct FixedPasswordGenerator;
	impl PasswordGenerator for FixedPasswordGenerator {
		fn generate(&self) -> Secret {
			Secret::new(TEST_CLIENT_PASSWORD)
		}
	}

	/// Wraps a test gateway in a [`ServiceBroker`] guarded by the test broker credentials.
	pub fn build_reqwest_test_broker(configuration: Configuration) -> ServiceBroker<ReqwestHttpClient> {
		let gateway = build_reqwest_test_gateway(configuration);

		ServiceBroker::new(Arc::new(gateway), TEST_BROKER_USERNAME, TEST_BROKER_PASSWORD)
			.with_password_generator(Arc::new(FixedPasswordGenerator))
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use oauth2::{
		HttpRequest, HttpResponse,
		http::{Method, StatusCode},
	};
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
