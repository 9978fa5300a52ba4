//! Service broker API on top of the gateway.
//!
//! [`ServiceBroker`] owns everything one broker deployment needs: a shared [`Gateway`], the
//! static [`Catalog`], the [`BasicAuthGate`] protecting the API, and the [`PasswordGenerator`]
//! used for new bindings. [`ServiceBroker::handle`] routes framework-neutral requests so any HTTP
//! server can host it.

pub mod binding;
pub mod catalog;
pub mod gate;
pub mod outcome;
pub mod password;
pub mod provisioning;
pub mod router;

pub use binding::*;
pub use catalog::*;
pub use gate::*;
pub use outcome::*;
pub use password::*;
pub use provisioning::*;
pub use router::*;

// self
use crate::{_prelude::*, gateway::Gateway, http::IdpHttpClient};
#[cfg(feature = "reqwest")]
use crate::{config::EnvConfig, error::ConfigError, http::ReqwestHttpClient};

/// Broker deployment bound to one IdP configuration.
pub struct ServiceBroker<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Gateway every IdP call flows through.
	pub gateway: Arc<Gateway<C>>,
	catalog: Catalog,
	gate: BasicAuthGate,
	passwords: Arc<dyn PasswordGenerator>,
}
impl<C> ServiceBroker<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Creates a broker guarded by the given API credentials, generating random client
	/// passwords.
	pub fn new(
		gateway: Arc<Gateway<C>>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			gateway,
			catalog: Catalog::default(),
			gate: BasicAuthGate::new(username, password),
			passwords: Arc::new(RandomPasswordGenerator),
		}
	}

	/// Replaces the password generator used for new bindings.
	pub fn with_password_generator(mut self, passwords: Arc<dyn PasswordGenerator>) -> Self {
		self.passwords = passwords;

		self
	}

	/// Advertised catalog.
	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}
}
#[cfg(feature = "reqwest")]
impl ServiceBroker<ReqwestHttpClient> {
	/// Builds a reqwest-backed broker from environment-derived settings.
	pub fn from_env_config(config: EnvConfig) -> Result<Self, ConfigError> {
		let gateway = Gateway::new(config.idp)?;

		Ok(Self::new(Arc::new(gateway), config.broker_username, config.broker_password.expose()))
	}
}
impl<C> Clone for ServiceBroker<C>
where
	C: ?Sized + IdpHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			gateway: self.gateway.clone(),
			catalog: self.catalog.clone(),
			gate: self.gate.clone(),
			passwords: self.passwords.clone(),
		}
	}
}
impl<C> Debug for ServiceBroker<C>
where
	C: ?Sized + IdpHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceBroker")
			.field("gateway", &self.gateway)
			.field("gate", &self.gate)
			.finish_non_exhaustive()
	}
}
