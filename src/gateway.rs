//! IdP session gateway: the single point through which every management call flows.
//!
//! Each gateway-mediated call runs three stages in order, short-circuiting on failure:
//!
//! 1. [`Gateway::authenticate`] exchanges the configured admin credentials for a fresh session
//!    token. Tokens are never reused across calls.
//! 2. [`Gateway::resolve_session_name`] learns the header name the IdP expects the token under.
//!    The first successful answer is cached for the lifetime of the gateway; failures are not.
//! 3. [`Gateway::dispatch`] attaches the token under that name and sends the request.
//!
//! Dispatch never fails: authentication failures become an empty `401`, every other problem an
//! empty `500`, and upstream responses are returned untouched for the caller to interpret.

pub mod dispatch;
pub mod server_info;
pub mod session;

// crates.io
use oauth2::http::HeaderName;
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, config::Configuration, http::IdpHttpClient};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// IdP-facing client owned by whichever layer serves one broker configuration.
///
/// The configuration is immutable and freely shared. The cached session identifier name is the
/// only mutable state; it sits behind a read-mostly lock so concurrent dispatches can read it
/// while the first successful resolution writes it.
pub struct Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Validated IdP configuration.
	pub configuration: Arc<Configuration>,
	/// HTTP client wrapper used for every outbound IdP request.
	pub http_client: Arc<C>,
	session_name: RwLock<Option<HeaderName>>,
}
impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_http_client(
		configuration: impl Into<Arc<Configuration>>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			configuration: configuration.into(),
			http_client: http_client.into(),
			session_name: RwLock::new(None),
		}
	}

	/// Returns the session identifier name if one has been resolved already.
	pub fn cached_session_name(&self) -> Option<HeaderName> {
		self.session_name.read().clone()
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient> {
	/// Creates a gateway with its own reqwest transport honoring the configured timeout.
	pub fn new(configuration: Configuration) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::from_configuration(&configuration)?;

		Ok(Self::with_http_client(configuration, http_client))
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("configuration", &self.configuration)
			.field("session_name", &self.cached_session_name())
			.finish()
	}
}

/// Parses a JSON body, keeping the failing path for diagnostics.
pub(crate) fn parse_json<T>(body: &[u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}
