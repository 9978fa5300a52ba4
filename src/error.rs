//! Broker-level error types shared by the gateway, credential operations, and configuration.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical broker error exposed by public APIs.
///
/// Gateway-mediated calls never surface these to broker callers; the dispatcher folds them into
/// fixed status responses instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The IdP refused to open an admin session.
	#[error(transparent)]
	Session(#[from] SessionError),
	/// The session identifier name could not be discovered.
	#[error(transparent)]
	Resolution(#[from] ResolutionError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// A broker request was rejected before reaching the IdP.
	#[error(transparent)]
	Broker(#[from] BrokerError),
}

/// Configuration and validation failures raised while building the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting is absent or blank.
	#[error("Required configuration missing: {key}.")]
	Missing {
		/// Setting or environment variable name.
		key: &'static str,
	},
	/// The IdP base URL cannot be parsed.
	#[error("The IdP base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A numeric setting could not be parsed or is out of range.
	#[error("Setting `{key}` has an invalid value: {value}.")]
	InvalidSetting {
		/// Setting or environment variable name.
		key: &'static str,
		/// Offending raw value.
		value: String,
	},
	/// Configured scopes failed validation.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A request payload could not be serialized.
	#[error("Request payload could not be serialized.")]
	Payload(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Admin session could not be established against the IdP.
#[derive(Debug, ThisError)]
pub enum SessionError {
	/// The authenticate endpoint answered with a non-successful status.
	#[error("IdP rejected the admin credentials with status {status}.")]
	Rejected {
		/// HTTP status returned by the IdP.
		status: u16,
	},
	/// The authenticate endpoint returned a body that is not the expected JSON document.
	#[error("IdP returned a malformed authentication response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// The authenticate response carried no usable `tokenId`.
	#[error("IdP authentication response did not include a session token.")]
	MissingToken,
}

/// Session identifier name discovery failed.
#[derive(Debug, ThisError)]
pub enum ResolutionError {
	/// The server-info endpoint answered with a non-successful status.
	#[error("IdP server info returned status {status}.")]
	UnexpectedStatus {
		/// HTTP status returned by the IdP.
		status: u16,
	},
	/// The server-info body is not the expected JSON document.
	#[error("IdP returned a malformed server info response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// The server-info body has no usable `cookieName`.
	#[error("IdP server info did not include a cookie name.")]
	MissingCookieName,
	/// The advertised cookie name cannot be used as an HTTP header name.
	#[error("IdP advertised `{name}` which is not a valid header name.")]
	InvalidHeaderName {
		/// Name advertised by the IdP.
		name: String,
	},
}

/// Broker requests refused before any IdP call is made.
#[derive(Debug, ThisError)]
pub enum BrokerError {
	/// A binding was requested without an application to bind to.
	#[error("This service supports generation of credentials through binding an application only.")]
	RequiresApp,
	/// An instance, binding, or derived client identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the IdP.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the IdP.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
