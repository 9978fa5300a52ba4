//! Platform-facing outcomes and the JSON responses they render to.

// crates.io
use oauth2::http::header::CONTENT_TYPE;
use serde_json::{Value, json};
// self
use crate::{_prelude::*, auth::Secret};

/// Credentials handed to a bound application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
	/// Realm OAuth2 endpoint of the IdP.
	pub uri: String,
	/// OAuth2 client id.
	pub username: String,
	/// OAuth2 client secret.
	pub password: Secret,
}

/// Result of a broker operation as reported to the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrokerOutcome {
	/// A binding produced fresh credentials.
	CreatedWithCredentials(Credentials),
	/// The binding already exists.
	Conflict,
	/// The binding was already removed.
	Gone,
	/// The operation completed.
	Ok,
	/// The broker could not open an IdP admin session.
	Unauthorized,
	/// Anything else went wrong.
	InternalError,
}
impl BrokerOutcome {
	/// Status code reported for this outcome.
	pub fn status(&self) -> StatusCode {
		match self {
			Self::CreatedWithCredentials(_) => StatusCode::CREATED,
			Self::Conflict => StatusCode::CONFLICT,
			Self::Gone => StatusCode::GONE,
			Self::Ok => StatusCode::OK,
			Self::Unauthorized => StatusCode::UNAUTHORIZED,
			Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Renders the outcome as a platform response.
	pub fn into_response(self) -> BrokerResponse {
		let status = self.status();

		match self {
			Self::CreatedWithCredentials(credentials) =>
				BrokerResponse::json(status, json!({ "credentials": credentials })),
			_ => BrokerResponse::json(status, json!({})),
		}
	}
}

/// Response produced by [`ServiceBroker::handle`](crate::broker::ServiceBroker::handle).
#[derive(Clone, Debug, PartialEq)]
pub struct BrokerResponse {
	/// Status code.
	pub status: StatusCode,
	/// JSON body; `None` renders as an empty body.
	pub body: Option<Value>,
}
impl BrokerResponse {
	/// Response carrying a JSON document.
	pub fn json(status: StatusCode, body: Value) -> Self {
		Self { status, body: Some(body) }
	}

	/// Response with no body at all.
	pub fn empty(status: StatusCode) -> Self {
		Self { status, body: None }
	}

	/// Response carrying `{"description": ...}`.
	pub fn described(status: StatusCode, description: impl Display) -> Self {
		Self::json(status, json!({ "description": description.to_string() }))
	}

	/// Converts into an HTTP response suitable for any server framework.
	pub fn into_http(self) -> HttpResponse {
		let Some(body) = self.body else {
			return crate::http::empty_response(self.status);
		};
		let mut response = HttpResponse::new(body.to_string().into_bytes());

		*response.status_mut() = self.status;

		response
			.headers_mut()
			.insert(CONTENT_TYPE, oauth2::http::HeaderValue::from_static("application/json"));

		response
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcomes_map_to_statuses_with_empty_objects() {
		for (outcome, status) in [
			(BrokerOutcome::Conflict, 409),
			(BrokerOutcome::Gone, 410),
			(BrokerOutcome::Ok, 200),
			(BrokerOutcome::Unauthorized, 401),
			(BrokerOutcome::InternalError, 500),
		] {
			let response = outcome.into_response();

			assert_eq!(response.status.as_u16(), status);
			assert_eq!(response.body, Some(json!({})));
		}
	}

	#[test]
	fn created_outcome_renders_credentials() {
		let response = BrokerOutcome::CreatedWithCredentials(Credentials {
			uri: "https://idp.example.com/openam/oauth2/".into(),
			username: "inst-bind".into(),
			password: Secret::new("pw"),
		})
		.into_response();

		assert_eq!(response.status, StatusCode::CREATED);
		assert_eq!(
			response.body,
			Some(json!({
				"credentials": {
					"uri": "https://idp.example.com/openam/oauth2/",
					"username": "inst-bind",
					"password": "pw",
				}
			}))
		);
	}

	#[test]
	fn http_conversion_keeps_empty_bodies_empty() {
		let response = BrokerResponse::empty(StatusCode::UNAUTHORIZED).into_http();

		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
		assert!(response.body().is_empty());

		let response = BrokerResponse::json(StatusCode::OK, json!({})).into_http();

		assert_eq!(response.body(), b"{}");
		assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
	}
}
