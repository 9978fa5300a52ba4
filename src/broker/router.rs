//! Framework-neutral routing of broker API requests.

// crates.io
use oauth2::http::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::json;
// self
use crate::{
	_prelude::*,
	auth::{BindingId, InstanceId},
	broker::{
		BindRequest, BrokerOutcome, BrokerResponse, ProvisionRequest, ServiceBroker,
		basic_authorization,
	},
	error::BrokerError,
	gateway,
	http::IdpHttpClient,
	obs::log_event,
};

const INVALID_BODY: &str = "Request body is not a valid JSON document for this operation.";

/// Incoming broker API request.
#[derive(Clone, Debug, Default)]
pub struct BrokerRequest {
	/// HTTP method.
	pub method: Method,
	/// Request path, for example `/v2/catalog`.
	pub path: String,
	/// Raw query string without the leading `?`.
	pub query: Option<String>,
	/// Every `Authorization` header value, in arrival order.
	pub authorization: Vec<String>,
	/// Raw request body.
	pub body: Vec<u8>,
}
impl BrokerRequest {
	/// Starts a request with no headers, query, or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), ..Default::default() }
	}

	/// Starts a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Starts a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Starts a `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// Starts a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Adds an `Authorization: Basic` header.
	pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
		self.authorization.push(basic_authorization(username, password));

		self
	}

	/// Sets the query string.
	pub fn with_query(mut self, query: impl Into<String>) -> Self {
		self.query = Some(query.into());

		self
	}

	/// Sets a JSON body.
	pub fn with_json(mut self, body: &serde_json::Value) -> Self {
		self.body = body.to_string().into_bytes();

		self
	}

	fn query_param(&self, key: &str) -> Option<String> {
		let query = self.query.as_deref()?;

		url::form_urlencoded::parse(query.as_bytes())
			.find(|(name, _)| name == key)
			.map(|(_, value)| value.into_owned())
	}

	fn parse_body<T>(&self) -> Result<T, BrokerResponse>
	where
		T: DeserializeOwned,
	{
		gateway::parse_json(&self.body).map_err(|err| {
			log_event!(debug, error = %err, "Rejecting unparsable broker request body.");

			BrokerResponse::described(StatusCode::BAD_REQUEST, INVALID_BODY)
		})
	}
}
impl From<HttpRequest> for BrokerRequest {
	fn from(request: HttpRequest) -> Self {
		let (parts, body) = request.into_parts();
		let authorization = parts
			.headers
			.get_all(AUTHORIZATION)
			.iter()
			.map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
			.collect();

		Self {
			method: parts.method,
			path: parts.uri.path().to_owned(),
			query: parts.uri.query().map(ToOwned::to_owned),
			authorization,
			body,
		}
	}
}

impl<C> ServiceBroker<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Authenticates and routes one broker API request.
	pub async fn handle(&self, request: BrokerRequest) -> BrokerResponse {
		if !self.gate.admits(&request.authorization) {
			log_event!(warn, path = %request.path, "Rejecting unauthenticated broker request.");

			return BrokerResponse::empty(StatusCode::UNAUTHORIZED);
		}

		let path = request.path.trim_matches('/').to_owned();
		let segments = path.split('/').collect::<Vec<_>>();
		let routed = match segments.as_slice() {
			["v2", "catalog"] => self.route_catalog(&request),
			["v2", "service_instances", instance] => self.route_instance(&request, instance).await,
			["v2", "service_instances", instance, "service_bindings", binding] =>
				self.route_binding(&request, instance, binding).await,
			_ => Err(BrokerResponse::json(StatusCode::NOT_FOUND, json!({}))),
		};

		routed.unwrap_or_else(|response| response)
	}

	fn route_catalog(&self, request: &BrokerRequest) -> Result<BrokerResponse, BrokerResponse> {
		if request.method != Method::GET {
			return Err(method_not_allowed());
		}

		let body = serde_json::to_value(self.catalog()).map_err(|err| {
			log_event!(error, error = %err, "Unable to render catalog.");

			BrokerResponse::json(StatusCode::INTERNAL_SERVER_ERROR, json!({}))
		})?;

		Ok(BrokerResponse::json(StatusCode::OK, body))
	}

	async fn route_instance(
		&self,
		request: &BrokerRequest,
		instance: &str,
	) -> Result<BrokerResponse, BrokerResponse> {
		if ![Method::PUT, Method::PATCH, Method::DELETE].contains(&request.method) {
			return Err(method_not_allowed());
		}

		let instance = InstanceId::new(instance).map_err(invalid_identifier)?;

		if request.method == Method::DELETE {
			self.ensure_known_service(request.query_param("service_id").as_deref())?;

			return Ok(self.deprovision(&instance).await.into_response());
		}

		let body = request.parse_body::<ProvisionRequest>()?;

		self.ensure_known_service(body.service_id.as_deref())?;

		let outcome = if request.method == Method::PUT {
			self.provision(&instance)
		} else {
			self.update(&instance)
		};

		Ok(outcome.into_response())
	}

	async fn route_binding(
		&self,
		request: &BrokerRequest,
		instance: &str,
		binding: &str,
	) -> Result<BrokerResponse, BrokerResponse> {
		if ![Method::PUT, Method::DELETE].contains(&request.method) {
			return Err(method_not_allowed());
		}

		let instance = InstanceId::new(instance).map_err(invalid_identifier)?;
		let binding = BindingId::new(binding).map_err(invalid_identifier)?;
		let outcome = if request.method == Method::PUT {
			let body = request.parse_body::<BindRequest>()?;

			self.ensure_known_service(body.service_id.as_deref())?;
			self.bind(&instance, &binding, &body).await
		} else {
			self.ensure_known_service(request.query_param("service_id").as_deref())?;
			self.unbind(&instance, &binding).await
		};

		outcome.map(BrokerOutcome::into_response).map_err(broker_error)
	}

	fn ensure_known_service(&self, service_id: Option<&str>) -> Result<(), BrokerResponse> {
		match service_id {
			Some(id) if self.catalog().offers(id) => Ok(()),
			id => Err(BrokerResponse::described(
				StatusCode::BAD_REQUEST,
				format!("Unknown service_id : {}", id.unwrap_or("null")),
			)),
		}
	}
}

fn method_not_allowed() -> BrokerResponse {
	BrokerResponse::json(StatusCode::METHOD_NOT_ALLOWED, json!({}))
}

fn invalid_identifier(err: crate::auth::IdentifierError) -> BrokerResponse {
	broker_error(err.into())
}

fn broker_error(err: BrokerError) -> BrokerResponse {
	match err {
		BrokerError::RequiresApp => BrokerResponse::json(
			StatusCode::UNPROCESSABLE_ENTITY,
			json!({ "error": "RequiresApp", "description": err.to_string() }),
		),
		BrokerError::InvalidIdentifier(_) =>
			BrokerResponse::described(StatusCode::BAD_REQUEST, err),
	}
}
