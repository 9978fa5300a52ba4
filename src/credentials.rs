//! OAuth2 client lifecycle operations layered on the gateway.
//!
//! [`Gateway::create_client`], [`Gateway::delete_client`], and [`Gateway::list_clients`] only
//! build IdP requests and hand them to [`Gateway::dispatch`]; the raw response comes back to the
//! caller, which interprets the status through [`CreateClientOutcome`] and
//! [`DeleteClientOutcome`]. [`Gateway::deprovision`] is the one operation that interprets
//! responses itself, because it aggregates many deletions into a single verdict.

pub mod bulk;
pub mod create;
pub mod delete;
pub mod list;

pub use bulk::*;
pub use list::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	gateway::Gateway,
	http::{self, IdpHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan, log_event},
};

/// Interpretation of a create-client response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateClientOutcome {
	/// The IdP stored the new client.
	Created,
	/// A client with the same username already exists.
	AlreadyExists,
	/// The gateway could not open an admin session.
	Unauthorized,
	/// Anything else, reported as an internal error.
	Failed {
		/// Status observed on the response.
		status: u16,
	},
}
impl CreateClientOutcome {
	/// Classifies a create-client response status.
	pub fn classify(status: StatusCode) -> Self {
		match status {
			status if status.is_success() => Self::Created,
			StatusCode::CONFLICT => Self::AlreadyExists,
			StatusCode::UNAUTHORIZED => Self::Unauthorized,
			status => Self::Failed { status: status.as_u16() },
		}
	}
}

/// Interpretation of a delete-client response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteClientOutcome {
	/// The IdP removed the client.
	Deleted,
	/// The IdP answered `400`, its way of saying the client does not exist.
	AlreadyRemoved,
	/// The gateway could not open an admin session.
	Unauthorized,
	/// Anything else.
	Failed {
		/// Status observed on the response.
		status: u16,
	},
}
impl DeleteClientOutcome {
	/// Classifies a delete-client response status.
	pub fn classify(status: StatusCode) -> Self {
		match status {
			status if status.is_success() => Self::Deleted,
			StatusCode::BAD_REQUEST => Self::AlreadyRemoved,
			StatusCode::UNAUTHORIZED => Self::Unauthorized,
			status => Self::Failed { status: status.as_u16() },
		}
	}

	/// Returns true when the client is gone after the call, whoever removed it.
	pub fn is_tolerated(self) -> bool {
		matches!(self, Self::Deleted | Self::AlreadyRemoved)
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Dispatches a prepared request inside an operation span and records its outcome.
	async fn dispatch_operation(
		&self,
		kind: OperationKind,
		request: Result<HttpRequest, ConfigError>,
	) -> HttpResponse {
		let span = OperationSpan::new(kind, kind.as_str());

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		let response = span
			.instrument(async move {
				match request {
					Ok(request) => self.dispatch(request).await,
					Err(err) => {
						log_event!(error, error = %err, "Unable to build IdP request.");

						http::empty_response(StatusCode::INTERNAL_SERVER_ERROR)
					},
				}
			})
			.await;

		obs::record_operation_outcome(kind, OperationOutcome::from_success(http::is_success(&response)));

		response
	}
}
