//! Instance-wide client cleanup with concurrent fan-out and all-or-nothing reporting.

// crates.io
use async_lock::Semaphore;
use futures::future;
// self
use crate::{
	_prelude::*,
	auth::{ClientUsername, InstanceId},
	credentials::{AgentList, DeleteClientOutcome},
	gateway::Gateway,
	http::{self, IdpHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan, log_event},
};

/// Aggregate verdict of a bulk deprovision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeprovisionOutcome {
	/// Every owned client is gone, or there were none to begin with.
	Ok,
	/// Listing failed or at least one deletion was not tolerated.
	InternalError,
}
impl DeprovisionOutcome {
	/// Status reported to the platform for this outcome.
	pub fn status(self) -> StatusCode {
		match self {
			Self::Ok => StatusCode::OK,
			Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + IdpHttpClient,
{
	/// Deletes every client whose username starts with `{instance}-`.
	///
	/// All matching deletions are issued concurrently and none waits on another, unless
	/// [`fan_out_limit`](crate::config::Configuration::fan_out_limit) sets a cap. A failed deletion
	/// never cancels the rest. The verdict is only reported after every deletion has completed. A `400` from a deletion means the client
	/// was already removed and counts as success.
	pub async fn deprovision(&self, instance: &InstanceId) -> DeprovisionOutcome {
		const KIND: OperationKind = OperationKind::Deprovision;

		let span = OperationSpan::new(KIND, "deprovision");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let outcome = span.instrument(self.delete_owned_clients(instance)).await;

		obs::record_operation_outcome(
			KIND,
			OperationOutcome::from_success(outcome == DeprovisionOutcome::Ok),
		);

		outcome
	}

	async fn delete_owned_clients(&self, instance: &InstanceId) -> DeprovisionOutcome {
		log_event!(info, %instance, "Deprovisioning service instance.");

		let response = self.list_clients().await;

		if !http::is_success(&response) {
			log_event!(
				error,
				status = response.status().as_u16(),
				"Unable to list OAuth2 clients for deprovisioning."
			);

			return DeprovisionOutcome::InternalError;
		}

		let agents = match AgentList::from_body(response.body()) {
			Ok(agents) => agents,
			Err(err) => {
				log_event!(error, error = %err, "IdP returned an unreadable client list.");

				return DeprovisionOutcome::InternalError;
			},
		};
		let mut failed = false;
		let mut targets = Vec::new();

		for name in agents.usernames().filter(|name| instance.owns(name)) {
			match ClientUsername::new(name) {
				Ok(username) => targets.push(username),
				Err(err) => {
					log_event!(error, client = name, error = %err, "Owned client cannot be addressed.");

					failed = true;
				},
			}
		}

		log_event!(debug, %instance, count = targets.len(), "Deleting owned OAuth2 clients.");

		let limiter = self.configuration.fan_out_limit.map(Semaphore::new);
		let deletions = targets.iter().map(|username| {
			let limiter = limiter.as_ref();

			async move {
				let _permit = match limiter {
					Some(limiter) => Some(limiter.acquire().await),
					None => None,
				};
				let response = self.delete_client(username).await;

				(username, DeleteClientOutcome::classify(response.status()))
			}
		});

		for (username, outcome) in future::join_all(deletions).await {
			match outcome {
				DeleteClientOutcome::Deleted => {},
				DeleteClientOutcome::AlreadyRemoved => {
					log_event!(warn, client = %username, "OAuth2 client was already removed.");
				},
				outcome => {
					log_event!(error, client = %username, ?outcome, "Unable to delete OAuth2 client.");

					failed = true;
				},
			}
		}

		if failed { DeprovisionOutcome::InternalError } else { DeprovisionOutcome::Ok }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcome_statuses() {
		assert_eq!(DeprovisionOutcome::Ok.status(), StatusCode::OK);
		assert_eq!(DeprovisionOutcome::InternalError.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
