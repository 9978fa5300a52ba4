//! Optional observability helpers for gateway and broker operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `idp_broker.operation` with the `operation`
//!   and `stage` (call site) fields, plus lifecycle log events.
//! - Enable `metrics` to increment the `idp_broker_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

pub(crate) use self::tracing::log_event;

// self
use crate::_prelude::*;

/// Operations observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Admin session exchange.
	Authenticate,
	/// Session identifier name discovery.
	ResolveSessionName,
	/// OAuth2 client creation.
	CreateClient,
	/// OAuth2 client removal.
	DeleteClient,
	/// OAuth2 client listing.
	ListClients,
	/// Bulk removal of an instance's clients.
	Deprovision,
	/// Broker-level binding creation.
	Bind,
	/// Broker-level binding removal.
	Unbind,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authenticate => "authenticate",
			OperationKind::ResolveSessionName => "resolve_session_name",
			OperationKind::CreateClient => "create_client",
			OperationKind::DeleteClient => "delete_client",
			OperationKind::ListClients => "list_clients",
			OperationKind::Deprovision => "deprovision",
			OperationKind::Bind => "bind",
			OperationKind::Unbind => "unbind",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure reported back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Maps a boolean result onto [`Success`](Self::Success) or [`Failure`](Self::Failure).
	pub const fn from_success(success: bool) -> Self {
		if success { OperationOutcome::Success } else { OperationOutcome::Failure }
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
