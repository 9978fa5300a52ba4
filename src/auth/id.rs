//! Strongly typed identifiers for service instances, bindings, and IdP client usernames.
//!
//! An IdP client belongs to an instance purely by naming convention: its username is
//! `{instance}-{binding}`, so the instance's clients are exactly those whose username starts with
//! `{instance}-`. There is no other ownership index.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $max:expr) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, $max, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, $max, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
// Room for `{instance}-{binding}` built from two maximal identifiers.
const CLIENT_USERNAME_MAX_LEN: usize = 2 * IDENTIFIER_MAX_LEN + 1;
const CLIENT_USERNAME_SEPARATOR: char = '-';

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (instance, binding, client).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (instance, binding, client).
		kind: &'static str,
	},
	/// The identifier contains a path separator.
	#[error("{kind} identifier contains a path separator.")]
	ContainsSeparator {
		/// Kind of identifier (instance, binding, client).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (instance, binding, client).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { InstanceId, "Service instance identifier issued by the platform.", "Instance", IDENTIFIER_MAX_LEN }
def_id! { BindingId, "Service binding identifier issued by the platform.", "Binding", IDENTIFIER_MAX_LEN }
def_id! {
	ClientUsername,
	"Username of an OAuth2 client agent stored in the IdP.",
	"Client",
	CLIENT_USERNAME_MAX_LEN
}

impl InstanceId {
	/// Username prefix shared by every client provisioned for this instance.
	///
	/// The separator is part of the prefix, so instance `abc` never claims `abc2-x`.
	pub fn client_prefix(&self) -> String {
		format!("{}{CLIENT_USERNAME_SEPARATOR}", self.0)
	}

	/// Returns true when `username` names a client provisioned for this instance.
	pub fn owns(&self, username: &str) -> bool {
		username.starts_with(&self.client_prefix())
	}
}

impl ClientUsername {
	/// Builds the `{instance}-{binding}` username for a binding.
	pub fn for_binding(
		instance: &InstanceId,
		binding: &BindingId,
	) -> Result<Self, IdentifierError> {
		Self::new(format!("{instance}{CLIENT_USERNAME_SEPARATOR}{binding}"))
	}
}

fn validate_view(kind: &'static str, max: usize, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains('/') {
		return Err(IdentifierError::ContainsSeparator { kind });
	}
	if view.len() > max {
		return Err(IdentifierError::TooLong { kind, max });
	}

	Ok(())
}
