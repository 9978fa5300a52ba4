//! Redacting wrapper for the broker's sensitive strings.
//!
//! The IdP admin password, the session token opened with it, the broker's own API password, and
//! each generated client password all travel as [`Secret`] so `Debug` and `Display` output
//! (including tracing fields) never reveal them.

// self
use crate::_prelude::*;

/// Credential string that prints as `<redacted>`.
///
/// Serialization emits the raw value because the broker hands generated client passwords back to
/// the platform in binding responses.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value for request bodies and headers; never pass it to a log macro.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = Secret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "Secret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn serializes_as_plain_string() {
		let json = serde_json::to_string(&Secret::new("p4ss")).expect("Secret should serialize.");

		assert_eq!(json, "\"p4ss\"");
	}
}
