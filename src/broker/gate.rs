//! HTTP Basic authentication guarding the broker API.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::Secret};

const BASIC_SCHEME: &str = "Basic";

/// Admits requests carrying exactly one matching `Authorization: Basic` header.
#[derive(Clone)]
pub struct BasicAuthGate {
	username: String,
	password: Secret,
}
impl BasicAuthGate {
	/// Creates a gate for the given broker credentials.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: Secret::new(password) }
	}

	/// Returns true when `authorization` holds a single header naming the configured credentials.
	pub fn admits<S>(&self, authorization: &[S]) -> bool
	where
		S: AsRef<str>,
	{
		let [header] = authorization else {
			return false;
		};

		self.decode(header.as_ref())
			.is_some_and(|(username, password)| {
				username == self.username && password == self.password.expose()
			})
	}

	fn decode(&self, header: &str) -> Option<(String, String)> {
		let (scheme, encoded) = header.trim().split_once(' ')?;

		if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
			return None;
		}

		let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
		let (username, password) = decoded.split_once(':')?;

		Some((username.to_owned(), password.to_owned()))
	}
}
impl Debug for BasicAuthGate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasicAuthGate")
			.field("username", &self.username)
			.field("password", &self.password)
			.finish()
	}
}

/// Renders an `Authorization` header value for the given credentials.
pub fn basic_authorization(username: &str, password: &str) -> String {
	format!("{BASIC_SCHEME} {}", STANDARD.encode(format!("{username}:{password}")))
}
