//! Realm-scoped IdP URLs derived once from the base URL.

// self
use crate::{_prelude::*, auth::ClientUsername, error::ConfigError};

/// URLs the gateway talks to, all ending in `/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdpEndpoints {
	/// `{base}/json/`, home of realm-independent APIs such as server info.
	pub api_base: Url,
	/// `{base}/json/{realm}/`, home of authentication and agent management.
	pub api_realm: Url,
	/// `{base}/oauth2/{realm}/`, handed to bound applications as the credentials URI.
	pub oauth2: Url,
}
impl IdpEndpoints {
	/// Derives the endpoint set from a base URL and a normalized realm path.
	pub fn derive(base_url: &str, realm: &str) -> Result<Self, ConfigError> {
		let base = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if base.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl {
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}

		let realm_segments = realm.split('/').filter(|segment| !segment.is_empty());

		Ok(Self {
			api_base: directory(&base, ["json"]),
			api_realm: directory(&base, std::iter::once("json").chain(realm_segments.clone())),
			oauth2: directory(&base, std::iter::once("oauth2").chain(realm_segments)),
		})
	}

	/// `GET` target advertising the session cookie name.
	pub fn server_info(&self) -> Url {
		child(&self.api_base, ["serverinfo", "*"])
	}

	/// `POST` target exchanging admin credentials for a session token.
	pub fn authenticate(&self) -> Url {
		let mut url = child(&self.api_realm, ["authenticate"]);

		url.query_pairs_mut()
			.append_pair("authTokenType", "module")
			.append_pair("authIndexValue", "Application");

		url
	}

	/// `POST` target creating a new agent.
	pub fn create_agent(&self) -> Url {
		let mut url = child(&self.api_realm, ["agents"]);

		url.query_pairs_mut().append_pair("_action", "create");

		url
	}

	/// `GET` target listing every agent in the realm.
	pub fn query_agents(&self) -> Url {
		let mut url = child(&self.api_realm, ["agents"]);

		url.query_pairs_mut().append_pair("_queryId", "*");

		url
	}

	/// Resource path of a single agent.
	pub fn agent(&self, username: &ClientUsername) -> Url {
		child(&self.api_realm, ["agents", username.as_ref()])
	}
}

/// Trims the realm and collapses leading, trailing, and repeated slashes.
pub fn normalize_realm(realm: &str) -> String {
	realm.trim().split('/').filter(|segment| !segment.is_empty()).collect::<Vec<_>>().join("/")
}

fn directory<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
	let mut url = child(base, segments);

	if let Ok(mut path) = url.path_segments_mut() {
		path.push("");
	}

	url
}

fn child<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
	let mut url = base.clone();

	url.set_query(None);
	url.set_fragment(None);

	if let Ok(mut path) = url.path_segments_mut() {
		path.pop_if_empty().extend(segments);
	}

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn endpoints(base: &str, realm: &str) -> IdpEndpoints {
		IdpEndpoints::derive(base, &normalize_realm(realm))
			.expect("Endpoint fixture should derive successfully.")
	}

	#[test]
	fn root_realm_has_no_empty_segment() {
		let urls = endpoints("https://idp.example.com/openam", "  ");

		assert_eq!(urls.api_base.as_str(), "https://idp.example.com/openam/json/");
		assert_eq!(urls.api_realm.as_str(), "https://idp.example.com/openam/json/");
		assert_eq!(urls.oauth2.as_str(), "https://idp.example.com/openam/oauth2/");
	}

	#[test]
	fn realm_slashes_never_double() {
		for realm in ["customers", "/customers", "customers/", "//customers//"] {
			let urls = endpoints("https://idp.example.com/openam/", realm);

			assert_eq!(urls.api_realm.as_str(), "https://idp.example.com/openam/json/customers/");
			assert_eq!(urls.oauth2.as_str(), "https://idp.example.com/openam/oauth2/customers/");
		}

		let nested = endpoints("https://idp.example.com", "/a//b/");

		assert_eq!(nested.api_realm.as_str(), "https://idp.example.com/json/a/b/");
	}

	#[test]
	fn operation_urls_follow_idp_conventions() {
		let urls = endpoints("https://idp.example.com/openam", "customers");
		let username = ClientUsername::new("inst-bind").expect("Username fixture should be valid.");

		assert_eq!(urls.server_info().as_str(), "https://idp.example.com/openam/json/serverinfo/*");
		assert_eq!(
			urls.authenticate().as_str(),
			"https://idp.example.com/openam/json/customers/authenticate?authTokenType=module&authIndexValue=Application"
		);
		assert_eq!(
			urls.create_agent().as_str(),
			"https://idp.example.com/openam/json/customers/agents?_action=create"
		);
		assert_eq!(
			urls.query_agents().as_str(),
			"https://idp.example.com/openam/json/customers/agents?_queryId=*"
		);
		assert_eq!(
			urls.agent(&username).as_str(),
			"https://idp.example.com/openam/json/customers/agents/inst-bind"
		);
	}

	#[test]
	fn normalize_realm_collapses_separators() {
		assert_eq!(normalize_realm(" /a//b/ "), "a/b");
		assert_eq!(normalize_realm(""), "");
	}
}
