//! URL settings loaded from TOML.
//!
//! ```toml
//! [query]
//! warn_unknown_keys = true
//! debug_label = "app"
//!
//! [routes]
//! user_detail = "/users/:id"
//! user_list = "/users"
//! ```
//!
//! Settings are parsed from text handed in by the caller. Nothing is read
//! from the environment or the file system.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coerce::CoerceOptions;
use crate::error::UrlResult;
use crate::routes::RouteTable;

/// Top-level URL settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlSettings {
	/// Query coercion settings
	pub query: QuerySettings,

	/// Named route templates: "name" -> "/path/:param"
	pub routes: BTreeMap<String, String>,
}

/// The `[query]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySettings {
	/// Warn about query keys that have no default
	pub warn_unknown_keys: bool,

	/// Label used in diagnostics when the caller supplies none
	pub debug_label: String,
}

impl Default for QuerySettings {
	fn default() -> Self {
		Self {
			warn_unknown_keys: true,
			debug_label: String::new(),
		}
	}
}

impl UrlSettings {
	/// Parse settings from a TOML string.
	///
	/// # Errors
	///
	/// Returns [`UrlError::InvalidSettings`](crate::UrlError::InvalidSettings)
	/// for malformed TOML, mistyped values or unknown keys.
	pub fn from_toml_str(content: &str) -> UrlResult<Self> {
		Ok(toml::from_str(content)?)
	}

	/// Builds coercion options from the `[query]` section.
	pub fn coerce_options(&self) -> CoerceOptions {
		CoerceOptions {
			debug_label: self.query.debug_label.clone(),
			warn_unknown_keys: self.query.warn_unknown_keys,
		}
	}

	/// Registers every `[routes]` entry in a fresh [`RouteTable`].
	pub fn route_table(&self) -> RouteTable {
		self.routes.iter().collect()
	}

	/// Consumes the settings into a [`RouteTable`].
	pub fn into_route_table(self) -> RouteTable {
		self.routes.into_iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::UrlError;
	use crate::path_params;
	use rstest::rstest;

	const SETTINGS: &str = r#"
[query]
warn_unknown_keys = false
debug_label = "app"

[routes]
user_detail = "/users/:id"
user_list = "/users"
"#;

	#[rstest]
	fn test_from_toml_str() {
		let settings = UrlSettings::from_toml_str(SETTINGS).unwrap();

		assert!(!settings.query.warn_unknown_keys);
		assert_eq!(settings.query.debug_label, "app");
		assert_eq!(settings.routes.len(), 2);
		assert_eq!(
			settings.coerce_options(),
			CoerceOptions {
				debug_label: "app".to_string(),
				warn_unknown_keys: false,
			}
		);
	}

	#[rstest]
	#[case("")]
	#[case("[query]\n")]
	#[case("[routes]\n")]
	fn test_defaults(#[case] content: &str) {
		let settings = UrlSettings::from_toml_str(content).unwrap();

		assert!(settings.query.warn_unknown_keys);
		assert_eq!(settings.coerce_options(), CoerceOptions::default());
	}

	#[rstest]
	#[case("[query]\nunknown = 1\n")]
	#[case("[other]\n")]
	#[case("[query]\nwarn_unknown_keys = \"yes\"\n")]
	#[case("[routes]\nhome = 1\n")]
	#[case("not toml at all")]
	fn test_invalid_settings(#[case] content: &str) {
		let err = UrlSettings::from_toml_str(content).unwrap_err();
		assert!(matches!(err, UrlError::InvalidSettings(_)));
	}

	#[rstest]
	fn test_into_route_table() {
		let settings = UrlSettings::from_toml_str(SETTINGS).unwrap();
		assert_eq!(settings.route_table().len(), 2);

		let routes = settings.into_route_table();
		assert_eq!(
			routes
				.reverse("user_detail", Some(&path_params! { "id" => 9 }), None, None)
				.unwrap(),
			"/users/9"
		);
		assert_eq!(routes.template("user_list"), Some("/users"));
	}
}
