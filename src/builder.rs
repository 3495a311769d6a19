//! URL composition: path substitution followed by query serialization.
//!
//! The same template serves two purposes. Without any parameters it is an
//! abstract route definition and comes back untouched, so it can double as
//! a routing key. With parameters it resolves into a navigable URL.
//!
//! ```
//! use reinhardt_url_builder::{UrlBuilder, query_params};
//!
//! let url = UrlBuilder::new("/users/:id")
//! 	.path_param("id", 1)
//! 	.query_params(query_params! { "search" => "hello", "page" => 1 })
//! 	.default_query_params(query_params! { "search" => "", "page" => 1 })
//! 	.build();
//!
//! assert_eq!(url, "/users/1?search=hello");
//! ```

use crate::params::{PathParams, QueryParams};
use crate::pattern::UrlPattern;
use crate::query::{query_builder, query_params_builder};
use crate::value::{PathValue, QueryValue};

/// Builds a URL from a template and optional parameters.
///
/// - Neither path nor query parameters: the template is returned as is.
/// - Path substitution always runs otherwise, with an empty map when no
///   path parameters are given, so optional placeholders are stripped.
/// - Query parameters, when given, are serialized against `defaults`
///   (empty when absent).
pub fn url_builder(
	template: &str,
	path_params: Option<&PathParams>,
	query_params: Option<&QueryParams>,
	defaults: Option<&QueryParams>,
) -> String {
	if path_params.is_none() && query_params.is_none() {
		return template.to_string();
	}

	let empty_path = PathParams::new();
	let path = UrlPattern::new(template).substitute(path_params.unwrap_or(&empty_path));

	match query_params {
		Some(query) => {
			let empty_defaults = QueryParams::new();
			query_params_builder(&path, query, defaults.unwrap_or(&empty_defaults))
		}
		None => path,
	}
}

/// Substitutes path parameters, then appends the non-default query
/// parameters. The defaults map is mandatory here.
pub fn url_query_builder(
	template: &str,
	path_params: Option<&PathParams>,
	query_params: Option<&QueryParams>,
	defaults: &QueryParams,
) -> String {
	let path = url_builder(template, path_params, None, None);
	query_builder(&path, query_params, defaults)
}

/// Owned, chainable front end to [`url_builder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlBuilder {
	template: String,
	path_params: Option<PathParams>,
	query_params: Option<QueryParams>,
	defaults: Option<QueryParams>,
}

impl UrlBuilder {
	/// Starts a builder for `template`.
	pub fn new(template: impl Into<String>) -> Self {
		Self {
			template: template.into(),
			..Self::default()
		}
	}

	/// Sets all path parameters at once.
	pub fn path_params(mut self, params: PathParams) -> Self {
		self.path_params = Some(params);
		self
	}

	/// Adds a single path parameter.
	pub fn path_param(mut self, key: impl Into<String>, value: impl Into<PathValue>) -> Self {
		self.path_params
			.get_or_insert_with(PathParams::new)
			.insert(key, value);
		self
	}

	/// Sets all query parameters at once.
	pub fn query_params(mut self, params: QueryParams) -> Self {
		self.query_params = Some(params);
		self
	}

	/// Adds a single query parameter.
	pub fn query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
		self.query_params
			.get_or_insert_with(QueryParams::new)
			.insert(key, value);
		self
	}

	/// Sets the defaults used to elide query parameters.
	pub fn default_query_params(mut self, defaults: QueryParams) -> Self {
		self.defaults = Some(defaults);
		self
	}

	/// Returns the template this builder resolves.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Resolves the URL.
	pub fn build(&self) -> String {
		url_builder(
			&self.template,
			self.path_params.as_ref(),
			self.query_params.as_ref(),
			self.defaults.as_ref(),
		)
	}
}
