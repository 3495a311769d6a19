//! Named route templates.
//!
//! A route template doubles as a routing key and as a navigable URL, so
//! the table stores the abstract template and reverses names into
//! concrete URLs on demand.

use std::collections::BTreeMap;

use crate::builder::url_builder;
use crate::error::{UrlError, UrlResult};
use crate::params::{PathParams, QueryParams};
use crate::pattern::UrlPattern;

/// Name-to-template registry for URL reversal.
///
/// # Example
///
/// ```
/// use reinhardt_url_builder::{RouteTable, path_params};
///
/// let mut routes = RouteTable::new();
/// routes.register("user_detail", "/users/:id");
///
/// let url = routes
/// 	.reverse("user_detail", Some(&path_params! { "id" => 42 }), None, None)
/// 	.unwrap();
/// assert_eq!(url, "/users/42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
	routes: BTreeMap<String, UrlPattern>,
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `template` under `name`, replacing any previous entry.
	pub fn register(&mut self, name: impl Into<String>, template: &str) {
		self.routes.insert(name.into(), UrlPattern::new(template));
	}

	/// Builder-style variant of [`register`](Self::register).
	pub fn with_route(mut self, name: impl Into<String>, template: &str) -> Self {
		self.register(name, template);
		self
	}

	/// Returns the abstract template registered under `name`.
	pub fn template(&self, name: &str) -> Option<&str> {
		self.routes.get(name).map(UrlPattern::template)
	}

	/// Returns the tokenized pattern registered under `name`.
	pub fn pattern(&self, name: &str) -> Option<&UrlPattern> {
		self.routes.get(name)
	}

	/// Check if a route name is registered
	pub fn has_route(&self, name: &str) -> bool {
		self.routes.contains_key(name)
	}

	/// Returns all registered route names in sorted order.
	pub fn route_names(&self) -> Vec<&str> {
		self.routes.keys().map(String::as_str).collect()
	}

	/// Returns the number of registered routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether no route is registered.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Resolves the route `name` into a URL.
	///
	/// Behaves like [`url_builder`] on the registered template: missing
	/// required placeholders stay visible in the result.
	///
	/// # Errors
	///
	/// Returns [`UrlError::UnknownRoute`] if `name` is not registered.
	pub fn reverse(
		&self,
		name: &str,
		path_params: Option<&PathParams>,
		query_params: Option<&QueryParams>,
		defaults: Option<&QueryParams>,
	) -> UrlResult<String> {
		let pattern = self.lookup(name)?;
		let url = url_builder(pattern.template(), path_params, query_params, defaults);
		tracing::debug!(route = %name, url = %url, "reversed route");
		Ok(url)
	}

	/// Resolves the route `name`, requiring every non-optional placeholder
	/// to have a value.
	///
	/// # Errors
	///
	/// Returns [`UrlError::UnknownRoute`] if `name` is not registered and
	/// [`UrlError::MissingParam`] for the first required placeholder
	/// without a value.
	pub fn reverse_strict(
		&self,
		name: &str,
		path_params: &PathParams,
		query_params: Option<&QueryParams>,
		defaults: Option<&QueryParams>,
	) -> UrlResult<String> {
		let pattern = self.lookup(name)?;
		if let Some(missing) = pattern
			.required_param_names()
			.into_iter()
			.find(|param| !path_params.contains_key(param))
		{
			return Err(UrlError::MissingParam(missing.to_string()));
		}
		self.reverse(name, Some(path_params), query_params, defaults)
	}

	/// Iterates over `(name, template)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.routes
			.iter()
			.map(|(name, pattern)| (name.as_str(), pattern.template()))
	}

	fn lookup(&self, name: &str) -> UrlResult<&UrlPattern> {
		self.routes
			.get(name)
			.ok_or_else(|| UrlError::UnknownRoute(name.to_string()))
	}
}

impl<N: Into<String>, T: AsRef<str>> FromIterator<(N, T)> for RouteTable {
	fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
		let mut table = Self::new();
		for (name, template) in iter {
			table.register(name, template.as_ref());
		}
		table
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{path_params, query_params};
	use rstest::{fixture, rstest};

	#[fixture]
	fn routes() -> RouteTable {
		RouteTable::new()
			.with_route("user_list", "/users")
			.with_route("user_detail", "/users/:id")
			.with_route("user_tab", "/users/:id/:tab?")
	}

	#[rstest]
	fn test_reverse_without_params_is_abstract(routes: RouteTable) {
		assert_eq!(
			routes.reverse("user_detail", None, None, None).unwrap(),
			"/users/:id"
		);
	}

	#[rstest]
	fn test_reverse_with_params(routes: RouteTable) {
		let path = path_params! { "id" => 5 };
		let query = query_params! { "page" => 2, "search" => "" };
		let defaults = query_params! { "page" => 1, "search" => "" };

		assert_eq!(
			routes
				.reverse("user_tab", Some(&path), Some(&query), Some(&defaults))
				.unwrap(),
			"/users/5?page=2"
		);
	}

	#[rstest]
	fn test_reverse_unknown_route(routes: RouteTable) {
		let err = routes.reverse("missing", None, None, None).unwrap_err();
		assert!(matches!(err, UrlError::UnknownRoute(name) if name == "missing"));
	}

	#[rstest]
	fn test_reverse_lenient_keeps_missing_placeholder(routes: RouteTable) {
		let query = query_params! { "page" => 2 };
		assert_eq!(
			routes.reverse("user_detail", None, Some(&query), None).unwrap(),
			"/users/:id?page=2"
		);
	}

	#[rstest]
	#[case("user_detail", path_params! {}, Some("id"))]
	#[case("user_tab", path_params! { "id" => 1 }, None)]
	#[case("user_list", path_params! {}, None)]
	fn test_reverse_strict(
		routes: RouteTable,
		#[case] name: &str,
		#[case] path: PathParams,
		#[case] missing: Option<&str>,
	) {
		match (routes.reverse_strict(name, &path, None, None), missing) {
			(Err(UrlError::MissingParam(param)), Some(expected)) => assert_eq!(param, expected),
			(Ok(_), None) => {}
			(other, _) => panic!("unexpected result: {:?}", other),
		}
	}

	#[rstest]
	fn test_lookup_helpers(routes: RouteTable) {
		assert!(routes.has_route("user_list"));
		assert!(!routes.has_route("nope"));
		assert_eq!(routes.template("user_detail"), Some("/users/:id"));
		assert_eq!(
			routes.route_names(),
			vec!["user_detail", "user_list", "user_tab"]
		);
		assert_eq!(routes.len(), 3);
		assert!(routes.pattern("user_tab").unwrap().is_abstract());
	}

	#[rstest]
	fn test_from_iterator() {
		let table: RouteTable = [("home", "/"), ("about", "/about")].into_iter().collect();
		assert_eq!(
			table.iter().collect::<Vec<_>>(),
			vec![("about", "/about"), ("home", "/")]
		);
	}
}
