//! Binding typed query parameters to the current location.
//!
//! The host decides when to evaluate; this module only decides whether
//! the typed parameters have to be recomputed. Nothing here reads global
//! state: the "current location" fallback is an explicit
//! [`LocationSource`] handed in by the caller.
//!
//! Two entry points mirror the two ways a view consumes query parameters:
//!
//! - [`use_query_params`] returns a [`QueryParamsHook`] that memoizes the
//!   coerced map per search string and hands out the same `Rc` for as long
//!   as the search string does not change.
//! - [`with_query_params`] wraps a render callback and injects freshly
//!   coerced parameters on every render.

use std::cell::RefCell;
use std::rc::Rc;

use crate::coerce::{CoerceOptions, query_params_from_search};
use crate::params::QueryParams;

/// A navigable location: path, search string and navigation key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
	/// Path component, e.g. `/users/1`.
	pub pathname: String,
	/// Search string including its leading `?`, if any.
	pub search: Option<String>,
	/// Opaque key identifying the history entry.
	pub key: Option<String>,
}

impl Location {
	/// Creates a location holding only a search string.
	pub fn with_search(search: impl Into<String>) -> Self {
		Self {
			search: Some(search.into()),
			..Self::default()
		}
	}

	/// Splits a relative URL such as `/users?page=2#top` into a location.
	///
	/// The fragment is dropped.
	pub fn parse(href: &str) -> Self {
		let without_hash = href.split_once('#').map_or(href, |(before, _)| before);
		match without_hash.split_once('?') {
			Some((pathname, query)) => Self {
				pathname: pathname.to_string(),
				search: (!query.is_empty()).then(|| format!("?{}", query)),
				key: None,
			},
			None => Self {
				pathname: without_hash.to_string(),
				..Self::default()
			},
		}
	}

	/// Returns the search string.
	pub fn search(&self) -> Option<&str> {
		self.search.as_deref()
	}
}

/// Provides the ambient current location.
pub trait LocationSource {
	/// Returns the current search string.
	fn current_search(&self) -> Option<String>;
}

impl LocationSource for Location {
	fn current_search(&self) -> Option<String> {
		self.search.clone()
	}
}

/// A fixed search string, for hosts without navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLocation(pub Option<String>);

impl StaticLocation {
	/// Creates a source that always reports `search`.
	pub fn new(search: impl Into<String>) -> Self {
		Self(Some(search.into()))
	}
}

impl LocationSource for StaticLocation {
	fn current_search(&self) -> Option<String> {
		self.0.clone()
	}
}

/// A location shared between the navigating side and its readers.
///
/// Cloning shares the same underlying location.
#[derive(Debug, Clone, Default)]
pub struct SharedLocation {
	inner: Rc<RefCell<Location>>,
}

impl SharedLocation {
	/// Creates a shared handle around `location`.
	pub fn new(location: Location) -> Self {
		Self {
			inner: Rc::new(RefCell::new(location)),
		}
	}

	/// Replaces the current location.
	pub fn navigate(&self, location: Location) {
		*self.inner.borrow_mut() = location;
	}

	/// Replaces only the search string.
	pub fn set_search(&self, search: Option<String>) {
		self.inner.borrow_mut().search = search;
	}

	/// Returns a snapshot of the current location.
	pub fn get(&self) -> Location {
		self.inner.borrow().clone()
	}
}

impl LocationSource for SharedLocation {
	fn current_search(&self) -> Option<String> {
		self.inner.borrow().search.clone()
	}
}

/// Coerces the query parameters of `location`, or of `fallback` when no
/// location is given.
pub fn query_params_from_location(
	location: Option<&Location>,
	fallback: &dyn LocationSource,
	defaults: &QueryParams,
	options: &CoerceOptions,
) -> QueryParams {
	let search = observed_search(location, fallback);
	query_params_from_search(search.as_deref(), defaults, options)
}

fn observed_search(location: Option<&Location>, fallback: &dyn LocationSource) -> Option<String> {
	match location {
		Some(location) => location.search.clone(),
		None => fallback.current_search(),
	}
}

#[derive(Debug)]
struct HookState {
	search: Option<String>,
	params: Rc<QueryParams>,
}

/// Memoized typed query parameters for one consumer.
///
/// The hook is idle between evaluations. An evaluation recomputes only
/// when the observed search string differs by value from the previous
/// one; otherwise the previous `Rc` is returned, so consumers can skip
/// downstream work with [`Rc::ptr_eq`].
#[derive(Debug)]
pub struct QueryParamsHook {
	defaults: QueryParams,
	options: CoerceOptions,
	state: Option<HookState>,
}

impl QueryParamsHook {
	/// Creates an idle hook that has not evaluated yet.
	pub fn new(defaults: QueryParams, options: CoerceOptions) -> Self {
		Self {
			defaults,
			options,
			state: None,
		}
	}

	/// Returns the typed parameters for the observed location.
	///
	/// `location` overrides `fallback` when given.
	pub fn evaluate(
		&mut self,
		location: Option<&Location>,
		fallback: &dyn LocationSource,
	) -> Rc<QueryParams> {
		let search = observed_search(location, fallback);

		if let Some(state) = &self.state
			&& state.search == search
		{
			return Rc::clone(&state.params);
		}

		tracing::trace!(
			search = ?search,
			debug_label = %self.options.debug_label,
			"recomputing query params"
		);
		let params = Rc::new(query_params_from_search(
			search.as_deref(),
			&self.defaults,
			&self.options,
		));
		self.state = Some(HookState {
			search,
			params: Rc::clone(&params),
		});
		params
	}

	/// Returns the parameters of the last evaluation, if any.
	pub fn current(&self) -> Option<Rc<QueryParams>> {
		self.state.as_ref().map(|state| Rc::clone(&state.params))
	}

	/// Returns the defaults this hook coerces against.
	pub fn defaults(&self) -> &QueryParams {
		&self.defaults
	}
}

/// Creates a [`QueryParamsHook`] labelled `debug_label`.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use reinhardt_url_builder::{Location, query_params, use_query_params};
///
/// let mut hook = use_query_params(query_params! { "page" => 1 }, "Dashboard");
/// let fallback = Location::default();
///
/// let first = hook.evaluate(Some(&Location::with_search("?page=2")), &fallback);
/// let second = hook.evaluate(Some(&Location::with_search("?page=2")), &fallback);
///
/// assert_eq!(*first, query_params! { "page" => 2 });
/// assert!(Rc::ptr_eq(&first, &second));
/// ```
pub fn use_query_params(defaults: QueryParams, debug_label: impl Into<String>) -> QueryParamsHook {
	QueryParamsHook::new(defaults, CoerceOptions::labeled(debug_label))
}

/// A render callback that receives typed query parameters.
///
/// Built by [`with_query_params`].
pub struct WithQueryParams<F> {
	display_name: String,
	defaults: QueryParams,
	render: F,
}

impl<F> std::fmt::Debug for WithQueryParams<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WithQueryParams")
			.field("display_name", &self.display_name)
			.field("defaults", &self.defaults)
			.finish()
	}
}

impl<F> WithQueryParams<F> {
	/// Returns `WithQueryParams(<name>)`, also used as the debug label.
	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// Renders with parameters coerced from `location`.
	pub fn render<P, R>(&self, location: &Location, props: P) -> R
	where
		F: Fn(P, QueryParams) -> R,
	{
		let params = query_params_from_search(
			location.search(),
			&self.defaults,
			&CoerceOptions::labeled(self.display_name.as_str()),
		);
		(self.render)(props, params)
	}
}

/// Wraps `render` so that it receives typed query parameters alongside
/// its own props.
pub fn with_query_params<F>(
	component_name: &str,
	defaults: QueryParams,
	render: F,
) -> WithQueryParams<F> {
	WithQueryParams {
		display_name: format!("WithQueryParams({})", component_name),
		defaults,
		render,
	}
}
