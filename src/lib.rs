//! # Reinhardt URL Builder
//!
//! Client-side URL building and query parameter binding.
//!
//! A route is declared once as a template such as `/users/:id/:tab?`. The
//! same template serves as a routing key and, once parameters are
//! supplied, as a navigable URL. Query parameters are described by a
//! defaults map: the runtime type of each default decides how the raw
//! query string value is coerced, and values equal to their default never
//! show up in generated URLs.
//!
//! ## Building URLs
//!
//! ```
//! use reinhardt_url_builder::{path_params, query_params, url_builder};
//!
//! let defaults = query_params! { "page" => 1, "search" => "" };
//! let url = url_builder(
//! 	"/users/:id/:tab?",
//! 	Some(&path_params! { "id" => 7 }),
//! 	Some(&query_params! { "page" => 2, "search" => "" }),
//! 	Some(&defaults),
//! );
//!
//! assert_eq!(url, "/users/7?page=2");
//! ```
//!
//! ## Reading query parameters
//!
//! ```
//! use reinhardt_url_builder::{CoerceOptions, QueryValue, query_params, query_params_from_search};
//!
//! let defaults = query_params! { "page" => 1, "sizes" => vec!["small"], "all" => false };
//! let params = query_params_from_search(
//! 	Some("?page=3&sizes=medium&sizes=large&all=true"),
//! 	&defaults,
//! 	&CoerceOptions::labeled("UserList"),
//! );
//!
//! assert_eq!(params.get_as::<u32>("page").unwrap(), 3);
//! assert_eq!(params.get_as::<Vec<String>>("sizes").unwrap(), ["medium", "large"]);
//! assert_eq!(params.get("all"), Some(&QueryValue::Bool(true)));
//! ```
//!
//! ## Modules
//!
//! - [`pattern`]: template tokenization and path substitution
//! - [`coerce`]: search string parsing and type coercion
//! - [`query`]: query string serialization
//! - [`builder`]: URL composition
//! - [`location`]: memoized binding to the current location
//! - [`routes`] and [`config`]: named routes and TOML settings

pub mod builder;
pub mod coerce;
pub mod config;
pub mod error;
pub mod location;
pub mod params;
pub mod pattern;
pub mod query;
pub mod routes;
pub mod value;

pub use builder::{UrlBuilder, url_builder, url_query_builder};
pub use coerce::{
	CoerceOptions, coerce_query_params, coerce_query_params_with, parse_search,
	query_params_from_search,
};
pub use config::{QuerySettings, UrlSettings};
pub use error::{UrlError, UrlResult};
pub use location::{
	Location, LocationSource, QueryParamsHook, SharedLocation, StaticLocation, WithQueryParams,
	query_params_from_location, use_query_params, with_query_params,
};
pub use params::{FromQueryValue, PathParams, QueryParams};
pub use pattern::{PathSegment, UrlPattern, path_params_builder};
pub use query::{encode_component, query_builder, query_params_builder, strip_defaults, stringify};
pub use routes::RouteTable;
pub use value::{PathValue, QueryValue, ValueKind, format_number, parse_float};

/// Commonly used items.
pub mod prelude {
	pub use crate::{
		CoerceOptions, Location, LocationSource, PathParams, QueryParams, QueryValue, RouteTable,
		UrlBuilder, UrlError, UrlResult, path_params, query_params, query_params_from_search,
		url_builder, use_query_params, with_query_params,
	};
}
