//! Query string serialization.
//!
//! Parameters equal to their default are implicit and never written to
//! the URL. The rest are serialized with sorted keys, one `key=value`
//! pair per list element.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::params::QueryParams;
use crate::value::QueryValue;

/// Characters left unescaped in query keys and values.
///
/// Everything except `A-Z a-z 0-9 - _ . ~` is percent-encoded, so
/// reserved characters such as `&`, `=`, `+` and `#` never leak into the
/// query structure.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~');

/// Returns the entries of `query` that differ from their default.
///
/// Comparison is strict value equality: a NaN never equals its default
/// and keys without a default are always kept.
pub fn strip_defaults(query: &QueryParams, defaults: &QueryParams) -> QueryParams {
	query
		.iter()
		.filter(|(key, value)| defaults.get(key) != Some(*value))
		.map(|(key, value)| (key.clone(), value.clone()))
		.collect()
}

/// Serializes parameters into a query string without the leading `?`.
///
/// Keys are emitted in sorted order and lists as repeated keys. Empty
/// lists produce nothing.
pub fn stringify(params: &QueryParams) -> String {
	let mut pairs = Vec::new();
	for (key, value) in params {
		let key = encode_component(key);
		match value {
			QueryValue::List(items) => {
				for item in items {
					pairs.push(format!("{}={}", key, encode_component(&item.to_string())));
				}
			}
			scalar => pairs.push(format!("{}={}", key, encode_component(&scalar.to_string()))),
		}
	}
	pairs.join("&")
}

/// Percent-encodes a single query key or value.
pub fn encode_component(input: &str) -> String {
	utf8_percent_encode(input, QUERY_COMPONENT).to_string()
}

/// Appends the non-default query parameters to `url`.
///
/// Returns `url` unchanged when every parameter equals its default.
///
/// # Example
///
/// ```
/// use reinhardt_url_builder::{query_params, query_params_builder};
///
/// let url = query_params_builder(
/// 	"/users/1",
/// 	&query_params! { "visible" => true, "page" => 1 },
/// 	&query_params! { "visible" => false, "page" => 1 },
/// );
/// assert_eq!(url, "/users/1?visible=true");
/// ```
pub fn query_params_builder(url: &str, query: &QueryParams, defaults: &QueryParams) -> String {
	let query_string = stringify(&strip_defaults(query, defaults));
	if query_string.is_empty() {
		url.to_string()
	} else {
		format!("{}?{}", url, query_string)
	}
}

/// Variant of [`query_params_builder`] where the query map is optional.
///
/// Without query parameters the URL is returned unchanged.
pub fn query_builder(url: &str, query: Option<&QueryParams>, defaults: &QueryParams) -> String {
	match query {
		Some(query) => query_params_builder(url, query, defaults),
		None => url.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::query_params;
	use rstest::rstest;

	const URL: &str = "/test";

	#[rstest]
	#[case(query_params! { "query" => "test" }, query_params! { "query" => "test" }, "/test")]
	#[case(query_params! { "query" => "test" }, query_params! { "query" => "default" }, "/test?query=test")]
	#[case(query_params! { "query" => "test&teken" }, query_params! { "query" => "test&teken" }, "/test")]
	#[case(query_params! { "query" => "test&teken" }, query_params! { "query" => "default" }, "/test?query=test%26teken")]
	fn test_query_params_builder(
		#[case] query: QueryParams,
		#[case] defaults: QueryParams,
		#[case] expected: &str,
	) {
		assert_eq!(query_params_builder(URL, &query, &defaults), expected);
	}

	#[rstest]
	fn test_keys_are_sorted() {
		let query = query_params! { "search" => "awesome", "num" => 23 };
		assert_eq!(
			query_params_builder("/users", &query, &QueryParams::new()),
			"/users?num=23&search=awesome"
		);
	}

	#[rstest]
	fn test_lists_repeat_the_key() {
		let query = query_params! { "sizes" => vec!["medium", "large"], "empty" => Vec::<String>::new() };
		assert_eq!(stringify(&query), "sizes=medium&sizes=large");
	}

	#[rstest]
	fn test_list_equal_to_default_is_elided() {
		let query = query_params! { "sizes" => vec!["small"] };
		assert_eq!(query_params_builder(URL, &query, &query.clone()), URL);
	}

	#[rstest]
	fn test_nan_is_never_elided() {
		let query = query_params! { "page" => f64::NAN };
		assert_eq!(
			query_params_builder(URL, &query, &query.clone()),
			"/test?page=NaN"
		);
	}

	#[rstest]
	fn test_coerced_value_equal_to_default_is_elided() {
		let query = query_params! { "page" => 1.0 };
		let defaults = query_params! { "page" => 1 };
		assert_eq!(query_params_builder(URL, &query, &defaults), URL);
	}

	#[rstest]
	#[case("a b", "a%20b")]
	#[case("a+b=c", "a%2Bb%3Dc")]
	#[case("#frag", "%23frag")]
	#[case("safe-_.~", "safe-_.~")]
	#[case("héllo", "h%C3%A9llo")]
	fn test_encode_component(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(encode_component(input), expected);
	}

	#[rstest]
	fn test_query_builder_without_query() {
		assert_eq!(query_builder(URL, None, &QueryParams::new()), URL);
	}

	#[rstest]
	fn test_query_builder_with_query() {
		let query = query_params! { "query" => "test" };
		let defaults = query_params! { "query" => "default" };
		assert_eq!(
			query_builder(URL, Some(&query), &defaults),
			"/test?query=test"
		);
	}

	#[rstest]
	fn test_strip_defaults_keeps_unknown_keys() {
		let query = query_params! { "page" => 1, "extra" => "x" };
		let defaults = query_params! { "page" => 1 };
		assert_eq!(
			strip_defaults(&query, &defaults),
			query_params! { "extra" => "x" }
		);
	}
}
