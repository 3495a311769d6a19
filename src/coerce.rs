//! Query string parsing and type coercion.
//!
//! Parsing a search string only ever produces strings (or lists of
//! strings for repeated keys). The defaults map is the schema: the
//! runtime type of each default decides what the matching raw value is
//! coerced into.
//!
//! | Default            | Raw value              | Result                        |
//! |--------------------|------------------------|-------------------------------|
//! | number             | `"42"`                 | `42.0` (NaN when unparsable)  |
//! | boolean            | `"true"` / anything    | `true` / `false`              |
//! | string             | `"x"`                  | `"x"`                         |
//! | array of T         | `"x"` or `["x", "y"]`  | array of T                    |
//! | empty array        | `"x"` or `["x", "y"]`  | array of strings              |
//! | (none)             | anything               | unchanged, with a warning     |

use crate::params::QueryParams;
use crate::value::{QueryValue, ValueKind, parse_float};

/// Options controlling [`coerce_query_params_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceOptions {
	/// Label included in diagnostics, usually the consuming component.
	pub debug_label: String,
	/// Emit a warning for keys that have no default.
	pub warn_unknown_keys: bool,
}

impl Default for CoerceOptions {
	fn default() -> Self {
		Self {
			debug_label: String::new(),
			warn_unknown_keys: true,
		}
	}
}

impl CoerceOptions {
	/// Creates options with the given debug label and warnings enabled.
	pub fn labeled(debug_label: impl Into<String>) -> Self {
		Self {
			debug_label: debug_label.into(),
			..Self::default()
		}
	}
}

/// Parses a search string into raw query parameters.
///
/// A leading `?` is optional. Percent escapes and `+` are decoded, a key
/// without `=` maps to an empty string and a key seen more than once
/// becomes a list in order of appearance. Empty keys are skipped.
pub fn parse_search(search: &str) -> QueryParams {
	let search = search.strip_prefix('?').unwrap_or(search);
	let mut params = QueryParams::new();
	if search.is_empty() {
		return params;
	}

	for (key, value) in url::form_urlencoded::parse(search.as_bytes()) {
		if key.is_empty() {
			continue;
		}
		let value = QueryValue::Text(value.into_owned());
		let merged = match params.remove(&key) {
			Some(QueryValue::List(mut items)) => {
				items.push(value);
				QueryValue::List(items)
			}
			Some(previous) => QueryValue::List(vec![previous, value]),
			None => value,
		};
		params.insert(key.into_owned(), merged);
	}

	params
}

/// Coerces raw query parameters into the types of their defaults.
///
/// `input` is laid over `defaults` first, so every default key is present
/// in the result. Keys without a default pass through unchanged and are
/// reported with a warning naming `debug_label`.
pub fn coerce_query_params(
	input: &QueryParams,
	defaults: &QueryParams,
	debug_label: &str,
) -> QueryParams {
	coerce_query_params_with(input, defaults, &CoerceOptions::labeled(debug_label))
}

/// Like [`coerce_query_params`], with explicit options.
pub fn coerce_query_params_with(
	input: &QueryParams,
	defaults: &QueryParams,
	options: &CoerceOptions,
) -> QueryParams {
	let merged = defaults.merged(input);

	merged
		.into_iter()
		.map(|(key, actual)| {
			let coerced = match defaults.get(&key) {
				None => {
					if options.warn_unknown_keys {
						tracing::warn!(
							key = %key,
							debug_label = %options.debug_label,
							"no default query param defined for \"{}\" for: \"{}\".",
							key,
							options.debug_label
						);
					}
					actual
				}
				// Values that are already the default need no processing
				Some(default) if *default == actual => actual,
				Some(default) => coerce_value(actual, default),
			};
			(key, coerced)
		})
		.collect()
}

/// Parses `search`, merges it over `defaults` and coerces the result.
///
/// An absent or empty search yields the defaults unchanged.
pub fn query_params_from_search(
	search: Option<&str>,
	defaults: &QueryParams,
	options: &CoerceOptions,
) -> QueryParams {
	let input = search.map(parse_search).unwrap_or_default();
	coerce_query_params_with(&input, defaults, options)
}

fn coerce_value(actual: QueryValue, default: &QueryValue) -> QueryValue {
	match default {
		QueryValue::List(hint) => {
			let items = actual.into_list();
			match hint.first().map(QueryValue::kind) {
				// No element to infer from: keep the raw strings
				None => QueryValue::List(items),
				Some(kind) => QueryValue::List(
					items
						.into_iter()
						.map(|item| coerce_scalar(item, kind))
						.collect(),
				),
			}
		}
		scalar => coerce_scalar(actual, scalar.kind()),
	}
}

fn coerce_scalar(actual: QueryValue, kind: ValueKind) -> QueryValue {
	match (kind, actual) {
		(ValueKind::Number, QueryValue::Number(n)) => QueryValue::Number(n),
		(ValueKind::Number, other) => QueryValue::Number(parse_float(&other.to_string())),
		(ValueKind::Bool, QueryValue::Bool(b)) => QueryValue::Bool(b),
		(ValueKind::Bool, QueryValue::Text(s)) => QueryValue::Bool(s == "true"),
		(ValueKind::Bool, _) => QueryValue::Bool(false),
		(_, other) => other,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::query_params;
	use rstest::rstest;
	use tracing_test::traced_test;

	fn from_search(search: &str, defaults: &QueryParams) -> QueryParams {
		query_params_from_search(Some(search), defaults, &CoerceOptions::labeled("debug"))
	}

	#[rstest]
	#[case("?query=hallo")]
	#[case("query=hallo")]
	fn test_leading_question_mark_is_optional(#[case] search: &str) {
		let defaults = query_params! { "query" => "default" };
		assert_eq!(
			from_search(search, &defaults),
			query_params! { "query" => "hallo" }
		);
	}

	#[rstest]
	fn test_parse_search_repeated_keys() {
		let params = parse_search("?sizes=medium&sizes=large&sizes=small&page=2");
		assert_eq!(
			params,
			query_params! {
				"sizes" => vec!["medium", "large", "small"],
				"page" => "2",
			}
		);
	}

	#[rstest]
	fn test_parse_search_decodes() {
		let params = parse_search("query=henk%26jan&name=a+b&flag");
		assert_eq!(params.get("query"), Some(&QueryValue::from("henk&jan")));
		assert_eq!(params.get("name"), Some(&QueryValue::from("a b")));
		assert_eq!(params.get("flag"), Some(&QueryValue::from("")));
	}

	#[rstest]
	#[case("")]
	#[case("?")]
	#[case("&&")]
	#[case("=x")]
	fn test_parse_search_empty(#[case] search: &str) {
		assert!(parse_search(search).is_empty());
	}

	#[rstest]
	fn test_missing_params_fall_back_to_defaults() {
		let defaults = query_params! {
			"number" => 42,
			"numbers" => vec![1, 2, 3],
			"float" => 1.42,
			"string" => "small",
			"strings" => vec!["small", "large"],
			"falseBoolean" => false,
			"trueBoolean" => true,
			"booleans" => vec![false, true, false],
		};

		assert_eq!(from_search("", &defaults), defaults);
		assert_eq!(
			query_params_from_search(None, &defaults, &CoerceOptions::default()),
			defaults
		);
	}

	#[rstest]
	fn test_round_trip_types() {
		let defaults = query_params! { "n" => 1, "b" => true, "s" => "x", "arr" => vec![1, 2] };
		let input = query_params! {
			"n" => "42",
			"b" => "false",
			"s" => "y",
			"arr" => vec!["5", "6"],
		};

		assert_eq!(
			coerce_query_params(&input, &defaults, "debug"),
			query_params! { "n" => 42, "b" => false, "s" => "y", "arr" => vec![5, 6] }
		);
	}

	#[rstest]
	#[case("?id=42", 1.0, 42.0)]
	#[case("?id=1.12", 33.3, 1.12)]
	fn test_numbers(#[case] search: &str, #[case] default: f64, #[case] expected: f64) {
		let defaults = query_params! { "id" => default };
		assert_eq!(
			from_search(search, &defaults),
			query_params! { "id" => expected }
		);
	}

	#[rstest]
	fn test_invalid_number_is_nan() {
		let defaults = query_params! { "page" => 1 };
		let params = from_search("?page=abc", &defaults);
		assert!(params.get("page").and_then(QueryValue::as_f64).unwrap().is_nan());
	}

	#[rstest]
	#[case("?visible=true", false, true)]
	#[case("?visible=false", true, false)]
	#[case("?visible=yes", true, false)]
	#[case("?visible=TRUE", true, false)]
	fn test_booleans(#[case] search: &str, #[case] default: bool, #[case] expected: bool) {
		let defaults = query_params! { "visible" => default };
		assert_eq!(
			from_search(search, &defaults),
			query_params! { "visible" => expected }
		);
	}

	#[rstest]
	fn test_strings_are_left_alone() {
		let defaults = query_params! { "color" => "blue" };
		assert_eq!(
			from_search("?color=red", &defaults),
			query_params! { "color" => "red" }
		);
	}

	#[rstest]
	#[case("?sizes=medium&sizes=large&sizes=small", query_params! { "sizes" => vec!["small"] }, query_params! { "sizes" => vec!["medium", "large", "small"] })]
	#[case("?numbers=1&numbers=2&numbers=3", query_params! { "numbers" => vec![42] }, query_params! { "numbers" => vec![1, 2, 3] })]
	#[case("?visible=true&visible=false&visible=false", query_params! { "visible" => vec![true] }, query_params! { "visible" => vec![true, false, false] })]
	#[case("?sizes=medium&sizes=large&sizes=small", query_params! { "sizes" => Vec::<String>::new() }, query_params! { "sizes" => vec!["medium", "large", "small"] })]
	fn test_arrays(
		#[case] search: &str,
		#[case] defaults: QueryParams,
		#[case] expected: QueryParams,
	) {
		assert_eq!(from_search(search, &defaults), expected);
	}

	#[rstest]
	#[case("?sizes=large", query_params! { "sizes" => vec!["small"] }, query_params! { "sizes" => vec!["large"] })]
	#[case("?numbers=1", query_params! { "numbers" => vec![42] }, query_params! { "numbers" => vec![1] })]
	#[case("?visible=true", query_params! { "visible" => vec![false] }, query_params! { "visible" => vec![true] })]
	#[case("?sizes=medium", query_params! { "sizes" => Vec::<String>::new() }, query_params! { "sizes" => vec!["medium"] })]
	fn test_singular_values_become_arrays(
		#[case] search: &str,
		#[case] defaults: QueryParams,
		#[case] expected: QueryParams,
	) {
		assert_eq!(from_search(search, &defaults), expected);
	}

	#[rstest]
	fn test_repeated_key_for_scalar_number_uses_first_value() {
		let defaults = query_params! { "page" => 1 };
		assert_eq!(
			from_search("?page=3&page=4", &defaults),
			query_params! { "page" => 3 }
		);
	}

	#[rstest]
	fn test_pre_typed_values_keep_their_type() {
		let defaults = query_params! { "page" => 1, "active" => false };
		let input = query_params! { "page" => 7, "active" => true };

		assert_eq!(coerce_query_params(&input, &defaults, ""), input);
	}

	#[test]
	#[traced_test]
	fn test_unknown_key_passes_through_with_warning() {
		let params = from_search("?color=red", &QueryParams::new());

		assert_eq!(params, query_params! { "color" => "red" });
		assert!(logs_contain(
			"no default query param defined for \"color\" for: \"debug\"."
		));
	}

	#[test]
	#[traced_test]
	fn test_unknown_key_warning_can_be_disabled() {
		let options = CoerceOptions {
			debug_label: "quiet".to_string(),
			warn_unknown_keys: false,
		};

		let params = query_params_from_search(Some("?color=red"), &QueryParams::new(), &options);

		assert_eq!(params, query_params! { "color" => "red" });
		assert!(!logs_contain("no default query param defined"));
	}
}
