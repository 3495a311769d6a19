//! Dynamically typed parameter values.
//!
//! Query parameters arrive as strings and are coerced into the runtime
//! type of their default. [`QueryValue`] is the closed set of shapes a
//! parameter can take, and [`ValueKind`] is the tag coercion dispatches on.

use std::fmt;

use serde::{Serialize, Serializer};

/// Runtime type tag of a [`QueryValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// A string value.
	Text,
	/// A floating point number.
	Number,
	/// A boolean flag.
	Bool,
	/// An array of scalar values.
	List,
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Text => "string",
			Self::Number => "number",
			Self::Bool => "boolean",
			Self::List => "array",
		};
		f.write_str(name)
	}
}

/// A single query parameter value.
///
/// Equality is strict value equality, so `Number(NAN)` never equals
/// itself and is therefore never elided as a default.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
	/// A string value, as produced by parsing a search string.
	Text(String),
	/// A number. Invalid numeric input is represented as NaN.
	Number(f64),
	/// A boolean flag.
	Bool(bool),
	/// Repeated values for the same key.
	List(Vec<QueryValue>),
}

impl QueryValue {
	/// Returns the runtime type tag of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Text(_) => ValueKind::Text,
			Self::Number(_) => ValueKind::Number,
			Self::Bool(_) => ValueKind::Bool,
			Self::List(_) => ValueKind::List,
		}
	}

	/// Returns the string slice if this is a text value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the number if this is a numeric value.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the flag if this is a boolean value.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the elements if this is a list value.
	pub fn as_list(&self) -> Option<&[QueryValue]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Wraps a scalar in a single element list; lists are returned as is.
	pub fn into_list(self) -> Vec<QueryValue> {
		match self {
			Self::List(items) => items,
			other => vec![other],
		}
	}
}

/// Formats the value the way a browser would stringify it.
///
/// Lists are joined with `,`, numbers follow [`format_number`].
impl fmt::Display for QueryValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(s) => f.write_str(s),
			Self::Number(n) => f.write_str(&format_number(*n)),
			Self::Bool(b) => write!(f, "{}", b),
			Self::List(items) => {
				for (index, item) in items.iter().enumerate() {
					if index > 0 {
						f.write_str(",")?;
					}
					write!(f, "{}", item)?;
				}
				Ok(())
			}
		}
	}
}

// Integral numbers serialize as integers so they deserialize into integer fields.
impl Serialize for QueryValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Text(s) => serializer.serialize_str(s),
			Self::Number(n) if is_safe_integer(*n) => serializer.serialize_i64(*n as i64),
			Self::Number(n) => serializer.serialize_f64(*n),
			Self::Bool(b) => serializer.serialize_bool(*b),
			Self::List(items) => serializer.collect_seq(items),
		}
	}
}

impl From<&str> for QueryValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for QueryValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for QueryValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

macro_rules! impl_query_value_from_number {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for QueryValue {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

impl_query_value_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
	fn from(values: Vec<T>) -> Self {
		Self::List(values.into_iter().map(Into::into).collect())
	}
}

/// A path parameter value substituted into a URL template.
#[derive(Debug, Clone, PartialEq)]
pub enum PathValue {
	/// A string segment, inserted verbatim.
	Text(String),
	/// A number, formatted like [`format_number`].
	Number(f64),
}

impl fmt::Display for PathValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(s) => f.write_str(s),
			Self::Number(n) => f.write_str(&format_number(*n)),
		}
	}
}

impl From<&str> for PathValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for PathValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

macro_rules! impl_path_value_from_number {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for PathValue {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

impl_path_value_from_number!(f64, f32, i32, i64, u32, u64, usize);

/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub(crate) fn is_safe_integer(n: f64) -> bool {
	n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

/// Formats a number for use inside a URL.
///
/// Integral values carry no fractional part (`23`, not `23.0`), negative
/// zero prints as `0` and non-finite values print as `NaN`, `Infinity`
/// and `-Infinity`.
pub fn format_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n == f64::INFINITY {
		"Infinity".to_string()
	} else if n == f64::NEG_INFINITY {
		"-Infinity".to_string()
	} else if n == 0.0 {
		"0".to_string()
	} else {
		n.to_string()
	}
}

/// Parses the longest numeric prefix of `input` as a float.
///
/// Leading whitespace is skipped and trailing garbage is ignored
/// (`"42px"` parses as `42`). `Infinity` is recognised with an optional
/// sign. Input without a numeric prefix yields NaN.
pub fn parse_float(input: &str) -> f64 {
	let trimmed = input.trim_start();
	let bytes = trimmed.as_bytes();
	let mut end = 0;

	if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
		end += 1;
	}

	if trimmed[end..].starts_with("Infinity") {
		return if bytes.first() == Some(&b'-') {
			f64::NEG_INFINITY
		} else {
			f64::INFINITY
		};
	}

	let int_start = end;
	while end < bytes.len() && bytes[end].is_ascii_digit() {
		end += 1;
	}
	let mut digits = end - int_start;

	if end < bytes.len() && bytes[end] == b'.' {
		let frac_start = end + 1;
		let mut frac_end = frac_start;
		while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
			frac_end += 1;
		}
		digits += frac_end - frac_start;
		// A lone `.` only counts when digits precede it
		if digits > 0 {
			end = frac_end;
		}
	}

	if digits == 0 {
		return f64::NAN;
	}

	if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
		let mut exp_end = end + 1;
		if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
			exp_end += 1;
		}
		let exp_digits_start = exp_end;
		while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
			exp_end += 1;
		}
		if exp_end > exp_digits_start {
			end = exp_end;
		}
	}

	trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}
