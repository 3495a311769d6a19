//! Path and query parameter maps.
//!
//! Both maps are ordered by key, which gives query serialization its
//! stable sorted output for free. Typed access goes through the
//! [`FromQueryValue`] trait, and any `serde` type whose fields are
//! scalars or arrays of scalars converts to and from a [`QueryParams`].
//!
//! # Example
//!
//! ```
//! use reinhardt_url_builder::query_params;
//!
//! let defaults = query_params! { "page" => 1, "query" => "", "sizes" => vec!["small"] };
//! let page: u32 = defaults.get_as("page").unwrap();
//! assert_eq!(page, 1);
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{UrlError, UrlResult};
use crate::value::{PathValue, QueryValue, is_safe_integer};

/// Builds a [`QueryParams`] map from `key => value` pairs.
#[macro_export]
macro_rules! query_params {
	() => {
		$crate::QueryParams::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut params = $crate::QueryParams::new();
		$(params.insert($key, $value);)+
		params
	}};
}

/// Builds a [`PathParams`] map from `key => value` pairs.
#[macro_export]
macro_rules! path_params {
	() => {
		$crate::PathParams::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut params = $crate::PathParams::new();
		$(params.insert($key, $value);)+
		params
	}};
}

/// Values substituted into `:name` placeholders of a URL template.
///
/// Keys that match no placeholder are ignored during substitution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathParams {
	params: BTreeMap<String, PathValue>,
}

impl PathParams {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value, replacing any previous value under `key`.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PathValue>) {
		self.params.insert(key.into(), value.into());
	}

	/// Chaining variant of [`PathParams::insert`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<PathValue>) -> Self {
		self.insert(key, value);
		self
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&PathValue> {
		self.params.get(key)
	}

	/// Returns whether `key` has a value.
	pub fn contains_key(&self, key: &str) -> bool {
		self.params.contains_key(key)
	}

	/// Returns the number of parameters.
	pub fn len(&self) -> usize {
		self.params.len()
	}

	/// Returns whether there are no parameters.
	pub fn is_empty(&self) -> bool {
		self.params.is_empty()
	}

	/// Iterates over the parameters in key order.
	pub fn iter(&self) -> btree_map::Iter<'_, String, PathValue> {
		self.params.iter()
	}

	/// Builds path parameters from the fields of a serializable struct.
	///
	/// Strings and numbers are kept, booleans are stringified.
	///
	/// # Errors
	///
	/// Returns [`UrlError::UnsupportedValue`] for arrays, objects and nulls.
	pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> UrlResult<Self> {
		let fields = object_fields(value)?;
		let mut params = Self::new();
		for (key, field) in fields {
			let value = match field {
				Value::String(s) => PathValue::Text(s),
				Value::Number(n) => PathValue::Number(n.as_f64().unwrap_or(f64::NAN)),
				Value::Bool(b) => PathValue::Text(b.to_string()),
				other => {
					return Err(UrlError::UnsupportedValue {
						key,
						kind: json_kind(&other),
					});
				}
			};
			params.params.insert(key, value);
		}
		Ok(params)
	}
}

impl<K: Into<String>, V: Into<PathValue>> FromIterator<(K, V)> for PathParams {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			params: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl<'a> IntoIterator for &'a PathParams {
	type Item = (&'a String, &'a PathValue);
	type IntoIter = btree_map::Iter<'a, String, PathValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.params.iter()
	}
}

/// A map of query parameters.
///
/// Used for raw parsed input (strings and lists of strings), for the
/// defaults that define each parameter's type, and for the coerced result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
	params: BTreeMap<String, QueryValue>,
}

impl QueryParams {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value, returning the previous value under `key`.
	pub fn insert(
		&mut self,
		key: impl Into<String>,
		value: impl Into<QueryValue>,
	) -> Option<QueryValue> {
		self.params.insert(key.into(), value.into())
	}

	/// Chaining variant of [`QueryParams::insert`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
		self.insert(key, value);
		self
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&QueryValue> {
		self.params.get(key)
	}

	/// Returns the value under `key` converted to `T`.
	///
	/// # Errors
	///
	/// Returns [`UrlError::MissingParam`] if the key is absent and
	/// [`UrlError::TypeMismatch`] if the stored value has another shape.
	pub fn get_as<T: FromQueryValue>(&self, key: &str) -> UrlResult<T> {
		let value = self
			.get(key)
			.ok_or_else(|| UrlError::MissingParam(key.to_string()))?;
		T::from_query_value(value).ok_or_else(|| UrlError::TypeMismatch {
			key: key.to_string(),
			expected: T::type_name(),
			actual: value.kind(),
		})
	}

	/// Removes and returns the value under `key`.
	pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
		self.params.remove(key)
	}

	/// Returns whether `key` has a value.
	pub fn contains_key(&self, key: &str) -> bool {
		self.params.contains_key(key)
	}

	/// Returns the number of parameters.
	pub fn len(&self) -> usize {
		self.params.len()
	}

	/// Returns whether there are no parameters.
	pub fn is_empty(&self) -> bool {
		self.params.is_empty()
	}

	/// Iterates over the keys in sorted order.
	pub fn keys(&self) -> btree_map::Keys<'_, String, QueryValue> {
		self.params.keys()
	}

	/// Iterates over the parameters in key order.
	pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
		self.params.iter()
	}

	/// Returns a copy of `self` with the entries of `overrides` laid on top.
	pub fn merged(&self, overrides: &QueryParams) -> QueryParams {
		let mut merged = self.clone();
		for (key, value) in overrides {
			merged.params.insert(key.clone(), value.clone());
		}
		merged
	}

	/// Builds query parameters from the fields of a serializable struct.
	///
	/// Typically used to derive the defaults map from a plain struct.
	///
	/// # Errors
	///
	/// Returns [`UrlError::UnsupportedValue`] when a field is null, an
	/// object, or an array holding anything other than scalars.
	pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> UrlResult<Self> {
		let fields = object_fields(value)?;
		let mut params = Self::new();
		for (key, field) in fields {
			let value = match field {
				Value::Array(items) => {
					let mut list = Vec::with_capacity(items.len());
					for item in items {
						list.push(scalar_from_json(&key, item)?);
					}
					QueryValue::List(list)
				}
				scalar => scalar_from_json(&key, scalar)?,
			};
			params.params.insert(key, value);
		}
		Ok(params)
	}

	/// Converts the parameters into a typed struct.
	///
	/// Non-finite numbers surface as `null`, so a NaN produced by a bad
	/// numeric input only deserializes into an optional field.
	///
	/// # Errors
	///
	/// Returns [`UrlError::Deserialize`] if the parameters do not fit `T`.
	pub fn deserialize_into<T: DeserializeOwned>(&self) -> UrlResult<T> {
		let value = serde_json::to_value(self).map_err(UrlError::Serialize)?;
		serde_json::from_value(value).map_err(UrlError::Deserialize)
	}
}

impl Serialize for QueryParams {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(&self.params)
	}
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			params: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl IntoIterator for QueryParams {
	type Item = (String, QueryValue);
	type IntoIter = btree_map::IntoIter<String, QueryValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.params.into_iter()
	}
}

impl<'a> IntoIterator for &'a QueryParams {
	type Item = (&'a String, &'a QueryValue);
	type IntoIter = btree_map::Iter<'a, String, QueryValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.params.iter()
	}
}

fn object_fields<T: Serialize + ?Sized>(value: &T) -> UrlResult<serde_json::Map<String, Value>> {
	match serde_json::to_value(value).map_err(UrlError::Serialize)? {
		Value::Object(fields) => Ok(fields),
		other => Err(UrlError::UnsupportedValue {
			key: "<root>".to_string(),
			kind: json_kind(&other),
		}),
	}
}

fn scalar_from_json(key: &str, value: Value) -> UrlResult<QueryValue> {
	match value {
		Value::String(s) => Ok(QueryValue::Text(s)),
		Value::Number(n) => Ok(QueryValue::Number(n.as_f64().unwrap_or(f64::NAN))),
		Value::Bool(b) => Ok(QueryValue::Bool(b)),
		other => Err(UrlError::UnsupportedValue {
			key: key.to_string(),
			kind: json_kind(&other),
		}),
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Conversion from a stored [`QueryValue`] into a Rust type.
///
/// No string parsing happens here: the value must already have the
/// matching runtime type, which coercion guarantees for keys that have
/// a default.
pub trait FromQueryValue: Sized {
	/// Name of the target type, used in error messages.
	fn type_name() -> &'static str;

	/// Converts the value, or returns `None` on a shape mismatch.
	fn from_query_value(value: &QueryValue) -> Option<Self>;
}

impl FromQueryValue for f64 {
	fn type_name() -> &'static str {
		"f64"
	}

	fn from_query_value(value: &QueryValue) -> Option<Self> {
		value.as_f64()
	}
}

impl FromQueryValue for f32 {
	fn type_name() -> &'static str {
		"f32"
	}

	fn from_query_value(value: &QueryValue) -> Option<Self> {
		value.as_f64().map(|n| n as f32)
	}
}

// Integers only accept integral numbers inside the target range
macro_rules! impl_from_query_value_for_integer {
	($($ty:ty => $type_name:expr),* $(,)?) => {
		$(
			impl FromQueryValue for $ty {
				fn type_name() -> &'static str {
					$type_name
				}

				fn from_query_value(value: &QueryValue) -> Option<Self> {
					let n = value.as_f64()?;
					if is_safe_integer(n) && n >= <$ty>::MIN as f64 && n <= <$ty>::MAX as f64 {
						Some(n as $ty)
					} else {
						None
					}
				}
			}
		)*
	};
}

impl_from_query_value_for_integer! {
	i32 => "i32",
	i64 => "i64",
	u32 => "u32",
	u64 => "u64",
	usize => "usize",
}

impl FromQueryValue for bool {
	fn type_name() -> &'static str {
		"bool"
	}

	fn from_query_value(value: &QueryValue) -> Option<Self> {
		value.as_bool()
	}
}

impl FromQueryValue for String {
	fn type_name() -> &'static str {
		"String"
	}

	fn from_query_value(value: &QueryValue) -> Option<Self> {
		value.as_str().map(str::to_string)
	}
}

impl<T: FromQueryValue> FromQueryValue for Vec<T> {
	fn type_name() -> &'static str {
		"Vec"
	}

	fn from_query_value(value: &QueryValue) -> Option<Self> {
		value.as_list()?.iter().map(T::from_query_value).collect()
	}
}

impl FromQueryValue for QueryValue {
	fn type_name() -> &'static str {
		"QueryValue"
	}

	fn from_query_value(value: &QueryValue) -> Option<Self> {
		Some(value.clone())
	}
}
