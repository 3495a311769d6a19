//! Error types for URL building.
//!
//! Building and parsing URLs never fails: unmatched placeholders stay
//! visible, bad numbers become NaN and unknown query keys only warn.
//! The errors below belong to the typed surfaces layered on top
//! (serde bridges, settings, named routes and typed accessors).

use thiserror::Error;

use crate::value::ValueKind;

/// Result type for fallible URL operations.
pub type UrlResult<T> = Result<T, UrlError>;

/// Errors raised by the typed layers of the crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UrlError {
	/// No route is registered under the given name.
	#[error("route not found: {0}")]
	UnknownRoute(String),

	/// A required path or query parameter is absent.
	#[error("missing parameter: {0}")]
	MissingParam(String),

	/// A value cannot be represented as a query or path value.
	#[error("unsupported value for '{key}': {kind}")]
	UnsupportedValue {
		/// Parameter name (`<root>` for the top level value).
		key: String,
		/// Description of the offending JSON shape.
		kind: &'static str,
	},

	/// A parameter holds a value of another runtime type than requested.
	#[error("parameter '{key}' is {actual}, expected {expected}")]
	TypeMismatch {
		/// Parameter name.
		key: String,
		/// Requested Rust type.
		expected: &'static str,
		/// Runtime type of the stored value.
		actual: ValueKind,
	},

	/// Converting a Rust value into parameters failed.
	#[error("failed to serialize parameters: {0}")]
	Serialize(#[source] serde_json::Error),

	/// Converting parameters into a Rust value failed.
	#[error("failed to deserialize parameters: {0}")]
	Deserialize(#[source] serde_json::Error),

	/// URL settings could not be parsed.
	#[error("invalid url settings: {0}")]
	InvalidSettings(#[from] toml::de::Error),
}
