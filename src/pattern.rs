//! URL templates with `:name` placeholders.
//!
//! A template is split on `/`. Every segment starting with `:` is a
//! placeholder; a trailing `?` marks it optional:
//!
//! - `/users` - no placeholders
//! - `/users/:id` - required placeholder `id`
//! - `/users/:id?/:tab?` - optional placeholders `id` and `tab`
//!
//! Substitution never fails. Optional placeholders without a value
//! collapse to an empty segment, required ones stay visible in the output
//! so an incomplete URL is easy to spot.

use std::fmt;

use crate::params::PathParams;

/// One `/`-delimited segment of a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
	/// Literal text, copied verbatim.
	Literal(String),
	/// A `:name` or `:name?` placeholder.
	Param {
		/// The parameter name, without `:` and `?`.
		name: String,
		/// Whether the placeholder ends with `?`.
		optional: bool,
		/// The segment text as written in the template.
		raw: String,
	},
}

impl PathSegment {
	/// Tokenizes a single segment.
	pub fn parse(segment: &str) -> Self {
		match segment.strip_prefix(':') {
			Some(rest) => {
				let (name, optional) = match rest.strip_suffix('?') {
					Some(name) => (name, true),
					None => (rest, false),
				};
				Self::Param {
					name: name.to_string(),
					optional,
					raw: segment.to_string(),
				}
			}
			None => Self::Literal(segment.to_string()),
		}
	}

	/// Returns the parameter name for placeholder segments.
	pub fn param_name(&self) -> Option<&str> {
		match self {
			Self::Param { name, .. } => Some(name),
			Self::Literal(_) => None,
		}
	}

	fn resolve(&self, params: &PathParams) -> String {
		match self {
			Self::Literal(text) => text.clone(),
			Self::Param {
				name,
				optional,
				raw,
			} => match params.get(name) {
				Some(value) => value.to_string(),
				None if *optional => String::new(),
				None => raw.clone(),
			},
		}
	}
}

/// A tokenized URL template.
///
/// # Example
///
/// ```
/// use reinhardt_url_builder::{UrlPattern, path_params};
///
/// let pattern = UrlPattern::new("/users/:id/edit/:tab?");
/// assert_eq!(pattern.substitute(&path_params! { "id" => 1 }), "/users/1/edit");
/// ```
#[derive(Debug, Clone)]
pub struct UrlPattern {
	/// The template string as written.
	template: String,
	/// Segments in template order.
	segments: Vec<PathSegment>,
}

impl UrlPattern {
	/// Tokenizes a template. Every string is a valid template.
	pub fn new(template: &str) -> Self {
		Self {
			template: template.to_string(),
			segments: template.split('/').map(PathSegment::parse).collect(),
		}
	}

	/// Returns the template string as written.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Returns the tokenized segments.
	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}

	/// Returns all placeholder names in template order.
	pub fn param_names(&self) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(PathSegment::param_name)
			.collect()
	}

	/// Returns the names of the placeholders not marked optional.
	pub fn required_param_names(&self) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(|segment| match segment {
				PathSegment::Param {
					name,
					optional: false,
					..
				} => Some(name.as_str()),
				_ => None,
			})
			.collect()
	}

	/// Returns whether the template contains any placeholder.
	pub fn is_abstract(&self) -> bool {
		self.segments
			.iter()
			.any(|segment| matches!(segment, PathSegment::Param { .. }))
	}

	/// Replaces placeholders with values from `params`.
	///
	/// Values are inserted without any escaping. Keys that match no
	/// placeholder are ignored. Trailing slashes are stripped unless the
	/// result is the root path `/`.
	pub fn substitute(&self, params: &PathParams) -> String {
		let joined = self
			.segments
			.iter()
			.map(|segment| segment.resolve(params))
			.collect::<Vec<_>>()
			.join("/");

		let trimmed = joined.trim_end_matches('/');
		if trimmed.is_empty() && !joined.is_empty() {
			// Only slashes remain: keep the root
			"/".to_string()
		} else {
			trimmed.to_string()
		}
	}
}

impl PartialEq for UrlPattern {
	fn eq(&self, other: &Self) -> bool {
		self.template == other.template
	}
}

impl Eq for UrlPattern {}

impl fmt::Display for UrlPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.template)
	}
}

/// Substitutes path parameters into `template`.
///
/// Shorthand for [`UrlPattern::new`] followed by [`UrlPattern::substitute`].
pub fn path_params_builder(template: &str, params: &PathParams) -> String {
	UrlPattern::new(template).substitute(params)
}
