//! Lookup queries.
//!
//! A [`Query`] is the argument of [`crate::Registry::get`],
//! [`crate::Registry::get_or_none`] and [`crate::Registry::unregister_by_attr`].
//! A well-formed query holds exactly one term:
//!
//! - a positional value, accepted only when the registry declares exactly one
//!   lookup attribute (the value is matched against that attribute), or
//! - a named value, `attribute = value`.
//!
//! Bare values and `(name, value)` pairs convert into queries, so the common
//! cases read as `registry.get(2)` and `registry.get(("name", "a"))`. Malformed
//! queries are representable through the builder and are rejected at
//! resolution time with [`crate::RegistryError::InvalidQuery`].

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::value::AttrValue;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
	Positional(AttrValue),
	Named(String, AttrValue),
}

/// A set of query terms for looking up a single item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
	terms: Vec<Term>,
}

impl Query {
	/// Returns an empty query. Resolving it fails; add terms first.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a query with one positional value.
	pub fn value(value: impl Into<AttrValue>) -> Self {
		Self::new().and_value(value)
	}

	/// Returns a query with one named value.
	pub fn attr(name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		Self::new().and_attr(name, value)
	}

	/// Adds a positional value.
	pub fn and_value(mut self, value: impl Into<AttrValue>) -> Self {
		self.terms.push(Term::Positional(value.into()));
		self
	}

	/// Adds a named value.
	pub fn and_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.terms.push(Term::Named(name.into(), value.into()));
		self
	}

	/// Resolves this query to a single attribute name and value.
	///
	/// `registry` and `operation` name the caller in shape errors, e.g.
	/// `MyRegistry.get()`.
	pub(crate) fn resolve<T: Debug>(
		self,
		registry: &str,
		operation: &'static str,
		lookup_attrs: &[&'static str],
	) -> Result<(String, AttrValue), RegistryError<T>> {
		let positional = self.terms.iter().filter(|t| matches!(t, Term::Positional(_))).count();
		let named = self.terms.len() - positional;

		match (positional, named) {
			(1, 0) => {
				let Some(Term::Positional(value)) = self.terms.into_iter().next() else {
					unreachable!("single positional term was counted")
				};
				match lookup_attrs {
					[attr_name] => Ok(((*attr_name).to_owned(), value)),
					_ => Err(RegistryError::invalid_query(
						registry,
						operation,
						format!(
							"Positional values cannot be provided to {registry}.{operation}(). This registry \
							 only supports looking up items by attribute name."
						),
					)),
				}
			}
			(0, 1) => {
				let Some(Term::Named(name, value)) = self.terms.into_iter().next() else {
					unreachable!("single named term was counted")
				};
				Ok((name, value))
			}
			_ => Err(RegistryError::invalid_query(
				registry,
				operation,
				format!("Either one positional value or one named value may be provided to {registry}.{operation}()."),
			)),
		}
	}
}

impl From<AttrValue> for Query {
	fn from(value: AttrValue) -> Self {
		Self::value(value)
	}
}

macro_rules! positional_query {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Query {
				fn from(value: $ty) -> Self {
					Self::value(value)
				}
			}
		)*
	};
}

positional_query!(i8, i16, i32, i64, u8, u16, u32, u64, usize, bool, char, &str, String, Arc<str>);

impl<V: Into<AttrValue>> From<(&str, V)> for Query {
	fn from((name, value): (&str, V)) -> Self {
		Self::attr(name, value)
	}
}

impl<V: Into<AttrValue>> From<(String, V)> for Query {
	fn from((name, value): (String, V)) -> Self {
		Self::attr(name, value)
	}
}
