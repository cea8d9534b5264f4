//! Lookup attribute values.

use std::fmt;
use std::sync::Arc;

/// The value of a lookup attribute read off a registry item.
///
/// Index maps are keyed by this type, so two items conflict on an attribute
/// exactly when their values compare equal here. Values of different variants
/// never compare equal (`Int(1)` and `Str("1")` are distinct keys).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrValue {
	/// Boolean value.
	Bool(bool),
	/// Signed integer value.
	Int(i64),
	/// Unsigned integer value too large for [`AttrValue::Int`].
	UInt(u64),
	/// Character value.
	Char(char),
	/// String value.
	Str(Arc<str>),
}

impl AttrValue {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			AttrValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			AttrValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			AttrValue::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			AttrValue::Bool(_) => "bool",
			AttrValue::Int(_) => "int",
			AttrValue::UInt(_) => "uint",
			AttrValue::Char(_) => "char",
			AttrValue::Str(_) => "str",
		}
	}
}

impl fmt::Display for AttrValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttrValue::Bool(v) => write!(f, "{v}"),
			AttrValue::Int(v) => write!(f, "{v}"),
			AttrValue::UInt(v) => write!(f, "{v}"),
			AttrValue::Char(v) => write!(f, "{v}"),
			AttrValue::Str(v) => f.write_str(v),
		}
	}
}

macro_rules! int_attr_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for AttrValue {
				fn from(v: $ty) -> Self {
					AttrValue::Int(i64::from(v))
				}
			}
		)*
	};
}

int_attr_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for AttrValue {
	fn from(v: u64) -> Self {
		match i64::try_from(v) {
			Ok(v) => AttrValue::Int(v),
			Err(_) => AttrValue::UInt(v),
		}
	}
}

impl From<usize> for AttrValue {
	fn from(v: usize) -> Self {
		AttrValue::from(v as u64)
	}
}

impl From<bool> for AttrValue {
	fn from(v: bool) -> Self {
		AttrValue::Bool(v)
	}
}

impl From<char> for AttrValue {
	fn from(v: char) -> Self {
		AttrValue::Char(v)
	}
}

impl From<&str> for AttrValue {
	fn from(v: &str) -> Self {
		AttrValue::Str(Arc::from(v))
	}
}

impl From<String> for AttrValue {
	fn from(v: String) -> Self {
		AttrValue::Str(Arc::from(v))
	}
}

impl From<&String> for AttrValue {
	fn from(v: &String) -> Self {
		AttrValue::Str(Arc::from(v.as_str()))
	}
}

impl From<Arc<str>> for AttrValue {
	fn from(v: Arc<str>) -> Self {
		AttrValue::Str(v)
	}
}
