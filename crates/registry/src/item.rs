//! Item capability traits.
//!
//! A registry never inspects its items beyond the lookup attributes its
//! definition declares. [`RegistryItem`] is the single capability an item type
//! must expose for that: a named accessor returning an [`AttrValue`].

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::value::AttrValue;

/// Trait for types that can be stored in a registry.
///
/// Identity is value equality: two items are the same item iff they compare
/// equal. `Debug` output is used when an item is named in an error message.
pub trait RegistryItem: Eq + Hash + Debug + Send + Sync + 'static {
	/// Returns the value of the named lookup attribute.
	///
	/// `None` means the item does not carry the attribute. Registering such an
	/// item into a registry that declares the attribute fails with
	/// [`crate::RegistryError::InvalidItemRegistration`].
	fn lookup_attr(&self, name: &str) -> Option<AttrValue>;
}

/// Conversion used by [`registry_item!`] to read a field as an attribute value.
///
/// `Option<_>` fields map `None` to a missing attribute.
pub trait ToAttrValue {
	fn to_attr_value(&self) -> Option<AttrValue>;
}

macro_rules! to_attr_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl ToAttrValue for $ty {
				fn to_attr_value(&self) -> Option<AttrValue> {
					Some(AttrValue::from(self.clone()))
				}
			}

			impl ToAttrValue for Option<$ty> {
				fn to_attr_value(&self) -> Option<AttrValue> {
					self.clone().map(AttrValue::from)
				}
			}
		)*
	};
}

to_attr_value!(
	i8,
	i16,
	i32,
	i64,
	u8,
	u16,
	u32,
	u64,
	usize,
	bool,
	char,
	String,
	&'static str,
	Arc<str>,
	AttrValue,
);

/// Implements [`RegistryItem`] for a struct by mapping attribute names to fields.
///
/// ```
/// #[derive(Debug, PartialEq, Eq, Hash)]
/// struct Plugin {
/// 	id: u32,
/// 	name: String,
/// 	alias: Option<String>,
/// }
///
/// registries::registry_item!(Plugin {
/// 	"id" => id,
/// 	"name" => name,
/// 	"alias" => alias,
/// });
/// ```
#[macro_export]
macro_rules! registry_item {
	($type:ty { $($attr:literal => $($field:ident).+),* $(,)? }) => {
		impl $crate::RegistryItem for $type {
			fn lookup_attr(&self, name: &str) -> ::core::option::Option<$crate::AttrValue> {
				match name {
					$($attr => $crate::ToAttrValue::to_attr_value(&self.$($field).+),)*
					_ => ::core::option::Option::None,
				}
			}
		}
	};
}

/// Implements [`RegistryItem`] for types that carry no lookup attributes.
///
/// Registries of such items support population, iteration and membership, but
/// any declared lookup attribute makes registration fail.
#[macro_export]
macro_rules! plain_registry_items {
	($($type:ty),* $(,)?) => {
		$(
			impl $crate::RegistryItem for $type {
				fn lookup_attr(&self, _name: &str) -> ::core::option::Option<$crate::AttrValue> {
					::core::option::Option::None
				}
			}
		)*
	};
}

plain_registry_items!(
	i8,
	i16,
	i32,
	i64,
	u8,
	u16,
	u32,
	u64,
	usize,
	bool,
	char,
	String,
	&'static str
);
