//! Registry error taxonomy.
//!
//! Every failure carries the structured context it was raised with (attribute
//! name and value, offending item, conflicting item) plus a message rendered
//! from the owning registry's [`ErrorTemplates`] at construction time.

use std::fmt;
use std::sync::Arc;

use crate::config::{ErrorTemplates, TemplateFields};
use crate::value::AttrValue;

/// The kind of a [`RegistryError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// A query referenced an attribute the registry does not declare.
	UnsupportedAttribute,
	/// `get` found no item for a valid attribute/value pair.
	ItemNotFound,
	/// `register` was called with an item that is already a member.
	AlreadyRegistered,
	/// The item lacks one of the declared lookup attributes.
	InvalidItemRegistration,
	/// Another item already holds the same value for an attribute.
	RegistrationConflict,
	/// `unregister_by_attr` found no item for a valid attribute/value pair.
	AttrNotFoundUnregistration,
	/// `unregister` was called with an item that is not a member.
	ItemNotFoundUnregistration,
	/// A pre-registration hook vetoed the registration.
	RegistrationRejected,
	/// A pre-unregistration hook vetoed the unregistration.
	UnregistrationRejected,
	/// The query terms had the wrong shape for the registry.
	InvalidQuery,
	/// Positional access outside the registered range.
	IndexOutOfRange,
}

impl ErrorKind {
	/// Returns true for lookup failures that `get_or_none` maps to `None`.
	pub fn is_lookup_miss(self) -> bool {
		matches!(self, ErrorKind::ItemNotFound)
	}

	/// Returns true for kinds raised while registering.
	pub fn is_registration(self) -> bool {
		matches!(
			self,
			ErrorKind::AlreadyRegistered
				| ErrorKind::InvalidItemRegistration
				| ErrorKind::RegistrationConflict
				| ErrorKind::RegistrationRejected
		)
	}

	/// Returns true for kinds raised while unregistering.
	pub fn is_unregistration(self) -> bool {
		matches!(
			self,
			ErrorKind::AttrNotFoundUnregistration
				| ErrorKind::ItemNotFoundUnregistration
				| ErrorKind::UnregistrationRejected
		)
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::UnsupportedAttribute => "unsupported_attribute",
			Self::ItemNotFound => "item_not_found",
			Self::AlreadyRegistered => "already_registered",
			Self::InvalidItemRegistration => "invalid_item_registration",
			Self::RegistrationConflict => "registration_conflict",
			Self::AttrNotFoundUnregistration => "attr_not_found_unregistration",
			Self::ItemNotFoundUnregistration => "item_not_found_unregistration",
			Self::RegistrationRejected => "registration_rejected",
			Self::UnregistrationRejected => "unregistration_rejected",
			Self::InvalidQuery => "invalid_query",
			Self::IndexOutOfRange => "index_out_of_range",
		};
		f.write_str(name)
	}
}

/// Registry operation error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError<T: fmt::Debug> {
	#[error("{message}")]
	UnsupportedAttribute { attr_name: String, message: String },

	#[error("{message}")]
	ItemNotFound {
		attr_name: String,
		attr_value: AttrValue,
		message: String,
	},

	#[error("{message}")]
	AlreadyRegistered { item: Arc<T>, message: String },

	#[error("{message}")]
	InvalidItemRegistration {
		item: Arc<T>,
		attr_name: String,
		message: String,
	},

	#[error("{message}")]
	RegistrationConflict {
		item: Arc<T>,
		/// The registered item already holding `attr_value`.
		other_item: Arc<T>,
		attr_name: String,
		attr_value: AttrValue,
		message: String,
	},

	#[error("{message}")]
	AttrNotFoundUnregistration {
		attr_name: String,
		attr_value: AttrValue,
		message: String,
	},

	#[error("{message}")]
	ItemNotFoundUnregistration { item: Arc<T>, message: String },

	#[error("{message}")]
	RegistrationRejected { item: Arc<T>, message: String },

	#[error("{message}")]
	UnregistrationRejected { item: Arc<T>, message: String },

	#[error("{message}")]
	InvalidQuery {
		registry: String,
		operation: &'static str,
		message: String,
	},

	#[error("{message}")]
	IndexOutOfRange {
		index: isize,
		len: usize,
		message: String,
	},
}

impl<T: fmt::Debug> RegistryError<T> {
	/// Builds a veto for use in [`crate::RegistryDef::on_item_registering`].
	pub fn registration_rejected(item: Arc<T>, reason: impl fmt::Display) -> Self {
		let message = format!("Could not register {item:?}: {reason}");
		Self::RegistrationRejected { item, message }
	}

	/// Builds a veto for use in [`crate::RegistryDef::on_item_unregistering`].
	pub fn unregistration_rejected(item: Arc<T>, reason: impl fmt::Display) -> Self {
		let message = format!("Could not unregister {item:?}: {reason}");
		Self::UnregistrationRejected { item, message }
	}

	pub(crate) fn unsupported_attribute(templates: &ErrorTemplates, attr_name: &str) -> Self {
		let message = templates.render(
			ErrorKind::UnsupportedAttribute,
			&TemplateFields {
				attr_name: Some(attr_name),
				..Default::default()
			},
		);
		Self::UnsupportedAttribute {
			attr_name: attr_name.to_owned(),
			message,
		}
	}

	pub(crate) fn item_not_found(templates: &ErrorTemplates, attr_name: &str, attr_value: AttrValue) -> Self {
		let message = templates.render(
			ErrorKind::ItemNotFound,
			&TemplateFields {
				attr_name: Some(attr_name),
				attr_value: Some(&attr_value),
				..Default::default()
			},
		);
		Self::ItemNotFound {
			attr_name: attr_name.to_owned(),
			attr_value,
			message,
		}
	}

	pub(crate) fn already_registered(templates: &ErrorTemplates, item: Arc<T>) -> Self {
		let message = templates.render(
			ErrorKind::AlreadyRegistered,
			&TemplateFields {
				item: Some(format!("{item:?}")),
				..Default::default()
			},
		);
		Self::AlreadyRegistered { item, message }
	}

	pub(crate) fn invalid_item_registration(templates: &ErrorTemplates, item: Arc<T>, attr_name: &str) -> Self {
		let message = templates.render(
			ErrorKind::InvalidItemRegistration,
			&TemplateFields {
				attr_name: Some(attr_name),
				item: Some(format!("{item:?}")),
				..Default::default()
			},
		);
		Self::InvalidItemRegistration {
			item,
			attr_name: attr_name.to_owned(),
			message,
		}
	}

	pub(crate) fn registration_conflict(
		templates: &ErrorTemplates,
		item: Arc<T>,
		other_item: Arc<T>,
		attr_name: &str,
		attr_value: AttrValue,
	) -> Self {
		let message = templates.render(
			ErrorKind::RegistrationConflict,
			&TemplateFields {
				attr_name: Some(attr_name),
				attr_value: Some(&attr_value),
				item: Some(format!("{item:?}")),
				other_item: Some(format!("{other_item:?}")),
			},
		);
		Self::RegistrationConflict {
			item,
			other_item,
			attr_name: attr_name.to_owned(),
			attr_value,
			message,
		}
	}

	pub(crate) fn attr_not_found_unregistration(
		templates: &ErrorTemplates,
		attr_name: &str,
		attr_value: AttrValue,
	) -> Self {
		let message = templates.render(
			ErrorKind::AttrNotFoundUnregistration,
			&TemplateFields {
				attr_name: Some(attr_name),
				attr_value: Some(&attr_value),
				..Default::default()
			},
		);
		Self::AttrNotFoundUnregistration {
			attr_name: attr_name.to_owned(),
			attr_value,
			message,
		}
	}

	pub(crate) fn item_not_found_unregistration(templates: &ErrorTemplates, item: Arc<T>) -> Self {
		let message = templates.render(
			ErrorKind::ItemNotFoundUnregistration,
			&TemplateFields {
				item: Some(format!("{item:?}")),
				..Default::default()
			},
		);
		Self::ItemNotFoundUnregistration { item, message }
	}

	pub(crate) fn index_out_of_range(index: isize, len: usize) -> Self {
		Self::IndexOutOfRange {
			index,
			len,
			message: format!("Index {index} is out of range for a registry of {len} items."),
		}
	}
}

impl<T: fmt::Debug> RegistryError<T> {
	pub(crate) fn invalid_query(registry: &str, operation: &'static str, message: String) -> Self {
		Self::InvalidQuery {
			registry: registry.to_owned(),
			operation,
			message,
		}
	}

	/// Returns the kind of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UnsupportedAttribute { .. } => ErrorKind::UnsupportedAttribute,
			Self::ItemNotFound { .. } => ErrorKind::ItemNotFound,
			Self::AlreadyRegistered { .. } => ErrorKind::AlreadyRegistered,
			Self::InvalidItemRegistration { .. } => ErrorKind::InvalidItemRegistration,
			Self::RegistrationConflict { .. } => ErrorKind::RegistrationConflict,
			Self::AttrNotFoundUnregistration { .. } => ErrorKind::AttrNotFoundUnregistration,
			Self::ItemNotFoundUnregistration { .. } => ErrorKind::ItemNotFoundUnregistration,
			Self::RegistrationRejected { .. } => ErrorKind::RegistrationRejected,
			Self::UnregistrationRejected { .. } => ErrorKind::UnregistrationRejected,
			Self::InvalidQuery { .. } => ErrorKind::InvalidQuery,
			Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
		}
	}

	/// Returns the rendered message.
	pub fn message(&self) -> &str {
		match self {
			Self::UnsupportedAttribute { message, .. }
			| Self::ItemNotFound { message, .. }
			| Self::AlreadyRegistered { message, .. }
			| Self::InvalidItemRegistration { message, .. }
			| Self::RegistrationConflict { message, .. }
			| Self::AttrNotFoundUnregistration { message, .. }
			| Self::ItemNotFoundUnregistration { message, .. }
			| Self::RegistrationRejected { message, .. }
			| Self::UnregistrationRejected { message, .. }
			| Self::InvalidQuery { message, .. }
			| Self::IndexOutOfRange { message, .. } => message,
		}
	}

	/// Returns the offending item, if this kind carries one.
	pub fn item(&self) -> Option<&Arc<T>> {
		match self {
			Self::AlreadyRegistered { item, .. }
			| Self::InvalidItemRegistration { item, .. }
			| Self::RegistrationConflict { item, .. }
			| Self::ItemNotFoundUnregistration { item, .. }
			| Self::RegistrationRejected { item, .. }
			| Self::UnregistrationRejected { item, .. } => Some(item),
			_ => None,
		}
	}

	/// Returns the attribute name, if this kind carries one.
	pub fn attr_name(&self) -> Option<&str> {
		match self {
			Self::UnsupportedAttribute { attr_name, .. }
			| Self::ItemNotFound { attr_name, .. }
			| Self::InvalidItemRegistration { attr_name, .. }
			| Self::RegistrationConflict { attr_name, .. }
			| Self::AttrNotFoundUnregistration { attr_name, .. } => Some(attr_name),
			_ => None,
		}
	}

	/// Returns the attribute value, if this kind carries one.
	pub fn attr_value(&self) -> Option<&AttrValue> {
		match self {
			Self::ItemNotFound { attr_value, .. }
			| Self::RegistrationConflict { attr_value, .. }
			| Self::AttrNotFoundUnregistration { attr_value, .. } => Some(attr_value),
			_ => None,
		}
	}
}
