//! Per-registry error message configuration.
//!
//! Every structured failure the core reports is rendered from a message
//! template with named substitution fields. A registry definition can replace
//! the wording of any kind without changing which kind is raised or what data
//! it carries; templates may be built in code or loaded from TOML:
//!
//! ```toml
//! item_not_found_unregistration = 'The foo "{item}" is unregistered.'
//! registration_conflict = "{item} clashes with {other_item} on {attr_name}={attr_value}"
//! ```
//!
//! Recognised fields are `{attr_name}`, `{attr_value}`, `{item}` and
//! `{other_item}`. Any other `{...}` sequence is copied through verbatim.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::value::AttrValue;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid error template config: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Message template overrides, one optional entry per [`ErrorKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorTemplates {
	pub unsupported_attribute: Option<String>,
	pub item_not_found: Option<String>,
	pub already_registered: Option<String>,
	pub invalid_item_registration: Option<String>,
	pub registration_conflict: Option<String>,
	pub attr_not_found_unregistration: Option<String>,
	pub item_not_found_unregistration: Option<String>,
}

impl ErrorTemplates {
	/// Parses template overrides from a TOML document.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	/// Returns these templates with `kind` overridden.
	pub fn with(mut self, kind: ErrorKind, template: impl Into<String>) -> Self {
		if let Some(slot) = self.slot_mut(kind) {
			*slot = Some(template.into());
		}
		self
	}

	/// Returns the effective template for `kind`.
	pub fn template(&self, kind: ErrorKind) -> &str {
		self.slot(kind)
			.and_then(|t| t.as_deref())
			.unwrap_or_else(|| default_template(kind))
	}

	/// Renders the template for `kind` with the given fields.
	pub fn render(&self, kind: ErrorKind, fields: &TemplateFields<'_>) -> String {
		render_template(self.template(kind), fields)
	}

	fn slot(&self, kind: ErrorKind) -> Option<&Option<String>> {
		Some(match kind {
			ErrorKind::UnsupportedAttribute => &self.unsupported_attribute,
			ErrorKind::ItemNotFound => &self.item_not_found,
			ErrorKind::AlreadyRegistered => &self.already_registered,
			ErrorKind::InvalidItemRegistration => &self.invalid_item_registration,
			ErrorKind::RegistrationConflict => &self.registration_conflict,
			ErrorKind::AttrNotFoundUnregistration => &self.attr_not_found_unregistration,
			ErrorKind::ItemNotFoundUnregistration => &self.item_not_found_unregistration,
			_ => return None,
		})
	}

	fn slot_mut(&mut self, kind: ErrorKind) -> Option<&mut Option<String>> {
		Some(match kind {
			ErrorKind::UnsupportedAttribute => &mut self.unsupported_attribute,
			ErrorKind::ItemNotFound => &mut self.item_not_found,
			ErrorKind::AlreadyRegistered => &mut self.already_registered,
			ErrorKind::InvalidItemRegistration => &mut self.invalid_item_registration,
			ErrorKind::RegistrationConflict => &mut self.registration_conflict,
			ErrorKind::AttrNotFoundUnregistration => &mut self.attr_not_found_unregistration,
			ErrorKind::ItemNotFoundUnregistration => &mut self.item_not_found_unregistration,
			_ => return None,
		})
	}
}

/// Named values substituted into a message template.
#[derive(Debug, Default, Clone)]
pub struct TemplateFields<'a> {
	pub attr_name: Option<&'a str>,
	pub attr_value: Option<&'a AttrValue>,
	pub item: Option<String>,
	pub other_item: Option<String>,
}

/// Returns the built-in template for `kind`.
///
/// Kinds without a configurable template render a generic message.
pub fn default_template(kind: ErrorKind) -> &'static str {
	match kind {
		ErrorKind::UnsupportedAttribute => "\"{attr_name}\" is not a registered lookup attribute.",
		ErrorKind::ItemNotFound => "No item registered with {attr_name}={attr_value}.",
		ErrorKind::AlreadyRegistered => "Could not register {item}: it is already registered.",
		ErrorKind::InvalidItemRegistration => {
			"Could not register {item}: it does not have a \"{attr_name}\" attribute."
		}
		ErrorKind::RegistrationConflict => {
			"Could not register {item}: another item ({other_item}) is already registered with \
			 {attr_name}={attr_value}."
		}
		ErrorKind::AttrNotFoundUnregistration => "No item registered with {attr_name}={attr_value}.",
		ErrorKind::ItemNotFoundUnregistration => "Could not unregister {item}: it is not registered.",
		_ => "Unspecified registry error.",
	}
}

fn render_template(template: &str, fields: &TemplateFields<'_>) -> String {
	let mut out = String::with_capacity(template.len() + 32);
	let mut rest = template;

	while let Some(open) = rest.find('{') {
		out.push_str(&rest[..open]);
		let after = &rest[open + 1..];
		let Some(close) = after.find('}') else {
			out.push_str(&rest[open..]);
			return out;
		};

		let name = &after[..close];
		if let Some(inner) = name.rfind('{') {
			out.push_str(&rest[open..=open + inner]);
			rest = &after[inner..];
			continue;
		}
		let value = match name {
			"attr_name" => fields.attr_name.map(str::to_owned),
			"attr_value" => fields.attr_value.map(ToString::to_string),
			"item" => fields.item.clone(),
			"other_item" => fields.other_item.clone(),
			_ => None,
		};

		match value {
			Some(value) => out.push_str(&value),
			None => out.push_str(&rest[open..open + close + 2]),
		}
		rest = &after[close + 1..];
	}

	out.push_str(rest);
	out
}
