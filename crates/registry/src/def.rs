//! Registry definitions.
//!
//! A [`RegistryDef`] plays the role of a concrete registry type: it names the
//! registry, declares its lookup attributes, supplies its default items and
//! message templates, and receives the lifecycle hooks. Every method has a
//! default, so an empty `impl` is a valid unindexed registry.
//!
//! # Hooks
//!
//! All eight hooks run while the registry lock is held and no internal borrow is
//! outstanding, so a hook may call any registry operation on the registry it
//! is handed (the lock is re-entrant).
//!
//! | Hook | Runs | May veto |
//! |------|------|----------|
//! | [`on_item_registering`](RegistryDef::on_item_registering) | before attribute validation | yes |
//! | [`on_item_registered`](RegistryDef::on_item_registered) | after the item is committed | no |
//! | [`on_item_unregistering`](RegistryDef::on_item_unregistering) | before the membership check | yes |
//! | [`on_item_unregistered`](RegistryDef::on_item_unregistered) | after the item is removed | no |
//! | [`on_populating`](RegistryDef::on_populating) | before defaults are pulled | yes |
//! | [`on_populated`](RegistryDef::on_populated) | after the registry is ready | no |
//! | [`on_resetting`](RegistryDef::on_resetting) | before items are unregistered | yes |
//! | [`on_reset`](RegistryDef::on_reset) | after the item set is empty | no |
//!
//! A veto returns an error before any state is mutated.

use std::sync::Arc;

use crate::config::ErrorTemplates;
use crate::core::Registry;
use crate::error::RegistryError;
use crate::item::RegistryItem;

/// Behavior of a concrete registry type.
#[allow(unused_variables)]
pub trait RegistryDef<T: RegistryItem>: Send + Sync + 'static {
	/// Returns the registry type name used in error and log text.
	///
	/// Defaults to the unqualified name of the implementing type.
	fn label(&self) -> &str {
		short_type_name(std::any::type_name::<Self>())
	}

	/// Returns the declared lookup attribute names, in declaration order.
	///
	/// Read once when the registry is constructed.
	fn lookup_attrs(&self) -> &'static [&'static str] {
		&[]
	}

	/// Returns the items registered during population.
	///
	/// Each item goes through the normal registration path, so conflicts
	/// between defaults are reported like any other conflict.
	fn defaults(&self) -> Box<dyn Iterator<Item = T> + '_> {
		Box::new(std::iter::empty())
	}

	/// Returns the message templates for this registry's errors.
	///
	/// Read once when the registry is constructed.
	fn error_templates(&self) -> ErrorTemplates {
		ErrorTemplates::default()
	}

	/// Runs before an item is validated and registered.
	fn on_item_registering(&self, registry: &Registry<T>, item: &Arc<T>) -> Result<(), RegistryError<T>> {
		Ok(())
	}

	/// Runs after an item is registered.
	fn on_item_registered(&self, registry: &Registry<T>, item: &Arc<T>) {}

	/// Runs before an item is unregistered.
	fn on_item_unregistering(&self, registry: &Registry<T>, item: &Arc<T>) -> Result<(), RegistryError<T>> {
		Ok(())
	}

	/// Runs after an item is unregistered.
	fn on_item_unregistered(&self, registry: &Registry<T>, item: &Arc<T>) {}

	/// Runs before the registry is populated.
	fn on_populating(&self, registry: &Registry<T>) -> Result<(), RegistryError<T>> {
		Ok(())
	}

	/// Runs after the registry is populated.
	fn on_populated(&self, registry: &Registry<T>) {}

	/// Runs before the registry is reset.
	fn on_resetting(&self, registry: &Registry<T>) -> Result<(), RegistryError<T>> {
		Ok(())
	}

	/// Runs after every item has been unregistered by a reset.
	fn on_reset(&self, registry: &Registry<T>) {}
}

/// Strips the module path and generic arguments from a type name.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
	let base = full.split('<').next().unwrap_or(full);
	base.rsplit("::").next().unwrap_or(base)
}
