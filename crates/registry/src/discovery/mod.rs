//! Discovery-backed registries.
//!
//! A [`DiscoveryDef`] names an entry point group; wrapping it in
//! [`Discovered`] makes the group's entries the registry's defaults. Each
//! entry is turned into an item by [`DiscoveryDef::process_entry`]. An entry
//! that fails to load is logged and skipped, so one broken plugin never
//! blocks population.
//!
//! Entries come from a [`Discovery`] source: [`InventoryDiscovery`] reads the
//! process-wide `inventory` collection filled by [`crate::entry_point!`], and
//! [`StaticDiscovery`] serves an explicit list.

mod entry;

use std::sync::Arc;

#[doc(hidden)]
pub use entry::boxed;
pub use entry::{EntryPoint, LoadError, Loaded, Loader};

use crate::config::ErrorTemplates;
use crate::core::Registry;
use crate::def::RegistryDef;
use crate::error::RegistryError;
use crate::item::RegistryItem;

/// Source of entry points.
pub trait Discovery: Send + Sync + 'static {
	/// Returns the entries advertised under `group`, in load order.
	fn entries(&self, group: &str) -> Vec<EntryPoint>;
}

/// Entry points submitted with [`crate::entry_point!`] anywhere in the binary.
///
/// Entries are ordered by name; link order is not stable across builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryDiscovery;

impl Discovery for InventoryDiscovery {
	fn entries(&self, group: &str) -> Vec<EntryPoint> {
		let mut entries: Vec<EntryPoint> = inventory::iter::<EntryPoint>
			.into_iter()
			.filter(|entry| entry.group == group)
			.copied()
			.collect();
		entries.sort_by_key(|entry| entry.name);
		entries
	}
}

/// A fixed list of entry points, served in list order.
#[derive(Debug, Default, Clone)]
pub struct StaticDiscovery {
	entries: Vec<EntryPoint>,
}

impl StaticDiscovery {
	pub fn new(entries: impl IntoIterator<Item = EntryPoint>) -> Self {
		Self {
			entries: entries.into_iter().collect(),
		}
	}
}

impl Discovery for StaticDiscovery {
	fn entries(&self, group: &str) -> Vec<EntryPoint> {
		self.entries.iter().filter(|entry| entry.group == group).copied().collect()
	}
}

/// A registry definition whose defaults come from an entry point group.
///
/// [`RegistryDef::defaults`] is ignored once the definition is wrapped in
/// [`Discovered`].
pub trait DiscoveryDef<T: RegistryItem>: RegistryDef<T> {
	/// Returns the entry point group to load.
	fn group(&self) -> &str;

	/// Turns a discovered entry into the item to register.
	///
	/// Defaults to loading the entry and downcasting the value to `T`.
	fn process_entry(&self, entry: &EntryPoint) -> Result<T, LoadError> {
		entry.load_as::<T>()
	}
}

/// Adapter that populates a [`DiscoveryDef`] from a [`Discovery`] source.
pub struct Discovered<D> {
	inner: D,
	source: Box<dyn Discovery>,
}

impl<D> Discovered<D> {
	/// Wraps `def`, discovering entries through [`InventoryDiscovery`].
	pub fn new(def: D) -> Self {
		Self::with_source(def, InventoryDiscovery)
	}

	/// Wraps `def`, discovering entries through `source`.
	pub fn with_source(def: D, source: impl Discovery) -> Self {
		Self {
			inner: def,
			source: Box::new(source),
		}
	}
}

impl<T: RegistryItem, D: DiscoveryDef<T>> RegistryDef<T> for Discovered<D> {
	fn label(&self) -> &str {
		self.inner.label()
	}

	fn lookup_attrs(&self) -> &'static [&'static str] {
		self.inner.lookup_attrs()
	}

	fn defaults(&self) -> Box<dyn Iterator<Item = T> + '_> {
		let entries = self.source.entries(self.inner.group());
		tracing::trace!(
			registry = %self.inner.label(),
			group = %self.inner.group(),
			count = entries.len(),
			"discovered entry points"
		);

		Box::new(entries.into_iter().filter_map(move |entry| match self.inner.process_entry(&entry) {
			Ok(item) => Some(item),
			Err(error) => {
				tracing::error!(
					entry = entry.name,
					registry = %self.inner.label(),
					%error,
					"could not load entry point"
				);
				None
			}
		}))
	}

	fn error_templates(&self) -> ErrorTemplates {
		self.inner.error_templates()
	}

	fn on_item_registering(&self, registry: &Registry<T>, item: &Arc<T>) -> Result<(), RegistryError<T>> {
		self.inner.on_item_registering(registry, item)
	}

	fn on_item_registered(&self, registry: &Registry<T>, item: &Arc<T>) {
		self.inner.on_item_registered(registry, item);
	}

	fn on_item_unregistering(&self, registry: &Registry<T>, item: &Arc<T>) -> Result<(), RegistryError<T>> {
		self.inner.on_item_unregistering(registry, item)
	}

	fn on_item_unregistered(&self, registry: &Registry<T>, item: &Arc<T>) {
		self.inner.on_item_unregistered(registry, item);
	}

	fn on_populating(&self, registry: &Registry<T>) -> Result<(), RegistryError<T>> {
		self.inner.on_populating(registry)
	}

	fn on_populated(&self, registry: &Registry<T>) {
		self.inner.on_populated(registry);
	}

	fn on_resetting(&self, registry: &Registry<T>) -> Result<(), RegistryError<T>> {
		self.inner.on_resetting(registry)
	}

	fn on_reset(&self, registry: &Registry<T>) {
		self.inner.on_reset(registry);
	}
}

#[cfg(test)]
mod tests;
