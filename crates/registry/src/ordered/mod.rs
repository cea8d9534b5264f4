//! Insertion-ordered registries.
//!
//! [`OrderedRegistry`] wraps a definition in an adapter that records every
//! registration in order through the post-registration and
//! post-unregistration hooks. The core registry is unchanged; ordered
//! iteration and positional access read the recorded order under the core
//! lock, so they always agree with the item set.
//!
//! The wrapped definition's post hooks run after the order is updated, so
//! they observe the new position.

use std::ops::Deref;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::config::ErrorTemplates;
use crate::core::Registry;
use crate::def::RegistryDef;
use crate::error::RegistryError;
use crate::item::RegistryItem;

/// Registration order of the items in one registry.
struct OrderTracker<T> {
	order: Mutex<IndexSet<Arc<T>>>,
}

impl<T: RegistryItem> OrderTracker<T> {
	fn new() -> Self {
		Self {
			order: Mutex::new(IndexSet::new()),
		}
	}

	fn push(&self, item: &Arc<T>) {
		let mut order = self.order.lock();
		order.shift_remove(item);
		order.insert(Arc::clone(item));
	}

	fn remove(&self, item: &Arc<T>) {
		self.order.lock().shift_remove(item);
	}

	fn snapshot(&self) -> Vec<Arc<T>> {
		self.order.lock().iter().cloned().collect()
	}

	fn at(&self, index: isize) -> Result<Arc<T>, RegistryError<T>> {
		let order = self.order.lock();
		let len = order.len();
		let resolved = if index < 0 {
			len.checked_sub(index.unsigned_abs())
		} else {
			Some(index.unsigned_abs())
		};

		resolved
			.and_then(|pos| order.get_index(pos))
			.cloned()
			.ok_or_else(|| RegistryError::index_out_of_range(index, len))
	}
}

/// Definition adapter that keeps an [`OrderTracker`] in step with the core.
struct Ordered<T: RegistryItem, D> {
	inner: D,
	order: Arc<OrderTracker<T>>,
}

impl<T: RegistryItem, D: RegistryDef<T>> RegistryDef<T> for Ordered<T, D> {
	fn label(&self) -> &str {
		self.inner.label()
	}

	fn lookup_attrs(&self) -> &'static [&'static str] {
		self.inner.lookup_attrs()
	}

	fn defaults(&self) -> Box<dyn Iterator<Item = T> + '_> {
		self.inner.defaults()
	}

	fn error_templates(&self) -> ErrorTemplates {
		self.inner.error_templates()
	}

	fn on_item_registering(&self, registry: &Registry<T>, item: &Arc<T>) -> Result<(), RegistryError<T>> {
		self.inner.on_item_registering(registry, item)
	}

	fn on_item_registered(&self, registry: &Registry<T>, item: &Arc<T>) {
		self.order.push(item);
		self.inner.on_item_registered(registry, item);
	}

	fn on_item_unregistering(&self, registry: &Registry<T>, item: &Arc<T>) -> Result<(), RegistryError<T>> {
		self.inner.on_item_unregistering(registry, item)
	}

	fn on_item_unregistered(&self, registry: &Registry<T>, item: &Arc<T>) {
		self.order.remove(item);
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

/// A registry that iterates and indexes items in registration order.
///
/// Dereferences to the core [`Registry`], so lookups and mutations are the
/// same calls. [`OrderedRegistry::items`] and [`OrderedRegistry::iter`]
/// shadow the unordered core versions.
pub struct OrderedRegistry<T: RegistryItem> {
	registry: Registry<T>,
	order: Arc<OrderTracker<T>>,
}

impl<T: RegistryItem> OrderedRegistry<T> {
	/// Creates an empty, pending ordered registry for the given definition.
	pub fn new(def: impl RegistryDef<T>) -> Self {
		let order = Arc::new(OrderTracker::new());
		let registry = Registry::new(Ordered {
			inner: def,
			order: Arc::clone(&order),
		});
		Self { registry, order }
	}

	/// Returns the registered items, earliest registration first.
	pub fn items(&self) -> Result<Vec<Arc<T>>, RegistryError<T>> {
		self.registry.populate()?;
		Ok(self.registry.locked(|| self.order.snapshot()))
	}

	/// Returns an iterator over the registered items in registration order.
	pub fn iter(&self) -> Result<std::vec::IntoIter<Arc<T>>, RegistryError<T>> {
		Ok(self.items()?.into_iter())
	}

	/// Returns the item registered at `index`.
	///
	/// Negative indexes count back from the most recent registration, so `-1`
	/// is the last item.
	///
	/// # Errors
	///
	/// Returns [`RegistryError::IndexOutOfRange`] if `index` does not address a
	/// registered item, or any error raised while populating.
	pub fn at(&self, index: isize) -> Result<Arc<T>, RegistryError<T>> {
		self.registry.populate()?;
		self.registry.locked(|| self.order.at(index))
	}

	/// Alias of [`OrderedRegistry::at`].
	pub fn get_index(&self, index: isize) -> Result<Arc<T>, RegistryError<T>> {
		self.at(index)
	}

	/// Returns the earliest registered item.
	pub fn first(&self) -> Result<Option<Arc<T>>, RegistryError<T>> {
		match self.at(0) {
			Ok(item) => Ok(Some(item)),
			Err(RegistryError::IndexOutOfRange { .. }) => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// Returns the most recently registered item.
	pub fn last(&self) -> Result<Option<Arc<T>>, RegistryError<T>> {
		match self.at(-1) {
			Ok(item) => Ok(Some(item)),
			Err(RegistryError::IndexOutOfRange { .. }) => Ok(None),
			Err(err) => Err(err),
		}
	}
}

impl<T: RegistryItem> Deref for OrderedRegistry<T> {
	type Target = Registry<T>;

	fn deref(&self) -> &Registry<T> {
		&self.registry
	}
}

impl<T: RegistryItem> std::fmt::Debug for OrderedRegistry<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("OrderedRegistry").field(&self.registry).finish()
	}
}
