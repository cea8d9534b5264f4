//! The registry container.
//!
//! # Role
//!
//! Owns the item set, one index map per lookup attribute and the lifecycle
//! state, all behind a single re-entrant lock. Every mutation validates
//! first and commits second, so a failed call leaves no partial index update.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use rustc_hash::{FxHashMap, FxHashSet};

use super::state::{RegistryState, StateCell};
use crate::config::ErrorTemplates;
use crate::def::RegistryDef;
use crate::error::RegistryError;
use crate::item::RegistryItem;
use crate::query::Query;
use crate::value::AttrValue;

/// Index storage guarded by the registry lock.
pub(super) struct Indexes<T> {
	/// Authoritative membership.
	pub(super) items: FxHashSet<Arc<T>>,
	/// One map per declared lookup attribute, parallel to `Registry::lookup_attrs`.
	pub(super) by_attr: Vec<FxHashMap<AttrValue, Arc<T>>>,
}

type Guard<'a, T> = ReentrantMutexGuard<'a, RefCell<Indexes<T>>>;

/// Marks an interrupted population ready while a panic unwinds through
/// [`Registry::populate`].
///
/// Every normal return leaves the state `Pending` or `Ready`, so a
/// `Populating` state on drop only happens on unwind.
struct PopulateUnwind<'a> {
	state: &'a StateCell,
	label: &'a str,
}

impl Drop for PopulateUnwind<'_> {
	fn drop(&mut self) {
		if self.state.load() == RegistryState::Populating {
			tracing::error!(registry = %self.label, "population panicked; registry left ready with partial defaults");
			self.state.store(RegistryState::Ready);
		}
	}
}

/// A thread-safe set of unique items, searchable by declared attributes.
///
/// # Concurrency
///
/// - One [`ReentrantMutex`] serializes every operation; register, unregister,
///   populate and reset are atomic with respect to each other.
/// - Hooks run with the lock held and may call back into the registry.
///   Internal `RefCell` borrows are never held across a hook or a default
///   source call.
/// - `populate` re-entered on the populating thread returns immediately.
///   Other threads block on the lock until population has finished.
pub struct Registry<T: RegistryItem> {
	pub(super) def: Box<dyn RegistryDef<T>>,
	pub(super) label: String,
	pub(super) lookup_attrs: &'static [&'static str],
	pub(super) templates: ErrorTemplates,
	pub(super) state: StateCell,
	pub(super) indexes: ReentrantMutex<RefCell<Indexes<T>>>,
}

impl<T: RegistryItem> Registry<T> {
	/// Creates an empty, pending registry for the given definition.
	pub fn new(def: impl RegistryDef<T>) -> Self {
		let label = def.label().to_owned();
		let lookup_attrs = def.lookup_attrs();
		let templates = def.error_templates();
		let indexes = Indexes {
			items: FxHashSet::default(),
			by_attr: lookup_attrs.iter().map(|_| FxHashMap::default()).collect(),
		};

		Self {
			def: Box::new(def),
			label,
			lookup_attrs,
			templates,
			state: StateCell::new(RegistryState::Pending),
			indexes: ReentrantMutex::new(RefCell::new(indexes)),
		}
	}

	/// Returns the registry type name used in error and log text.
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Returns the declared lookup attribute names.
	pub fn lookup_attrs(&self) -> &'static [&'static str] {
		self.lookup_attrs
	}

	/// Returns the current lifecycle state without triggering population.
	pub fn state(&self) -> RegistryState {
		self.state.load()
	}

	/// Returns the item matching a single attribute/value query.
	///
	/// # Errors
	///
	/// - [`RegistryError::InvalidQuery`] if the query does not hold exactly one
	///   usable term.
	/// - [`RegistryError::UnsupportedAttribute`] if the attribute is not declared.
	/// - [`RegistryError::ItemNotFound`] if no item holds the value.
	pub fn get(&self, query: impl Into<Query>) -> Result<Arc<T>, RegistryError<T>> {
		let (attr_name, attr_value) = query.into().resolve(&self.label, "get", self.lookup_attrs)?;
		self.populate()?;

		let guard = self.indexes.lock();
		let indexes = guard.borrow();
		let index = self.attr_index(&indexes, &attr_name)?;
		match index.get(&attr_value) {
			Some(item) => Ok(Arc::clone(item)),
			None => Err(RegistryError::item_not_found(&self.templates, &attr_name, attr_value)),
		}
	}

	/// Returns the item matching a query, or `None` if no item holds the value.
	///
	/// Query shape and unsupported attribute errors still propagate.
	pub fn get_or_none(&self, query: impl Into<Query>) -> Result<Option<Arc<T>>, RegistryError<T>> {
		let (attr_name, attr_value) = query.into().resolve(&self.label, "get_or_none", self.lookup_attrs)?;
		match self.get(Query::attr(attr_name, attr_value)) {
			Ok(item) => Ok(Some(item)),
			Err(err) if err.kind().is_lookup_miss() => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// Registers an item and returns the stored handle.
	///
	/// Populates the registry first, so defaults always win over items
	/// registered by callers.
	///
	/// # Errors
	///
	/// - [`RegistryError::AlreadyRegistered`] if the item is a member.
	/// - Any error returned by [`RegistryDef::on_item_registering`].
	/// - [`RegistryError::InvalidItemRegistration`] if the item lacks a
	///   declared attribute.
	/// - [`RegistryError::RegistrationConflict`] if another item holds one of
	///   the item's attribute values.
	pub fn register(&self, item: impl Into<Arc<T>>) -> Result<Arc<T>, RegistryError<T>> {
		let item = item.into();
		self.populate()?;

		let guard = self.indexes.lock();
		if guard.borrow().items.contains(&item) {
			return Err(RegistryError::already_registered(&self.templates, item));
		}

		self.def.on_item_registering(self, &item)?;

		let mut values = Vec::with_capacity(self.lookup_attrs.len());
		{
			let indexes = guard.borrow();
			for (&attr_name, index) in self.lookup_attrs.iter().zip(&indexes.by_attr) {
				let Some(value) = item.lookup_attr(attr_name) else {
					return Err(RegistryError::invalid_item_registration(&self.templates, item, attr_name));
				};
				if let Some(other) = index.get(&value) {
					return Err(RegistryError::registration_conflict(
						&self.templates,
						Arc::clone(&item),
						Arc::clone(other),
						attr_name,
						value,
					));
				}
				values.push(value);
			}
		}

		{
			let mut borrowed = guard.borrow_mut();
			let indexes = &mut *borrowed;
			for (index, value) in indexes.by_attr.iter_mut().zip(values) {
				index.insert(value, Arc::clone(&item));
			}
			indexes.items.insert(Arc::clone(&item));
		}

		tracing::trace!(registry = %self.label, item = ?item, "registered item");
		self.def.on_item_registered(self, &item);
		Ok(item)
	}

	/// Unregisters an item and returns the handle that was stored.
	///
	/// # Errors
	///
	/// - Any error returned by [`RegistryDef::on_item_unregistering`].
	/// - [`RegistryError::ItemNotFoundUnregistration`] if the item is not a member.
	pub fn unregister(&self, item: impl Into<Arc<T>>) -> Result<Arc<T>, RegistryError<T>> {
		let item = item.into();
		self.populate()?;

		let guard = self.indexes.lock();
		self.def.on_item_unregistering(self, &item)?;

		let stored = {
			let mut borrowed = guard.borrow_mut();
			let indexes = &mut *borrowed;
			let Some(stored) = indexes.items.take(&item) else {
				return Err(RegistryError::item_not_found_unregistration(&self.templates, item));
			};
			for (&attr_name, index) in self.lookup_attrs.iter().zip(indexes.by_attr.iter_mut()) {
				let Some(value) = stored.lookup_attr(attr_name) else {
					continue;
				};
				if index.get(&value).is_some_and(|held| Arc::ptr_eq(held, &stored)) {
					index.remove(&value);
				}
			}
			stored
		};

		tracing::trace!(registry = %self.label, item = ?stored, "unregistered item");
		self.def.on_item_unregistered(self, &stored);
		Ok(stored)
	}

	/// Unregisters the item matching a single attribute/value query.
	///
	/// # Errors
	///
	/// - [`RegistryError::InvalidQuery`] and [`RegistryError::UnsupportedAttribute`]
	///   as for [`Registry::get`].
	/// - [`RegistryError::AttrNotFoundUnregistration`] if no item holds the value.
	/// - Any error from [`Registry::unregister`].
	pub fn unregister_by_attr(&self, query: impl Into<Query>) -> Result<Arc<T>, RegistryError<T>> {
		let (attr_name, attr_value) = query.into().resolve(&self.label, "unregister_by_attr", self.lookup_attrs)?;
		self.populate()?;

		let guard = self.indexes.lock();
		let item = {
			let indexes = guard.borrow();
			let index = self.attr_index(&indexes, &attr_name)?;
			match index.get(&attr_value) {
				Some(item) => Arc::clone(item),
				None => {
					return Err(RegistryError::attr_not_found_unregistration(
						&self.templates,
						&attr_name,
						attr_value,
					));
				}
			}
		};

		self.unregister(item)
	}

	/// Ensures the registry is populated.
	///
	/// Has no effect unless the registry is [`RegistryState::Pending`].
	///
	/// # Errors
	///
	/// Returns any veto from [`RegistryDef::on_populating`], leaving the
	/// registry pending. Returns the first error raised while registering a
	/// default; the registry is then marked ready with the defaults that did
	/// register, and [`Registry::reset`] allows another attempt.
	///
	/// A panic raised by `on_populating` or by the defaults source also leaves
	/// the registry ready, with whatever defaults registered before it.
	pub fn populate(&self) -> Result<(), RegistryError<T>> {
		if self.state.load() == RegistryState::Ready {
			return Ok(());
		}

		let _guard = self.indexes.lock();
		if self.state.load() != RegistryState::Pending {
			return Ok(());
		}
		self.state.store(RegistryState::Populating);
		let _unwind = PopulateUnwind {
			state: &self.state,
			label: &self.label,
		};

		if let Err(err) = self.def.on_populating(self) {
			self.state.store(RegistryState::Pending);
			return Err(err);
		}

		let mut count = 0usize;
		for item in self.def.defaults() {
			if let Err(err) = self.register(item) {
				tracing::error!(registry = %self.label, error = %err, "failed to register default item");
				self.state.store(RegistryState::Ready);
				return Err(err);
			}
			count += 1;
		}

		self.state.store(RegistryState::Ready);
		tracing::debug!(registry = %self.label, count, "populated registry");
		self.def.on_populated(self);
		Ok(())
	}

	/// Unregisters every item and marks the registry pending.
	///
	/// Has no effect unless the registry is [`RegistryState::Ready`]. The next
	/// populating access registers the defaults again.
	///
	/// # Errors
	///
	/// Returns any veto from [`RegistryDef::on_resetting`] or from an
	/// unregistration; the registry then stays ready.
	///
	/// # Panics
	///
	/// Panics if items remain after every item was unregistered, which means a
	/// hook registered items during the reset.
	pub fn reset(&self) -> Result<(), RegistryError<T>> {
		let guard = self.indexes.lock();
		if self.state.load() != RegistryState::Ready {
			return Ok(());
		}

		self.def.on_resetting(self)?;

		let items: Vec<Arc<T>> = guard.borrow().items.iter().cloned().collect();
		let count = items.len();
		for item in items {
			self.unregister(item)?;
		}

		let remaining = guard.borrow().items.len();
		assert!(
			remaining == 0,
			"registry {} still holds {remaining} items after reset; a hook registered items while resetting",
			self.label
		);

		self.def.on_reset(self);
		self.state.store(RegistryState::Pending);
		tracing::debug!(registry = %self.label, count, "reset registry");
		Ok(())
	}

	/// Returns whether the item is registered.
	pub fn contains(&self, item: &T) -> Result<bool, RegistryError<T>> {
		self.populate()?;
		let guard = self.indexes.lock();
		let found = guard.borrow().items.contains(item);
		Ok(found)
	}

	/// Returns the number of registered items.
	pub fn len(&self) -> Result<usize, RegistryError<T>> {
		self.populate()?;
		let guard = self.indexes.lock();
		let len = guard.borrow().items.len();
		Ok(len)
	}

	/// Returns true if no items are registered.
	pub fn is_empty(&self) -> Result<bool, RegistryError<T>> {
		Ok(self.len()? == 0)
	}

	/// Returns a snapshot of the registered items in unspecified order.
	pub fn items(&self) -> Result<Vec<Arc<T>>, RegistryError<T>> {
		self.populate()?;
		let guard = self.indexes.lock();
		let items = guard.borrow().items.iter().cloned().collect();
		Ok(items)
	}

	/// Returns an iterator over a snapshot of the registered items.
	///
	/// The order is unspecified and may differ between calls.
	pub fn iter(&self) -> Result<std::vec::IntoIter<Arc<T>>, RegistryError<T>> {
		Ok(self.items()?.into_iter())
	}

	/// Runs `f` while holding the registry lock.
	///
	/// Used by extensions that must read their own hook-maintained state
	/// consistently with the core.
	pub(crate) fn locked<R>(&self, f: impl FnOnce() -> R) -> R {
		let _guard: Guard<'_, T> = self.indexes.lock();
		f()
	}

	fn attr_index<'a>(
		&self,
		indexes: &'a Indexes<T>,
		attr_name: &str,
	) -> Result<&'a FxHashMap<AttrValue, Arc<T>>, RegistryError<T>> {
		self.lookup_attrs
			.iter()
			.position(|&name| name == attr_name)
			.map(|pos| &indexes.by_attr[pos])
			.ok_or_else(|| RegistryError::unsupported_attribute(&self.templates, attr_name))
	}
}

impl<T: RegistryItem> fmt::Debug for Registry<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let len = self.indexes.try_lock().and_then(|guard| {
			let len = guard.try_borrow().ok().map(|indexes| indexes.items.len());
			len
		});
		f.debug_struct("Registry")
			.field("label", &self.label)
			.field("lookup_attrs", &self.lookup_attrs)
			.field("state", &self.state())
			.field("len", &len)
			.finish()
	}
}
