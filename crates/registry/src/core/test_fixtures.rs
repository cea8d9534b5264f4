use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::Registry;
use crate::config::ErrorTemplates;
use crate::def::RegistryDef;
use crate::error::RegistryError;

/// Test item with two optional lookup attributes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct Item {
	pub(crate) id: Option<i64>,
	pub(crate) name: Option<String>,
}

crate::registry_item!(Item {
	"id" => id,
	"name" => name,
});

impl fmt::Debug for Item {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Item(")?;
		match self.id {
			Some(id) => write!(f, "id={id}")?,
			None => write!(f, "id=-")?,
		}
		match &self.name {
			Some(name) => write!(f, ", name={name:?})"),
			None => write!(f, ")"),
		}
	}
}

pub(crate) fn item(id: i64, name: &str) -> Item {
	Item {
		id: Some(id),
		name: Some(name.to_owned()),
	}
}

pub(crate) fn id_item(id: i64) -> Item {
	Item { id: Some(id), name: None }
}

pub(crate) type Events = Arc<Mutex<Vec<String>>>;

/// Configurable definition that records every hook call.
pub(crate) struct TestDef {
	pub(crate) attrs: &'static [&'static str],
	pub(crate) defaults: Vec<Item>,
	pub(crate) templates: ErrorTemplates,
	pub(crate) events: Events,
	pub(crate) defaults_pulled: Arc<AtomicUsize>,
	pub(crate) reject_id: Option<i64>,
	pub(crate) veto_populating: bool,
}

impl TestDef {
	pub(crate) fn new(attrs: &'static [&'static str]) -> Self {
		Self {
			attrs,
			defaults: Vec::new(),
			templates: ErrorTemplates::default(),
			events: Events::default(),
			defaults_pulled: Arc::new(AtomicUsize::new(0)),
			reject_id: None,
			veto_populating: false,
		}
	}

	pub(crate) fn with_defaults(mut self, defaults: impl IntoIterator<Item = Item>) -> Self {
		self.defaults = defaults.into_iter().collect();
		self
	}

	pub(crate) fn with_templates(mut self, templates: ErrorTemplates) -> Self {
		self.templates = templates;
		self
	}

	pub(crate) fn rejecting(mut self, id: i64) -> Self {
		self.reject_id = Some(id);
		self
	}

	fn record(&self, event: String) {
		self.events.lock().push(event);
	}
}

impl RegistryDef<Item> for TestDef {
	fn label(&self) -> &str {
		"MyRegistry"
	}

	fn lookup_attrs(&self) -> &'static [&'static str] {
		self.attrs
	}

	fn defaults(&self) -> Box<dyn Iterator<Item = Item> + '_> {
		self.defaults_pulled.fetch_add(1, Ordering::SeqCst);
		Box::new(self.defaults.iter().cloned())
	}

	fn error_templates(&self) -> ErrorTemplates {
		self.templates.clone()
	}

	fn on_item_registering(&self, _registry: &Registry<Item>, item: &Arc<Item>) -> Result<(), RegistryError<Item>> {
		self.record(format!("registering {item:?}"));
		if item.id.is_some() && item.id == self.reject_id {
			return Err(RegistryError::registration_rejected(Arc::clone(item), "reserved id"));
		}
		Ok(())
	}

	fn on_item_registered(&self, _registry: &Registry<Item>, item: &Arc<Item>) {
		self.record(format!("registered {item:?}"));
	}

	fn on_item_unregistering(&self, _registry: &Registry<Item>, item: &Arc<Item>) -> Result<(), RegistryError<Item>> {
		self.record(format!("unregistering {item:?}"));
		Ok(())
	}

	fn on_item_unregistered(&self, _registry: &Registry<Item>, item: &Arc<Item>) {
		self.record(format!("unregistered {item:?}"));
	}

	fn on_populating(&self, registry: &Registry<Item>) -> Result<(), RegistryError<Item>> {
		self.record(format!("populating {}", registry.state()));
		if self.veto_populating {
			return Err(RegistryError::registration_rejected(Arc::new(id_item(0)), "population vetoed"));
		}
		Ok(())
	}

	fn on_populated(&self, registry: &Registry<Item>) {
		self.record(format!("populated {}", registry.state()));
	}

	fn on_resetting(&self, _registry: &Registry<Item>) -> Result<(), RegistryError<Item>> {
		self.record("resetting".to_owned());
		Ok(())
	}

	fn on_reset(&self, _registry: &Registry<Item>) {
		self.record("reset".to_owned());
	}
}

/// Builds a registry over `def` and returns it with the def's event log.
pub(crate) fn registry(def: TestDef) -> (Registry<Item>, Events) {
	let events = Arc::clone(&def.events);
	(Registry::new(def), events)
}

/// Asserts that the item set and every index map agree.
pub(crate) fn assert_coherent<T: crate::RegistryItem>(registry: &Registry<T>) {
	let guard = registry.indexes.lock();
	let indexes = guard.borrow();

	for (pos, &attr_name) in registry.lookup_attrs.iter().enumerate() {
		let index = &indexes.by_attr[pos];
		assert_eq!(
			index.len(),
			indexes.items.len(),
			"index for {attr_name} has {} entries for {} items",
			index.len(),
			indexes.items.len()
		);
		for (value, held) in index {
			let stored = indexes.items.get(held).expect("indexed item is a member");
			assert!(Arc::ptr_eq(stored, held), "index for {attr_name} holds a stale handle");
			assert_eq!(held.lookup_attr(attr_name).as_ref(), Some(value));
		}
	}
	for item in &indexes.items {
		for (pos, &attr_name) in registry.lookup_attrs.iter().enumerate() {
			let value = item.lookup_attr(attr_name).expect("member carries every attribute");
			assert!(indexes.by_attr[pos].contains_key(&value), "{item:?} missing from {attr_name} index");
		}
	}
}
