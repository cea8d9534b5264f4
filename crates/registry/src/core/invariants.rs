use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::RegistryState;
use super::test_fixtures::{TestDef, assert_coherent, id_item, item, registry};
use crate::error::ErrorKind;

/// Must keep the item set and every index map coherent.
///
/// * Enforced in: `Registry::register`, `Registry::unregister`
/// * Failure symptom: `get` returns items that are not members, or misses members.
#[cfg_attr(test, test)]
pub(crate) fn test_index_coherence() {
	let (registry, _) = registry(TestDef::new(&["id", "name"]).with_defaults([item(1, "a"), item(2, "b")]));

	registry.register(item(3, "c")).unwrap();
	assert_coherent(&registry);

	registry.unregister(item(1, "a")).unwrap();
	assert_coherent(&registry);

	registry.unregister_by_attr(("name", "c")).unwrap();
	assert_coherent(&registry);

	assert_eq!(registry.len().unwrap(), 1);
	assert_eq!(*registry.get(("id", 2)).unwrap(), item(2, "b"));
}

/// Must never let two distinct items hold the same value for one attribute.
///
/// * Enforced in: `Registry::register`
/// * Failure symptom: A lookup silently resolves to the wrong item.
#[cfg_attr(test, test)]
pub(crate) fn test_no_shared_attribute_values() {
	let (registry, _) = registry(TestDef::new(&["id", "name"]));
	registry.register(item(1, "a")).unwrap();

	let err = registry.register(item(2, "a")).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::RegistrationConflict);
	assert_eq!(err.attr_name(), Some("name"));

	assert_eq!(registry.len().unwrap(), 1);
	assert_eq!(*registry.get(("name", "a")).unwrap(), item(1, "a"));
}

/// Must leave the indexes untouched when registration fails.
///
/// * Enforced in: `Registry::register` (validate, then commit)
/// * Failure symptom: Orphan index entries block later registrations.
#[cfg_attr(test, test)]
pub(crate) fn test_failed_registration_is_atomic() {
	let (registry, _) = registry(TestDef::new(&["id", "name"]));
	registry.register(item(1, "a")).unwrap();

	// "id" validates before "name" conflicts; id=2 must not be left behind.
	registry.register(item(2, "a")).unwrap_err();
	// Missing "name"; id=3 must not be left behind either.
	registry.register(id_item(3)).unwrap_err();
	assert_coherent(&registry);

	registry.register(item(2, "b")).unwrap();
	registry.register(item(3, "c")).unwrap();
	assert_eq!(registry.len().unwrap(), 3);
}

/// Must register defaults exactly once per pending cycle.
///
/// * Enforced in: `Registry::populate`
/// * Failure symptom: Defaults conflict with themselves, or hooks fire twice.
#[cfg_attr(test, test)]
pub(crate) fn test_population_runs_once() {
	let def = TestDef::new(&["id"]).with_defaults([id_item(1), id_item(2)]);
	let pulled = Arc::clone(&def.defaults_pulled);
	let (registry, _) = registry(def);

	registry.populate().unwrap();
	registry.populate().unwrap();
	registry.get(1).unwrap();
	assert_eq!(registry.state(), RegistryState::Ready);
	assert_eq!(pulled.load(Ordering::SeqCst), 1);

	registry.reset().unwrap();
	registry.populate().unwrap();
	assert_eq!(pulled.load(Ordering::SeqCst), 2);
	assert_eq!(registry.len().unwrap(), 2);
}

/// Must return an unregistered item to a fresh, re-registrable state.
///
/// * Enforced in: `Registry::unregister`
/// * Failure symptom: Re-registering an item reports a stale conflict.
#[cfg_attr(test, test)]
pub(crate) fn test_register_unregister_round_trip() {
	let (registry, _) = registry(TestDef::new(&["id", "name"]).with_defaults([item(1, "a")]));
	let before = registry.len().unwrap();

	registry.register(item(2, "b")).unwrap();
	registry.unregister(item(2, "b")).unwrap();
	assert_eq!(registry.len().unwrap(), before);
	assert!(registry.get_or_none(("id", 2)).unwrap().is_none());
	assert!(registry.get_or_none(("name", "b")).unwrap().is_none());

	registry.register(item(2, "b")).unwrap();
	assert_coherent(&registry);
}
