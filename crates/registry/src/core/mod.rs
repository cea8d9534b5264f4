#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Registry core.
//!
//! # Purpose
//!
//! The `core` module owns the generic [`Registry`] container: a set of unique
//! items searchable by declared lookup attributes, populated lazily from a
//! default-item source and driven through a small lifecycle.
//!
//! # Mental Model
//!
//! 1. **Definition:** A [`crate::RegistryDef`] names the registry, declares
//!    its lookup attributes and supplies defaults, templates and hooks.
//! 2. **Population:** The first access moves the registry from
//!    [`RegistryState::Pending`] through [`RegistryState::Populating`] to
//!    [`RegistryState::Ready`], registering every default through the normal
//!    registration path. A population that fails or panics part way still
//!    ends ready, and `reset` clears what it left behind.
//! 3. **Mutation:** `register` and `unregister` validate everything before
//!    touching the indexes, then commit the item set and every index map
//!    together.
//! 4. **Reset:** `reset` unregisters every item through the normal path and
//!    returns the registry to pending, so the next access populates again.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Registry`] | Item set, per-attribute index maps and lifecycle state. |
//! | [`RegistryState`] | Lifecycle state, readable without locking. |
//!
//! # Concurrency
//!
//! - **Mutations:** Totally ordered by one re-entrant lock per registry.
//! - **Hooks:** Called with the lock held; they may re-enter the registry on
//!   the same thread.
//! - **Population:** Exactly once per pending cycle. Other threads block on the
//!   lock until it finishes.
//!
//! # Invariants
//!
//! - Must keep the item set and every index map coherent.
//!   - Enforced in: [`Registry::register`], [`Registry::unregister`].
//!   - Tested by: `invariants::test_index_coherence`
//!   - Failure symptom: `get` returns items that are not members, or misses members.
//!
//! - Must never let two distinct items hold the same value for one attribute.
//!   - Enforced in: [`Registry::register`].
//!   - Tested by: `invariants::test_no_shared_attribute_values`
//!   - Failure symptom: A lookup silently resolves to the wrong item.
//!
//! - Must leave the indexes untouched when registration fails.
//!   - Enforced in: [`Registry::register`] (validate, then commit).
//!   - Tested by: `invariants::test_failed_registration_is_atomic`
//!   - Failure symptom: Orphan index entries block later registrations.
//!
//! - Must register defaults exactly once per pending cycle.
//!   - Enforced in: [`Registry::populate`].
//!   - Tested by: `invariants::test_population_runs_once`
//!   - Failure symptom: Defaults conflict with themselves, or hooks fire twice.
//!
//! - Must return an unregistered item to a fresh, re-registrable state.
//!   - Enforced in: [`Registry::unregister`].
//!   - Tested by: `invariants::test_register_unregister_round_trip`
//!   - Failure symptom: Re-registering an item reports a stale conflict.

mod registry;
mod state;

pub use registry::Registry;
pub use state::RegistryState;

#[cfg(test)]
mod invariants;

#[cfg(test)]
pub(crate) mod test_fixtures;
