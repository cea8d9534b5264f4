use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// The lifecycle state of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryState {
	/// Created or reset; the next access populates.
	Pending,
	/// Defaults are being registered.
	Populating,
	/// Population finished.
	Ready,
}

impl fmt::Display for RegistryState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pending => write!(f, "pending"),
			Self::Populating => write!(f, "populating"),
			Self::Ready => write!(f, "ready"),
		}
	}
}

/// Atomic cell holding a [`RegistryState`].
///
/// Transitions happen under the registry lock; loads may happen without it
/// so that `populate` can return early once the registry is ready.
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
	pub(crate) fn new(state: RegistryState) -> Self {
		Self(AtomicU8::new(state as u8))
	}

	pub(crate) fn load(&self) -> RegistryState {
		match self.0.load(Ordering::Acquire) {
			0 => RegistryState::Pending,
			1 => RegistryState::Populating,
			_ => RegistryState::Ready,
		}
	}

	pub(crate) fn store(&self, state: RegistryState) {
		self.0.store(state as u8, Ordering::Release);
	}
}
