use std::any::{Any, type_name};
use std::fmt;

/// Boxed value produced by an entry point loader.
pub type Loaded = Box<dyn Any + Send + Sync>;

/// Function that produces the value behind an entry point.
pub type Loader = fn() -> Result<Loaded, LoadError>;

/// A named, lazily loaded value advertised under a group.
///
/// Entry points are collected process-wide with `inventory`; submit one with
/// [`crate::entry_point!`].
#[derive(Clone, Copy)]
pub struct EntryPoint {
	/// Group the entry belongs to. Registries select entries by group.
	pub group: &'static str,
	/// Entry name, used for ordering and in load failure logs.
	pub name: &'static str,
	pub loader: Loader,
}

inventory::collect!(EntryPoint);

impl EntryPoint {
	pub const fn new(group: &'static str, name: &'static str, loader: Loader) -> Self {
		Self { group, name, loader }
	}

	/// Runs the loader.
	pub fn load(&self) -> Result<Loaded, LoadError> {
		(self.loader)()
	}

	/// Runs the loader and downcasts the value to `T`.
	///
	/// # Errors
	///
	/// Returns [`LoadError::TypeMismatch`] if the loaded value is not a `T`,
	/// or the loader's own error.
	pub fn load_as<T: Any>(&self) -> Result<T, LoadError> {
		match self.load()?.downcast::<T>() {
			Ok(value) => Ok(*value),
			Err(_) => Err(LoadError::TypeMismatch {
				entry: self.name,
				expected: type_name::<T>(),
			}),
		}
	}
}

impl fmt::Debug for EntryPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntryPoint")
			.field("group", &self.group)
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

/// Failure to turn an entry point into a registry item.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("entry point {entry} does not provide a {expected}")]
	TypeMismatch { entry: &'static str, expected: &'static str },

	#[error("{0}")]
	Failed(String),

	#[error(transparent)]
	Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl LoadError {
	pub fn failed(reason: impl fmt::Display) -> Self {
		Self::Failed(reason.to_string())
	}
}

#[doc(hidden)]
pub fn boxed<V: Any + Send + Sync>(value: V) -> Result<Loaded, LoadError> {
	Ok(Box::new(value))
}

/// Submits an [`EntryPoint`] to the process-wide inventory.
///
/// The value form boxes an expression evaluated on every load. The
/// `loader =` form takes a function pointer or non-capturing closure that
/// may fail.
///
/// ```
/// registries::entry_point!("demo.greetings", "hello", String::from("hello"));
/// registries::entry_point!("demo.greetings", "broken", loader = || {
/// 	Err(registries::LoadError::failed("not installed"))
/// });
/// # fn main() {}
/// ```
#[macro_export]
macro_rules! entry_point {
	($group:literal, $name:literal, loader = $loader:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::EntryPoint::new($group, $name, $loader)
		}
	};
	($group:literal, $name:literal, $value:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::EntryPoint::new($group, $name, || $crate::discovery::boxed($value))
		}
	};
}
