//! Thread-safe item registries with attribute lookup.
//!
//! A [`Registry`] holds a set of unique items and indexes them by the lookup
//! attributes its [`RegistryDef`] declares. It populates itself lazily from
//! the definition's defaults on first access, reports every contract
//! violation as a structured [`RegistryError`], and calls the definition's
//! hooks around each mutation.
//!
//! # Layers
//!
//! - [`core`] - the registry container, its lifecycle and locking
//! - [`ordered`] - registration-order iteration and positional access
//! - [`discovery`] - defaults loaded from `inventory`-collected entry points
//!
//! # Example
//!
//! ```
//! use registries::{Registry, RegistryDef};
//!
//! #[derive(Debug, PartialEq, Eq, Hash)]
//! struct Codec {
//! 	name: &'static str,
//! 	extension: &'static str,
//! }
//!
//! registries::registry_item!(Codec {
//! 	"name" => name,
//! 	"extension" => extension,
//! });
//!
//! struct Codecs;
//!
//! impl RegistryDef<Codec> for Codecs {
//! 	fn lookup_attrs(&self) -> &'static [&'static str] {
//! 		&["name", "extension"]
//! 	}
//!
//! 	fn defaults(&self) -> Box<dyn Iterator<Item = Codec> + '_> {
//! 		Box::new([Codec { name: "gzip", extension: "gz" }].into_iter())
//! 	}
//! }
//!
//! let codecs = Registry::new(Codecs);
//! codecs.register(Codec { name: "zstd", extension: "zst" }).unwrap();
//!
//! assert_eq!(codecs.get(("extension", "gz")).unwrap().name, "gzip");
//! assert!(codecs.register(Codec { name: "brotli", extension: "gz" }).is_err());
//! ```

pub mod config;
pub mod core;
pub mod def;
pub mod discovery;
pub mod error;
pub mod item;
pub mod ordered;
pub mod query;
pub mod value;

pub use config::{ConfigError, ErrorTemplates, TemplateFields};
pub use crate::core::{Registry, RegistryState};
pub use def::RegistryDef;
pub use discovery::{Discovered, Discovery, DiscoveryDef, EntryPoint, InventoryDiscovery, LoadError, StaticDiscovery};
pub use error::{ErrorKind, RegistryError};
#[doc(hidden)]
pub use inventory;
pub use item::{RegistryItem, ToAttrValue};
pub use ordered::OrderedRegistry;
pub use query::Query;
pub use value::AttrValue;
