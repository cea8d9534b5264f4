use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};

use super::{Discovered, Discovery, DiscoveryDef, EntryPoint, InventoryDiscovery, LoadError, StaticDiscovery, boxed};
use crate::core::Registry;
use crate::def::RegistryDef;
use crate::ordered::OrderedRegistry;

const GROUP: &str = "registries.tests.greetings";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Greeting {
	name: String,
}

impl Greeting {
	fn new(name: &str) -> Self {
		Self { name: name.to_owned() }
	}
}

crate::registry_item!(Greeting { "name" => name });

struct Greetings;

impl RegistryDef<Greeting> for Greetings {
	fn lookup_attrs(&self) -> &'static [&'static str] {
		&["name"]
	}
}

impl DiscoveryDef<Greeting> for Greetings {
	fn group(&self) -> &str {
		GROUP
	}
}

crate::entry_point!("registries.tests.greetings", "zeta", Greeting::new("zeta"));
crate::entry_point!("registries.tests.greetings", "alpha", Greeting::new("alpha"));
crate::entry_point!("registries.tests.greetings", "broken", loader = || Err(LoadError::failed("not installed")));
crate::entry_point!("registries.tests.other", "alpha", 7u32);

fn three_entries() -> StaticDiscovery {
	StaticDiscovery::new([
		EntryPoint::new(GROUP, "a", || boxed(Greeting::new("a"))),
		EntryPoint::new(GROUP, "b", || Err(LoadError::failed("missing dependency"))),
		EntryPoint::new(GROUP, "c", || boxed(Greeting::new("c"))),
		EntryPoint::new("elsewhere", "d", || boxed(Greeting::new("d"))),
	])
}

#[derive(Debug)]
struct CapturedEvent {
	level: Level,
	message: String,
	fields: Vec<(String, String)>,
}

impl CapturedEvent {
	fn field(&self, name: &str) -> Option<&str> {
		self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
	}
}

/// Layer that records every event it sees.
#[derive(Clone, Default)]
struct CaptureLayer(Arc<Mutex<Vec<CapturedEvent>>>);

impl CaptureLayer {
	fn errors(&self) -> Vec<CapturedEvent> {
		let mut events = self.0.lock();
		let (errors, rest): (Vec<_>, Vec<_>) = events.drain(..).partition(|e| e.level == Level::ERROR);
		*events = rest;
		errors
	}
}

struct EventVisitor<'a>(&'a mut CapturedEvent);

impl Visit for EventVisitor<'_> {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			self.0.message = format!("{value:?}");
		} else {
			self.0.fields.push((field.name().to_owned(), format!("{value:?}")));
		}
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		self.0.fields.push((field.name().to_owned(), value.to_owned()));
	}
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let mut captured = CapturedEvent {
			level: *event.metadata().level(),
			message: String::new(),
			fields: Vec::new(),
		};
		event.record(&mut EventVisitor(&mut captured));
		self.0.lock().push(captured);
	}
}

fn names(items: impl IntoIterator<Item = Arc<Greeting>>) -> Vec<String> {
	let mut names: Vec<String> = items.into_iter().map(|g| g.name.clone()).collect();
	names.sort();
	names
}

#[test]
fn test_failed_entry_is_logged_and_skipped() {
	let capture = CaptureLayer::default();
	let subscriber = tracing_subscriber::registry().with(capture.clone());
	let registry: Registry<Greeting> = Registry::new(Discovered::with_source(Greetings, three_entries()));

	let len = tracing::subscriber::with_default(subscriber, || registry.len().unwrap());

	assert_eq!(len, 2);
	assert_eq!(names(registry.items().unwrap()), ["a", "c"]);

	let errors = capture.errors();
	assert_eq!(errors.len(), 1, "expected one load failure, got {errors:?}");
	let error = &errors[0];
	assert_eq!(error.message, "could not load entry point");
	assert_eq!(error.field("entry"), Some("b"));
	assert_eq!(error.field("registry"), Some("Greetings"));
	assert_eq!(error.field("error"), Some("missing dependency"));
}

#[test]
fn test_static_discovery_filters_by_group() {
	let entries = three_entries().entries(GROUP);
	let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
	assert_eq!(names, ["a", "b", "c"]);
	assert!(three_entries().entries("unknown").is_empty());
}

#[test]
fn test_inventory_discovery_orders_by_name() {
	let entries = InventoryDiscovery.entries(GROUP);
	let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
	assert_eq!(names, ["alpha", "broken", "zeta"]);

	let registry: Registry<Greeting> = Registry::new(Discovered::new(Greetings));
	assert_eq!(names_of(&registry), ["alpha", "zeta"]);
	assert_eq!(registry.get("zeta").unwrap().name, "zeta");
}

fn names_of(registry: &Registry<Greeting>) -> Vec<String> {
	names(registry.items().unwrap())
}

#[test]
fn test_load_as_reports_type_mismatch() {
	let entry = InventoryDiscovery.entries("registries.tests.other")[0];
	assert_eq!(entry.load_as::<u32>().unwrap(), 7);

	let err = entry.load_as::<Greeting>().unwrap_err();
	let LoadError::TypeMismatch { entry: name, expected } = err else {
		panic!("expected a type mismatch, got {err:?}");
	};
	assert_eq!(name, "alpha");
	assert!(expected.ends_with("Greeting"));
}

/// Builds greetings from plain string entries.
struct Shouts;

impl RegistryDef<Greeting> for Shouts {}

impl DiscoveryDef<Greeting> for Shouts {
	fn group(&self) -> &str {
		"shouts"
	}

	fn process_entry(&self, entry: &EntryPoint) -> Result<Greeting, LoadError> {
		let word = entry.load_as::<&'static str>()?;
		Ok(Greeting::new(&word.to_uppercase()))
	}
}

#[test]
fn test_custom_entry_processing() {
	let source = StaticDiscovery::new([
		EntryPoint::new("shouts", "hi", || boxed("hi")),
		EntryPoint::new("shouts", "bad", || boxed(1u8)),
		EntryPoint::new("shouts", "yo", || boxed("yo")),
	]);
	let registry: OrderedRegistry<Greeting> = OrderedRegistry::new(Discovered::with_source(Shouts, source));

	let ordered: Vec<String> = registry.iter().unwrap().map(|g| g.name.clone()).collect();
	assert_eq!(ordered, ["HI", "YO"]);
	assert_eq!(registry.label(), "Shouts");
}
