pub mod engine;
pub mod holdings;
pub mod linker;
pub mod resolver;

pub use engine::{MappingEngine, TraversalOptions};
pub use holdings::HoldingsResolver;
pub use linker::{InstanceLinker, parse_legacy_bib_ids};
pub use resolver::{PropertyResolver, PropertyValue};
