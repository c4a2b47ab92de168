pub mod error;
pub mod lookup;
pub mod mapping;
pub mod record;
pub mod schema;
pub mod stats;

pub use error::{Result, TransformationError};
pub use lookup::{InstanceIdEntry, InstanceIdMap};
pub use mapping::{MappingRow, NOT_MAPPED, RecordMap, normalize_target_path};
pub use record::{LegacyRecord, TargetRecord};
pub use schema::{PropertyDescriptor, PropertyKind, TargetSchema};
pub use stats::{FieldCounter, TransformationStats};
