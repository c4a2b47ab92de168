pub mod cache;
pub mod entity;
pub mod mapping;

pub use cache::RefDataCache;
pub use entity::{KeyType, RefDataTuple, RefEntity};
pub use mapping::{RefDataMapping, WILDCARD};
