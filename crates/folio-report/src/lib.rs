mod markdown;

pub use markdown::{write_mapping_report, write_migration_report};
