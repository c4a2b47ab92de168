pub mod json;
pub mod tabular;

pub use json::{
    read_instance_id_map, read_instance_id_map_file, read_record_map, read_record_map_file,
    read_ref_data, read_ref_data_file, read_target_schema, read_target_schema_file,
};
pub use tabular::{
    read_legacy_records, read_legacy_records_file, read_ref_data_map, read_ref_data_map_file,
};
