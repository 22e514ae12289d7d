pub mod raw_source_map;
pub mod segment_marker;
pub mod source_file;
