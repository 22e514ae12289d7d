pub mod src;

pub use src::raw_source_map::{encode_vlq, SourceMap};
pub use src::segment_marker::{compare_markers, SegmentMarker};
pub use src::source_file::{line_starts, offset_to_line_col, SourceMapBuilder};

#[cfg(test)]
mod test;
