// Source File
//
// Source map assembly for rendered files.

use super::raw_source_map::{encode_vlq, SourceMap};
use super::segment_marker::SegmentMarker;

/// Computes the character offset of each line start in `source`.
pub fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, byte) in source.as_bytes().iter().enumerate() {
        if *byte == b'\n' {
            starts.push(idx + 1);
        }
    }
    starts
}

/// Maps a character offset to a 0-based (line, column) pair, given the
/// precomputed line starts of the file.
pub fn offset_to_line_col(starts: &[usize], offset: usize) -> (u32, u32) {
    let line = match starts.binary_search(&offset) {
        Ok(line) => line,
        Err(insert) => insert - 1,
    };
    (line as u32, (offset - starts[line]) as u32)
}

/// Source map builder.
pub struct SourceMapBuilder {
    file: String,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    mappings: Vec<Vec<SegmentMarker>>,
}

impl SourceMapBuilder {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sources: Vec::new(),
            sources_content: Vec::new(),
            names: Vec::new(),
            mappings: vec![Vec::new()],
        }
    }

    pub fn add_source(&mut self, source: &str, content: Option<&str>) -> usize {
        if let Some(idx) = self.sources.iter().position(|s| s == source) {
            return idx;
        }
        let idx = self.sources.len();
        self.sources.push(source.to_string());
        self.sources_content.push(content.map(|s| s.to_string()));
        idx
    }

    pub fn add_name(&mut self, name: &str) -> usize {
        if let Some(idx) = self.names.iter().position(|n| n == name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        idx
    }

    pub fn add_mapping(
        &mut self,
        gen_line: u32,
        gen_col: u32,
        src_line: u32,
        src_col: u32,
        source_idx: usize,
        name_idx: Option<usize>,
    ) {
        while self.mappings.len() <= gen_line as usize {
            self.mappings.push(Vec::new());
        }

        let mut marker =
            SegmentMarker::new(gen_col, src_line, src_col).with_source(source_idx as u32);
        if let Some(idx) = name_idx {
            marker = marker.with_name(idx as u32);
        }

        self.mappings[gen_line as usize].push(marker);
    }

    pub fn build(self) -> SourceMap {
        let mappings = self.encode_mappings();
        SourceMap {
            version: 3,
            file: self.file,
            source_root: None,
            sources: self.sources,
            sources_content: Some(self.sources_content),
            names: self.names,
            mappings,
        }
    }

    /// Standard v3 relative segment encoding: segments are relative to the
    /// previous segment on the same line for the generated column and to the
    /// previous segment anywhere for source index, line, column, and name.
    fn encode_mappings(&self) -> String {
        let mut out = String::new();
        let mut prev_source: i64 = 0;
        let mut prev_src_line: i64 = 0;
        let mut prev_src_col: i64 = 0;
        let mut prev_name: i64 = 0;

        for (line_idx, line) in self.mappings.iter().enumerate() {
            if line_idx > 0 {
                out.push(';');
            }
            let mut prev_gen_col: i64 = 0;
            let mut sorted = line.clone();
            sorted.sort_by_key(|m| m.generated_column);

            for (seg_idx, marker) in sorted.iter().enumerate() {
                if seg_idx > 0 {
                    out.push(',');
                }
                out.push_str(&encode_vlq(marker.generated_column as i64 - prev_gen_col));
                prev_gen_col = marker.generated_column as i64;

                if let Some(source) = marker.source_index {
                    out.push_str(&encode_vlq(source as i64 - prev_source));
                    prev_source = source as i64;
                    out.push_str(&encode_vlq(marker.line as i64 - prev_src_line));
                    prev_src_line = marker.line as i64;
                    out.push_str(&encode_vlq(marker.column as i64 - prev_src_col));
                    prev_src_col = marker.column as i64;

                    if let Some(name) = marker.name_index {
                        out.push_str(&encode_vlq(name as i64 - prev_name));
                        prev_name = name as i64;
                    }
                }
            }
        }
        out
    }
}
