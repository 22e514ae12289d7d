//! Magic String
//!
//! An ordered insert/replace edit set over an original file. Untouched bytes
//! are carried through exactly; `generate` produces the edited text together
//! with a source map whose mappings for untouched spans point at the
//! original position 1:1, and whose mappings for inserted spans point at the
//! insertion locus, tagged with a name so the generated text can be traced.

use crate::sourcemaps::{line_starts, offset_to_line_col, SourceMap, SourceMapBuilder};

#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
    name: Option<String>,
    seq: usize,
}

pub struct MagicString<'s> {
    original: &'s str,
    edits: Vec<Edit>,
}

impl<'s> MagicString<'s> {
    pub fn new(original: &'s str) -> Self {
        Self {
            original,
            edits: Vec::new(),
        }
    }

    pub fn original(&self) -> &'s str {
        self.original
    }

    /// Insert `text` at `pos`, optionally tagging the inserted span with a
    /// name for the source map.
    pub fn insert(&mut self, pos: usize, text: impl Into<String>, name: Option<&str>) {
        let seq = self.edits.len();
        self.edits.push(Edit {
            start: pos,
            end: pos,
            text: text.into(),
            name: name.map(String::from),
            seq,
        });
    }

    /// Replace the original span `[start, end)` with `text`.
    pub fn replace(&mut self, start: usize, end: usize, text: impl Into<String>) {
        let seq = self.edits.len();
        self.edits.push(Edit {
            start,
            end,
            text: text.into(),
            name: None,
            seq,
        });
    }

    /// Remove the original span `[start, end)`.
    pub fn remove(&mut self, start: usize, end: usize) {
        self.replace(start, end, "");
    }

    pub fn has_changed(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Applies the edit set and builds the output and its source map.
    /// Edits are applied in position order; same-position insertions keep
    /// their registration order. An edit overlapping an already-consumed
    /// span is dropped rather than corrupting the output.
    pub fn generate(&self, output_name: &str, source_name: &str) -> (String, SourceMap) {
        let mut builder = SourceMapBuilder::new(output_name);
        let source_idx = builder.add_source(source_name, Some(self.original));
        let starts = line_starts(self.original);

        let mut sorted: Vec<&Edit> = self.edits.iter().collect();
        sorted.sort_by_key(|edit| (edit.start, edit.seq));

        let mut emitter = Emitter {
            out: String::with_capacity(self.original.len()),
            builder,
            starts,
            source_idx,
            gen_line: 0,
            gen_col: 0,
        };

        let mut cursor = 0;
        for edit in sorted {
            if edit.start < cursor {
                continue;
            }
            emitter.original_chunk(&self.original[cursor..edit.start], cursor);
            if !edit.text.is_empty() {
                emitter.inserted(&edit.text, edit.start, edit.name.as_deref());
            }
            cursor = edit.end;
        }
        emitter.original_chunk(&self.original[cursor..], cursor);

        let Emitter { out, builder, .. } = emitter;
        (out, builder.build())
    }
}

struct Emitter {
    out: String,
    builder: SourceMapBuilder,
    starts: Vec<usize>,
    source_idx: usize,
    gen_line: u32,
    gen_col: u32,
}

impl Emitter {
    /// Untouched original text: every output line it contributes maps back
    /// to its exact original position.
    fn original_chunk(&mut self, text: &str, offset: usize) {
        if text.is_empty() {
            return;
        }
        self.map_to(offset, None);
        for (idx, ch) in text.char_indices() {
            self.out.push(ch);
            if ch == '\n' {
                self.gen_line += 1;
                self.gen_col = 0;
                let next = idx + 1;
                if next < text.len() {
                    self.map_to(offset + next, None);
                }
            } else {
                self.gen_col += ch.len_utf8() as u32;
            }
        }
    }

    /// Inserted text: every output line it contributes maps to the original
    /// insertion point, carrying the edit's name.
    fn inserted(&mut self, text: &str, anchor: usize, name: Option<&str>) {
        self.map_to(anchor, name);
        for ch in text.chars() {
            self.out.push(ch);
            if ch == '\n' {
                self.gen_line += 1;
                self.gen_col = 0;
                self.map_to(anchor, name);
            } else {
                self.gen_col += ch.len_utf8() as u32;
            }
        }
    }

    fn map_to(&mut self, offset: usize, name: Option<&str>) {
        let (line, col) = offset_to_line_col(&self.starts, offset);
        let name_idx = name.map(|name| self.builder.add_name(name));
        self.builder.add_mapping(
            self.gen_line,
            self.gen_col,
            line,
            col,
            self.source_idx,
            name_idx,
        );
    }
}
