use crate::sourcemaps::{encode_vlq, line_starts, offset_to_line_col, SourceMapBuilder};

#[test]
fn vlq_encodes_known_values() {
    assert_eq!(encode_vlq(0), "A");
    assert_eq!(encode_vlq(1), "C");
    assert_eq!(encode_vlq(-1), "D");
    assert_eq!(encode_vlq(16), "gB");
    assert_eq!(encode_vlq(123), "2H");
}

#[test]
fn line_starts_and_offsets_round_trip() {
    let source = "ab\ncde\n\nf";
    let starts = line_starts(source);
    assert_eq!(starts, vec![0, 3, 7, 8]);
    assert_eq!(offset_to_line_col(&starts, 0), (0, 0));
    assert_eq!(offset_to_line_col(&starts, 2), (0, 2));
    assert_eq!(offset_to_line_col(&starts, 3), (1, 0));
    assert_eq!(offset_to_line_col(&starts, 5), (1, 2));
    assert_eq!(offset_to_line_col(&starts, 8), (3, 0));
}

#[test]
fn builder_emits_identity_first_segment() {
    let mut builder = SourceMapBuilder::new("out.js");
    let src = builder.add_source("in.js", Some("var a = 1;"));
    builder.add_mapping(0, 0, 0, 0, src, None);
    let map = builder.build();
    assert_eq!(map.version, 3);
    assert_eq!(map.sources, vec!["in.js".to_string()]);
    assert_eq!(map.mappings, "AAAA");
}

#[test]
fn builder_encodes_relative_segments_across_lines() {
    let mut builder = SourceMapBuilder::new("out.js");
    let src = builder.add_source("in.js", None);
    builder.add_mapping(0, 0, 0, 0, src, None);
    builder.add_mapping(1, 0, 1, 0, src, None);
    builder.add_mapping(2, 4, 2, 4, src, None);
    let map = builder.build();
    assert_eq!(map.mappings, "AAAA;AACA;IACI");
}

#[test]
fn builder_dedupes_sources_and_names() {
    let mut builder = SourceMapBuilder::new("out.js");
    let a = builder.add_source("in.js", None);
    let b = builder.add_source("in.js", None);
    assert_eq!(a, b);
    let n1 = builder.add_name("Foo");
    let n2 = builder.add_name("Foo");
    assert_eq!(n1, n2);
}

#[test]
fn map_serializes_to_json() {
    let mut builder = SourceMapBuilder::new("out.js");
    let src = builder.add_source("in.js", Some("x"));
    builder.add_mapping(0, 0, 0, 0, src, None);
    let json = builder.build().to_json();
    assert!(json.contains("\"version\":3"));
    assert!(json.contains("\"mappings\":\"AAAA\""));
    assert!(json.contains("\"sourcesContent\""));
}
