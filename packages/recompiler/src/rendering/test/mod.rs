use crate::rendering::src::renderer::update_source_mapping_url;
use crate::rendering::{ImportManager, MagicString};

#[test]
fn magic_string_without_edits_reports_unchanged() {
    let out = MagicString::new("var a = 1;\n");
    assert!(!out.has_changed());
    let (content, _) = out.generate("a.js", "a.js");
    assert_eq!(content, "var a = 1;\n");
}

#[test]
fn insertions_leave_surrounding_bytes_identical() {
    let original = "line one\nline two\n";
    let mut out = MagicString::new(original);
    out.insert(9, "inserted\n", Some("Anchor"));
    let (content, map) = out.generate("a.js", "a.js");
    assert_eq!(content, "line one\ninserted\nline two\n");
    assert!(map.names.contains(&"Anchor".to_string()));
}

#[test]
fn replacements_and_removals_apply_in_order() {
    let original = "aaa bbb ccc";
    let mut out = MagicString::new(original);
    out.replace(4, 7, "BBB");
    out.remove(8, 11);
    let (content, _) = out.generate("a.js", "a.js");
    assert_eq!(content, "aaa BBB ");
}

#[test]
fn same_position_insertions_keep_registration_order() {
    let mut out = MagicString::new("x");
    out.insert(1, "-first", None);
    out.insert(1, "-second", None);
    let (content, _) = out.generate("a.js", "a.js");
    assert_eq!(content, "x-first-second");
}

#[test]
fn untouched_lines_map_one_to_one() {
    let original = "alpha\nbeta\n";
    let mut out = MagicString::new(original);
    out.insert(original.len(), "gamma\n", None);
    let (_, map) = out.generate("a.js", "a.js");
    // Two original lines map straight through: segment per line start.
    assert!(map.mappings.starts_with("AAAA;AACA"));
    assert_eq!(map.sources, vec!["a.js".to_string()]);
}

#[test]
fn source_mapping_url_comment_is_replaced_not_duplicated() {
    let contents = "var a = 1;\n//# sourceMappingURL=old.js.map\n";
    let updated = update_source_mapping_url(contents, "/pkg/a.js.map");
    assert!(updated.contains("//# sourceMappingURL=a.js.map"));
    assert!(!updated.contains("old.js.map"));

    let without = update_source_mapping_url("var a = 1;\n", "a.js.map");
    assert!(without.ends_with("//# sourceMappingURL=a.js.map\n"));
}

#[test]
fn import_manager_reuses_prefixes_per_module() {
    let mut imports = ImportManager::new(false);
    let first = imports.qualified("@angular/core", "ɵɵdefineComponent");
    let second = imports.qualified("@angular/core", "ɵɵinject");
    let other = imports.qualified("rxjs", "Subject");
    assert_eq!(first, "i0.ɵɵdefineComponent");
    assert_eq!(second, "i0.ɵɵinject");
    assert_eq!(other, "i1.Subject");
    assert_eq!(
        imports.finalize(),
        vec![
            ("@angular/core".to_string(), "i0".to_string()),
            ("rxjs".to_string(), "i1".to_string()),
        ]
    );
}

#[test]
fn core_bundles_reference_core_helpers_bare() {
    let mut imports = ImportManager::new(true);
    assert_eq!(
        imports.qualified("@angular/core", "ɵɵdefineInjectable"),
        "ɵɵdefineInjectable"
    );
    assert!(imports.finalize().is_empty());
}
