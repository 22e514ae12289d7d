// Analysis utilities: template well-formedness, selector parsing, raw
// metadata-object access.

use oxc_ast::ast;

use crate::reflection::src::util::{property_key_name, unwrap_parens};

/// Checks that a template is structurally sound enough to compile later:
/// interpolation delimiters must pair up and element tags must balance.
/// Full template compilation is outside this tool; this check only decides
/// whether a class must be poisoned.
pub fn validate_template(template: &str) -> Result<(), String> {
    let mut rest = template;
    loop {
        match rest.find("{{") {
            None => {
                if let Some(idx) = rest.find("}}") {
                    return Err(format!(
                        "unexpected closing interpolation at offset {}",
                        template.len() - rest.len() + idx
                    ));
                }
                break;
            }
            Some(open) => {
                let after_open = &rest[open + 2..];
                match after_open.find("}}") {
                    None => {
                        return Err(format!(
                            "unterminated interpolation at offset {}",
                            template.len() - rest.len() + open
                        ));
                    }
                    Some(close) => rest = &after_open[close + 2..],
                }
            }
        }
    }

    check_tag_balance(template)
}

const VOID_ELEMENTS: [&str; 8] = ["br", "hr", "img", "input", "link", "meta", "source", "wbr"];

fn check_tag_balance(template: &str) -> Result<(), String> {
    let mut stack: Vec<String> = Vec::new();
    let bytes = template.as_bytes();
    let mut idx = 0;

    while idx < bytes.len() {
        if bytes[idx] != b'<' {
            idx += 1;
            continue;
        }
        let rest = &template[idx..];
        let Some(end) = rest.find('>') else {
            return Err(format!("unterminated tag at offset {}", idx));
        };
        let tag = &rest[1..end];
        idx += end + 1;

        if tag.starts_with('!') || tag.ends_with('/') {
            continue;
        }
        if let Some(name) = tag.strip_prefix('/') {
            let name = name.trim().to_ascii_lowercase();
            match stack.pop() {
                Some(open) if open == name => {}
                Some(open) => {
                    return Err(format!("expected </{}> but found </{}>", open, name));
                }
                None => return Err(format!("unexpected closing tag </{}>", name)),
            }
        } else {
            let name: String = tag
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
                .to_ascii_lowercase();
            if name.is_empty() || VOID_ELEMENTS.contains(&name.as_str()) {
                continue;
            }
            stack.push(name);
        }
    }

    match stack.pop() {
        Some(open) => Err(format!("unclosed element <{}>", open)),
        None => Ok(()),
    }
}

/// Parses a directive selector into the runtime selector-list encoding:
/// element selectors become `["tag"]`, attribute selectors become
/// `["", "attr", ""]`. Anything more elaborate is carried as a raw string.
pub fn render_selectors(selector: &str) -> String {
    let parts: Vec<String> = selector
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if let Some(attr) = part.strip_prefix('[').and_then(|p| p.strip_suffix(']')) {
                format!("[\"\", \"{}\", \"\"]", attr)
            } else {
                format!("[\"{}\"]", part)
            }
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Direct AST access to one property of a decorator's metadata object
/// literal; used for fields that are re-emitted verbatim rather than folded.
pub fn object_property<'a>(
    expr: &'a ast::Expression<'a>,
    key: &str,
) -> Option<&'a ast::Expression<'a>> {
    let ast::Expression::ObjectExpression(object) = unwrap_parens(expr) else {
        return None;
    };
    for prop in &object.properties {
        let ast::ObjectPropertyKind::ObjectProperty(prop) = prop else {
            continue;
        };
        if property_key_name(&prop.key) == Some(key) {
            return Some(&prop.value);
        }
    }
    None
}

/// JSON-escapes a string for embedding in generated JavaScript.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}
