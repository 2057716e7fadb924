//! Java structural parser.
//!
//! Locates type declarations and method bodies by balanced-delimiter
//! scanning over masked source (see [`super::lexer`]) instead of building a
//! syntax tree. Spans are cut from the original text, so every captured
//! class and method is verbatim, indentation included.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::helpers::{
    identifier_at, identifier_before, is_ident_byte, next_non_ws, prev_non_ws, LineIndex,
};
use super::lexer::{mask, matching_brace, matching_paren};
use super::Parser;
use crate::error::{Result, SchwaError, UNNAMED_SOURCE};
use crate::types::{ClassComponent, ClassKind, MethodComponent, ParsedUnit, StructuralIssue};

/// `class`/`interface`/`enum`/`record` keyword followed by the declared name.
static TYPE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?P<keyword>class|interface|enum|record)\s+(?P<name>[\p{L}_$][\p{L}\p{N}_$]*)")
        .expect("type declaration regex is valid")
});

/// Words that can sit in front of `(` without naming a method.
const NON_METHOD_WORDS: &[&str] = &[
    "if",
    "for",
    "while",
    "switch",
    "catch",
    "synchronized",
    "return",
    "new",
    "throw",
    "else",
    "do",
    "try",
    "super",
    "this",
    "assert",
    "case",
];

/// Bytes that may directly precede a method name: the end of a modifier,
/// return type, generic list, array type or annotation, or the end of the
/// previous member.
fn may_precede_method_name(b: u8) -> bool {
    is_ident_byte(b) || matches!(b, b'>' | b']' | b')' | b';' | b'{' | b'}')
}

/// Structural parser for Java source.
#[derive(Clone, Copy, Debug, Default)]
pub struct JavaParser;

impl JavaParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for JavaParser {
    fn language(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn parse(&self, source: &str) -> Result<ParsedUnit> {
        parse(source)
    }
}

/// A type declaration whose body braces balance.
#[derive(Debug)]
struct TypeDeclaration {
    kind: ClassKind,
    name: String,
    keyword_start: usize,
    open: usize,
    close: usize,
}

/// Parse Java source into its classes and methods.
pub fn parse(source: &str) -> Result<ParsedUnit> {
    let mut unit = ParsedUnit {
        filename: UNNAMED_SOURCE.to_string(),
        ..Default::default()
    };
    if source.trim().is_empty() {
        return Ok(unit);
    }

    let masked = mask(source);
    let lines = LineIndex::new(source);

    let declarations = find_type_declarations(&masked, &lines, &mut unit.issues);
    for decl in declarations {
        let class = extract_class(&decl, source, masked.as_bytes(), &lines);
        if let Some(previous) = unit.classes.insert(class.name.clone(), class) {
            unit.issues.push(StructuralIssue {
                line: lines.line_of(decl.keyword_start),
                message: format!(
                    "class name '{}' declared more than once; keeping the declaration at line {} over line {}",
                    previous.name,
                    lines.line_of(decl.keyword_start),
                    previous.start_line
                ),
            });
        }
    }

    for issue in &unit.issues {
        warn!(line = issue.line, "{}", issue.message);
    }

    if unit.classes.is_empty() {
        let (line, message) = match unit.issues.first() {
            Some(issue) => (
                Some(issue.line),
                format!("no class could be recovered: {}", issue.message),
            ),
            None => (None, "no class declarations found".to_string()),
        };
        return Err(SchwaError::parse(line, message));
    }

    debug!(
        classes = unit.classes.len(),
        methods = unit.method_count(),
        issues = unit.issues.len(),
        "parsed java source"
    );
    Ok(unit)
}

/// Parse `source` and return the verbatim text of one method.
pub fn extract_method(class_name: &str, method_name: &str, source: &str) -> Result<String> {
    JavaParser.extract_method(class_name, method_name, source)
}

/// Find every type declaration, nested ones included.
fn find_type_declarations(
    masked: &str,
    lines: &LineIndex,
    issues: &mut Vec<StructuralIssue>,
) -> Vec<TypeDeclaration> {
    let bytes = masked.as_bytes();
    let mut declarations = Vec::new();

    for caps in TYPE_DECLARATION.captures_iter(masked) {
        let (Some(keyword), Some(name)) = (caps.name("keyword"), caps.name("name")) else {
            continue;
        };

        // `Foo.class` literals and `@interface` annotation types.
        if let Some(prev) = prev_non_ws(bytes, keyword.start()) {
            if matches!(bytes[prev], b'.' | b'@') {
                continue;
            }
        }
        let Some(kind) = ClassKind::from_keyword(keyword.as_str()) else {
            continue;
        };

        let Some(open) = header_end(bytes, name.end(), kind) else {
            continue;
        };

        match matching_brace(bytes, open) {
            Some(close) => declarations.push(TypeDeclaration {
                kind,
                name: name.as_str().to_string(),
                keyword_start: keyword.start(),
                open,
                close,
            }),
            None => issues.push(StructuralIssue {
                line: lines.line_of(keyword.start()),
                message: format!(
                    "{} '{}' has no closing brace",
                    kind.as_str(),
                    name.as_str()
                ),
            }),
        }
    }

    declarations
}

/// Offset of the `{` opening a declaration body that starts scanning at
/// `from`. A `;`, `}` or `(` first means the keyword did not start a
/// declaration, except for the component list of a record.
fn header_end(bytes: &[u8], from: usize, kind: ClassKind) -> Option<usize> {
    // `record` is contextual: only a name followed by type parameters or a
    // component list declares one.
    if kind == ClassKind::Record {
        let next = next_non_ws(bytes, from)?;
        if !matches!(bytes[next], b'(' | b'<') {
            return None;
        }
    }

    let mut from = from;
    let mut components_seen = false;
    loop {
        let offset = bytes[from..]
            .iter()
            .position(|b| matches!(b, b'{' | b';' | b'}' | b'('))?;
        let at = from + offset;
        match bytes[at] {
            b'{' if kind != ClassKind::Record || components_seen => return Some(at),
            b'(' if kind == ClassKind::Record && !components_seen => {
                from = matching_paren(bytes, at)? + 1;
                components_seen = true;
            }
            _ => return None,
        }
    }
}

fn extract_class(
    decl: &TypeDeclaration,
    source: &str,
    masked: &[u8],
    lines: &LineIndex,
) -> ClassComponent {
    let mut class = ClassComponent {
        name: decl.name.clone(),
        filename: UNNAMED_SOURCE.to_string(),
        kind: decl.kind,
        text: source[decl.keyword_start..=decl.close].to_string(),
        start_line: lines.line_of(decl.keyword_start),
        end_line: lines.line_of(decl.close),
        start_byte: decl.keyword_start,
        methods: BTreeMap::new(),
    };

    let mut body_start = decl.open + 1;
    if decl.kind == ClassKind::Enum {
        // Constants come first and may carry bodies of their own; members
        // only start after the first top-level `;`.
        match member_section_start(masked, decl.open, decl.close) {
            Some(start) => body_start = start,
            None => return class,
        }
    }

    for method in find_methods(&decl.name, source, masked, body_start, decl.close, lines) {
        class.methods.insert(method.name.clone(), method);
    }
    class
}

/// Offset just past the first `;` at the enum body's own depth.
fn member_section_start(masked: &[u8], open: usize, close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in masked.iter().enumerate().take(close).skip(open + 1) {
        match b {
            b'{' | b'(' => depth += 1,
            b'}' | b')' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Scan a class body for methods and constructors at the body's own depth.
///
/// Nested type bodies, initializer blocks and lambdas raise the depth and
/// are stepped over; nested types are parsed as classes of their own.
fn find_methods(
    class_name: &str,
    source: &str,
    masked: &[u8],
    start: usize,
    end: usize,
    lines: &LineIndex,
) -> Vec<MethodComponent> {
    let mut methods = Vec::new();
    let mut depth = 0usize;
    let mut i = start;

    while i < end {
        match masked[i] {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'(' if depth == 0 => {
                if let Some((method, next)) = method_at(class_name, source, masked, i, end, lines) {
                    methods.push(method);
                    i = next;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    methods
}

/// Try to read a method whose parameter list opens at `paren`.
///
/// Returns the method and the offset to resume scanning from.
fn method_at(
    class_name: &str,
    source: &str,
    masked: &[u8],
    paren: usize,
    end: usize,
    lines: &LineIndex,
) -> Option<(MethodComponent, usize)> {
    let (name_start, name_end) = identifier_before(masked, paren)?;
    let name = &source[name_start..name_end];
    if NON_METHOD_WORDS.contains(&name) {
        return None;
    }

    if let Some(prev) = prev_non_ws(masked, name_start) {
        if !may_precede_method_name(masked[prev]) {
            return None;
        }
        // `new Foo(...) { ... }` and `record Foo(...) { ... }`.
        if let Some((word_start, word_end)) = identifier_before(masked, prev + 1) {
            if matches!(&source[word_start..word_end], "new" | "record") {
                return None;
            }
        }
    }

    let close_paren = matching_paren(masked, paren).filter(|&p| p < end)?;
    let open = body_open(masked, close_paren + 1, end)?;
    let close = matching_brace(masked, open).filter(|&c| c < end)?;

    let method = MethodComponent {
        name: name.to_string(),
        class_name: class_name.to_string(),
        text: source[name_start..=close].to_string(),
        start_line: lines.line_of(name_start),
        end_line: lines.line_of(close),
        start_byte: name_start,
    };
    Some((method, close + 1))
}

/// Offset of the `{` opening a method body after a parameter list ending
/// at `from`, stepping over a `throws` clause. `None` for abstract and
/// interface declarations, or anything else that is not a body.
fn body_open(masked: &[u8], from: usize, end: usize) -> Option<usize> {
    let mut at = next_non_ws(masked, from).filter(|&p| p < end)?;

    if let Some(word_end) = identifier_at(masked, at) {
        if &masked[at..word_end] != b"throws" {
            return None;
        }
        let offset = masked[word_end..end]
            .iter()
            .position(|b| matches!(b, b'{' | b';' | b'}' | b'(' | b'='))?;
        at = word_end + offset;
    }

    (masked[at] == b'{').then_some(at)
}
