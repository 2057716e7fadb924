//! Data models for parsed source units.
//!
//! These types are produced fresh by every parse and never mutated
//! afterwards. They are plain values: cloning or comparing them has no
//! effect on the parser that made them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A file revision handed in by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub filename: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(filename: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source: source.into(),
        }
    }
}

impl<F: Into<String>, S: Into<String>> From<(F, S)> for SourceUnit {
    fn from((filename, source): (F, S)) -> Self {
        Self::new(filename, source)
    }
}

/// Declaration keyword a type was introduced with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
}

impl ClassKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "enum" => Some(ClassKind::Enum),
            "record" => Some(ClassKind::Record),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Record => "record",
        }
    }
}

/// A method or constructor with a body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodComponent {
    pub name: String,
    /// Simple name of the owning class.
    pub class_name: String,
    /// Verbatim text from the method name through the closing brace.
    pub text: String,
    pub start_line: u32,
    pub end_line: u32,
    /// Byte offset of `text` in the original source.
    pub start_byte: usize,
}

/// A class, interface, enum or record declaration and the methods found in it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassComponent {
    pub name: String,
    pub filename: String,
    pub kind: ClassKind,
    /// Verbatim text from the declaration keyword through the closing brace.
    pub text: String,
    pub start_line: u32,
    pub end_line: u32,
    /// Byte offset of `text` in the original source.
    pub start_byte: usize,
    /// Methods keyed by simple name. Overloads collapse to the last one.
    pub methods: BTreeMap<String, MethodComponent>,
}

impl ClassComponent {
    pub fn method(&self, name: &str) -> Option<&MethodComponent> {
        self.methods.get(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Class text with every method span blanked out.
    ///
    /// Two revisions whose skeletons differ changed something outside the
    /// method bodies (fields, signature, initializers).
    pub fn skeleton(&self) -> String {
        let mut spans: Vec<(usize, usize)> = self
            .methods
            .values()
            .filter_map(|m| {
                let start = m.start_byte.checked_sub(self.start_byte)?;
                Some((start, start + m.text.len()))
            })
            .filter(|(_, end)| *end <= self.text.len())
            .collect();
        spans.sort_unstable();

        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for (start, end) in spans {
            if start < cursor {
                continue;
            }
            out.push_str(&self.text[cursor..start]);
            cursor = end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

/// A declaration the parser had to give up on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralIssue {
    pub line: u32,
    pub message: String,
}

/// Everything recovered from one source text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUnit {
    pub filename: String,
    /// Classes keyed by simple name, nested classes included.
    pub classes: BTreeMap<String, ClassComponent>,
    pub issues: Vec<StructuralIssue>,
}

impl ParsedUnit {
    pub fn class(&self, name: &str) -> Option<&ClassComponent> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn method_count(&self) -> usize {
        self.classes.values().map(|c| c.methods.len()).sum()
    }

    /// Stamp a filename onto the unit and every class in it.
    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.to_string();
        for class in self.classes.values_mut() {
            class.filename = filename.to_string();
        }
        self
    }
}
