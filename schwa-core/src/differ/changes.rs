//! Diff record types and result structures.

use serde::{Deserialize, Serialize};

use crate::error::Side;
use crate::types::StructuralIssue;

/// Type of change detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::Modified => "modified",
        }
    }
}

/// Change status of one method of a class present in at least one revision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffMethod {
    /// Class the method belongs to.
    pub class_name: String,
    /// Name in the base revision; `None` when the method was added.
    pub method_a: Option<String>,
    /// Name in the head revision; `None` when the method was removed.
    pub method_b: Option<String>,
    pub change: ChangeType,
    /// Similarity of the two spans, for modified methods.
    pub similarity: Option<f32>,
}

impl DiffMethod {
    pub fn added(class_name: &str, name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            method_a: None,
            method_b: Some(name.to_string()),
            change: ChangeType::Added,
            similarity: None,
        }
    }

    pub fn removed(class_name: &str, name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            method_a: Some(name.to_string()),
            method_b: None,
            change: ChangeType::Removed,
            similarity: None,
        }
    }

    pub fn modified(class_name: &str, name: &str, similarity: f32) -> Self {
        Self {
            class_name: class_name.to_string(),
            method_a: Some(name.to_string()),
            method_b: Some(name.to_string()),
            change: ChangeType::Modified,
            similarity: Some(similarity),
        }
    }

    pub fn is_added(&self) -> bool {
        self.change == ChangeType::Added
    }

    pub fn is_removed(&self) -> bool {
        self.change == ChangeType::Removed
    }

    pub fn is_modified(&self) -> bool {
        self.change == ChangeType::Modified
    }

    /// Whichever name is present, preferring the head revision.
    pub fn name(&self) -> &str {
        self.method_b
            .as_deref()
            .or(self.method_a.as_deref())
            .unwrap_or_default()
    }
}

/// Change status of a class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffClass {
    /// Name in the base revision; `None` when the class was added.
    pub class_a: Option<String>,
    /// Name in the head revision; `None` when the class was removed.
    pub class_b: Option<String>,
    pub change: ChangeType,
    /// Method records belonging to this class.
    pub methods: Vec<DiffMethod>,
}

impl DiffClass {
    pub fn added(name: &str) -> Self {
        Self {
            class_a: None,
            class_b: Some(name.to_string()),
            change: ChangeType::Added,
            methods: Vec::new(),
        }
    }

    pub fn removed(name: &str) -> Self {
        Self {
            class_a: Some(name.to_string()),
            class_b: None,
            change: ChangeType::Removed,
            methods: Vec::new(),
        }
    }

    pub fn modified(name: &str, methods: Vec<DiffMethod>) -> Self {
        Self {
            class_a: Some(name.to_string()),
            class_b: Some(name.to_string()),
            change: ChangeType::Modified,
            methods,
        }
    }

    /// Set method records.
    pub fn with_methods(mut self, methods: Vec<DiffMethod>) -> Self {
        self.methods = methods;
        self
    }

    pub fn is_added(&self) -> bool {
        self.change == ChangeType::Added
    }

    pub fn is_removed(&self) -> bool {
        self.change == ChangeType::Removed
    }

    pub fn is_modified(&self) -> bool {
        self.change == ChangeType::Modified
    }

    /// Whichever name is present, preferring the head revision.
    pub fn name(&self) -> &str {
        self.class_b
            .as_deref()
            .or(self.class_a.as_deref())
            .unwrap_or_default()
    }
}

/// One element of the ordered diff output.
///
/// A class record is always followed by the method records it holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiffRecord {
    Class(DiffClass),
    Method(DiffMethod),
}

impl DiffRecord {
    pub fn change(&self) -> ChangeType {
        match self {
            DiffRecord::Class(c) => c.change,
            DiffRecord::Method(m) => m.change,
        }
    }

    pub fn as_class(&self) -> Option<&DiffClass> {
        match self {
            DiffRecord::Class(c) => Some(c),
            DiffRecord::Method(_) => None,
        }
    }

    pub fn as_method(&self) -> Option<&DiffMethod> {
        match self {
            DiffRecord::Method(m) => Some(m),
            DiffRecord::Class(_) => None,
        }
    }
}

/// Summary statistics for a diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub classes_added: u32,
    pub classes_removed: u32,
    pub classes_modified: u32,

    pub methods_added: u32,
    pub methods_removed: u32,
    pub methods_modified: u32,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter matching a record.
    pub fn record(&mut self, record: &DiffRecord) {
        let counter = match record {
            DiffRecord::Class(c) => match c.change {
                ChangeType::Added => &mut self.classes_added,
                ChangeType::Removed => &mut self.classes_removed,
                ChangeType::Modified => &mut self.classes_modified,
            },
            DiffRecord::Method(m) => match m.change {
                ChangeType::Added => &mut self.methods_added,
                ChangeType::Removed => &mut self.methods_removed,
                ChangeType::Modified => &mut self.methods_modified,
            },
        };
        *counter += 1;
    }

    pub fn from_records(records: &[DiffRecord]) -> Self {
        let mut summary = Self::new();
        for record in records {
            summary.record(record);
        }
        summary
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();

        for (label, added, removed, modified) in [
            (
                "classes",
                self.classes_added,
                self.classes_removed,
                self.classes_modified,
            ),
            (
                "methods",
                self.methods_added,
                self.methods_removed,
                self.methods_modified,
            ),
        ] {
            let mut counts = Vec::new();
            if added > 0 {
                counts.push(format!("{} added", added));
            }
            if removed > 0 {
                counts.push(format!("{} removed", removed));
            }
            if modified > 0 {
                counts.push(format!("{} modified", modified));
            }
            if !counts.is_empty() {
                parts.push(format!("{}: {}", label, counts.join(", ")));
            }
        }

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// A structural issue the parser recovered from on one side of a pair.
///
/// Classes lost to such an issue show up as removed or added records, so
/// these notes tell a truncated revision apart from a real deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffIssue {
    pub side: Side,
    pub line: u32,
    pub message: String,
}

impl DiffIssue {
    pub fn new(side: Side, issue: &StructuralIssue) -> Self {
        Self {
            side,
            line: issue.line,
            message: issue.message.clone(),
        }
    }
}

/// Complete result of diffing one file pair.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Head filename, or the base one when the head has none.
    pub filename: String,

    /// Ordered diff records.
    pub records: Vec<DiffRecord>,

    /// Summary statistics
    pub summary: DiffSummary,

    /// Human-readable summary text
    pub summary_text: String,

    /// Structural issues noted while parsing either side.
    #[serde(default)]
    pub issues: Vec<DiffIssue>,

    /// Duration of diff operation in milliseconds
    pub duration_ms: f64,
}

impl DiffReport {
    pub fn new(filename: &str, records: Vec<DiffRecord>, duration_ms: f64) -> Self {
        let summary = DiffSummary::from_records(&records);
        let summary_text = summary.text();
        Self {
            filename: filename.to_string(),
            records,
            summary,
            summary_text,
            issues: Vec::new(),
            duration_ms,
        }
    }

    /// Attach parse notes; the summary text mentions how many there are.
    pub fn with_issues(mut self, issues: Vec<DiffIssue>) -> Self {
        if !issues.is_empty() {
            let plural = if issues.len() == 1 { "" } else { "s" };
            self.summary_text = format!(
                "{} ({} structural issue{})",
                self.summary.text(),
                issues.len(),
                plural
            );
        }
        self.issues = issues;
        self
    }

    /// Whether either side was only partially parsed.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.records.is_empty()
    }

    /// Get record count.
    pub fn change_count(&self) -> usize {
        self.records.len()
    }

    pub fn classes(&self) -> impl Iterator<Item = &DiffClass> {
        self.records.iter().filter_map(DiffRecord::as_class)
    }

    pub fn methods(&self) -> impl Iterator<Item = &DiffMethod> {
        self.records.iter().filter_map(DiffRecord::as_method)
    }
}
