//! Comparator logic for diffing two revisions of a source file.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::config::DiffConfig;
use crate::differ::changes::{DiffClass, DiffIssue, DiffMethod, DiffRecord, DiffReport};
use crate::differ::similarity;
use crate::error::{Result, Side};
use crate::parser::{self, Parser};
use crate::types::{ClassComponent, MethodComponent, ParsedUnit, SourceUnit};

/// Aligns two parsed revisions by class and method name.
///
/// The engine only sees the [`Parser`] trait, so any language with a
/// structural parser can be diffed.
pub struct DiffEngine<'p> {
    parser: &'p dyn Parser,
    config: DiffConfig,
}

impl<'p> DiffEngine<'p> {
    pub fn new(parser: &'p dyn Parser) -> Self {
        Self {
            parser,
            config: DiffConfig::default(),
        }
    }

    /// Set configuration.
    pub fn with_config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Ordered diff records between the base (`a`) and head (`b`) revisions.
    ///
    /// Fails if either side cannot be parsed; the error names the file and
    /// the side. No partial result is returned. Structural issues a side
    /// was recovered from are only logged here; [`report`](Self::report)
    /// carries them.
    pub fn diff(&self, a: &SourceUnit, b: &SourceUnit) -> Result<Vec<DiffRecord>> {
        let (classes_a, classes_b) = self.parse_pair(a, b)?;
        Ok(self.diff_units(a, b, &classes_a, &classes_b))
    }

    /// Diff with summary statistics, timing and the parse notes of both
    /// sides.
    pub fn report(&self, a: &SourceUnit, b: &SourceUnit) -> Result<DiffReport> {
        let start = Instant::now();
        let (classes_a, classes_b) = self.parse_pair(a, b)?;
        let records = self.diff_units(a, b, &classes_a, &classes_b);

        let issues = classes_a
            .issues
            .iter()
            .map(|issue| DiffIssue::new(Side::Base, issue))
            .chain(
                classes_b
                    .issues
                    .iter()
                    .map(|issue| DiffIssue::new(Side::Head, issue)),
            )
            .collect();

        let filename = if b.filename.is_empty() {
            &a.filename
        } else {
            &b.filename
        };
        Ok(DiffReport::new(
            filename,
            records,
            start.elapsed().as_secs_f64() * 1000.0,
        )
        .with_issues(issues))
    }

    fn parse_pair(&self, a: &SourceUnit, b: &SourceUnit) -> Result<(ParsedUnit, ParsedUnit)> {
        let classes_a = self
            .parser
            .parse_unit(a)
            .map_err(|e| e.on_side(Side::Base))?;
        let classes_b = self
            .parser
            .parse_unit(b)
            .map_err(|e| e.on_side(Side::Head))?;
        Ok((classes_a, classes_b))
    }

    fn diff_units(
        &self,
        a: &SourceUnit,
        b: &SourceUnit,
        classes_a: &ParsedUnit,
        classes_b: &ParsedUnit,
    ) -> Vec<DiffRecord> {
        let records = self.diff_parsed(classes_a, classes_b);
        debug!(
            base = %a.filename,
            head = %b.filename,
            records = records.len(),
            issues = classes_a.issues.len() + classes_b.issues.len(),
            "diffed revisions"
        );
        records
    }

    /// Diff two already-parsed revisions.
    pub fn diff_parsed(&self, a: &ParsedUnit, b: &ParsedUnit) -> Vec<DiffRecord> {
        let mut records = Vec::new();

        let names: BTreeSet<&str> = a.class_names().chain(b.class_names()).collect();
        for name in names {
            match (a.class(name), b.class(name)) {
                (None, Some(head)) => {
                    let methods = if self.config.expand_class_members {
                        head.method_names()
                            .map(|m| DiffMethod::added(name, m))
                            .collect()
                    } else {
                        Vec::new()
                    };
                    push_class(&mut records, DiffClass::added(name).with_methods(methods));
                }
                (Some(base), None) => {
                    let methods = if self.config.expand_class_members {
                        base.method_names()
                            .map(|m| DiffMethod::removed(name, m))
                            .collect()
                    } else {
                        Vec::new()
                    };
                    push_class(&mut records, DiffClass::removed(name).with_methods(methods));
                }
                (Some(base), Some(head)) => {
                    let methods = self.diff_methods(name, &base.methods, &head.methods);
                    if !methods.is_empty() || self.member_changes(base, head) {
                        push_class(&mut records, DiffClass::modified(name, methods));
                    }
                }
                (None, None) => {}
            }
        }

        records
    }

    /// Method records for a matched class: added, then removed, then
    /// modified, each in name order. Unchanged methods are left out.
    fn diff_methods(
        &self,
        class_name: &str,
        base: &BTreeMap<String, MethodComponent>,
        head: &BTreeMap<String, MethodComponent>,
    ) -> Vec<DiffMethod> {
        let mut changes = Vec::new();

        // Added methods
        for name in head.keys().filter(|n| !base.contains_key(*n)) {
            changes.push(DiffMethod::added(class_name, name));
        }

        // Removed methods
        for name in base.keys().filter(|n| !head.contains_key(*n)) {
            changes.push(DiffMethod::removed(class_name, name));
        }

        // Modified methods
        let threshold = self.config.threshold();
        for (name, base_method) in base {
            let Some(head_method) = head.get(name) else {
                continue;
            };
            let (modified, score) =
                similarity::is_modified(&base_method.text, &head_method.text, threshold);
            if modified {
                changes.push(DiffMethod::modified(class_name, name, score));
            }
        }

        changes
    }

    /// Whether the class text outside method bodies changed, when enabled.
    fn member_changes(&self, base: &ClassComponent, head: &ClassComponent) -> bool {
        self.config.detect_member_changes && base.skeleton() != head.skeleton()
    }
}

/// Push a class record followed by its method records.
fn push_class(records: &mut Vec<DiffRecord>, class: DiffClass) {
    let methods = class.methods.clone();
    records.push(DiffRecord::Class(class));
    records.extend(methods.into_iter().map(DiffRecord::Method));
}

/// Pick the parser for a pair from the head filename, then the base one.
fn parser_for_pair(a: &SourceUnit, b: &SourceUnit) -> Result<&'static dyn Parser> {
    parser::parser_for_path(&b.filename).or_else(|_| parser::parser_for_path(&a.filename))
}

/// Diff two revisions with the default configuration.
pub fn diff(a: &SourceUnit, b: &SourceUnit) -> Result<Vec<DiffRecord>> {
    DiffEngine::new(parser_for_pair(a, b)?).diff(a, b)
}

/// Diff two revisions into a report.
pub fn diff_report(a: &SourceUnit, b: &SourceUnit, config: &DiffConfig) -> Result<DiffReport> {
    DiffEngine::new(parser_for_pair(a, b)?)
        .with_config(config.clone())
        .report(a, b)
}

/// Diff many independent revision pairs in parallel using rayon.
///
/// One result per pair, in input order. A failing pair does not affect the
/// others.
pub fn diff_batch(
    pairs: &[(SourceUnit, SourceUnit)],
    config: &DiffConfig,
    num_threads: Option<usize>,
) -> Vec<Result<DiffReport>> {
    let pool = match num_threads {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
        _ => None,
    };

    let diff_fn = |(a, b): &(SourceUnit, SourceUnit)| diff_report(a, b, config);

    match pool {
        Some(pool) => pool.install(|| pairs.par_iter().map(diff_fn).collect()),
        None => pairs.par_iter().map(diff_fn).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::changes::ChangeType;
    use crate::error::SchwaError;
    use crate::parser::JavaParser;

    fn unit(source: &str) -> SourceUnit {
        SourceUnit::new("Shapes.java", source)
    }

    const BASE: &str = r#"
class Circle {
    private double r;

    double area() {
        return Math.PI * r * r;
    }

    double perimeter() {
        return 2 * Math.PI * r;
    }
}

class Square {
    double side;

    double area() { return side * side; }
}
"#;

    #[test]
    fn test_diff_identical_is_empty() {
        let records = diff(&unit(BASE), &unit(BASE)).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_diff_method_added() {
        let head = BASE.replace(
            "double side;",
            "double side;\n\n    double diagonal() { return side * Math.sqrt(2); }",
        );
        let records = diff(&unit(BASE), &unit(&head)).unwrap();

        assert_eq!(records.len(), 2);
        let class = records[0].as_class().unwrap();
        assert_eq!(class.class_a.as_deref(), Some("Square"));
        assert!(class.is_modified());

        let method = records[1].as_method().unwrap();
        assert!(method.is_added());
        assert_eq!(method.method_b.as_deref(), Some("diagonal"));
        assert_eq!(method.method_a, None);
    }

    #[test]
    fn test_diff_method_removed() {
        let head = BASE.replace(
            "    double perimeter() {\n        return 2 * Math.PI * r;\n    }\n",
            "",
        );
        let records = diff(&unit(BASE), &unit(&head)).unwrap();

        let methods: Vec<_> = records.iter().filter_map(DiffRecord::as_method).collect();
        assert_eq!(methods.len(), 1);
        assert!(methods[0].is_removed());
        assert_eq!(methods[0].method_a.as_deref(), Some("perimeter"));
    }

    #[test]
    fn test_diff_method_modified_carries_similarity() {
        let head = BASE.replace("return side * side;", "return Math.pow(side, 2);");
        let records = diff(&unit(BASE), &unit(&head)).unwrap();

        let methods: Vec<_> = records.iter().filter_map(DiffRecord::as_method).collect();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].class_name, "Square");
        assert!(methods[0].is_modified());
        let score = methods[0].similarity.unwrap();
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_diff_class_added_and_removed() {
        let head = BASE.replace("class Square", "class Rectangle");
        let records = diff(&unit(BASE), &unit(&head)).unwrap();

        let changes: Vec<_> = records
            .iter()
            .map(|r| (r.as_class().unwrap().name().to_string(), r.change()))
            .collect();
        assert_eq!(
            changes,
            vec![
                ("Rectangle".to_string(), ChangeType::Added),
                ("Square".to_string(), ChangeType::Removed),
            ]
        );
    }

    #[test]
    fn test_expand_class_members() {
        let head = BASE.replace("class Square", "class Rectangle");
        let engine = DiffEngine::new(&JavaParser).with_config(DiffConfig {
            expand_class_members: true,
            ..Default::default()
        });
        let records = engine.diff(&unit(BASE), &unit(&head)).unwrap();

        assert_eq!(records.len(), 4);
        assert!(records[0].as_class().unwrap().is_added());
        assert_eq!(records[1].as_method().unwrap().method_b.as_deref(), Some("area"));
        assert!(records[2].as_class().unwrap().is_removed());
        assert!(records[3].as_method().unwrap().is_removed());
    }

    #[test]
    fn test_member_changes_silent_by_default() {
        let head = BASE.replace("private double r;", "private double radius;");
        let records = diff(&unit(BASE), &unit(&head)).unwrap();
        assert!(records.is_empty());

        let engine = DiffEngine::new(&JavaParser).with_config(DiffConfig {
            detect_member_changes: true,
            ..Default::default()
        });
        let records = engine.diff(&unit(BASE), &unit(&head)).unwrap();
        assert_eq!(records.len(), 1);
        let class = records[0].as_class().unwrap();
        assert_eq!(class.name(), "Circle");
        assert!(class.is_modified());
        assert!(class.methods.is_empty());
    }

    #[test]
    fn test_similarity_threshold() {
        let head = BASE.replace("return side * side;", "return side * side ;");
        let lenient = DiffEngine::new(&JavaParser).with_config(DiffConfig {
            similarity_threshold: 0.9,
            ..Default::default()
        });
        assert!(lenient.diff(&unit(BASE), &unit(&head)).unwrap().is_empty());

        let strict = DiffEngine::new(&JavaParser);
        assert_eq!(strict.diff(&unit(BASE), &unit(&head)).unwrap().len(), 2);
    }

    #[test]
    fn test_diff_names_failing_side() {
        let err = diff(&unit(BASE), &unit("class Broken {")).unwrap_err();
        match err {
            SchwaError::Parse { filename, side, .. } => {
                assert_eq!(filename, "Shapes.java");
                assert_eq!(side, Some(Side::Head));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = diff(&unit("no classes here"), &unit(BASE)).unwrap_err();
        assert!(matches!(
            err,
            SchwaError::Parse {
                side: Some(Side::Base),
                ..
            }
        ));
    }

    #[test]
    fn test_diff_against_empty_revision() {
        let records = diff(&unit(""), &unit(BASE)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.change() == ChangeType::Added));
    }

    #[test]
    fn test_diff_unsupported_language() {
        let a = SourceUnit::new("notes.txt", "class A {}");
        assert!(matches!(
            diff(&a, &a),
            Err(SchwaError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_report_summary() {
        let head = BASE.replace("return side * side;", "return Math.pow(side, 2);");
        let report = diff_report(&unit(BASE), &unit(&head), &DiffConfig::default()).unwrap();

        assert_eq!(report.filename, "Shapes.java");
        assert_eq!(report.summary.classes_modified, 1);
        assert_eq!(report.summary.methods_modified, 1);
        assert_eq!(report.summary_text, "classes: 1 modified; methods: 1 modified");
        assert!(report.duration_ms >= 0.0);
    }

    #[test]
    fn test_report_notes_truncated_class() {
        let head = format!(
            "{}\nclass Square {{\n    double side;\n\n    double area() {{ return side * side; }}\n",
            &BASE[..BASE.find("class Square").unwrap()]
        );
        let report = diff_report(&unit(BASE), &unit(&head), &DiffConfig::default()).unwrap();

        let removed: Vec<_> = report.classes().filter(|c| c.is_removed()).collect();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name(), "Square");

        assert!(report.has_issues());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].side, Side::Head);
        assert!(report.issues[0].message.contains("Square"));
        assert_eq!(report.summary_text, "classes: 1 removed (1 structural issue)");
    }

    #[test]
    fn test_report_without_issues() {
        let report = diff_report(&unit(BASE), &unit(BASE), &DiffConfig::default()).unwrap();
        assert!(!report.has_issues());
        assert_eq!(report.summary_text, "No changes");
    }

    #[test]
    fn test_diff_batch_preserves_order() {
        let modified = BASE.replace("return side * side;", "return Math.pow(side, 2);");
        let pairs = vec![
            (unit(BASE), unit(BASE)),
            (unit(BASE), unit(&modified)),
            (unit(BASE), unit("class Broken {")),
        ];

        let results = diff_batch(&pairs, &DiffConfig::default(), Some(2));
        assert_eq!(results.len(), 3);
        assert!(!results[0].as_ref().unwrap().has_changes());
        assert!(results[1].as_ref().unwrap().has_changes());
        assert!(results[2].is_err());
    }
}
