//! Method-level diff engine for comparing two revisions of a file.
//!
//! Both revisions are parsed with the same structural parser, classes are
//! aligned by name, then methods within each matched class are aligned by
//! name. Matched methods are compared by text similarity of their verbatim
//! spans rather than by syntax trees.
//!
//! # Output
//!
//! An ordered sequence of [`DiffRecord`]s:
//!
//! - a class present only in the head revision yields an added `DiffClass`,
//!   only in the base one a removed `DiffClass`;
//! - a class present in both yields a modified `DiffClass` followed by its
//!   `DiffMethod` records, or nothing when no method changed;
//! - unchanged methods are never reported.
//!
//! Renames are not inferred: a renamed method is one removal plus one
//! addition. Overloads share a name and therefore a single entry.
//!
//! # Example
//!
//! ```rust
//! use schwa_core::differ::diff;
//! use schwa_core::SourceUnit;
//!
//! let base = SourceUnit::new("A.java", "class A { void f() { } }");
//! let head = SourceUnit::new("A.java", "class A { void f() { } void g() { } }");
//!
//! let records = diff(&base, &head).unwrap();
//! assert_eq!(records.len(), 2);
//! ```

pub mod changes;
pub mod comparator;
pub mod similarity;

pub use changes::{
    ChangeType, DiffClass, DiffIssue, DiffMethod, DiffRecord, DiffReport, DiffSummary,
};
pub use comparator::{diff, diff_batch, diff_report, DiffEngine};
