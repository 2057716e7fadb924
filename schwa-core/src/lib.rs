//! schwa-core - structural Java parsing and method-level revision diffing.
//!
//! This crate provides the core of schwa's code-evolution analysis: given
//! two revisions of a source file, it reports which classes and methods were
//! added, removed, or modified, without a compiler front end.
//!
//! # Features
//!
//! - **Structural parsing**: classes and method bodies located by
//!   string/comment-aware balanced-brace scanning
//! - **Verbatim spans**: every method is captured exactly as written
//! - **Name-aligned diffing**: classes and methods matched by name, bodies
//!   compared by character-level similarity
//! - **Batch diffing**: independent file pairs diffed concurrently via Rayon
//! - **Python bindings**: the `_core` extension module (`python` feature)
//!
//! # Usage
//!
//! ```rust
//! use schwa_core::{diff, SourceUnit};
//!
//! let base = SourceUnit::new("API.java", "class API { void login() { a(); b(); } }");
//! let head = SourceUnit::new("API.java", "class API { void login() { a(); } }");
//!
//! let records = diff(&base, &head)?;
//! assert!(records[0].as_class().unwrap().is_modified());
//! assert!(records[1].as_method().unwrap().is_modified());
//! # Ok::<(), schwa_core::SchwaError>(())
//! ```

pub mod config;
pub mod differ;
pub mod error;
pub mod exporter;
pub mod parser;
pub mod types;

#[cfg(feature = "python")]
mod python;

pub use config::DiffConfig;
pub use differ::{
    diff, diff_batch, diff_report, ChangeType, DiffClass, DiffEngine, DiffIssue, DiffMethod,
    DiffRecord, DiffReport, DiffSummary,
};
pub use error::{Result, SchwaError, Side};
pub use parser::{JavaParser, Parser};
pub use types::{ClassComponent, ClassKind, MethodComponent, ParsedUnit, SourceUnit, StructuralIssue};

/// Get the version of schwa-core.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
