//! Structural parsing module.
//!
//! A [`Parser`] turns one source text into a [`ParsedUnit`]: the classes it
//! declares and the verbatim span of every method body inside them. Parsers
//! locate boundaries by delimiter scanning rather than a full grammar, so
//! adding a language means writing a scanner, not a front end.
//!
//! Only Java ships today. The diff engine depends on the trait alone.

use std::path::Path;

use rayon::prelude::*;

use crate::error::{Result, SchwaError};
use crate::types::{ParsedUnit, SourceUnit};

pub mod java;
pub mod lexer;

mod helpers;

pub use java::JavaParser;

/// Per-language structural parser.
pub trait Parser: Send + Sync {
    /// Language identifier, e.g. `"java"`.
    fn language(&self) -> &'static str;

    /// File extensions this parser handles, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse source text into classes keyed by simple name.
    fn parse(&self, source: &str) -> Result<ParsedUnit>;

    /// Parse a unit, attributing results and errors to its filename.
    fn parse_unit(&self, unit: &SourceUnit) -> Result<ParsedUnit> {
        self.parse(&unit.source)
            .map(|parsed| parsed.with_filename(&unit.filename))
            .map_err(|e| e.with_filename(&unit.filename))
    }

    /// Verbatim text of one method, from its name through the closing brace.
    fn extract_method(&self, class_name: &str, method_name: &str, source: &str) -> Result<String> {
        let parsed = self.parse(source)?;
        let class = parsed
            .class(class_name)
            .ok_or_else(|| SchwaError::ClassNotFound {
                class: class_name.to_string(),
            })?;
        let method = class
            .method(method_name)
            .ok_or_else(|| SchwaError::MethodNotFound {
                class: class_name.to_string(),
                method: method_name.to_string(),
            })?;
        Ok(method.text.clone())
    }
}

static JAVA: JavaParser = JavaParser;

/// Every registered parser.
fn registry() -> [&'static dyn Parser; 1] {
    [&JAVA]
}

/// Look up a parser by language identifier.
pub fn parser_for(language: &str) -> Result<&'static dyn Parser> {
    let language = language.to_lowercase();
    registry()
        .into_iter()
        .find(|p| p.language() == language || p.extensions().contains(&language.as_str()))
        .ok_or(SchwaError::UnsupportedLanguage(language))
}

/// Look up a parser by the extension of `filename`.
pub fn parser_for_path(filename: &str) -> Result<&'static dyn Parser> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| SchwaError::UnsupportedLanguage(filename.to_string()))?;
    registry()
        .into_iter()
        .find(|p| p.extensions().contains(&extension.as_str()))
        .ok_or_else(|| SchwaError::UnsupportedLanguage(filename.to_string()))
}

/// Get supported languages.
pub fn supported_languages() -> Vec<&'static str> {
    registry().iter().map(|p| p.language()).collect()
}

/// Parse many units in parallel using rayon.
///
/// Each unit is parsed independently with the parser its filename selects.
/// Results come back in input order.
pub fn parse_units_parallel(
    units: &[SourceUnit],
    num_threads: Option<usize>,
) -> Vec<Result<ParsedUnit>> {
    let pool = match num_threads {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
        _ => None,
    };

    let parse_fn =
        |unit: &SourceUnit| -> Result<ParsedUnit> { parser_for_path(&unit.filename)?.parse_unit(unit) };

    match pool {
        Some(pool) => pool.install(|| units.par_iter().map(parse_fn).collect()),
        None => units.par_iter().map(parse_fn).collect(),
    }
}
