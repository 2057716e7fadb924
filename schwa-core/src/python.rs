//! Python bindings for the schwa history tool.
//!
//! ```python
//! from schwa import _core
//!
//! components = _core.parse(source)
//! components["API"].functions.keys()
//!
//! for diff in _core.diff(("API.java", old), ("API.java", new)):
//!     if isinstance(diff, _core.DiffMethod) and diff.added:
//!         print(diff.method_b)
//! ```

use std::collections::BTreeMap;

use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;

use crate::differ::{self, DiffClass, DiffMethod, DiffRecord};
use crate::error::SchwaError;
use crate::parser::{self, Parser};
use crate::types::{ClassComponent, SourceUnit};

impl From<SchwaError> for PyErr {
    fn from(err: SchwaError) -> Self {
        if err.is_not_found() {
            PyKeyError::new_err(err.to_string())
        } else {
            PyValueError::new_err(err.to_string())
        }
    }
}

/// A parsed class: its name and the verbatim text of each method.
#[pyclass(name = "ClassComponent", get_all)]
#[derive(Clone)]
pub struct PyClassComponent {
    name: String,
    filename: String,
    functions: BTreeMap<String, String>,
}

impl From<ClassComponent> for PyClassComponent {
    fn from(class: ClassComponent) -> Self {
        Self {
            name: class.name,
            filename: class.filename,
            functions: class
                .methods
                .into_iter()
                .map(|(name, method)| (name, method.text))
                .collect(),
        }
    }
}

#[pymethods]
impl PyClassComponent {
    fn __repr__(&self) -> String {
        format!(
            "ClassComponent(name={:?}, functions={})",
            self.name,
            self.functions.len()
        )
    }
}

#[pyclass(name = "DiffMethod", get_all)]
#[derive(Clone)]
pub struct PyDiffMethod {
    class_name: String,
    method_a: Option<String>,
    method_b: Option<String>,
    added: bool,
    removed: bool,
    modified: bool,
    similarity: Option<f32>,
}

impl From<DiffMethod> for PyDiffMethod {
    fn from(m: DiffMethod) -> Self {
        Self {
            added: m.is_added(),
            removed: m.is_removed(),
            modified: m.is_modified(),
            class_name: m.class_name,
            method_a: m.method_a,
            method_b: m.method_b,
            similarity: m.similarity,
        }
    }
}

#[pymethods]
impl PyDiffMethod {
    fn __repr__(&self) -> String {
        format!(
            "DiffMethod(method_a={:?}, method_b={:?}, added={}, removed={}, modified={})",
            self.method_a, self.method_b, self.added, self.removed, self.modified
        )
    }
}

#[pyclass(name = "DiffClass", get_all)]
#[derive(Clone)]
pub struct PyDiffClass {
    class_a: Option<String>,
    class_b: Option<String>,
    added: bool,
    removed: bool,
    modified: bool,
    methods: Vec<PyDiffMethod>,
}

impl From<DiffClass> for PyDiffClass {
    fn from(c: DiffClass) -> Self {
        Self {
            added: c.is_added(),
            removed: c.is_removed(),
            modified: c.is_modified(),
            class_a: c.class_a,
            class_b: c.class_b,
            methods: c.methods.into_iter().map(PyDiffMethod::from).collect(),
        }
    }
}

#[pymethods]
impl PyDiffClass {
    fn __repr__(&self) -> String {
        format!(
            "DiffClass(class_a={:?}, class_b={:?}, added={}, removed={}, modified={})",
            self.class_a, self.class_b, self.added, self.removed, self.modified
        )
    }
}

/// Parse Java source into a dict of class name to ClassComponent.
#[pyfunction]
fn parse(py: Python<'_>, source: &str) -> PyResult<BTreeMap<String, PyClassComponent>> {
    let parsed = py.allow_threads(|| parser::JavaParser.parse(source))?;
    Ok(parsed
        .classes
        .into_iter()
        .map(|(name, class)| (name, PyClassComponent::from(class)))
        .collect())
}

/// Verbatim text of one method.
#[pyfunction]
fn extract_method(class_name: &str, method_name: &str, source: &str) -> PyResult<String> {
    Ok(parser::JavaParser.extract_method(class_name, method_name, source)?)
}

/// Diff two `(filename, source)` revisions into DiffClass / DiffMethod objects.
#[pyfunction]
fn diff(py: Python<'_>, a: (String, String), b: (String, String)) -> PyResult<Vec<PyObject>> {
    let base = SourceUnit::from(a);
    let head = SourceUnit::from(b);
    let records = py.allow_threads(|| differ::diff(&base, &head))?;

    records
        .into_iter()
        .map(|record| match record {
            DiffRecord::Class(c) => Ok(Py::new(py, PyDiffClass::from(c))?.into_py(py)),
            DiffRecord::Method(m) => Ok(Py::new(py, PyDiffMethod::from(m))?.into_py(py)),
        })
        .collect()
}

/// Get the version of schwa-core.
#[pyfunction]
fn version() -> &'static str {
    crate::version()
}

/// Python module definition.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyClassComponent>()?;
    m.add_class::<PyDiffClass>()?;
    m.add_class::<PyDiffMethod>()?;

    m.add_function(wrap_pyfunction!(parse, m)?)?;
    m.add_function(wrap_pyfunction!(extract_method, m)?)?;
    m.add_function(wrap_pyfunction!(diff, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;

    Ok(())
}
