// PyDeclaration - PyO3 wrapper for the Declaration tree
//
// Read-only view; children are wrapped on access.

use crate::extractors::base::Declaration;
use pyo3::prelude::*;

/// Python-accessible Declaration wrapper
///
/// A function, type, namespace or member extracted from C/C++ source, with its
/// nested declarations in `children`.
#[pyclass(name = "Declaration")]
pub struct PyDeclaration {
    inner: Declaration,
}

impl PyDeclaration {
    pub fn from_declaration(declaration: Declaration) -> Self {
        PyDeclaration { inner: declaration }
    }
}

#[pymethods]
impl PyDeclaration {
    #[getter]
    fn id(&self) -> String {
        self.inner.id.clone()
    }

    #[getter]
    fn kind(&self) -> String {
        self.inner.kind.to_string()
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    #[getter]
    fn qualified_name(&self) -> String {
        self.inner.qualified_name.clone()
    }

    #[getter]
    fn start_line(&self) -> u32 {
        self.inner.start_line
    }

    #[getter]
    fn end_line(&self) -> u32 {
        self.inner.end_line
    }

    #[getter]
    fn start_byte(&self) -> usize {
        self.inner.span.start
    }

    #[getter]
    fn end_byte(&self) -> usize {
        self.inner.span.end
    }

    // Optional fields (can be None)

    #[getter]
    fn signature(&self) -> Option<String> {
        self.inner.signature.as_ref().map(|s| s.text.clone())
    }

    #[getter]
    fn return_type(&self) -> Option<String> {
        self.inner
            .signature
            .as_ref()
            .and_then(|s| s.return_type.clone())
    }

    #[getter]
    fn parameters(&self) -> Vec<String> {
        self.inner
            .signature
            .as_ref()
            .map(|s| s.parameters.clone())
            .unwrap_or_default()
    }

    #[getter]
    fn doc_comment(&self) -> Option<String> {
        self.inner.doc_comment.clone()
    }

    #[getter]
    fn visibility(&self) -> Option<String> {
        self.inner.visibility.map(|v| v.to_string())
    }

    /// `(start, end)` byte offsets of the `{ ... }` body
    #[getter]
    fn body_span(&self) -> Option<(usize, usize)> {
        self.inner.body_span.map(|span| (span.start, span.end))
    }

    #[getter]
    fn complexity(&self) -> Option<u32> {
        self.inner.complexity
    }

    #[getter]
    fn code_context(&self) -> Option<String> {
        self.inner.code_context.clone()
    }

    #[getter]
    fn children(&self) -> Vec<PyDeclaration> {
        self.inner
            .children
            .iter()
            .map(|c| PyDeclaration::from_declaration(c.clone()))
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "Declaration(name='{}', kind='{}', line={}, children={})",
            self.inner.qualified_name,
            self.inner.kind,
            self.inner.start_line,
            self.inner.children.len()
        )
    }
}
