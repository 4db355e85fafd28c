// PyExtractionResults - PyO3 wrapper for ExtractionResults
//
// Container for the declaration tree of one file

use super::PyDeclaration;
use crate::extractors::base::ExtractionResults;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python-accessible ExtractionResults wrapper
#[pyclass(name = "ExtractionResults")]
pub struct PyExtractionResults {
    inner: ExtractionResults,
}

impl PyExtractionResults {
    pub fn from_extraction_results(results: ExtractionResults) -> Self {
        PyExtractionResults { inner: results }
    }
}

#[pymethods]
impl PyExtractionResults {
    #[getter]
    fn language(&self) -> String {
        self.inner.language.clone()
    }

    #[getter]
    fn file_path(&self) -> String {
        self.inner.file_path.clone()
    }

    #[getter]
    fn content_hash(&self) -> String {
        self.inner.content_hash.clone()
    }

    /// Top-level declarations
    #[getter]
    fn declarations(&self) -> Vec<PyDeclaration> {
        self.inner
            .declarations
            .iter()
            .map(|d| PyDeclaration::from_declaration(d.clone()))
            .collect()
    }

    /// Look up any declaration by qualified name (e.g. "math::power")
    fn find(&self, qualified_name: &str) -> Option<PyDeclaration> {
        self.inner
            .find(qualified_name)
            .map(|d| PyDeclaration::from_declaration(d.clone()))
    }

    /// Flattened pre-order records as a JSON array
    fn records_json(&self) -> PyResult<String> {
        self.inner
            .records_to_json()
            .map_err(|e| PyValueError::new_err(format!("Serialization failed: {}", e)))
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner
            .to_json()
            .map_err(|e| PyValueError::new_err(format!("Serialization failed: {}", e)))
    }

    fn __len__(&self) -> usize {
        self.inner.total_count()
    }

    fn __repr__(&self) -> String {
        format!(
            "ExtractionResults(file_path='{}', language='{}', declarations={})",
            self.inner.file_path,
            self.inner.language,
            self.inner.total_count()
        )
    }
}
