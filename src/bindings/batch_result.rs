// PyBatchFileResult - file read + hash + extraction for one batch input
//
// File I/O happens in Rust's worker pool; Python receives the finished result.

use super::PyExtractionResults;
use crate::batch::BatchFileResult;
use pyo3::prelude::*;

/// Result of processing a single file in batch extraction.
///
/// - path: relative Unix-style path
/// - language: "c", "cpp", or "unknown"
/// - hash: blake3 of the content (empty if the read failed)
/// - results: extraction results (None on error)
/// - error: error message if any step failed
#[pyclass(name = "BatchFileResult")]
pub struct PyBatchFileResult {
    #[pyo3(get)]
    pub path: String,

    #[pyo3(get)]
    pub language: String,

    #[pyo3(get)]
    pub hash: String,

    #[pyo3(get)]
    pub size: usize,

    // PyExtractionResults is not Clone, so results go through a taking getter
    pub results: Option<PyExtractionResults>,

    #[pyo3(get)]
    pub error: Option<String>,
}

impl PyBatchFileResult {
    pub fn from_batch_result(result: BatchFileResult) -> Self {
        PyBatchFileResult {
            path: result.path,
            language: result.language,
            hash: result.hash,
            size: result.size,
            results: result
                .results
                .map(PyExtractionResults::from_extraction_results),
            error: result.error,
        }
    }
}

#[pymethods]
impl PyBatchFileResult {
    #[getter]
    fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Get extraction results
    ///
    /// Note: This takes ownership of the results field. Calling this
    /// multiple times will return None after the first call.
    #[getter]
    fn results(&mut self) -> Option<PyExtractionResults> {
        self.results.take()
    }

    fn __repr__(&self) -> String {
        if let Some(ref err) = self.error {
            format!("BatchFileResult(path={:?}, error={:?})", self.path, err)
        } else {
            format!(
                "BatchFileResult(path={:?}, lang={:?}, hash={:?}, has_results={})",
                self.path,
                self.language,
                &self.hash[..8.min(self.hash.len())],
                self.results.is_some()
            )
        }
    }
}
