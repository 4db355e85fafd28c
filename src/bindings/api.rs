// API Functions - PyO3-exposed functions for Python
//
// Thin wrappers over the manager, batch layer and hashing utilities.

use super::{PyBatchFileResult, PyExtractionResults};
use crate::batch;
use crate::extractors::ExtractorManager;
use crate::language::{detect_language_from_extension, LanguageVariant};
use crate::utils::hashing;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Extract declarations from source code
///
/// Args:
///     content (str): Source code content to extract from
///     language (str): "c" or "cpp"
///     file_path (str): File path recorded in the results and declaration ids
///
/// Returns:
///     ExtractionResults: The declaration tree
///
/// Raises:
///     ValueError: If the language is not recognized or the source has
///         unbalanced braces or an unterminated comment
#[pyfunction]
#[pyo3(signature = (content, language, file_path))]
pub fn extract_file(
    content: &str,
    language: &str,
    file_path: &str,
) -> PyResult<PyExtractionResults> {
    let variant = LanguageVariant::from_str(language)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let results = ExtractorManager::new()
        .extract_source(content, variant, file_path)
        .map_err(|e| PyValueError::new_err(format!("Extraction failed: {}", e)))?;

    Ok(PyExtractionResults::from_extraction_results(results))
}

/// Detect the language variant from a file extension
///
/// Returns:
///     str: "c" or "cpp", or "text" for anything else
#[pyfunction]
#[pyo3(signature = (file_path))]
pub fn detect_language(file_path: &str) -> String {
    let extension = Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    detect_language_from_extension(extension)
        .unwrap_or("text")
        .to_string()
}

/// Get list of supported languages
#[pyfunction]
pub fn supported_languages() -> Vec<String> {
    ExtractorManager::new()
        .supported_languages()
        .iter()
        .map(|&s| s.to_string())
        .collect()
}

/// Compute blake3 hash of content string
///
/// Returns:
///     str: 64-character hex digest
#[pyfunction]
pub fn hash_content(content: &str) -> String {
    hashing::hash_content(content)
}

/// Read and extract multiple files in parallel
///
/// Releases the GIL while files are read, hashed and extracted on the rayon
/// pool. A failing file yields a result with `error` set; it never fails the
/// batch.
///
/// Args:
///     paths (list[str]): File paths (absolute, or relative to the current directory)
///     workspace_root (str): Root used to compute the stored relative paths
///
/// Returns:
///     list[BatchFileResult]: One result per input, in input order
#[pyfunction]
#[pyo3(signature = (paths, workspace_root))]
pub fn extract_files_batch(
    py: Python<'_>,
    paths: Vec<String>,
    workspace_root: String,
) -> Vec<PyBatchFileResult> {
    let manager = ExtractorManager::new();
    let paths: Vec<PathBuf> = paths.into_iter().map(PathBuf::from).collect();

    let results = py.detach(move || {
        batch::extract_files_batch(&paths, Path::new(&workspace_root), manager.config())
    });

    results
        .into_iter()
        .map(PyBatchFileResult::from_batch_result)
        .collect()
}

/// Expand glob patterns to C/C++ source files
///
/// Raises:
///     ValueError: If a pattern is malformed
#[pyfunction]
#[pyo3(signature = (patterns, exclude = Vec::new()))]
pub fn expand_patterns(patterns: Vec<String>, exclude: Vec<String>) -> PyResult<Vec<String>> {
    let paths = batch::expand_patterns(&patterns, &exclude)
        .map_err(|e| PyValueError::new_err(format!("{:#}", e)))?;
    Ok(paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect())
}
