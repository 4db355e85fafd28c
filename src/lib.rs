// Declscan Core - structural declaration extraction for C and C++
//
// Lexical masking and brace matching feed a scope-aware block scanner; the
// `python` feature exposes the same extractors as a PyO3 extension module.

pub mod batch;
pub mod config;
pub mod extractors;
pub mod language;
pub mod utils;

// PyO3 bindings layer
#[cfg(feature = "python")]
pub mod bindings;

pub use config::ExtractorConfig;
pub use extractors::{
    extract, extract_declarations, Declaration, DeclarationKind, ExtractionResults,
    ExtractorManager, ParseError, ParseErrorKind, Signature, Span, Visibility,
};
pub use language::{Capabilities, LanguageVariant};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Declscan Core Python module
///
/// Provides declaration and doc comment extraction for C and C++.
#[cfg(feature = "python")]
#[pymodule]
fn declscan_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Add Python functions
    m.add_function(wrap_pyfunction!(bindings::extract_file, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::detect_language, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::supported_languages, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::extract_files_batch, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::expand_patterns, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::hash_content, m)?)?;

    // Add Python classes
    m.add_class::<bindings::PyDeclaration>()?;
    m.add_class::<bindings::PyExtractionResults>()?;
    m.add_class::<bindings::PyBatchFileResult>()?;

    Ok(())
}
