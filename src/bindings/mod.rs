// PyO3 Bindings Module
//
// Python bindings for the declaration extractor, compiled with the `python`
// feature. Wraps Declaration, ExtractionResults and BatchFileResult in
// PyO3-compatible types.

mod api;
mod batch_result;
mod declaration;
mod extraction_results;

// Re-export for lib.rs
pub use api::{
    detect_language, expand_patterns, extract_file, extract_files_batch, hash_content,
    supported_languages,
};
pub use batch_result::PyBatchFileResult;
pub use declaration::PyDeclaration;
pub use extraction_results::PyExtractionResults;
