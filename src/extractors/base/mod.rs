// Base Extractor Types and Passes for declscan
//
// - types.rs: Declaration, spans, signatures, flattened records
// - errors.rs: ParseError taxonomy
// - lexical.rs: comment/literal/directive masking
// - braces.rs: brace matching
// - extractor.rs: BaseExtractor (source, masked copy, line index, doc comments)
// - creation_methods.rs: declaration construction

pub mod braces;
pub mod creation_methods;
pub mod errors;
pub mod extractor;
pub mod lexical;
pub mod types;

pub use creation_methods::DeclarationOptions;
pub use errors::{ParseError, ParseErrorKind};
pub use extractor::{normalize_whitespace, BaseExtractor};
pub use types::{
    flatten_declarations, ContextConfig, Declaration, DeclarationKind, DeclarationRecord,
    ExtractionResults, Signature, Span, Visibility,
};
