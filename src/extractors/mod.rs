//! Declaration Extractors Module
//!
//! Structural extraction of declarations from C and C++ source. No grammar is
//! involved: a lexical pass masks comments and literals, braces are matched on
//! the masked text, and a block scanner classifies the text before each
//! block.
//!
//! # Architecture
//!
//! - `base` - Declaration types, errors, masking, brace matching, BaseExtractor
//! - `scanner` - Scope-aware block scanner shared by both variants
//! - `c`, `cpp` - Per-variant extractors
//! - `factory.rs` - Variant dispatch
//! - `manager.rs` - ExtractorManager public API

pub mod base;
pub mod c;
pub mod cpp;
pub mod factory;
pub mod manager;
pub mod scanner;

// Re-export the public API
pub use base::{
    flatten_declarations, Declaration, DeclarationKind, DeclarationRecord, ExtractionResults,
    ParseError, ParseErrorKind, Signature, Span, Visibility,
};
pub use factory::{extract, extract_declarations};
pub use manager::ExtractorManager;
