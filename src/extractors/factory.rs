//! Shared extractor factory - single dispatch point for both language variants
//!
//! The manager, the batch layer and the Python bindings all come through here so
//! every path configures the extractors the same way.

use crate::config::ExtractorConfig;
use crate::extractors::base::{Declaration, ExtractionResults, ParseError};
use crate::extractors::c::CExtractor;
use crate::extractors::cpp::CppExtractor;
use crate::language::LanguageVariant;
use crate::utils::hashing::hash_content;

/// Extract the declaration tree of `source` with the default configuration
pub fn extract(source: &str, variant: LanguageVariant) -> Result<Vec<Declaration>, ParseError> {
    extract_declarations(source, variant, "", &ExtractorConfig::default())
        .map(|results| results.declarations)
}

/// Extract declarations for either variant
///
/// # Parameters
/// - `content`: Source code content
/// - `variant`: `c` or `cpp`
/// - `file_path`: Relative Unix-style file path (used in declaration ids)
/// - `config`: Extraction options
///
/// # Returns
/// The declaration tree with the language tag, path and blake3 content hash, or
/// the first lexical/brace error. Nothing is returned for input that fails.
pub fn extract_declarations(
    content: &str,
    variant: LanguageVariant,
    file_path: &str,
    config: &ExtractorConfig,
) -> Result<ExtractionResults, ParseError> {
    let declarations = match variant {
        LanguageVariant::C => {
            let mut extractor = CExtractor::new(file_path.to_string(), content.to_string())?;
            extractor.set_context_config(config.context.clone());
            extractor.extract_declarations(config)
        }
        LanguageVariant::Cpp => {
            let mut extractor = CppExtractor::new(file_path.to_string(), content.to_string())?;
            extractor.set_context_config(config.context.clone());
            extractor.extract_declarations(config)
        }
    };

    Ok(ExtractionResults {
        language: variant.as_str().to_string(),
        file_path: file_path.to_string(),
        content_hash: hash_content(content),
        declarations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{DeclarationKind, ParseErrorKind};

    #[test]
    fn test_extract_reports_variant_and_hash() {
        let source = "int one(void) { return 1; }\n";
        let results =
            extract_declarations(source, LanguageVariant::C, "src/one.c", &ExtractorConfig::default())
                .unwrap();
        assert_eq!(results.language, "c");
        assert_eq!(results.file_path, "src/one.c");
        assert_eq!(results.content_hash, hash_content(source));
        assert_eq!(results.declarations.len(), 1);
    }

    #[test]
    fn test_same_text_differs_by_variant() {
        let source = "namespace n { int f() { return 0; } }\n";
        assert!(extract(source, LanguageVariant::C).unwrap().is_empty());
        let cpp = extract(source, LanguageVariant::Cpp).unwrap();
        assert_eq!(cpp[0].kind, DeclarationKind::Namespace);
    }

    #[test]
    fn test_unterminated_comment_fails() {
        let err = extract("int a;\n/* open", LanguageVariant::Cpp).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnterminatedComment);
        assert_eq!(err.offset(), Some(7));
    }

    #[test]
    fn test_stray_closing_brace_fails() {
        let err = extract("int f() { return 0; } }\n", LanguageVariant::C).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnbalancedBraces);
        assert_eq!(err.offset(), Some(22));
    }

    #[test]
    fn test_code_context_when_enabled() {
        let config = ExtractorConfig {
            include_code_context: true,
            ..Default::default()
        };
        let results = extract_declarations(
            "// helper\nint f(void) { return 0; }\n",
            LanguageVariant::C,
            "f.c",
            &config,
        )
        .unwrap();
        let context = results.declarations[0].code_context.as_deref().unwrap();
        assert!(context.contains("➤   2: int f(void) { return 0; }"));
    }
}
