//! C declaration extractor
//!
//! Functions (definitions and prototypes), struct/union/enum types including
//! `typedef struct {...} Name`, data members and enumerators. The work is done
//! by the shared block scanner running with the C capability set.

use crate::config::ExtractorConfig;
use crate::extractors::base::{BaseExtractor, ContextConfig, Declaration, ParseError};
use crate::extractors::scanner::BlockScanner;
use crate::language::LanguageVariant;

/// Main C extractor struct
pub struct CExtractor {
    base: BaseExtractor,
}

impl CExtractor {
    /// Run the lexical and brace passes over `content`
    pub fn new(file_path: String, content: String) -> Result<Self, ParseError> {
        Ok(Self {
            base: BaseExtractor::new(LanguageVariant::C, file_path, content)?,
        })
    }

    pub fn set_context_config(&mut self, config: ContextConfig) {
        self.base.set_context_config(config);
    }

    /// Extract the declaration tree
    pub fn extract_declarations(&self, config: &ExtractorConfig) -> Vec<Declaration> {
        BlockScanner::new(&self.base, config).scan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{DeclarationKind, ParseErrorKind};

    const SAMPLE: &str = include_str!("../../../test_samples/sample.c");
    const MALFORMED: &str = include_str!("../../../test_samples/malformed.c");

    fn extract(source: &str) -> Vec<Declaration> {
        CExtractor::new("sample.c".to_string(), source.to_string())
            .unwrap()
            .extract_declarations(&ExtractorConfig::default())
    }

    #[test]
    fn test_sample_top_level_declarations() {
        let decls = extract(SAMPLE);
        let summary: Vec<_> = decls.iter().map(|d| (d.kind, d.name.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (DeclarationKind::Function, "add"),
                (DeclarationKind::Function, "factorial"),
                (DeclarationKind::Struct, "Point"),
            ]
        );
    }

    #[test]
    fn test_sample_functions_carry_doc_comments() {
        let decls = extract(SAMPLE);
        assert_eq!(
            decls[0].doc_comment.as_deref(),
            Some("/**\n * Add two integers\n */")
        );
        assert_eq!(
            decls[1].doc_comment.as_deref(),
            Some("/**\n * Calculate factorial\n */")
        );
        assert_eq!(decls[2].doc_comment, None);
    }

    #[test]
    fn test_sample_signatures() {
        let decls = extract(SAMPLE);
        let add = decls[0].signature.as_ref().unwrap();
        assert_eq!(add.text, "int add(int a, int b)");
        assert_eq!(add.return_type.as_deref(), Some("int"));
        assert_eq!(add.parameters, vec!["int a", "int b"]);
        assert_eq!(decls[1].complexity, Some(2));
    }

    #[test]
    fn test_sample_struct_fields() {
        let decls = extract(SAMPLE);
        let names: Vec<_> = decls[2].children.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(decls[2]
            .children
            .iter()
            .all(|d| d.kind == DeclarationKind::Field));
    }

    #[test]
    fn test_body_span_round_trip() {
        let decls = extract(SAMPLE);
        let bodies: Vec<_> = decls.iter().map(|d| d.body_text(SAMPLE)).collect();
        assert_eq!(
            bodies,
            vec![
                Some("{\n    return a + b;\n}"),
                Some("{\n    if (n <= 1) {\n        return 1;\n    }\n    return n * factorial(n - 1);\n}"),
                Some("{\n    int x;\n    int y;\n}"),
            ]
        );
        assert_eq!(
            decls[2].span.slice(SAMPLE),
            "struct Point {\n    int x;\n    int y;\n};"
        );
        // Fields have no body
        assert!(decls[2].children.iter().all(|f| f.body_span.is_none()));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        assert_eq!(extract(SAMPLE), extract(SAMPLE));
    }

    #[test]
    fn test_malformed_input_fails_without_partial_results() {
        let err = CExtractor::new("malformed.c".to_string(), MALFORMED.to_string())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ParseErrorKind::UnbalancedBraces);
        let offset = err.offset().unwrap();
        assert_eq!(&MALFORMED[offset..offset + 1], "{");
    }

    #[test]
    fn test_function_pointer_and_attributes() {
        let source = "\
struct Ops {
    int (*open)(const char *path);
    unsigned flags : 4;
};

__attribute__((noreturn)) void die(const char *msg);

static inline int clamp(int v, int lo, int hi) {
    return v < lo ? lo : (v > hi ? hi : v);
}
";
        let decls = extract(source);
        let ops = &decls[0];
        let fields: Vec<_> = ops.children.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(fields, vec!["open", "flags"]);

        assert_eq!(decls[1].name, "die");
        assert!(decls[1].body_span.is_none());

        let clamp = &decls[2];
        assert_eq!(clamp.signature.as_ref().unwrap().return_type.as_deref(), Some("int"));
        assert_eq!(clamp.complexity, Some(3));
    }

    #[test]
    fn test_cpp_constructs_are_not_recognized_in_c() {
        let decls = extract("class Widget { int a; };\nint ok(void) { return 0; }\n");
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
    }
}
