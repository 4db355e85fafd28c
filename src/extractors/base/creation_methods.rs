// Declaration creation methods
//
// Kept apart from extractor.rs so position bookkeeping lives in one place.

use super::extractor::BaseExtractor;
use super::types::{Declaration, DeclarationKind, Signature, Span, Visibility};

/// Options for creating declarations
#[derive(Debug, Clone, Default)]
pub struct DeclarationOptions {
    pub qualified_name: Option<String>,
    pub signature: Option<Signature>,
    pub visibility: Option<Visibility>,
    pub body_span: Option<Span>,
    pub complexity: Option<u32>,
    /// Overrides the comment lookup when set
    pub doc_comment: Option<String>,
    pub children: Vec<Declaration>,
}

impl BaseExtractor {
    /// Create a declaration whose header starts at `span.start`
    pub fn create_declaration(
        &self,
        span: Span,
        name: String,
        kind: DeclarationKind,
        options: DeclarationOptions,
        include_code_context: bool,
    ) -> Declaration {
        let start_row = self.line_of(span.start);
        let end_row = self.line_of(span.end.saturating_sub(1).max(span.start));
        let column = self.column_of(span.start);

        let id = self.generate_id(&name, start_row as u32, column as u32);
        let code_context = if include_code_context {
            self.extract_code_context(start_row, end_row)
        } else {
            None
        };

        Declaration {
            id,
            qualified_name: options.qualified_name.unwrap_or_else(|| name.clone()),
            name,
            kind,
            signature: options.signature,
            doc_comment: options
                .doc_comment
                .or_else(|| self.find_doc_comment(span.start)),
            visibility: options.visibility,
            span,
            body_span: options.body_span,
            start_line: (start_row + 1) as u32,
            end_line: (end_row + 1) as u32,
            complexity: options.complexity,
            code_context,
            children: options.children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageVariant;

    #[test]
    fn test_create_declaration_positions() {
        let source = "\n/** Point */\nstruct Point {\n  int x;\n};\n";
        let base = BaseExtractor::new(
            LanguageVariant::C,
            "p.c".to_string(),
            source.to_string(),
        )
        .unwrap();
        let start = source.find("struct").unwrap();
        let end = source.rfind(';').unwrap() + 1;

        let decl = base.create_declaration(
            Span::new(start, end),
            "Point".to_string(),
            DeclarationKind::Struct,
            DeclarationOptions::default(),
            false,
        );

        assert_eq!(decl.start_line, 3);
        assert_eq!(decl.end_line, 5);
        assert_eq!(decl.qualified_name, "Point");
        assert_eq!(decl.doc_comment.as_deref(), Some("/** Point */"));
        assert!(decl.code_context.is_none());
    }
}
