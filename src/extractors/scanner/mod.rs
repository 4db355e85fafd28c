//! Block scanner shared by the C and C++ extractors
//!
//! Walks the masked source one region at a time. Statements end at `;` outside
//! parentheses; a `{` ends a header. A recognized header becomes a declaration
//! and its body is scanned again with the scope of the new node. Everything the
//! scanner does not recognize is skipped whole via the brace map.
//!
//! - `headers` - block/statement header classification
//! - `members` - data members and enumerators
//! - `complexity` - branch counting over function bodies

pub mod complexity;
pub mod headers;
pub mod members;

use std::collections::HashSet;

use crate::config::ExtractorConfig;
use crate::extractors::base::{
    BaseExtractor, Declaration, DeclarationKind, DeclarationOptions, Signature, Span, Visibility,
};
use crate::language::Capabilities;
use headers::{FunctionHeader, Header, HeaderContext, HeaderSource};

/// Name given to aggregates and namespaces declared without one
pub const ANONYMOUS: &str = "(anonymous)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    File,
    Namespace,
    Aggregate,
    Function,
}

#[derive(Debug, Clone)]
struct Scope {
    kind: ScopeKind,
    path: Vec<String>,
    /// Simple name of the enclosing class/struct/union
    aggregate_name: Option<String>,
    default_visibility: Option<Visibility>,
    depth: usize,
}

impl Scope {
    fn file() -> Self {
        Self {
            kind: ScopeKind::File,
            path: Vec::new(),
            aggregate_name: None,
            default_visibility: None,
            depth: 0,
        }
    }

    fn child(&self, kind: ScopeKind, qualified_name: &str) -> Self {
        Self {
            kind,
            path: qualified_name.split("::").map(str::to_string).collect(),
            aggregate_name: None,
            default_visibility: None,
            depth: self.depth + 1,
        }
    }

    /// Same scope one block deeper, for blocks that add no name
    fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    fn qualify(&self, qualifier: &[String], name: &str) -> String {
        self.path
            .iter()
            .chain(qualifier.iter())
            .map(String::as_str)
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join("::")
    }

    fn member_visibility(&self, current: Option<Visibility>) -> Option<Visibility> {
        match self.kind {
            ScopeKind::Aggregate => current,
            _ => None,
        }
    }
}

/// Where scanning resumes after a brace block, and whether a new statement
/// starts there
struct BlockOutcome {
    resume: usize,
    reset: bool,
}

impl BlockOutcome {
    fn after(close: usize) -> Self {
        Self {
            resume: close + 1,
            reset: true,
        }
    }
}

pub struct BlockScanner<'a> {
    base: &'a BaseExtractor,
    caps: Capabilities,
    config: &'a ExtractorConfig,
    /// Simple names of the aggregates seen so far, for out-of-line members
    known_aggregates: HashSet<String>,
}

impl<'a> BlockScanner<'a> {
    pub fn new(base: &'a BaseExtractor, config: &'a ExtractorConfig) -> Self {
        Self {
            base,
            caps: base.variant.capabilities(),
            config,
            known_aggregates: HashSet::new(),
        }
    }

    /// Scan the whole file
    pub fn scan(mut self) -> Vec<Declaration> {
        let end = self.base.masked.len();
        self.scan_region(0, end, &Scope::file())
    }

    fn scan_region(&mut self, start: usize, end: usize, scope: &Scope) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        let mut stmt_start = start;
        let mut depth = 0usize;
        let mut visibility = scope.default_visibility;
        let mut i = start;

        while i < end {
            match self.base.masked[i] {
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.saturating_sub(1),
                b';' if depth == 0 => {
                    self.on_statement(stmt_start, i, scope, visibility, &mut declarations);
                    stmt_start = i + 1;
                }
                b':' if depth == 0
                    && scope.kind == ScopeKind::Aggregate
                    && self.caps.access_labels =>
                {
                    if let Some(label) = self.access_label(stmt_start, i) {
                        visibility = Some(label);
                        stmt_start = i + 1;
                    }
                }
                b'{' => {
                    let Some(close) = self.base.braces.close_of(i) else {
                        i += 1;
                        continue;
                    };
                    if depth > 0 {
                        // Braces inside parentheses belong to the expression
                        i = close + 1;
                        continue;
                    }
                    let outcome =
                        self.on_block(stmt_start, i, close, end, scope, visibility, &mut declarations);
                    i = outcome.resume;
                    if outcome.reset {
                        stmt_start = i;
                    }
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        declarations
    }

    /// `public:` / `private:` / `protected:` ending at the colon at `colon`
    fn access_label(&self, stmt_start: usize, colon: usize) -> Option<Visibility> {
        let masked = &self.base.masked;
        let scope_operator = masked.get(colon + 1) == Some(&b':')
            || (colon > 0 && masked[colon - 1] == b':');
        if scope_operator {
            return None;
        }
        let text = self.base.masked_text(Span::new(stmt_start, colon));
        text.split_whitespace().last().and_then(Visibility::from_label)
    }

    fn header_span(&self, stmt_start: usize, terminator: usize) -> Option<Span> {
        let start = self.base.skip_whitespace(stmt_start, terminator);
        let end = self.base.trim_end(start, terminator);
        if start == end {
            None
        } else {
            Some(Span::new(start, end))
        }
    }

    fn depth_allows(&self, scope: &Scope) -> bool {
        scope.depth < self.config.max_nesting_depth
    }

    fn on_statement(
        &mut self,
        stmt_start: usize,
        semicolon: usize,
        scope: &Scope,
        visibility: Option<Visibility>,
        declarations: &mut Vec<Declaration>,
    ) {
        if scope.kind == ScopeKind::Function {
            return;
        }
        let Some(header) = self.header_span(stmt_start, semicolon) else {
            return;
        };
        let masked = self.base.masked_text(header);
        let src = HeaderSource {
            masked: &masked,
            original: self.base.get_text(header),
        };
        let ctx = HeaderContext {
            enclosing_aggregate: scope.aggregate_name.as_deref(),
            is_block: false,
        };
        let span = Span::new(header.start, semicolon + 1);

        let allows_functions =
            scope.kind != ScopeKind::Aggregate || self.caps.member_functions;
        if allows_functions {
            if let Some(Header::Function(function)) =
                headers::classify_statement(src, &self.caps, ctx)
            {
                let declaration =
                    self.function_declaration(function, src, span, None, scope, visibility);
                declarations.push(declaration);
                return;
            }
        }

        if scope.kind == ScopeKind::Aggregate && self.config.include_fields {
            for field in members::parse_fields(src, &self.caps) {
                let options = DeclarationOptions {
                    qualified_name: Some(scope.qualify(&[], &field.name)),
                    signature: Some(Signature {
                        text: field.text,
                        return_type: Some(field.field_type),
                        parameters: Vec::new(),
                    }),
                    visibility: scope.member_visibility(visibility),
                    ..Default::default()
                };
                declarations.push(self.base.create_declaration(
                    span,
                    field.name,
                    DeclarationKind::Field,
                    options,
                    self.config.include_code_context,
                ));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn on_block(
        &mut self,
        stmt_start: usize,
        open: usize,
        close: usize,
        region_end: usize,
        scope: &Scope,
        visibility: Option<Visibility>,
        declarations: &mut Vec<Declaration>,
    ) -> BlockOutcome {
        let Some(header) = self.header_span(stmt_start, open) else {
            // Bare block
            self.scan_function_block(open, close, scope, declarations);
            return BlockOutcome::after(close);
        };

        let masked = self.base.masked_text(header);
        let src = HeaderSource {
            masked: &masked,
            original: self.base.get_text(header),
        };
        let ctx = HeaderContext {
            enclosing_aggregate: scope.aggregate_name.as_deref(),
            is_block: true,
        };
        let body = Span::new(open, close + 1);

        match headers::classify_block(src, &self.caps, ctx) {
            Some(Header::Function(function)) if self.allows_function_blocks(scope) => {
                let span = Span::new(header.start, close + 1);
                let declaration =
                    self.function_declaration(function, src, span, Some(body), scope, visibility);
                declarations.push(declaration);
                BlockOutcome::after(close)
            }
            Some(Header::Aggregate {
                kind,
                name,
                typedef,
            }) => {
                let terminator = self.trailing_terminator(close, region_end);
                let name = name
                    .or_else(|| {
                        typedef
                            .then(|| terminator.and_then(|semi| self.trailing_name(close, semi)))
                            .flatten()
                    })
                    .unwrap_or_else(|| ANONYMOUS.to_string());
                let end = terminator.map(|semi| semi + 1).unwrap_or(close + 1);
                let declaration = self.aggregate_declaration(
                    kind,
                    name,
                    src,
                    Span::new(header.start, end),
                    body,
                    scope,
                    visibility,
                );
                declarations.push(declaration);
                BlockOutcome {
                    resume: end,
                    reset: true,
                }
            }
            Some(Header::Enum { name, typedef }) => {
                let terminator = self.trailing_terminator(close, region_end);
                let name = name
                    .or_else(|| {
                        typedef
                            .then(|| terminator.and_then(|semi| self.trailing_name(close, semi)))
                            .flatten()
                    })
                    .unwrap_or_else(|| ANONYMOUS.to_string());
                let end = terminator.map(|semi| semi + 1).unwrap_or(close + 1);
                let declaration = self.enum_declaration(
                    name,
                    src,
                    Span::new(header.start, end),
                    body,
                    scope,
                    visibility,
                );
                declarations.push(declaration);
                BlockOutcome {
                    resume: end,
                    reset: true,
                }
            }
            Some(Header::Namespace { name }) if self.allows_namespaces(scope) => {
                let name = name.unwrap_or_else(|| ANONYMOUS.to_string());
                let qualified_name = scope.qualify(&[], &name);
                let children = if self.depth_allows(scope) {
                    let inner = scope.child(ScopeKind::Namespace, &qualified_name);
                    self.scan_region(open + 1, close, &inner)
                } else {
                    Vec::new()
                };
                let options = DeclarationOptions {
                    qualified_name: Some(qualified_name),
                    signature: Some(Signature::text_only(src.normalized_original())),
                    body_span: Some(body),
                    children,
                    ..Default::default()
                };
                declarations.push(self.base.create_declaration(
                    Span::new(header.start, close + 1),
                    name,
                    DeclarationKind::Namespace,
                    options,
                    self.config.include_code_context,
                ));
                BlockOutcome::after(close)
            }
            Some(Header::Linkage) if self.allows_namespaces(scope) => {
                if self.depth_allows(scope) {
                    let nested = self.scan_region(open + 1, close, &scope.nested());
                    declarations.extend(nested);
                }
                BlockOutcome::after(close)
            }
            _ => self.skip_block(open, close, region_end, scope, declarations),
        }
    }

    /// Unrecognized header: an initializer continues its statement, anything
    /// else ends it. Function bodies are still searched for local types.
    fn skip_block(
        &mut self,
        open: usize,
        close: usize,
        region_end: usize,
        scope: &Scope,
        declarations: &mut Vec<Declaration>,
    ) -> BlockOutcome {
        let next = self.base.skip_whitespace(close + 1, region_end);
        let continues = matches!(self.base.masked.get(next), Some(b';' | b',' | b')'))
            && next < region_end;
        if continues {
            return BlockOutcome {
                resume: close + 1,
                reset: false,
            };
        }
        self.scan_function_block(open, close, scope, declarations);
        BlockOutcome::after(close)
    }

    /// Search a block inside a function body for local types
    fn scan_function_block(
        &mut self,
        open: usize,
        close: usize,
        scope: &Scope,
        declarations: &mut Vec<Declaration>,
    ) {
        if scope.kind == ScopeKind::Function && self.depth_allows(scope) {
            let nested = self.scan_region(open + 1, close, &scope.nested());
            declarations.extend(nested);
        }
    }

    fn allows_function_blocks(&self, scope: &Scope) -> bool {
        match scope.kind {
            ScopeKind::File | ScopeKind::Namespace => true,
            ScopeKind::Aggregate => self.caps.member_functions,
            ScopeKind::Function => false,
        }
    }

    fn allows_namespaces(&self, scope: &Scope) -> bool {
        matches!(scope.kind, ScopeKind::File | ScopeKind::Namespace)
    }

    /// The `;` ending a type definition's declarators, if one follows before
    /// the region ends
    fn trailing_terminator(&self, close: usize, region_end: usize) -> Option<usize> {
        let masked = &self.base.masked;
        let mut depth = 0usize;
        let mut i = close + 1;
        while i < region_end {
            match masked[i] {
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.saturating_sub(1),
                b';' if depth == 0 => return Some(i),
                b'{' => {
                    i = self.base.braces.close_of(i)? + 1;
                    continue;
                }
                b'}' => return None,
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Last declarator name between a closing brace and its `;`
    fn trailing_name(&self, close: usize, semicolon: usize) -> Option<String> {
        let text = self.base.masked_text(Span::new(close + 1, semicolon));
        // First declarator only, with attribute arguments blanked
        let mut depth = 0usize;
        let mut outside_parens = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                ',' if depth == 0 => break,
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
            outside_parens.push(if depth > 0 || c == ')' { ' ' } else { c });
        }
        outside_parens
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| {
                !w.is_empty() && !w.starts_with(|c: char| c.is_ascii_digit()) && !w.starts_with("__")
            })
            .last()
            .map(str::to_string)
    }

    fn function_declaration(
        &mut self,
        function: FunctionHeader,
        src: HeaderSource<'_>,
        span: Span,
        body: Option<Span>,
        scope: &Scope,
        visibility: Option<Visibility>,
    ) -> Declaration {
        let enclosing = scope.aggregate_name.as_deref();
        let kind = if function.is_destructor() {
            DeclarationKind::Destructor
        } else if self.caps.special_members && function.is_constructor(enclosing) {
            DeclarationKind::Constructor
        } else if scope.kind == ScopeKind::Aggregate {
            DeclarationKind::Method
        } else if function
            .qualifier
            .last()
            .is_some_and(|q| self.known_aggregates.contains(q))
        {
            DeclarationKind::Method
        } else {
            DeclarationKind::Function
        };

        let qualified_name = scope.qualify(&function.qualifier, &function.name);
        let complexity = body
            .filter(|_| self.config.compute_complexity)
            .map(|b| complexity::cyclomatic(&self.base.masked_text(b)));
        let children = match body {
            Some(b) if self.depth_allows(scope) => {
                let inner = scope.child(ScopeKind::Function, &qualified_name);
                self.scan_region(b.start + 1, b.end - 1, &inner)
            }
            _ => Vec::new(),
        };

        let options = DeclarationOptions {
            qualified_name: Some(qualified_name),
            signature: Some(Signature {
                text: src.normalized_original(),
                return_type: function.return_type,
                parameters: function.parameters,
            }),
            visibility: scope.member_visibility(visibility),
            body_span: body,
            complexity,
            children,
            ..Default::default()
        };
        self.base.create_declaration(
            span,
            function.name,
            kind,
            options,
            self.config.include_code_context,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn aggregate_declaration(
        &mut self,
        kind: DeclarationKind,
        name: String,
        src: HeaderSource<'_>,
        span: Span,
        body: Span,
        scope: &Scope,
        visibility: Option<Visibility>,
    ) -> Declaration {
        let qualified_name = scope.qualify(&[], &name);
        if name != ANONYMOUS {
            self.known_aggregates.insert(name.clone());
        }

        let children = if self.depth_allows(scope) {
            let mut inner = scope.child(ScopeKind::Aggregate, &qualified_name);
            inner.aggregate_name = Some(name.clone());
            inner.default_visibility = Some(match kind {
                DeclarationKind::Class => Visibility::Private,
                _ => Visibility::Public,
            });
            self.scan_region(body.start + 1, body.end - 1, &inner)
        } else {
            Vec::new()
        };

        let options = DeclarationOptions {
            qualified_name: Some(qualified_name),
            signature: Some(Signature::text_only(src.normalized_original())),
            visibility: scope.member_visibility(visibility),
            body_span: Some(body),
            children,
            ..Default::default()
        };
        self.base
            .create_declaration(span, name, kind, options, self.config.include_code_context)
    }

    fn enum_declaration(
        &mut self,
        name: String,
        src: HeaderSource<'_>,
        span: Span,
        body: Span,
        scope: &Scope,
        visibility: Option<Visibility>,
    ) -> Declaration {
        let qualified_name = scope.qualify(&[], &name);
        let children = if self.config.include_fields && self.depth_allows(scope) {
            self.enumerators(&qualified_name, body)
        } else {
            Vec::new()
        };

        let options = DeclarationOptions {
            qualified_name: Some(qualified_name),
            signature: Some(Signature::text_only(src.normalized_original())),
            visibility: scope.member_visibility(visibility),
            body_span: Some(body),
            children,
            ..Default::default()
        };
        self.base.create_declaration(
            span,
            name,
            DeclarationKind::Enum,
            options,
            self.config.include_code_context,
        )
    }

    fn enumerators(&self, enum_name: &str, body: Span) -> Vec<Declaration> {
        let inner = Span::new(body.start + 1, body.end - 1);
        let masked = self.base.masked_text(inner);
        let src = HeaderSource {
            masked: &masked,
            original: self.base.get_text(inner),
        };

        members::parse_enumerators(src)
            .into_iter()
            .map(|enumerator| {
                let span = Span::new(inner.start + enumerator.start, inner.start + enumerator.end);
                let options = DeclarationOptions {
                    qualified_name: Some(format!("{}::{}", enum_name, enumerator.name)),
                    signature: Some(Signature::text_only(enumerator.text)),
                    ..Default::default()
                };
                self.base.create_declaration(
                    span,
                    enumerator.name,
                    DeclarationKind::EnumMember,
                    options,
                    self.config.include_code_context,
                )
            })
            .collect()
    }
}
