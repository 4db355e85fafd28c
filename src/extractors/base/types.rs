// Base Extractor Types for declscan
//
// All data structures produced by the structural extractor: declarations,
// their spans and signatures, and the flattened record view.

use serde::{Deserialize, Serialize};

/// Configuration for code context rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Number of lines to show before the declaration
    pub lines_before: usize,
    /// Number of lines to show after the declaration
    pub lines_after: usize,
    /// Maximum line length to display (longer lines get truncated)
    pub max_line_length: usize,
    /// Whether to show line numbers in context
    pub show_line_numbers: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            lines_before: 3,
            lines_after: 3,
            max_line_length: 120,
            show_line_numbers: true,
        }
    }
}

/// Half-open byte range `[start, end)` into the original source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice the text this span was taken from
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// Declaration kinds
///
/// `Function`, `Struct`, `Class` and `Namespace` are the structural units; the
/// remaining kinds refine them (members of aggregates, enumerations, fields).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Function,
    Struct,
    Class,
    Namespace,
    Method,
    Constructor,
    Destructor,
    Union,
    Enum,
    #[serde(rename = "enum_member")]
    EnumMember,
    Field,
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclarationKind::Function => write!(f, "function"),
            DeclarationKind::Struct => write!(f, "struct"),
            DeclarationKind::Class => write!(f, "class"),
            DeclarationKind::Namespace => write!(f, "namespace"),
            DeclarationKind::Method => write!(f, "method"),
            DeclarationKind::Constructor => write!(f, "constructor"),
            DeclarationKind::Destructor => write!(f, "destructor"),
            DeclarationKind::Union => write!(f, "union"),
            DeclarationKind::Enum => write!(f, "enum"),
            DeclarationKind::EnumMember => write!(f, "enum_member"),
            DeclarationKind::Field => write!(f, "field"),
        }
    }
}

/// Member visibility inside a class, struct or union
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

impl Visibility {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            _ => None,
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
            Visibility::Protected => write!(f, "protected"),
        }
    }
}

/// Header text of a declaration, split into its parts where they exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Whitespace-normalized header, e.g. `int add(int a, int b)`
    pub text: String,
    /// Return type for functions, declared type for fields
    pub return_type: Option<String>,
    /// One entry per parameter, as written
    pub parameters: Vec<String>,
}

impl Signature {
    pub fn text_only(text: String) -> Self {
        Self {
            text,
            return_type: None,
            parameters: Vec::new(),
        }
    }
}

/// A recognized structural unit and everything nested inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Unique identifier (MD5 of file path, name and header position)
    pub id: String,
    pub kind: DeclarationKind,
    pub name: String,
    /// Scope path joined with `::`
    pub qualified_name: String,
    pub signature: Option<Signature>,
    /// Raw text of the comment block immediately preceding the header
    pub doc_comment: Option<String>,
    pub visibility: Option<Visibility>,
    /// Whole declaration, header through closing brace or semicolon
    pub span: Span,
    /// `{` through the matching `}`; `None` for forward declarations and fields
    pub body_span: Option<Span>,
    /// 1-based
    pub start_line: u32,
    /// 1-based
    pub end_line: u32,
    /// Cyclomatic complexity of function bodies
    pub complexity: Option<u32>,
    pub code_context: Option<String>,
    pub children: Vec<Declaration>,
}

impl Declaration {
    /// Direct child by exact name
    pub fn find_child(&self, name: &str) -> Option<&Declaration> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Pre-order walk over this declaration and all descendants
    pub fn walk(&self) -> Vec<&Declaration> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    /// Body text, byte-for-byte, when the declaration has one
    pub fn body_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        self.body_span.map(|span| span.slice(source))
    }
}

/// One declaration in the flattened list-of-records representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    pub id: String,
    pub kind: DeclarationKind,
    pub name: String,
    pub qualified_name: String,
    pub signature: Option<String>,
    pub doc_comment: Option<String>,
    pub visibility: Option<Visibility>,
    pub start_byte: usize,
    pub end_byte: usize,
    pub body_start: Option<usize>,
    pub body_end: Option<usize>,
    pub start_line: u32,
    pub end_line: u32,
    pub complexity: Option<u32>,
    pub parent_id: Option<String>,
    pub depth: u32,
}

impl DeclarationRecord {
    fn from_declaration(decl: &Declaration, parent_id: Option<&str>, depth: u32) -> Self {
        Self {
            id: decl.id.clone(),
            kind: decl.kind,
            name: decl.name.clone(),
            qualified_name: decl.qualified_name.clone(),
            signature: decl.signature.as_ref().map(|s| s.text.clone()),
            doc_comment: decl.doc_comment.clone(),
            visibility: decl.visibility,
            start_byte: decl.span.start,
            end_byte: decl.span.end,
            body_start: decl.body_span.map(|s| s.start),
            body_end: decl.body_span.map(|s| s.end),
            start_line: decl.start_line,
            end_line: decl.end_line,
            complexity: decl.complexity,
            parent_id: parent_id.map(|s| s.to_string()),
            depth,
        }
    }
}

/// Flatten a declaration tree into pre-order records linked by `parent_id`
pub fn flatten_declarations(declarations: &[Declaration]) -> Vec<DeclarationRecord> {
    fn visit(
        decl: &Declaration,
        parent_id: Option<&str>,
        depth: u32,
        out: &mut Vec<DeclarationRecord>,
    ) {
        out.push(DeclarationRecord::from_declaration(decl, parent_id, depth));
        for child in &decl.children {
            visit(child, Some(&decl.id), depth + 1, out);
        }
    }

    let mut records = Vec::new();
    for decl in declarations {
        visit(decl, None, 0, &mut records);
    }
    records
}

/// Extraction results for one source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResults {
    pub language: String,
    pub file_path: String,
    /// blake3 hex digest of the source text
    pub content_hash: String,
    pub declarations: Vec<Declaration>,
}

impl ExtractionResults {
    pub fn flatten(&self) -> Vec<DeclarationRecord> {
        flatten_declarations(&self.declarations)
    }

    /// Look up a declaration anywhere in the tree by qualified name
    pub fn find(&self, qualified_name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .flat_map(|d| d.walk())
            .find(|d| d.qualified_name == qualified_name)
    }

    /// Total number of declarations including nested ones
    pub fn total_count(&self) -> usize {
        self.declarations.iter().map(|d| d.walk().len()).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn records_to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.flatten())
    }
}
