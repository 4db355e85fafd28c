//! Header classification
//!
//! A header is the text between the end of the previous statement and either a
//! `{` (block header) or a `;` (statement). Classification runs on the masked
//! header so comments and literals never look like syntax; text that ends up in
//! output is sliced from the original header with the same offsets.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::{normalize_whitespace, DeclarationKind};
use crate::language::Capabilities;

static AGGREGATE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:static|extern|const|volatile|inline)\s+)*(typedef\s+)?(?:(?:static|const|volatile)\s+)*(struct|class|union)\b(?:\s*(?:\[\[[^\]]*\]\]|__attribute__\s*\(\([^)]*\)\)|alignas\s*\([^)]*\)|__declspec\s*\([^)]*\)))*\s*([A-Za-z_]\w*(?:\s*::\s*[A-Za-z_]\w*)*)?\s*(?:<[^{;]*>)?(?:\s+final)?\s*(?::\s*([^{;]+))?$",
    )
    .expect("valid aggregate header pattern")
});

static ENUM_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:static|extern)\s+)*(typedef\s+)?enum(?:\s+(?:class|struct))?(?:\s+([A-Za-z_]\w*))?\s*(?::\s*[\w\s:]+)?$",
    )
    .expect("valid enum header pattern")
});

static NAMESPACE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:inline\s+)?namespace(?:\s+([A-Za-z_]\w*(?:\s*::\s*(?:inline\s+)?[A-Za-z_]\w*)*))?$",
    )
    .expect("valid namespace header pattern")
});

static LINKAGE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^extern\s*"[^"]*"$"#).expect("valid linkage header pattern"));

/// Qualified function name directly before the parameter list
static FUNCTION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"((?:[A-Za-z_]\w*\s*(?:<[^<>()]*>\s*)?::\s*)*~?\s*[A-Za-z_]\w*)\s*(?:<[^<>()]*>)?\s*$",
    )
    .expect("valid function name pattern")
});

static OPERATOR_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\boperator\b").expect("valid operator pattern"));

static QUALIFIER_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((?:[A-Za-z_]\w*\s*(?:<[^<>()]*>\s*)?::\s*)*)$").expect("valid qualifier pattern")
});

static DECL_ATTRIBUTES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"__attribute__\s*\(\(.*?\)\)|__declspec\s*\([^)]*\)|\[\[[^\]]*\]\]")
        .expect("valid attribute pattern")
});

/// Names that can precede `(` without being a function
const NON_FUNCTION_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "sizeof", "do", "else", "case", "goto",
    "typeof", "alignof", "alignas", "decltype", "static_assert", "_Static_assert", "new",
    "delete", "throw", "defined", "__attribute__", "__declspec", "asm", "__asm__", "void", "int",
    "char", "short", "long", "float", "double", "signed", "unsigned", "bool", "_Bool", "auto",
    "const", "volatile", "static", "extern", "register", "inline", "struct", "union", "enum",
    "class", "namespace", "typedef", "using", "template", "typename", "noexcept",
];

/// Parenthesized attributes skipped while looking for the parameter list
const ATTRIBUTE_NAMES: &[&str] = &["__attribute__", "__declspec", "alignas", "_Alignas"];

/// Words that never appear in a return type
const FORBIDDEN_TYPE_WORDS: &[&str] = &[
    "return", "else", "case", "goto", "throw", "new", "delete", "typedef", "using", "if",
    "while", "for", "switch", "do", "co_return", "co_yield", "co_await",
];

/// Specifiers dropped from the reported return type
const SPECIFIERS: &[&str] = &[
    "static", "inline", "extern", "virtual", "explicit", "constexpr", "consteval", "friend",
    "__inline", "__inline__", "_Noreturn", "__forceinline",
];

/// Masked header text paired with the original text at the same offsets
#[derive(Debug, Clone, Copy)]
pub struct HeaderSource<'a> {
    pub masked: &'a str,
    pub original: &'a str,
}

impl<'a> HeaderSource<'a> {
    /// Original text for a range of the header, falling back to the masked text
    fn original_slice(&self, start: usize, end: usize) -> &'a str {
        self.original
            .get(start..end)
            .or_else(|| self.masked.get(start..end))
            .unwrap_or("")
    }

    pub fn normalized_original(&self) -> String {
        normalize_whitespace(self.original)
    }
}

/// Where a header appears
#[derive(Debug, Clone, Copy)]
pub struct HeaderContext<'a> {
    /// Name of the directly enclosing class/struct/union, if any
    pub enclosing_aggregate: Option<&'a str>,
    /// Header ends at `{` rather than `;`
    pub is_block: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHeader {
    /// Last name segment: `magnitude`, `~Vector`, `operator+`
    pub name: String,
    /// Leading segments of a qualified name, template arguments removed
    pub qualifier: Vec<String>,
    pub return_type: Option<String>,
    pub parameters: Vec<String>,
    pub has_init_list: bool,
}

impl FunctionHeader {
    pub fn is_destructor(&self) -> bool {
        self.name.starts_with('~')
    }

    /// Constructor inside its class, or `A::A` out of line
    pub fn is_constructor(&self, enclosing: Option<&str>) -> bool {
        if self.return_type.is_some() || self.is_destructor() {
            return false;
        }
        enclosing == Some(self.name.as_str())
            || self.qualifier.last().map(String::as_str) == Some(self.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Function(FunctionHeader),
    Aggregate {
        kind: DeclarationKind,
        name: Option<String>,
        typedef: bool,
    },
    Enum {
        name: Option<String>,
        typedef: bool,
    },
    Namespace {
        name: Option<String>,
    },
    /// `extern "C"`: children belong to the enclosing scope
    Linkage,
}

/// Classify the header of a brace block
pub fn classify_block(src: HeaderSource<'_>, caps: &Capabilities, ctx: HeaderContext<'_>) -> Option<Header> {
    let start = template_prefix_end(src.masked, caps);
    let body = src.masked[start..].trim();
    if body.is_empty() {
        return None;
    }
    let normalized = normalize_whitespace(body);

    if caps.linkage_blocks && LINKAGE_HEADER.is_match(&normalized) {
        return Some(Header::Linkage);
    }

    if caps.namespaces {
        if let Some(caps_match) = NAMESPACE_HEADER.captures(&normalized) {
            let name = caps_match.get(1).map(|m| compact_qualified(m.as_str()));
            return Some(Header::Namespace { name });
        }
    }

    if let Some(function) = parse_function(src, start, caps, ctx) {
        return Some(Header::Function(function));
    }

    classify_type(&normalized, caps)
}

/// Classify a `;`-terminated statement. Only function prototypes qualify;
/// forward-declared types and variables are not declarations here.
pub fn classify_statement(
    src: HeaderSource<'_>,
    caps: &Capabilities,
    ctx: HeaderContext<'_>,
) -> Option<Header> {
    let start = template_prefix_end(src.masked, caps);
    let function = parse_function(src, start, caps, ctx)?;
    let value_argument = function.parameters.iter().any(|p| {
        p.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '"' | '\'' | '-' | '&' | '!'))
    });
    if value_argument {
        return None;
    }
    Some(Header::Function(function))
}

/// Type-defining headers: struct/class/union and enum
fn classify_type(normalized: &str, caps: &Capabilities) -> Option<Header> {
    if let Some(m) = AGGREGATE_HEADER.captures(normalized) {
        let kind = match m.get(2).map(|k| k.as_str()) {
            Some("class") if caps.classes => DeclarationKind::Class,
            Some("class") => return None,
            Some("union") => DeclarationKind::Union,
            _ => DeclarationKind::Struct,
        };
        if m.get(4).is_some() && !caps.classes {
            return None;
        }
        return Some(Header::Aggregate {
            kind,
            name: m.get(3).map(|n| compact_qualified(n.as_str())),
            typedef: m.get(1).is_some(),
        });
    }

    if let Some(m) = ENUM_HEADER.captures(normalized) {
        return Some(Header::Enum {
            name: m.get(2).map(|n| n.as_str().to_string()),
            typedef: m.get(1).is_some(),
        });
    }

    None
}

/// Offset where the header continues after any `template <...>` prefixes and
/// leading `[[...]]` attributes
pub fn template_prefix_end(masked: &str, caps: &Capabilities) -> usize {
    let bytes = masked.as_bytes();
    let mut pos = 0;
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let rest = &masked[pos..];
        if rest.starts_with("[[") {
            match rest.find("]]") {
                Some(close) => {
                    pos += close + 2;
                    continue;
                }
                None => return pos,
            }
        }
        if !caps.templates || !rest.starts_with("template") {
            return pos;
        }
        let after_keyword = pos + "template".len();
        let mut i = after_keyword;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'<' {
            return pos;
        }
        match matching_angle(bytes, i) {
            Some(close) => pos = close + 1,
            None => return pos,
        }
    }
}

/// Index of the `>` closing the `<` at `open`, ignoring `->` and parenthesized text
fn matching_angle(bytes: &[u8], open: usize) -> Option<usize> {
    let mut angle = 0usize;
    let mut paren = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => paren += 1,
            b')' => paren = paren.saturating_sub(1),
            b'<' if paren == 0 => angle += 1,
            b'>' if paren == 0 && !(i > 0 && bytes[i - 1] == b'-') => {
                angle -= 1;
                if angle == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse `return-type name(params) tail` starting at `start`
fn parse_function(
    src: HeaderSource<'_>,
    start: usize,
    caps: &Capabilities,
    ctx: HeaderContext<'_>,
) -> Option<FunctionHeader> {
    let masked = src.masked;
    let (name_start, name_text, open) = locate_name(masked, start, caps)?;
    let close = matching_paren(masked.as_bytes(), open)?;

    let mut segments: Vec<String> = name_text.split("::").map(compact_segment).collect();
    let name = segments.pop()?;
    if name.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    if !segments.is_empty() && !caps.qualified_names {
        return None;
    }
    let bare = name.trim_start_matches('~');
    if !name.starts_with("operator") && NON_FUNCTION_NAMES.contains(&bare) {
        return None;
    }

    let prefix_masked = &masked[start..name_start];
    let prefix_clean = DECL_ATTRIBUTES.replace_all(prefix_masked, " ");
    if !is_plausible_type(&prefix_clean) {
        return None;
    }
    let prefix_words: Vec<&str> = prefix_clean.split_whitespace().collect();
    if prefix_words
        .iter()
        .any(|w| FORBIDDEN_TYPE_WORDS.contains(w))
    {
        return None;
    }
    let mut return_type = {
        let original = src.original_slice(start, name_start);
        let original = DECL_ATTRIBUTES.replace_all(original, " ");
        let kept: Vec<&str> = original
            .split_whitespace()
            .skip_while(|w| SPECIFIERS.contains(w))
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(kept.join(" "))
        }
    };

    let tail = parse_tail(&masked[close + 1..], caps, ctx.is_block)?;
    if return_type.is_none() {
        if let Some(trailing) = tail.trailing_return_range {
            let (a, b) = (close + 1 + trailing.0, close + 1 + trailing.1);
            return_type = Some(normalize_whitespace(src.original_slice(a, b)));
        }
    }

    let header = FunctionHeader {
        parameters: split_parameters(src, open + 1, close),
        has_init_list: tail.init_list,
        name,
        qualifier: segments,
        return_type,
    };

    if header.return_type.is_none() {
        let special = caps.special_members
            && (header.is_destructor()
                || header.is_constructor(ctx.enclosing_aggregate)
                || header.name.starts_with("operator"));
        if !special {
            return None;
        }
    } else if header.has_init_list {
        return None;
    }

    Some(header)
}

/// Find the function name and the `(` opening its parameter list
fn locate_name<'a>(
    masked: &'a str,
    start: usize,
    caps: &Capabilities,
) -> Option<(usize, &'a str, usize)> {
    let text = &masked[start..];

    if caps.operator_overloads {
        if let Some(m) = OPERATOR_KEYWORD.find(text) {
            let after = m.end();
            let rest = &text[after..];
            let trimmed = rest.trim_start();
            let symbol_start = after + (rest.len() - trimmed.len());
            // `operator()` carries its own parentheses
            let search_from = if trimmed.starts_with('(') {
                let inner_close = matching_paren(text.as_bytes(), symbol_start)?;
                inner_close + 1
            } else {
                symbol_start
            };
            let open = search_from + text[search_from..].find('(')?;
            let qualifier = QUALIFIER_CHAIN
                .captures(&text[..m.start()])
                .and_then(|c| c.get(1))
                .map(|q| q.start())
                .unwrap_or(m.start());
            return Some((start + qualifier, text[qualifier..open].trim_end(), start + open));
        }
    }

    let mut from = 0;
    loop {
        let open = from + first_paren_outside_angles(&text[from..])?;
        let m = FUNCTION_NAME.captures(&text[from..open])?.get(1)?;
        if ATTRIBUTE_NAMES.contains(&m.as_str().trim()) {
            from = matching_paren(text.as_bytes(), open)? + 1;
            continue;
        }
        return Some((start + from + m.start(), m.as_str(), start + open));
    }
}

/// `Foo < T >` -> `Foo`, `~ Vector` -> `~Vector`, `operator  bool` -> `operator bool`
fn compact_segment(segment: &str) -> String {
    let segment = segment.trim();
    if let Some(symbol) = segment.strip_prefix("operator") {
        let symbol = symbol.trim();
        return if symbol.starts_with(|c: char| c.is_alphabetic() || c == '_') {
            format!("operator {}", normalize_whitespace(symbol))
        } else {
            format!("operator{}", symbol.replace(char::is_whitespace, ""))
        };
    }
    let without_args = match segment.find('<') {
        Some(idx) => &segment[..idx],
        None => segment,
    };
    without_args.replace(char::is_whitespace, "")
}

fn first_paren_outside_angles(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut angle = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => angle += 1,
            b'>' if !(i > 0 && bytes[i - 1] == b'-') => angle = angle.saturating_sub(1),
            b'(' if angle == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

pub(crate) fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `a :: b` -> `a::b`
fn compact_qualified(name: &str) -> String {
    name.split("::")
        .map(|s| s.trim().trim_start_matches("inline ").trim())
        .collect::<Vec<_>>()
        .join("::")
}

/// Only identifier characters, whitespace, pointer/reference marks, scope
/// separators, template brackets and array brackets; commas only inside `<>`
fn is_plausible_type(text: &str) -> bool {
    let mut angle = 0usize;
    for c in text.chars() {
        match c {
            '<' => angle += 1,
            '>' => angle = angle.saturating_sub(1),
            ',' if angle == 0 => return false,
            c if c.is_alphanumeric() || c.is_whitespace() => {}
            '_' | '*' | '&' | ':' | ',' | '[' | ']' => {}
            _ => return false,
        }
    }
    true
}

#[derive(Debug, Default)]
struct Tail {
    init_list: bool,
    /// Range of a `-> type` relative to the tail start
    trailing_return_range: Option<(usize, usize)>,
}

/// Accept what may follow the parameter list, reject anything else
fn parse_tail(tail: &str, caps: &Capabilities, is_block: bool) -> Option<Tail> {
    const QUALIFIER_WORDS: &[&str] = &["const", "volatile", "override", "final", "mutable"];
    let mut result = Tail::default();
    let bytes = tail.as_bytes();
    let mut pos = 0;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let rest = &tail[pos..];
        if rest.is_empty() {
            return Some(result);
        }

        if let Some(word) = leading_word(rest) {
            if caps.classes && QUALIFIER_WORDS.contains(&word) {
                pos += word.len();
                continue;
            }
            if word == "noexcept" || word == "throw" || word == "__attribute__" {
                pos += word.len();
                let after = &tail[pos..];
                let trimmed = after.trim_start();
                if trimmed.starts_with('(') {
                    let open = pos + (after.len() - trimmed.len());
                    pos = matching_paren(bytes, open)? + 1;
                }
                continue;
            }
            return None;
        }

        if caps.classes && rest.starts_with("->") {
            let type_start = pos + 2;
            let type_end = tail[type_start..]
                .find(['=', ':', '{'])
                .map(|i| type_start + i)
                .unwrap_or(tail.len());
            result.trailing_return_range = Some((type_start, type_end));
            pos = type_end;
            continue;
        }
        if caps.classes && (rest.starts_with("&&") || rest.starts_with('&')) {
            pos += if rest.starts_with("&&") { 2 } else { 1 };
            continue;
        }
        if caps.special_members && is_block && rest.starts_with(':') && !rest.starts_with("::") {
            result.init_list = true;
            return Some(result);
        }
        if !is_block && rest.starts_with('=') {
            let value = rest[1..].trim();
            return if value == "0" || (caps.classes && (value == "default" || value == "delete")) {
                Some(result)
            } else {
                None
            };
        }
        return None;
    }
}

fn leading_word(text: &str) -> Option<&str> {
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    if end == 0 {
        None
    } else {
        Some(&text[..end])
    }
}

/// Split the parameter list on top-level commas; `(void)` is empty
fn split_parameters(src: HeaderSource<'_>, start: usize, end: usize) -> Vec<String> {
    let bytes = src.masked.as_bytes();
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut piece_start = start;

    for i in start..end {
        match bytes[i] {
            b'(' | b'[' | b'<' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'>' if !(i > 0 && bytes[i - 1] == b'-') => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                params.push(normalize_whitespace(src.original_slice(piece_start, i)));
                piece_start = i + 1;
            }
            _ => {}
        }
    }
    params.push(normalize_whitespace(src.original_slice(piece_start, end)));

    params.retain(|p| !p.is_empty());
    if params.len() == 1 && params[0] == "void" {
        params.clear();
    }
    params
}
