// Data members and enumerators
//
// Fields come from `;`-terminated statements inside an aggregate body that did
// not classify as member functions. Enumerators come from the comma-separated
// body of an enum.

use once_cell::sync::Lazy;
use regex::Regex;

use super::headers::{template_prefix_end, HeaderSource};
use crate::extractors::base::normalize_whitespace;
use crate::language::Capabilities;

static FORWARD_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:struct|class|union|enum(?:\s+(?:class|struct))?)\s+[A-Za-z_]\w*(?:\s*:\s*[\w\s:]+)?$")
        .expect("valid forward declaration pattern")
});

static FUNCTION_POINTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*(?:[A-Za-z_]\w*\s*::\s*)*[*&^]\s*(?:const\s+)?([A-Za-z_]\w*)\s*\)")
        .expect("valid function pointer pattern")
});

static TRAILING_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_]\w*)\s*(?:\[[^\]]*\]\s*)*$").expect("valid trailing name pattern")
});

static LEADING_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)").expect("valid leading name pattern"));

/// Statements in a class body that never declare data members
const SKIPPED_LEADING_WORDS: &[&str] = &[
    "typedef", "using", "friend", "static_assert", "_Static_assert", "template", "namespace",
    "return", "public", "private", "protected",
];

/// Words that cannot name a field
const RESERVED: &[&str] = &[
    "int", "char", "short", "long", "float", "double", "void", "signed", "unsigned", "bool",
    "_Bool", "auto", "const", "volatile", "static", "mutable", "struct", "union", "enum", "class",
    "operator", "virtual", "inline", "register", "extern",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: String,
    /// The declarator as written, with its type
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub text: String,
    /// Offsets relative to the enum body
    pub start: usize,
    pub end: usize,
}

/// Fields declared by one member statement (without its `;`)
pub fn parse_fields(src: HeaderSource<'_>, caps: &Capabilities) -> Vec<Field> {
    let start = template_prefix_end(src.masked, caps);
    let masked = src.masked[start..].trim_end();
    let normalized = normalize_whitespace(masked);
    if normalized.is_empty() || FORWARD_TYPE.is_match(&normalized) {
        return Vec::new();
    }
    let first_word = normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or("");
    if SKIPPED_LEADING_WORDS.contains(&first_word) {
        return Vec::new();
    }

    let pieces = split_top_level(masked.as_bytes(), b',', true);
    let mut fields = Vec::new();
    let mut base_type: Option<String> = None;

    for (piece_start, piece_end) in pieces {
        let (a, b) = (start + piece_start, start + piece_end);
        let masked_piece = &src.masked[a..b];
        let original_piece = src.original.get(a..b).unwrap_or(masked_piece);
        let cut = declarator_end(masked_piece.as_bytes());
        let declarator = &masked_piece[..cut];

        let Some((name, name_start)) = declarator_name(declarator) else {
            // A declarator without a name ends the statement's field list
            break;
        };
        if RESERVED.contains(&name.as_str()) {
            break;
        }

        let text = normalize_whitespace(original_piece);
        match &base_type {
            None => {
                let type_end = declarator[..name_start]
                    .rfind('(')
                    .filter(|_| FUNCTION_POINTER.is_match(declarator))
                    .unwrap_or(name_start);
                let field_type = normalize_whitespace(&original_piece[..type_end.min(original_piece.len())]);
                if field_type.is_empty() || !field_type.chars().any(|c| c.is_alphabetic()) {
                    return Vec::new();
                }
                base_type = Some(
                    field_type
                        .trim_end_matches(['*', '&', ' '])
                        .to_string(),
                );
                fields.push(Field {
                    name,
                    field_type,
                    text,
                });
            }
            Some(base) => {
                let modifiers = normalize_whitespace(
                    &original_piece[..name_start.min(original_piece.len())],
                );
                let field_type = if modifiers.is_empty() {
                    base.clone()
                } else {
                    format!("{} {}", base, modifiers)
                };
                fields.push(Field {
                    name,
                    field_type,
                    text: format!("{} {}", base, text),
                });
            }
        }
    }

    fields
}

/// Name of a declarator and its offset. Function pointers name themselves
/// inside `(*name)`; everything else is the last identifier before any array
/// suffix.
fn declarator_name(declarator: &str) -> Option<(String, usize)> {
    if let Some(m) = FUNCTION_POINTER.captures(declarator).and_then(|c| c.get(1)) {
        return Some((m.as_str().to_string(), m.start()));
    }
    if declarator.contains('(') {
        return None;
    }
    let m = TRAILING_NAME.captures(declarator)?.get(1)?;
    Some((m.as_str().to_string(), m.start()))
}

/// Length of the declarator before an initializer or bit-field width
fn declarator_end(bytes: &[u8]) -> usize {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'<' => depth += 1,
            b')' | b']' | b'>' => depth = depth.saturating_sub(1),
            b'=' | b'{' if depth == 0 => return i,
            b':' if depth == 0 => {
                let scope = bytes.get(i + 1) == Some(&b':') || (i > 0 && bytes[i - 1] == b':');
                if !scope {
                    return i;
                }
            }
            _ => {}
        }
    }
    bytes.len()
}

/// Enumerators of an enum body (the text between the braces)
pub fn parse_enumerators(src: HeaderSource<'_>) -> Vec<Enumerator> {
    split_top_level(src.masked.as_bytes(), b',', false)
        .into_iter()
        .filter_map(|(start, end)| {
            let masked_piece = &src.masked[start..end];
            let name = LEADING_NAME.captures(masked_piece)?.get(1)?;
            let lead = name.start();
            let trailing = masked_piece.len() - masked_piece.trim_end().len();
            let (a, b) = (start + lead, end - trailing);
            let original = src.original.get(a..b).unwrap_or(&src.masked[a..b]);
            Some(Enumerator {
                name: name.as_str().to_string(),
                text: normalize_whitespace(original),
                start: a,
                end: b,
            })
        })
        .collect()
}

/// Ranges between top-level separators, ignoring separators nested in
/// parentheses, brackets or braces, and in template arguments when `angles`
fn split_top_level(bytes: &[u8], separator: u8, angles: bool) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'<' if angles => depth += 1,
            b'>' if angles && !(i > 0 && bytes[i - 1] == b'-') => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                ranges.push((start, i));
                start = i + 1;
            }
            _ => {}
        }
    }
    ranges.push((start, bytes.len()));
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageVariant;

    fn fields(text: &str) -> Vec<Field> {
        parse_fields(
            HeaderSource {
                masked: text,
                original: text,
            },
            &LanguageVariant::Cpp.capabilities(),
        )
    }

    fn names(fields: &[Field]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_simple_field() {
        let result = fields("int x");
        assert_eq!(names(&result), vec!["x"]);
        assert_eq!(result[0].field_type, "int");
        assert_eq!(result[0].text, "int x");
    }

    #[test]
    fn test_multiple_declarators_share_base_type() {
        let result = fields("double x, *y, z[3]");
        assert_eq!(names(&result), vec!["x", "y", "z"]);
        assert_eq!(result[1].text, "double *y");
        assert_eq!(result[1].field_type, "double *");
    }

    #[test]
    fn test_initializers_and_bitfields() {
        assert_eq!(names(&fields("unsigned flags : 3")), vec!["flags"]);
        assert_eq!(names(&fields("int count = 0")), vec!["count"]);
        assert_eq!(names(&fields("std::vector<int> items{}")), vec!["items"]);
        assert_eq!(fields("std::map<int, int> table")[0].field_type, "std::map<int, int>");
    }

    #[test]
    fn test_function_pointer_field() {
        let result = fields("int (*compare)(const void *, const void *)");
        assert_eq!(names(&result), vec!["compare"]);
        assert_eq!(result[0].field_type, "int");
    }

    #[test]
    fn test_non_fields_are_skipped() {
        assert!(fields("friend class Builder").is_empty());
        assert!(fields("using Base::Base").is_empty());
        assert!(fields("struct Node").is_empty());
        assert!(fields("typedef int id_t").is_empty());
        assert!(fields("FOO").is_empty());
    }

    #[test]
    fn test_enumerators() {
        let body = "\n  RED = 1,\n  GREEN,\n  BLUE = (RED | 4),\n";
        let result = parse_enumerators(HeaderSource {
            masked: body,
            original: body,
        });
        let names: Vec<&str> = result.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN", "BLUE"]);
        assert_eq!(result[0].text, "RED = 1");
        assert_eq!(&body[result[1].start..result[1].end], "GREEN");
    }
}
