// Lexical masking pass
//
// Produces a copy of the source in which comments, string/char literals and
// preprocessor directives are blanked with spaces. Byte offsets and newlines are
// preserved so every later pass can work on the masked bytes and slice the
// original text with the same offsets.

use super::errors::ParseError;
use super::types::Span;

/// A comment found during masking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
    /// `/* ... */` as opposed to `// ...`
    pub is_block: bool,
    /// Only whitespace precedes the comment on its first line
    pub standalone: bool,
}

#[derive(Debug, Clone)]
pub struct MaskedSource {
    pub masked: Vec<u8>,
    pub comments: Vec<Comment>,
}

/// Mask comments, literals and directives in one forward pass.
///
/// Fails only on a block comment that never closes.
pub fn mask_source(source: &str) -> Result<MaskedSource, ParseError> {
    let bytes = source.as_bytes();
    let mut masked = bytes.to_vec();
    let mut comments = Vec::new();
    let len = bytes.len();
    let mut i = 0;
    // True until a non-whitespace byte is seen on the current line
    let mut at_line_start = true;

    while i < len {
        let b = bytes[i];
        match b {
            b'\n' => {
                at_line_start = true;
                i += 1;
            }
            b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                let start = i;
                let close = find_block_end(bytes, i + 2)
                    .ok_or_else(|| ParseError::unterminated_comment(start))?;
                blank(&mut masked, start, close);
                comments.push(Comment {
                    span: Span::new(start, close),
                    is_block: true,
                    standalone: at_line_start,
                });
                i = close;
            }
            b'/' if i + 1 < len && bytes[i + 1] == b'/' => {
                let start = i;
                let end = line_end(bytes, i);
                blank(&mut masked, start, end);
                comments.push(Comment {
                    span: Span::new(start, end),
                    is_block: false,
                    standalone: at_line_start,
                });
                i = end;
            }
            b'#' if at_line_start => {
                let end = directive_end(bytes, i);
                blank(&mut masked, i, end);
                i = end;
            }
            b'\'' if is_digit_separator(bytes, i) => {
                at_line_start = false;
                i += 1;
            }
            b'"' if is_raw_string_prefix(bytes, i) => {
                match raw_string_end(bytes, i) {
                    Some(end) => {
                        blank(&mut masked, i + 1, end - 1);
                        i = end;
                    }
                    None => {
                        let (end, _) = literal_end(bytes, i);
                        blank(&mut masked, i + 1, end);
                        i = end;
                    }
                }
                at_line_start = false;
            }
            b'"' | b'\'' => {
                let (end, closed) = literal_end(bytes, i);
                // Keep the quotes so `extern "C"` still reads as a literal
                let interior_end = if closed { end - 1 } else { end };
                if interior_end > i + 1 {
                    blank(&mut masked, i + 1, interior_end);
                }
                at_line_start = false;
                i = end;
            }
            b' ' | b'\t' | b'\r' | 0x0b | 0x0c => i += 1,
            _ => {
                at_line_start = false;
                i += 1;
            }
        }
    }

    Ok(MaskedSource { masked, comments })
}

/// Offset just past the closing `*/`
fn find_block_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j + 1 < bytes.len() {
        if bytes[j] == b'*' && bytes[j + 1] == b'/' {
            return Some(j + 2);
        }
        j += 1;
    }
    None
}

/// Offset of the newline ending this line (or end of input), honoring `\` splices
fn line_end(bytes: &[u8], from: usize) -> usize {
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'\n' {
            let spliced = j > 0 && bytes[j - 1] == b'\\'
                || j > 1 && bytes[j - 1] == b'\r' && bytes[j - 2] == b'\\';
            if !spliced {
                return j;
            }
        }
        j += 1;
    }
    bytes.len()
}

/// Preprocessor directives run to end of line; block comments inside them may
/// span lines and are skipped as a unit.
fn directive_end(bytes: &[u8], from: usize) -> usize {
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'\n' => {
                let spliced = j > 0 && bytes[j - 1] == b'\\'
                    || j > 1 && bytes[j - 1] == b'\r' && bytes[j - 2] == b'\\';
                if !spliced {
                    return j;
                }
            }
            b'/' if j + 1 < bytes.len() && bytes[j + 1] == b'*' => {
                if let Some(close) = find_block_end(bytes, j + 2) {
                    j = close;
                    continue;
                }
                return bytes.len();
            }
            _ => {}
        }
        j += 1;
    }
    bytes.len()
}

/// Offset just past the closing quote, and whether the quote was found. An
/// unterminated literal stops at the end of its line.
fn literal_end(bytes: &[u8], from: usize) -> (usize, bool) {
    let quote = bytes[from];
    let mut j = from + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return (j, false),
            c if c == quote => return (j + 1, true),
            _ => j += 1,
        }
    }
    (bytes.len(), false)
}

/// `'` between two digits of a numeric literal (`1'000`, `0xFF'FF`)
fn is_digit_separator(bytes: &[u8], quote: usize) -> bool {
    let prev_is_digit = quote > 0 && bytes[quote - 1].is_ascii_hexdigit();
    let next_is_digit = bytes.get(quote + 1).is_some_and(u8::is_ascii_hexdigit);
    if !prev_is_digit || !next_is_digit {
        return false;
    }
    // The token holding the quote must start with a digit, so `u8'a'` stays a literal
    let mut start = quote;
    while start > 0 {
        let b = bytes[start - 1];
        if b.is_ascii_alphanumeric() || b == b'\'' || b == b'.' || b == b'_' {
            start -= 1;
        } else {
            break;
        }
    }
    bytes[start].is_ascii_digit()
}

/// `R"`, `LR"`, `uR"`, `UR"` or `u8R"` opening a raw string at `quote`
fn is_raw_string_prefix(bytes: &[u8], quote: usize) -> bool {
    let mut start = quote;
    while start > 0 && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'_') {
        start -= 1;
    }
    matches!(&bytes[start..quote], b"R" | b"LR" | b"uR" | b"UR" | b"u8R")
}

/// Offset just past the closing `)delim"` of a raw string, or `None` when the
/// delimiter is malformed or never closed
fn raw_string_end(bytes: &[u8], quote: usize) -> Option<usize> {
    let open = quote + 1 + bytes[quote + 1..].iter().take(17).position(|&b| b == b'(')?;
    let delimiter = &bytes[quote + 1..open];
    if delimiter
        .iter()
        .any(|&b| b.is_ascii_whitespace() || matches!(b, b')' | b'\\' | b'"'))
    {
        return None;
    }

    let mut j = open + 1;
    while j < bytes.len() {
        if bytes[j] == b')'
            && bytes[j + 1..].starts_with(delimiter)
            && bytes.get(j + 1 + delimiter.len()) == Some(&b'"')
        {
            return Some(j + delimiter.len() + 2);
        }
        j += 1;
    }
    None
}

/// Replace everything but newlines with spaces
fn blank(masked: &mut [u8], start: usize, end: usize) {
    let end = end.min(masked.len());
    for b in &mut masked[start..end] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masked_str(source: &str) -> String {
        String::from_utf8(mask_source(source).unwrap().masked).unwrap()
    }

    #[test]
    fn test_masking_preserves_offsets() {
        let source = "int a; /* { */\nchar *s = \"}\";\n";
        let masked = masked_str(source);
        assert_eq!(masked.len(), source.len());
        assert!(!masked.contains('{'));
        assert!(!masked.contains('}'));
        assert_eq!(masked.matches('\n').count(), 2);
    }

    #[test]
    fn test_comments_are_collected_with_standalone_flag() {
        let source = "/** doc */\nint a; // trailing\n// own line\n";
        let result = mask_source(source).unwrap();
        assert_eq!(result.comments.len(), 3);
        assert!(result.comments[0].is_block);
        assert!(result.comments[0].standalone);
        assert!(!result.comments[1].standalone);
        assert!(result.comments[2].standalone);
        assert_eq!(result.comments[1].span.slice(source), "// trailing");
    }

    #[test]
    fn test_directives_are_masked_with_continuations() {
        let source = "#define OPEN {\\\n  x\nint b;\n";
        let masked = masked_str(source);
        assert!(!masked.contains('{'));
        assert!(masked.contains("int b;"));
    }

    #[test]
    fn test_unterminated_comment_reports_start() {
        let err = mask_source("int a;\n/* never closed").unwrap_err();
        assert_eq!(err.offset(), Some(7));
    }

    #[test]
    fn test_raw_strings_are_masked() {
        let source = "const char *s = R\"(\" { \")\";\nint f() { return 0; }\n";
        let masked = masked_str(source);
        assert_eq!(masked.len(), source.len());
        assert_eq!(masked.matches('{').count(), 1);
        assert!(masked.contains("int f() {"));

        let source = "auto j = u8R\"json({\n  \"a\": \")\"\n})json\";\nint g;\n";
        let masked = masked_str(source);
        assert!(!masked.contains('{'));
        assert!(!masked.contains('}'));
        assert_eq!(masked.matches('\n').count(), 4);
        assert!(masked.ends_with("int g;\n"));
    }

    #[test]
    fn test_raw_prefix_needs_whole_word() {
        // `BAR"` is an identifier followed by an ordinary string
        let masked = masked_str("x = BAR\"(}\";");
        assert!(!masked.contains('}'));
        assert!(masked.ends_with("\";"));
    }

    #[test]
    fn test_digit_separators_are_not_char_literals() {
        let source = "long big = 1'000'000; int mask = 0xFF'FF;\nint f() { return 0; }\n";
        let masked = masked_str(source);
        assert_eq!(masked, source);

        let masked = masked_str("char c = u8'{';");
        assert!(!masked.contains('{'));
    }

    #[test]
    fn test_escaped_quotes_inside_literals() {
        let masked = masked_str("char c = '\\''; const char *s = \"a\\\"{\";");
        assert!(!masked.contains('{'));
        assert!(masked.ends_with(';'));
    }
}
