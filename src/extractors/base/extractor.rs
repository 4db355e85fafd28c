// BaseExtractor implementation for declscan
//
// Owns the source text together with its masked copy, comment list, brace map
// and line index. Language extractors borrow it for every lookup.

use std::borrow::Cow;

use super::braces::BraceMap;
use super::errors::ParseError;
use super::lexical::{mask_source, Comment};
use super::types::{ContextConfig, Span};
use crate::language::LanguageVariant;

/// Base implementation for language extractors
pub struct BaseExtractor {
    pub variant: LanguageVariant,
    pub file_path: String,
    pub content: String,
    pub masked: Vec<u8>,
    pub comments: Vec<Comment>,
    pub braces: BraceMap,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
    pub context_config: ContextConfig,
}

impl BaseExtractor {
    /// Run the lexical and brace passes. Either can fail, and nothing is
    /// extracted from input that does.
    pub fn new(
        variant: LanguageVariant,
        file_path: String,
        content: String,
    ) -> Result<Self, ParseError> {
        let masked = mask_source(&content)?;
        let braces = BraceMap::build(&masked.masked)?;

        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );

        Ok(Self {
            variant,
            file_path,
            content,
            masked: masked.masked,
            comments: masked.comments,
            braces,
            line_starts,
            context_config: ContextConfig::default(),
        })
    }

    /// Original text for a span
    pub fn get_text(&self, span: Span) -> &str {
        span.slice(&self.content)
    }

    /// Masked text for a span: comments, literals and directives are blank
    pub fn masked_text(&self, span: Span) -> Cow<'_, str> {
        let end = span.end.min(self.masked.len());
        let start = span.start.min(end);
        String::from_utf8_lossy(&self.masked[start..end])
    }

    /// First non-whitespace offset in the masked text at or after `from`
    pub fn skip_whitespace(&self, from: usize, limit: usize) -> usize {
        let mut i = from;
        while i < limit && self.masked[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    /// Offset after the last non-whitespace byte of the masked text in `[from, to)`
    pub fn trim_end(&self, from: usize, to: usize) -> usize {
        let mut end = to;
        while end > from && self.masked[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        end
    }

    /// 0-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// 0-based column of `offset` in bytes
    pub fn column_of(&self, offset: usize) -> usize {
        offset - self.line_starts[self.line_of(offset)]
    }

    /// Generate ID for a declaration (MD5 hash)
    pub fn generate_id(&self, name: &str, line: u32, column: u32) -> String {
        let input = format!("{}:{}:{}:{}", self.file_path, name, line, column);
        let digest = md5::compute(input.as_bytes());
        format!("{:x}", digest)
    }

    /// Find the documentation comment for a header starting at `header_start`.
    ///
    /// The nearest comment must end on the line directly above the header with
    /// only whitespace in between. Earlier comments join the block while each
    /// one ends on the line directly above the next. Comments that share a line
    /// with code never qualify.
    pub fn find_doc_comment(&self, header_start: usize) -> Option<String> {
        let header_line_start = self.line_starts[self.line_of(header_start)];
        if !self.content[header_line_start..header_start]
            .chars()
            .all(char::is_whitespace)
        {
            return None;
        }

        let upto = self
            .comments
            .partition_point(|c| c.span.end <= header_start);
        let mut block: Vec<&Comment> = Vec::new();
        let mut boundary = header_start;

        for comment in self.comments[..upto].iter().rev() {
            if !comment.standalone || !self.adjacent(comment.span.end, boundary) {
                break;
            }
            block.push(comment);
            boundary = comment.span.start;
        }

        if block.is_empty() {
            return None;
        }
        block.reverse();
        Some(
            block
                .iter()
                .map(|c| self.get_text(c.span).trim_end())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Only whitespace between `end` and `next`, with exactly one line break
    fn adjacent(&self, end: usize, next: usize) -> bool {
        let gap = &self.content[end..next];
        gap.chars().all(char::is_whitespace) && gap.matches('\n').count() == 1
    }

    /// Extract code context around a declaration using configurable parameters
    pub(crate) fn extract_code_context(&self, start_row: usize, end_row: usize) -> Option<String> {
        if self.content.is_empty() {
            return None;
        }

        let lines: Vec<&str> = self.content.lines().collect();

        if lines.is_empty() || start_row >= lines.len() {
            return None;
        }

        let context_start = start_row.saturating_sub(self.context_config.lines_before);
        let context_end = std::cmp::min(lines.len() - 1, end_row + self.context_config.lines_after);

        let mut context_lines = Vec::new();
        for (i, line) in lines
            .iter()
            .enumerate()
            .take(context_end + 1)
            .skip(context_start)
        {
            let line_content = truncate_line(line, self.context_config.max_line_length);
            let marker = if i >= start_row && i <= end_row {
                "  ➤ "
            } else {
                "    "
            };

            let formatted_line = if self.context_config.show_line_numbers {
                format!("{}{:3}: {}", marker, i + 1, line_content)
            } else {
                format!("{}{}", marker, line_content)
            };

            context_lines.push(formatted_line);
        }

        Some(context_lines.join("\n"))
    }

    pub fn set_context_config(&mut self, config: ContextConfig) {
        self.context_config = config;
    }
}

/// Truncate to `max_len` bytes on a character boundary, marking the cut with `...`
fn truncate_line(line: &str, max_len: usize) -> Cow<'_, str> {
    if line.len() <= max_len {
        return Cow::Borrowed(line);
    }
    let mut cut = max_len.saturating_sub(3);
    while cut > 0 && !line.is_char_boundary(cut) {
        cut -= 1;
    }
    Cow::Owned(format!("{}...", &line[..cut]))
}

/// Collapse runs of whitespace to single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
