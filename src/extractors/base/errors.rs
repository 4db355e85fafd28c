// Parse errors for the structural extractor
//
// Every failure is terminal for the whole input; nothing is retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error category, independent of the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    UnbalancedBraces,
    UnterminatedComment,
    UnrecognizedLanguageVariant,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::UnbalancedBraces => write!(f, "unbalanced_braces"),
            ParseErrorKind::UnterminatedComment => write!(f, "unterminated_comment"),
            ParseErrorKind::UnrecognizedLanguageVariant => {
                write!(f, "unrecognized_language_variant")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `}` with nothing open, or a `{` never closed
    #[error("unbalanced braces at offset {offset}: {message}")]
    UnbalancedBraces { offset: usize, message: String },

    /// A `/*` with no closing `*/`
    #[error("unterminated comment at offset {offset}: {message}")]
    UnterminatedComment { offset: usize, message: String },

    #[error("unrecognized language variant '{tag}' (expected 'c' or 'cpp')")]
    UnrecognizedLanguageVariant { tag: String },
}

impl ParseError {
    pub fn unbalanced(offset: usize, message: impl Into<String>) -> Self {
        ParseError::UnbalancedBraces {
            offset,
            message: message.into(),
        }
    }

    pub fn unterminated_comment(offset: usize) -> Self {
        ParseError::UnterminatedComment {
            offset,
            message: "comment opened with '/*' is never closed".to_string(),
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::UnbalancedBraces { .. } => ParseErrorKind::UnbalancedBraces,
            ParseError::UnterminatedComment { .. } => ParseErrorKind::UnterminatedComment,
            ParseError::UnrecognizedLanguageVariant { .. } => {
                ParseErrorKind::UnrecognizedLanguageVariant
            }
        }
    }

    /// Byte offset into the source, when the error is tied to a position
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::UnbalancedBraces { offset, .. }
            | ParseError::UnterminatedComment { offset, .. } => Some(*offset),
            ParseError::UnrecognizedLanguageVariant { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParseError::UnbalancedBraces { message, .. }
            | ParseError::UnterminatedComment { message, .. } => message.clone(),
            ParseError::UnrecognizedLanguageVariant { tag } => {
                format!("unknown variant '{}'", tag)
            }
        }
    }

    /// 1-based line of the offset within `source`
    pub fn line_in(&self, source: &str) -> Option<usize> {
        self.offset().map(|offset| {
            let end = offset.min(source.len());
            source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
        })
    }
}
