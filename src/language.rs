//! Language Support - the `c` / `cpp` variant tag and its capability set
//!
//! The two variants share one scanner. A variant only selects which grammar
//! rules that scanner applies, through [`Capabilities`].

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::extractors::base::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageVariant {
    C,
    Cpp,
}

/// Grammar rules enabled for a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub classes: bool,
    pub namespaces: bool,
    /// `public:` / `private:` / `protected:` inside aggregates
    pub access_labels: bool,
    /// Constructors, destructors and member-initializer lists
    pub special_members: bool,
    pub templates: bool,
    pub operator_overloads: bool,
    /// `extern "C" { ... }` blocks
    pub linkage_blocks: bool,
    /// `A::b()` definitions outside their class
    pub qualified_names: bool,
    /// Member functions declared inside aggregates
    pub member_functions: bool,
}

impl LanguageVariant {
    pub const ALL: [LanguageVariant; 2] = [LanguageVariant::C, LanguageVariant::Cpp];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageVariant::C => "c",
            LanguageVariant::Cpp => "cpp",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            LanguageVariant::C => Capabilities {
                classes: false,
                namespaces: false,
                access_labels: false,
                special_members: false,
                templates: false,
                operator_overloads: false,
                linkage_blocks: false,
                qualified_names: false,
                member_functions: false,
            },
            LanguageVariant::Cpp => Capabilities {
                classes: true,
                namespaces: true,
                access_labels: true,
                special_members: true,
                templates: true,
                operator_overloads: true,
                linkage_blocks: true,
                qualified_names: true,
                member_functions: true,
            },
        }
    }

    /// Detect the variant for a path from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(detect_language_from_extension)
            .and_then(|lang| lang.parse().ok())
    }
}

impl FromStr for LanguageVariant {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" => Ok(LanguageVariant::C),
            "cpp" | "c++" | "cxx" => Ok(LanguageVariant::Cpp),
            _ => Err(ParseError::UnrecognizedLanguageVariant { tag: s.to_string() }),
        }
    }
}

impl std::fmt::Display for LanguageVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect language from file extension
///
/// Returns the variant tag accepted by `LanguageVariant::from_str`.
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "c" | "h" => Some("c"),
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Some("cpp"),
        _ => None,
    }
}

/// Tags of every supported variant
pub fn supported_languages() -> Vec<&'static str> {
    LanguageVariant::ALL.iter().map(|v| v.as_str()).collect()
}
