//! ExtractorManager - Public API for declaration extraction
//!
//! Handles file reading and language detection, then delegates to the shared
//! factory. This is the main entry point for clients working with files rather
//! than in-memory text.

use anyhow::{anyhow, Result};
use std::path::Path;

use crate::config::ExtractorConfig;
use crate::extractors::base::{ExtractionResults, ParseError};
use crate::extractors::factory::extract_declarations;
use crate::language::{self, LanguageVariant};
use crate::utils::file_utils::read_file_content;
use crate::utils::paths::display_path;

/// Manager for the C and C++ extractors
#[derive(Debug, Clone, Default)]
pub struct ExtractorManager {
    config: ExtractorConfig,
}

impl ExtractorManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Get supported languages
    pub fn supported_languages(&self) -> Vec<&'static str> {
        language::supported_languages()
    }

    /// Determine the language variant from a file's extension
    pub fn detect_language(&self, file_path: &str) -> Result<LanguageVariant> {
        let path = Path::new(file_path);
        LanguageVariant::from_path(path).ok_or_else(|| {
            let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
            anyhow!("Unsupported file extension: {}", extension)
        })
    }

    /// Extract declarations from in-memory source text
    pub fn extract_source(
        &self,
        content: &str,
        variant: LanguageVariant,
        file_path: &str,
    ) -> Result<ExtractionResults, ParseError> {
        let results = extract_declarations(content, variant, file_path, &self.config)?;
        tracing::debug!(
            "Extracted {} declarations from {} file: {}",
            results.total_count(),
            variant,
            file_path
        );
        Ok(results)
    }

    /// Read a file and extract its declarations
    ///
    /// The stored path is relative to `workspace_root` with `/` separators when
    /// the file is inside it. Read failures, non-UTF-8 content and unsupported
    /// extensions are reported with context; a `ParseError` can be recovered
    /// with `downcast_ref`.
    pub fn extract_file(&self, path: &Path, workspace_root: &Path) -> Result<ExtractionResults> {
        let variant = self.detect_language(&path.to_string_lossy())?;
        let content = read_file_content(path)?;
        let file_path = display_path(path, workspace_root);

        self.extract_source(&content, variant, &file_path)
            .map_err(|e| {
                let line = e.line_in(&content).unwrap_or(0);
                tracing::warn!(
                    "Failed to extract declarations from {}:{}: {}",
                    file_path,
                    line,
                    e
                );
                anyhow::Error::new(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::ParseErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_supported_languages() {
        assert_eq!(ExtractorManager::new().supported_languages(), vec!["c", "cpp"]);
    }

    #[test]
    fn test_detect_language() {
        let manager = ExtractorManager::new();
        assert_eq!(manager.detect_language("src/list.h").unwrap(), LanguageVariant::C);
        assert_eq!(manager.detect_language("src/list.cc").unwrap(), LanguageVariant::Cpp);
        let err = manager.detect_language("notes.txt").unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension: txt"));
    }

    #[test]
    fn test_extract_file_uses_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();
        let path = temp_dir.path().join("src/add.c");
        fs::write(&path, "int add(int a, int b) { return a + b; }\n").unwrap();

        let results = ExtractorManager::new()
            .extract_file(&path, temp_dir.path())
            .unwrap();

        assert_eq!(results.file_path, "src/add.c");
        assert_eq!(results.language, "c");
        assert_eq!(results.declarations[0].name, "add");
    }

    #[test]
    fn test_extract_file_parse_error_can_be_downcast() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.cpp");
        fs::write(&path, "class A {\n").unwrap();

        let err = ExtractorManager::new()
            .extract_file(&path, temp_dir.path())
            .unwrap_err();
        let parse_error = err.downcast_ref::<ParseError>().unwrap();
        assert_eq!(parse_error.kind(), ParseErrorKind::UnbalancedBraces);
        assert_eq!(parse_error.offset(), Some(8));
    }

    #[test]
    fn test_extract_file_reports_missing_and_unsupported_files() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ExtractorManager::new();

        let missing = manager
            .extract_file(&temp_dir.path().join("missing.c"), temp_dir.path())
            .unwrap_err();
        assert!(missing.to_string().contains("Failed to read file"));

        let text = temp_dir.path().join("notes.md");
        fs::write(&text, "# notes").unwrap();
        assert!(manager.extract_file(&text, temp_dir.path()).is_err());
    }

    #[test]
    fn test_config_controls_fields() {
        let manager = ExtractorManager::with_config(ExtractorConfig {
            include_fields: false,
            ..Default::default()
        });
        let results = manager
            .extract_source("struct P { int x; };", LanguageVariant::C, "p.c")
            .unwrap();
        assert!(results.declarations[0].children.is_empty());
    }
}
