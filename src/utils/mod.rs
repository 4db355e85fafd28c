// Utilities Module
//
// File access, hashing and path helpers shared by the manager, batch layer
// and bindings.

/// File utilities
pub mod file_utils {
    use anyhow::{Context, Result};
    use std::fs;
    use std::path::Path;

    use crate::language::LanguageVariant;

    /// Check if a file has a C or C++ extension
    pub fn is_supported_file(path: &Path) -> bool {
        LanguageVariant::from_path(path).is_some()
    }

    /// Read a source file, reporting unreadable and non-UTF-8 files separately
    pub fn read_file_content(path: &Path) -> Result<String> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        String::from_utf8(bytes)
            .with_context(|| format!("File is not valid UTF-8: {}", path.display()))
    }
}

/// Content hashing (blake3)
pub mod hashing;

/// Path conversion utilities (absolute ↔ relative Unix-style)
pub mod paths;

#[cfg(test)]
mod tests {
    use super::file_utils::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_supported_files() {
        assert!(is_supported_file(Path::new("src/list.c")));
        assert!(is_supported_file(Path::new("include/list.hpp")));
        assert!(!is_supported_file(Path::new("README.md")));
        assert!(!is_supported_file(Path::new("Makefile")));
    }

    #[test]
    fn test_read_file_content_rejects_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.c");
        std::fs::write(&path, [b'/', b'/', b' ', 0xE9, b'\n']).unwrap();

        let err = read_file_content(&path).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_file_content(&temp_dir.path().join("gone.c")).unwrap_err();
        assert!(err.to_string().contains("gone.c"));
    }
}
