// Batch extraction
//
// Per-file read, hash and extract on the rayon pool. Every input gets exactly
// one result, in input order, and one file's failure never affects another's.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::ExtractorConfig;
use crate::extractors::base::ExtractionResults;
use crate::extractors::factory::extract_declarations;
use crate::language::LanguageVariant;
use crate::utils::file_utils::{is_supported_file, read_file_content};
use crate::utils::hashing::hash_content;
use crate::utils::paths::display_path;

/// Result of processing a single file in batch extraction.
///
/// - path: relative Unix-style path when inside the workspace
/// - language: `c`, `cpp`, or `unknown` when detection failed
/// - hash: blake3 of the content (empty if the read failed)
/// - results: the declaration tree (None on any error)
/// - error: what went wrong, if anything
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFileResult {
    pub path: String,
    pub language: String,
    pub hash: String,
    pub size: usize,
    pub results: Option<ExtractionResults>,
    pub error: Option<String>,
}

impl BatchFileResult {
    /// Create a successful result with extraction data
    pub fn success(path: String, hash: String, size: usize, results: ExtractionResults) -> Self {
        BatchFileResult {
            path,
            language: results.language.clone(),
            hash,
            size,
            results: Some(results),
            error: None,
        }
    }

    /// Create a failed result with error message
    pub fn error(path: String, error: String) -> Self {
        BatchFileResult {
            path,
            language: "unknown".to_string(),
            hash: String::new(),
            size: 0,
            results: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.results.is_some()
    }
}

/// Extract declarations from many files in parallel
pub fn extract_files_batch(
    paths: &[PathBuf],
    workspace_root: &Path,
    config: &ExtractorConfig,
) -> Vec<BatchFileResult> {
    let results: Vec<BatchFileResult> = paths
        .par_iter()
        .map(|path| process_file(path, workspace_root, config))
        .collect();

    let failed = results.iter().filter(|r| !r.is_success()).count();
    tracing::debug!(
        "Batch extraction finished: {} files, {} failed",
        results.len(),
        failed
    );
    results
}

fn process_file(path: &Path, workspace_root: &Path, config: &ExtractorConfig) -> BatchFileResult {
    let rel_path = display_path(path, workspace_root);

    let Some(variant) = LanguageVariant::from_path(path) else {
        return BatchFileResult::error(rel_path, "Unsupported file extension".to_string());
    };

    let content = match read_file_content(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Skipping {}: {:#}", rel_path, e);
            return BatchFileResult::error(rel_path, format!("{:#}", e));
        }
    };
    let hash = hash_content(&content);
    let size = content.len();

    match extract_declarations(&content, variant, &rel_path, config) {
        Ok(results) => BatchFileResult::success(rel_path, hash, size, results),
        Err(e) => {
            let message = match e.line_in(&content) {
                Some(line) => format!("{} (line {})", e, line),
                None => e.to_string(),
            };
            tracing::warn!("Failed to extract declarations from {}: {}", rel_path, message);
            BatchFileResult {
                path: rel_path,
                language: variant.to_string(),
                hash,
                size,
                results: None,
                error: Some(message),
            }
        }
    }
}

/// Resolve glob patterns to C/C++ source files.
///
/// Symlinks and files matching any `exclude` pattern are skipped. The result is
/// sorted and free of duplicates.
pub fn expand_patterns(patterns: &[String], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let exclude = exclude
        .iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern: {}", p)))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for pattern in patterns {
        let entries =
            glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        for entry in entries {
            match entry {
                Ok(path) => {
                    let is_symlink = path
                        .symlink_metadata()
                        .map(|m| m.file_type().is_symlink())
                        .unwrap_or(false);
                    if is_symlink || !path.is_file() || !is_supported_file(&path) {
                        continue;
                    }
                    if exclude.iter().any(|p| p.matches_path(&path)) {
                        continue;
                    }
                    if seen.insert(path.clone()) {
                        paths.push(path);
                    }
                }
                Err(e) => tracing::warn!("Skipping unreadable path {}: {}", e.path().display(), e),
            }
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("add.c"), "int add(int a, int b) { return a + b; }\n").unwrap();
        fs::write(src.join("vec.hpp"), "class Vec { public: Vec(); };\n").unwrap();
        fs::write(src.join("broken.c"), "int f() {\n").unwrap();
        fs::write(src.join("README.md"), "# not code").unwrap();
        temp_dir
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let ws = workspace();
        let root = ws.path();
        let paths = vec![
            root.join("src/vec.hpp"),
            root.join("src/broken.c"),
            root.join("src/missing.c"),
            root.join("src/add.c"),
        ];

        let results = extract_files_batch(&paths, root, &ExtractorConfig::default());

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].path, "src/vec.hpp");
        assert_eq!(results[0].language, "cpp");
        assert!(results[0].is_success());

        assert_eq!(results[1].language, "c");
        assert!(results[1].results.is_none());
        let broken = results[1].error.as_deref().unwrap();
        assert!(broken.contains("unbalanced"));
        assert!(broken.ends_with("(line 1)"));
        assert_eq!(results[1].hash, hash_content("int f() {\n"));

        assert!(results[2].error.is_some());
        assert_eq!(results[2].hash, "");

        let add = results[3].results.as_ref().unwrap();
        assert_eq!(add.declarations[0].name, "add");
        assert_eq!(results[3].size, 40);
    }

    #[test]
    fn test_expand_patterns_filters_and_sorts() {
        let ws = workspace();
        let pattern = format!("{}/src/*", ws.path().display());

        let paths = expand_patterns(&[pattern.clone(), pattern], &[]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["add.c", "broken.c", "vec.hpp"]);
    }

    #[test]
    fn test_expand_patterns_exclude() {
        let ws = workspace();
        let pattern = format!("{}/src/*", ws.path().display());
        let paths = expand_patterns(&[pattern], &["**/broken.c".to_string()]).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(expand_patterns(&["[".to_string()], &[]).is_err());
    }
}
