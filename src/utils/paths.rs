// Path conversion utilities
//
// Declarations are stored against relative Unix-style paths so ids and output
// do not depend on where the workspace is checked out.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Convert a path inside `workspace_root` to a relative path with `/` separators.
///
/// Both paths are canonicalized when they exist so symlinked roots still
/// match; otherwise they are compared as given.
///
/// # Examples
/// ```
/// // to_relative_unix_style("/home/dev/project/src/vector.cpp", "/home/dev/project")
/// // => "src/vector.cpp"
/// ```
pub fn to_relative_unix_style(absolute: &Path, workspace_root: &Path) -> Result<String> {
    let (path, root) = match (absolute.canonicalize(), workspace_root.canonicalize()) {
        (Ok(path), Ok(root)) => (path, root),
        _ => (absolute.to_path_buf(), workspace_root.to_path_buf()),
    };
    let path = strip_unc_prefix(&path);
    let root = strip_unc_prefix(&root);

    let relative = path.strip_prefix(&root).with_context(|| {
        format!(
            "File path '{}' is not within workspace root '{}'",
            path.display(),
            root.display()
        )
    })?;
    let relative = relative.to_str().context("Path contains invalid UTF-8")?;

    Ok(if MAIN_SEPARATOR == '\\' {
        relative.replace('\\', "/")
    } else {
        relative.to_string()
    })
}

/// Relative Unix-style path when `path` is inside the workspace, otherwise the
/// path as given with `/` separators
pub fn display_path(path: &Path, workspace_root: &Path) -> String {
    to_relative_unix_style(path, workspace_root)
        .unwrap_or_else(|_| path.to_string_lossy().replace('\\', "/"))
}

// Canonicalized Windows paths carry a \\?\ prefix that plain paths lack
#[cfg(windows)]
fn strip_unc_prefix(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    match path_str.strip_prefix(r"\\?\") {
        Some(stripped) => PathBuf::from(stripped),
        None => path.to_path_buf(),
    }
}

#[cfg(not(windows))]
fn strip_unc_prefix(path: &Path) -> PathBuf {
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_path_inside_workspace() {
        let workspace = PathBuf::from("/home/dev/geometry");
        let absolute = PathBuf::from("/home/dev/geometry/src/vector.cpp");

        let result = to_relative_unix_style(&absolute, &workspace).unwrap();

        assert_eq!(result, "src/vector.cpp");
        assert!(!result.contains('\\'), "Should have no backslashes");
    }

    #[test]
    fn test_path_outside_workspace_is_an_error() {
        let workspace = PathBuf::from("/home/dev/geometry");
        let outside = PathBuf::from("/usr/include/stdio.h");

        assert!(to_relative_unix_style(&outside, &workspace).is_err());
        assert_eq!(display_path(&outside, &workspace), "/usr/include/stdio.h");
    }

    #[test]
    fn test_existing_paths_are_canonicalized() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("lib");
        std::fs::create_dir(&nested).unwrap();
        let file = nested.join("list.h");
        std::fs::write(&file, "struct list;").unwrap();

        let through_dot = temp_dir.path().join(".").join("lib").join("list.h");
        assert_eq!(
            to_relative_unix_style(&through_dot, temp_dir.path()).unwrap(),
            "lib/list.h"
        );
    }
}
