//! File materializer - turns extracted blocks into files on disk
//!
//! Writes are wholesale: parent directories are created on demand and any
//! existing content is truncated. Failures never panic; they come back as
//! errors for the caller to log and ride out, except that the runner
//! treats a missing project directory as fatal.

use std::fs;
use std::path::{Path, PathBuf};
use weaver_core::{Result, WeaverError};

/// Validate that a declared path is safe to write inside a project
///
/// Rejects absolute paths and `..` traversal so generated output cannot
/// escape the project directory.
pub fn validate_path(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);

    if path.is_absolute() {
        return Err(WeaverError::PathValidation(format!(
            "Absolute paths not allowed: {}",
            path.display()
        )));
    }

    for component in path.components() {
        if let std::path::Component::ParentDir = component {
            return Err(WeaverError::PathValidation(format!(
                "Path traversal not allowed: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

/// Write content to a file, creating missing ancestor directories
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WeaverError::FileWrite {
                path: path.display().to_string(),
                reason: format!("creating {}: {}", parent.display(), e),
            })?;
        }
    }

    fs::write(path, content).map_err(|e| WeaverError::FileWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    tracing::info!("Wrote file: {}", path.display());
    Ok(())
}

/// Read a file's current content
///
/// Returns an empty string if the file does not exist or cannot be read;
/// a real read error is logged but never surfaces.
pub fn read_file(path: &Path) -> String {
    if !path.exists() {
        return String::new();
    }
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Validate a declared relative path and write it under `project_dir`
///
/// Returns the absolute path that was written.
pub fn materialize(project_dir: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let relative = validate_path(relative)?;
    let full = project_dir.join(relative);
    write_file(&full, content)?;
    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo/models.py");

        write_file(&path, "class Task:\n    pass\n").unwrap();
        assert_eq!(read_file(&path), "class Task:\n    pass\n");
    }

    #[test]
    fn test_write_creates_missing_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/deep.py");

        write_file(&path, "nested").unwrap();
        assert!(path.exists());
        assert_eq!(read_file(&path), "nested");
    }

    #[test]
    fn test_write_truncates_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.py");

        write_file(&path, "first version with a long body").unwrap();
        write_file(&path, "second").unwrap();
        assert_eq!(read_file(&path), "second");
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_file(&dir.path().join("nope.py")), "");
    }

    #[test]
    fn test_validate_path_rejects_absolute() {
        assert!(validate_path("/etc/passwd").is_err());
    }

    #[test]
    fn test_validate_path_rejects_traversal() {
        assert!(validate_path("../../escape.py").is_err());
        assert!(validate_path("ok/../../escape.py").is_err());
    }

    #[test]
    fn test_validate_path_accepts_relative() {
        assert!(validate_path("todo/cli.py").is_ok());
    }

    #[test]
    fn test_materialize_writes_under_project_dir() {
        let dir = TempDir::new().unwrap();
        let written = materialize(dir.path(), "todo/status.py", "STATUSES = []").unwrap();

        assert!(written.starts_with(dir.path()));
        assert_eq!(read_file(&written), "STATUSES = []");
    }

    #[test]
    fn test_materialize_refuses_escaping_path() {
        let dir = TempDir::new().unwrap();
        assert!(materialize(dir.path(), "../outside.py", "nope").is_err());
    }
}
