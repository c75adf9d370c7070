//! Project directory management
//!
//! Every run materializes into a fresh `<sanitized-name>_<timestamp>`
//! directory under the configured projects root. Failure to create it is
//! fatal to the run; nothing else can proceed without somewhere to write.

use chrono::Local;
use std::path::{Path, PathBuf};
use weaver_core::{Result, WeaverError};

/// Lowercase a project name and map every non-alphanumeric to `_`
pub fn sanitize_project_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Create the timestamped project directory for a run
pub fn create_project_dir(projects_root: &Path, project_name: &str) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let dir_name = format!("{}_{}", sanitize_project_name(project_name), timestamp);
    let project_dir = projects_root.join(dir_name);

    std::fs::create_dir_all(&project_dir).map_err(|e| {
        WeaverError::Project(format!(
            "Failed to create project directory {}: {}",
            project_dir.display(),
            e
        ))
    })?;

    tracing::info!("Created project directory: {}", project_dir.display());
    Ok(project_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_lowercases_and_replaces() {
        assert_eq!(sanitize_project_name("My Todo App!"), "my_todo_app_");
        assert_eq!(sanitize_project_name("todo-list v2"), "todo_list_v2");
        assert_eq!(sanitize_project_name("simple"), "simple");
    }

    #[test]
    fn test_create_project_dir() {
        let root = TempDir::new().unwrap();
        let dir = create_project_dir(root.path(), "My Todo App").unwrap();

        assert!(dir.exists());
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("my_todo_app_"));
        // name_YYYYMMDD_HHMMSS
        assert_eq!(name.len(), "my_todo_app_".len() + 15);
    }

    #[test]
    fn test_create_project_dir_unwritable_root_is_fatal() {
        let result = create_project_dir(Path::new("/proc/no_such_root"), "x");
        assert!(matches!(result, Err(WeaverError::Project(_))));
    }
}
