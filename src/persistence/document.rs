use crate::domain::{Task, DEFAULT_CATEGORY};
use crate::store::{StoreError, StoreResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The whole data file: every task plus the ordered category list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_categories() -> Vec<String> {
    vec![DEFAULT_CATEGORY.to_string()]
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            categories: default_categories(),
        }
    }
}

/// Load the data file. A missing, unreadable or malformed file yields an empty document.
pub fn load_document<P: AsRef<Path>>(path: P) -> StoreDocument {
    let path = path.as_ref();

    if !path.exists() {
        info!("no data file at {}, starting empty", path.display());
        return StoreDocument::default();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| {
            serde_json::from_str::<StoreDocument>(&content).map_err(|e| e.to_string())
        });

    match parsed {
        Ok(document) => {
            info!(
                "loaded {} tasks and {} categories from {}",
                document.tasks.len(),
                document.categories.len(),
                path.display()
            );
            document
        }
        Err(reason) => {
            warn!(
                "could not read {} ({}), starting empty",
                path.display(),
                reason
            );
            StoreDocument::default()
        }
    }
}

/// Rewrite the data file in full (pretty-printed, 4-space indent, UTF-8 kept as-is)
pub fn save_document<P: AsRef<Path>>(path: P, document: &StoreDocument) -> StoreResult<()> {
    let path = path.as_ref();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;

    std::fs::write(path, &buf).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("saved {} tasks to {}", document.tasks.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_document() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let document = load_document(&path);
        assert!(document.tasks.is_empty());
        assert_eq!(document.categories, vec!["-".to_string()]);
    }

    #[test]
    fn test_load_corrupt_document_falls_back_to_default() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_document(&path), StoreDocument::default());
    }

    #[test]
    fn test_missing_categories_key_defaults_to_placeholder() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(&path, r#"{"tasks": [{"name": "A"}]}"#).unwrap();

        let document = load_document(&path);
        assert_eq!(document.tasks.len(), 1);
        assert_eq!(document.categories, vec!["-".to_string()]);
    }

    #[test]
    fn test_float_numbers_do_not_drop_the_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"{"tasks": [{"name": "A", "actual_sec": 12.0}, {"name": "B", "progress": 50.0}],
                "categories": ["-"]}"#,
        )
        .unwrap();

        let document = load_document(&path);
        assert_eq!(document.tasks.len(), 2);
        assert_eq!(document.tasks[0].actual_sec, 12);
        assert_eq!(document.tasks[1].progress, 50);
    }

    #[test]
    fn test_save_and_load_document() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let mut draft = TaskDraft::new("設計レビュー");
        draft.category = "dev".to_string();
        let mut document = StoreDocument::default();
        document.categories.push("dev".to_string());
        document.tasks.push(Task::from_draft(draft.normalized()));

        save_document(&path, &document).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("設計レビュー"));
        assert!(raw.contains("    \"tasks\""));

        assert_eq!(load_document(&path), document);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing").join("tasks.json");

        let err = save_document(&path, &StoreDocument::default()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
