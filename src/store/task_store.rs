use super::error::{StoreError, StoreResult};
use crate::domain::{clamp_progress, ChartSnapshot, Task, TaskDraft, DEFAULT_CATEGORY};
use crate::persistence::{load_document, save_document, StoreDocument};
use log::info;
use std::path::{Path, PathBuf};

/// Owner of the task and category lists.
///
/// Every command validates, mutates the in-memory document and then rewrites
/// the whole file. A failed write is reported but the mutation is kept.
#[derive(Debug)]
pub struct TaskStore {
    document: StoreDocument,
    /// None for in-memory stores (tests)
    path: Option<PathBuf>,
}

impl TaskStore {
    /// Open the store at `path`; missing or corrupt files start empty
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            document: load_document(&path),
            path: Some(path),
        }
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::from_document(StoreDocument::default())
    }

    pub fn from_document(document: StoreDocument) -> Self {
        Self {
            document,
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.document.tasks
    }

    pub fn categories(&self) -> &[String] {
        &self.document.categories
    }

    pub fn task(&self, index: usize) -> StoreResult<&Task> {
        self.document
            .tasks
            .get(index)
            .ok_or(StoreError::TaskOutOfRange(index))
    }

    fn task_mut(&mut self, index: usize) -> StoreResult<&mut Task> {
        self.document
            .tasks
            .get_mut(index)
            .ok_or(StoreError::TaskOutOfRange(index))
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.document.categories.iter().any(|c| c == name)
    }

    /// Write the whole document (no-op for in-memory stores)
    pub fn save(&self) -> StoreResult<()> {
        match &self.path {
            Some(path) => save_document(path, &self.document),
            None => Ok(()),
        }
    }

    // --- Tasks ---

    /// Append a task built from the form; returns its index
    pub fn create_task(&mut self, draft: TaskDraft) -> StoreResult<usize> {
        let draft = validated(draft)?;
        self.document.tasks.push(Task::from_draft(draft));
        self.save()?;
        Ok(self.document.tasks.len() - 1)
    }

    /// Replace the form fields of an existing task
    pub fn update_task(&mut self, index: usize, draft: TaskDraft) -> StoreResult<()> {
        let draft = validated(draft)?;
        self.task_mut(index)?.apply_draft(draft);
        self.save()
    }

    pub fn delete_task(&mut self, index: usize) -> StoreResult<Task> {
        self.task(index)?;
        let removed = self.document.tasks.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Drag-style reorder: take the task at `from` and insert it at `to`
    pub fn move_task(&mut self, from: usize, to: usize) -> StoreResult<()> {
        let len = self.document.tasks.len();
        if from >= len {
            return Err(StoreError::TaskOutOfRange(from));
        }
        if to >= len {
            return Err(StoreError::TaskOutOfRange(to));
        }
        if from == to {
            return Ok(());
        }
        let task = self.document.tasks.remove(from);
        self.document.tasks.insert(to, task);
        self.save()
    }

    /// Add a finished session to the task's total; returns the new total
    pub fn add_elapsed(&mut self, index: usize, seconds: u64) -> StoreResult<u64> {
        let task = self.task_mut(index)?;
        task.actual_sec = task.actual_sec.saturating_add(seconds);
        let total = task.actual_sec;
        self.save()?;
        Ok(total)
    }

    /// Set completion percentage, clamped to 0..=100; returns the stored value
    pub fn set_progress(&mut self, index: usize, value: i64) -> StoreResult<u8> {
        let progress = clamp_progress(value);
        self.task_mut(index)?.progress = progress;
        self.save()?;
        Ok(progress)
    }

    pub fn set_memo(&mut self, index: usize, memo: &str) -> StoreResult<()> {
        self.task_mut(index)?.memo = memo.trim().to_string();
        self.save()
    }

    // --- Categories ---

    pub fn add_category(&mut self, name: &str) -> StoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyCategoryName);
        }
        if self.has_category(name) {
            return Err(StoreError::DuplicateCategory(name.to_string()));
        }
        self.document.categories.push(name.to_string());
        self.save()
    }

    /// Remove a category and reset every task that used it to the placeholder.
    /// Returns how many tasks were reset.
    pub fn delete_category(&mut self, name: &str) -> StoreResult<usize> {
        if name == DEFAULT_CATEGORY {
            return Err(StoreError::DefaultCategoryProtected);
        }
        let position = self
            .document
            .categories
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| StoreError::UnknownCategory(name.to_string()))?;

        let mut reset = 0;
        for task in self.document.tasks.iter_mut().filter(|t| t.category == name) {
            task.category = DEFAULT_CATEGORY.to_string();
            reset += 1;
        }
        self.document.categories.remove(position);
        info!("deleted category '{}', reset {} tasks", name, reset);

        self.save()?;
        Ok(reset)
    }

    pub fn move_category(&mut self, from: usize, to: usize) -> StoreResult<()> {
        let len = self.document.categories.len();
        if from >= len {
            return Err(StoreError::CategoryOutOfRange(from));
        }
        if to >= len {
            return Err(StoreError::CategoryOutOfRange(to));
        }
        if from == to {
            return Ok(());
        }
        let category = self.document.categories.remove(from);
        self.document.categories.insert(to, category);
        self.save()
    }

    // --- Views ---

    pub fn chart(&self) -> ChartSnapshot {
        ChartSnapshot::from_store(&self.document.tasks, &self.document.categories)
    }
}

fn validated(draft: TaskDraft) -> StoreResult<TaskDraft> {
    let draft = draft.normalized();
    if draft.name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionTimer;
    use chrono::{Duration, Local};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn draft(name: &str, category: &str) -> TaskDraft {
        TaskDraft {
            name: name.to_string(),
            worker: "Sam".to_string(),
            estimate: "2.5".to_string(),
            start_date: "2025/01/10".to_string(),
            end_date: "2025/02/01".to_string(),
            category: category.to_string(),
        }
    }

    fn names(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_create_then_reload_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let mut store = TaskStore::open(&path);
        store.add_category("dev").unwrap();
        let idx = store.create_task(draft("Write parser", "dev")).unwrap();
        store.set_memo(idx, "  first pass done \n").unwrap();

        let reloaded = TaskStore::open(&path);
        assert_eq!(reloaded.tasks(), store.tasks());
        assert_eq!(reloaded.categories(), store.categories());

        let task = reloaded.task(0).unwrap();
        assert_eq!(task.name, "Write parser");
        assert_eq!(task.worker, "Sam");
        assert_eq!(task.estimate, "2.5");
        assert_eq!(task.start_date, "2025/01/10");
        assert_eq!(task.end_date, "2025/02/01");
        assert_eq!(task.category, "dev");
        assert_eq!(task.actual_sec, 0);
        assert_eq!(task.progress, 0);
        assert_eq!(task.memo, "first pass done");
    }

    #[test]
    fn test_create_with_empty_name_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let mut store = TaskStore::open(&path);
        let err = store.create_task(draft("   ", "-")).unwrap_err();
        assert!(matches!(err, StoreError::EmptyName));
        assert!(store.tasks().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_update_keeps_time_progress_and_memo() {
        let mut store = TaskStore::in_memory();
        store.create_task(draft("A", "-")).unwrap();
        store.add_elapsed(0, 90).unwrap();
        store.set_progress(0, 30).unwrap();
        store.set_memo(0, "memo").unwrap();

        store.update_task(0, draft("A renamed", "-")).unwrap();
        let task = store.task(0).unwrap();
        assert_eq!(task.name, "A renamed");
        assert_eq!(task.actual_sec, 90);
        assert_eq!(task.progress, 30);
        assert_eq!(task.memo, "memo");

        assert!(matches!(
            store.update_task(0, TaskDraft::new("")),
            Err(StoreError::EmptyName)
        ));
        assert!(matches!(
            store.update_task(5, draft("B", "-")),
            Err(StoreError::TaskOutOfRange(5))
        ));
    }

    #[test]
    fn test_two_sessions_accumulate() {
        let mut store = TaskStore::in_memory();
        store.create_task(draft("A", "-")).unwrap();

        let start = Local::now();
        let mut timer = SessionTimer::new();

        timer.start_at(start);
        let first = timer.stop_at(start + Duration::seconds(40)).unwrap();
        let after_first = store.add_elapsed(0, first).unwrap();

        timer.start_at(start + Duration::seconds(100));
        let second = timer.stop_at(start + Duration::seconds(175)).unwrap();
        let after_second = store.add_elapsed(0, second).unwrap();

        assert_eq!(after_first, 40);
        assert_eq!(after_second, 115);
        assert!(after_second >= after_first);
        assert_eq!(store.task(0).unwrap().actual_sec, 115);
    }

    #[test]
    fn test_delete_category_resets_references() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let mut store = TaskStore::open(&path);
        store.add_category("dev").unwrap();
        store.add_category("ops").unwrap();
        store.create_task(draft("A", "dev")).unwrap();
        store.create_task(draft("B", "ops")).unwrap();
        store.create_task(draft("C", "dev")).unwrap();

        let reset = store.delete_category("dev").unwrap();
        assert_eq!(reset, 2);
        assert_eq!(store.categories(), &["-".to_string(), "ops".to_string()]);

        let reloaded = TaskStore::open(&path);
        for task in reloaded.tasks() {
            assert!(reloaded.has_category(&task.category), "{} dangles", task.category);
        }
        assert_eq!(reloaded.task(0).unwrap().category, "-");
        assert_eq!(reloaded.task(1).unwrap().category, "ops");
        assert_eq!(reloaded.task(2).unwrap().category, "-");
    }

    #[test]
    fn test_default_category_cannot_be_deleted() {
        let mut store = TaskStore::in_memory();
        store.create_task(draft("A", "-")).unwrap();
        let before_tasks = store.tasks().to_vec();
        let before_categories = store.categories().to_vec();

        let err = store.delete_category("-").unwrap_err();
        assert!(matches!(err, StoreError::DefaultCategoryProtected));
        assert_eq!(store.tasks(), before_tasks.as_slice());
        assert_eq!(store.categories(), before_categories.as_slice());
    }

    #[test]
    fn test_delete_unknown_category() {
        let mut store = TaskStore::in_memory();
        assert!(matches!(
            store.delete_category("nope"),
            Err(StoreError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_add_category_validation() {
        let mut store = TaskStore::in_memory();
        store.add_category("  review ").unwrap();
        assert!(store.has_category("review"));
        assert!(matches!(
            store.add_category("review"),
            Err(StoreError::DuplicateCategory(_))
        ));
        assert!(matches!(
            store.add_category("   "),
            Err(StoreError::EmptyCategoryName)
        ));
    }

    #[test]
    fn test_move_task_first_to_last_persists_order() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let mut store = TaskStore::open(&path);
        for name in ["A", "B", "C"] {
            store.create_task(draft(name, "-")).unwrap();
        }

        store.move_task(0, 2).unwrap();
        assert_eq!(names(&store), vec!["B", "C", "A"]);

        let reloaded = TaskStore::open(&path);
        assert_eq!(names(&reloaded), vec!["B", "C", "A"]);

        assert!(matches!(
            store.move_task(3, 0),
            Err(StoreError::TaskOutOfRange(3))
        ));
    }

    #[test]
    fn test_move_category() {
        let mut store = TaskStore::in_memory();
        store.add_category("dev").unwrap();
        store.add_category("ops").unwrap();

        store.move_category(2, 0).unwrap();
        assert_eq!(
            store.categories(),
            &["ops".to_string(), "-".to_string(), "dev".to_string()]
        );
        assert!(matches!(
            store.move_category(0, 9),
            Err(StoreError::CategoryOutOfRange(9))
        ));
    }

    #[test]
    fn test_progress_is_clamped_and_persists() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let mut store = TaskStore::open(&path);
        store.create_task(draft("A", "-")).unwrap();

        assert_eq!(store.set_progress(0, 150).unwrap(), 100);
        assert_eq!(TaskStore::open(&path).task(0).unwrap().progress, 100);

        assert_eq!(store.set_progress(0, -20).unwrap(), 0);
        assert_eq!(TaskStore::open(&path).task(0).unwrap().progress, 0);

        assert_eq!(store.set_progress(0, 65).unwrap(), 65);
        assert_eq!(TaskStore::open(&path).task(0).unwrap().progress, 65);
    }

    #[test]
    fn test_delete_task_splices() {
        let mut store = TaskStore::in_memory();
        for name in ["A", "B", "C"] {
            store.create_task(draft(name, "-")).unwrap();
        }

        let removed = store.delete_task(1).unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(names(&store), vec!["A", "C"]);
        assert!(store.delete_task(2).is_err());
    }

    #[test]
    fn test_chart_uses_store_order() {
        let mut store = TaskStore::in_memory();
        store.add_category("dev").unwrap();
        store.create_task(draft("A", "dev")).unwrap();
        store.add_elapsed(0, 30).unwrap();

        let chart = store.chart();
        assert_eq!(chart.categories, vec!["-".to_string(), "dev".to_string()]);
        assert_eq!(chart.bars[0].total_secs, 30);
    }
}
