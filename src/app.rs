use crate::domain::{
    ChartSnapshot, ConfirmAction, DateParts, FormField, MessageKind, SessionTimer, Task, TaskDraft,
    UiMode, DEFAULT_CATEGORY,
};
use crate::store::{StoreError, StoreResult, TaskStore};
use log::{error, info};
use std::collections::HashSet;

/// Progress step for the +/- keys
pub const PROGRESS_STEP: i64 = 5;

/// Input form state for adding or editing a task
#[derive(Debug, Clone)]
pub struct FormState {
    /// Some(index) when editing an existing task
    pub editing_index: Option<usize>,
    pub name: String,
    pub worker: String,
    pub estimate: String,
    pub category: String,
    pub start: DateParts,
    pub end: DateParts,
    pub field: FormField,
    /// Year the selector range is centred on
    pub current_year: i32,
}

impl FormState {
    fn new(category: String) -> Self {
        let today = DateParts::today();
        Self {
            editing_index: None,
            name: String::new(),
            worker: String::new(),
            estimate: String::new(),
            category,
            start: today,
            end: today,
            field: FormField::Name,
            current_year: today.year,
        }
    }

    fn for_task(index: usize, task: &Task) -> Self {
        let today = DateParts::today();
        let draft = TaskDraft::from_task(task);
        Self {
            editing_index: Some(index),
            start: DateParts::parse(&draft.start_date).unwrap_or(today),
            end: DateParts::parse(&draft.end_date).unwrap_or(today),
            name: draft.name,
            worker: draft.worker,
            estimate: draft.estimate,
            category: draft.category,
            field: FormField::Name,
            current_year: today.year,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_index.is_some()
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Name => Some(&mut self.name),
            FormField::Worker => Some(&mut self.worker),
            FormField::Estimate => Some(&mut self.estimate),
            _ => None,
        }
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.clone(),
            worker: self.worker.clone(),
            estimate: self.estimate.clone(),
            start_date: self.start.format(),
            end_date: self.end.format(),
            category: self.category.clone(),
        }
    }
}

/// Message shown in the status bar until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// Chart view state: the aggregation plus which bars are hidden
#[derive(Debug, Clone)]
pub struct ChartView {
    pub snapshot: ChartSnapshot,
    pub hidden: HashSet<String>,
    pub cursor: usize,
}

impl ChartView {
    pub fn new(snapshot: ChartSnapshot) -> Self {
        Self {
            snapshot,
            hidden: HashSet::new(),
            cursor: 0,
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.snapshot.bars.len() {
            self.cursor += 1;
        }
    }

    /// Show/hide the bar under the cursor
    pub fn toggle_current(&mut self) {
        if !self.snapshot.is_selectable() {
            return;
        }
        if let Some(bar) = self.snapshot.bars.get(self.cursor) {
            if !self.hidden.remove(&bar.label) {
                self.hidden.insert(bar.label.clone());
            }
        }
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    pub fn hide_all(&mut self) {
        if self.snapshot.is_selectable() {
            self.hidden = self.snapshot.bars.iter().map(|b| b.label.clone()).collect();
        }
    }

    pub fn is_hidden(&self, label: &str) -> bool {
        self.hidden.contains(label)
    }
}

/// Main application state
pub struct AppState {
    pub store: TaskStore,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmAction>,
    pub timer: SessionTimer,
    /// Task the running timer belongs to
    pub timer_task: Option<usize>,
    pub category_index: usize,
    pub category_input: String,
    pub chart: Option<ChartView>,
    pub status: Option<StatusMessage>,
}

impl AppState {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            form: None,
            confirm: None,
            timer: SessionTimer::new(),
            timer_task: None,
            category_index: 0,
            category_input: String::new(),
            chart: None,
            status: None,
        }
    }

    // --- Status messages ---

    pub fn set_status(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Unwrap a store result, turning failures into a status message
    fn report<T>(&mut self, result: StoreResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.report_error(&err);
                None
            }
        }
    }

    fn report_error(&mut self, err: &StoreError) {
        if err.is_user_error() {
            self.set_status(MessageKind::Warning, capitalize(&err.to_string()));
        } else {
            error!("{}", err);
            self.set_status(MessageKind::Error, format!("Save failed: {}", err));
        }
    }

    // --- Selection ---

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks().get(self.selected_index)
    }

    fn has_selection(&self) -> bool {
        self.selected_index < self.store.tasks().len()
    }

    /// Selection is locked while a session is being timed
    fn selection_locked(&mut self) -> bool {
        if self.is_timer_running() {
            self.set_status(MessageKind::Warning, "Stop the timer first");
            true
        } else {
            false
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selection_locked() {
            return;
        }
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selection_locked() {
            return;
        }
        if self.selected_index + 1 < self.store.tasks().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.store.tasks().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    // --- Reordering ---

    /// Move selected task up in the list
    pub fn move_task_up(&mut self) {
        if self.selection_locked() || !self.has_selection() || self.selected_index == 0 {
            return;
        }
        let from = self.selected_index;
        let result = self.store.move_task(from, from - 1);
        if self.report(result).is_some() {
            self.selected_index = from - 1;
        }
    }

    /// Move selected task down in the list
    pub fn move_task_down(&mut self) {
        if self.selection_locked() || self.selected_index + 1 >= self.store.tasks().len() {
            return;
        }
        let from = self.selected_index;
        let result = self.store.move_task(from, from + 1);
        if self.report(result).is_some() {
            self.selected_index = from + 1;
        }
    }

    // --- Timer ---

    pub fn start_timer(&mut self) {
        if self.is_timer_running() || !self.has_selection() {
            return;
        }
        self.timer.start();
        self.timer_task = Some(self.selected_index);
        if let Some(task) = self.selected_task() {
            info!("timer started for '{}'", task.name);
        }
    }

    /// Stop the timer and add the session to its task; returns the session length
    pub fn stop_timer(&mut self) -> Option<u64> {
        let seconds = self.timer.stop()?;
        let index = self.timer_task.take()?;
        let result = self.store.add_elapsed(index, seconds);
        let total = self.report(result)?;
        info!(
            "timer stopped after {}s, task #{} total {}s",
            seconds, index, total
        );
        Some(seconds)
    }

    pub fn toggle_timer(&mut self) {
        if self.is_timer_running() {
            self.stop_timer();
        } else {
            self.start_timer();
        }
    }

    /// Seconds shown on the running timer label
    pub fn timer_elapsed(&self) -> u64 {
        self.timer.elapsed()
    }

    /// Stop any running session so no measured time is lost on exit
    pub fn shutdown(&mut self) {
        if self.is_timer_running() {
            self.stop_timer();
        }
    }

    // --- Progress & memo ---

    pub fn adjust_progress(&mut self, delta: i64) {
        let index = self.selected_index;
        let Some(current) = self.selected_task().map(|t| t.progress as i64) else {
            return;
        };
        let result = self.store.set_progress(index, current + delta);
        self.report(result);
    }

    pub fn save_memo(&mut self, memo: &str) {
        if !self.has_selection() {
            return;
        }
        let index = self.selected_index;
        let result = self.store.set_memo(index, memo);
        if self.report(result).is_some() {
            self.set_status(MessageKind::Info, "Memo saved");
        }
    }

    // --- Add / edit form ---

    /// Category the form should preselect: the first one in the list
    fn default_category(&self) -> String {
        self.store
            .categories()
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    pub fn start_add_task(&mut self) {
        self.form = Some(FormState::new(self.default_category()));
        self.ui_mode = UiMode::Form;
    }

    pub fn start_edit_task(&mut self) {
        let index = self.selected_index;
        if let Some(task) = self.store.tasks().get(index) {
            self.form = Some(FormState::for_task(index, task));
            self.ui_mode = UiMode::Form;
        }
    }

    pub fn form_next_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.field = form.field.next();
        }
    }

    pub fn form_prev_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.field = form.field.prev();
        }
    }

    pub fn form_add_char(&mut self, c: char) {
        if let Some(text) = self.form.as_mut().and_then(FormState::text_field_mut) {
            text.push(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(text) = self.form.as_mut().and_then(FormState::text_field_mut) {
            text.pop();
        }
    }

    /// Step the selector under the cursor (category, year, month, day)
    pub fn form_cycle(&mut self, forward: bool) {
        let categories = self.store.categories().to_vec();
        let Some(form) = &mut self.form else {
            return;
        };
        let year = form.current_year;
        match form.field {
            FormField::Category => {
                if categories.is_empty() {
                    return;
                }
                let pos = categories.iter().position(|c| *c == form.category);
                let next = match (pos, forward) {
                    (None, _) => 0,
                    (Some(p), true) => (p + 1) % categories.len(),
                    (Some(p), false) => (p + categories.len() - 1) % categories.len(),
                };
                form.category = categories[next].clone();
            }
            FormField::StartYear => form.start.cycle_year(year, forward),
            FormField::StartMonth => form.start.cycle_month(forward),
            FormField::StartDay => form.start.cycle_day(forward),
            FormField::EndYear => form.end.cycle_year(year, forward),
            FormField::EndMonth => form.end.cycle_month(forward),
            FormField::EndDay => form.end.cycle_day(forward),
            FormField::Name | FormField::Worker | FormField::Estimate => {}
        }
    }

    /// Create or update the task; an empty name keeps the form open with a warning
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };
        let draft = form.to_draft();

        let result = match form.editing_index {
            Some(index) => self.store.update_task(index, draft).map(|_| index),
            None => self.store.create_task(draft),
        };

        match result {
            Ok(index) => {
                if !self.is_timer_running() {
                    self.selected_index = index;
                }
                self.form = None;
                self.ui_mode = UiMode::Normal;
            }
            Err(StoreError::EmptyName) => {
                self.set_status(MessageKind::Warning, "Task name is required");
            }
            Err(err) => {
                self.report_error(&err);
                self.form = None;
                self.ui_mode = UiMode::Normal;
            }
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// After category changes, fall back to the first category if the form's is gone
    fn refresh_form_category(&mut self) {
        let fallback = self.default_category();
        let categories = self.store.categories();
        if let Some(form) = &mut self.form {
            if !categories.iter().any(|c| *c == form.category) {
                form.category = fallback;
            }
        }
    }

    // --- Delete with confirmation ---

    pub fn request_delete_task(&mut self) {
        if self.selection_locked() || !self.has_selection() {
            return;
        }
        self.confirm = Some(ConfirmAction::DeleteTask(self.selected_index));
        self.ui_mode = UiMode::Confirm;
    }

    pub fn request_delete_category(&mut self) {
        let Some(name) = self.store.categories().get(self.category_index).cloned() else {
            self.set_status(MessageKind::Warning, "Select a category to delete");
            return;
        };
        if name == DEFAULT_CATEGORY {
            self.report_error(&StoreError::DefaultCategoryProtected);
            return;
        }
        self.confirm = Some(ConfirmAction::DeleteCategory(name));
        self.ui_mode = UiMode::Confirm;
    }

    pub fn confirm_yes(&mut self) {
        match self.confirm.take() {
            Some(ConfirmAction::DeleteTask(index)) => {
                self.ui_mode = UiMode::Normal;
                let result = self.store.delete_task(index);
                if let Some(task) = self.report(result) {
                    info!("deleted task '{}'", task.name);
                    self.clamp_selection();
                }
            }
            Some(ConfirmAction::DeleteCategory(name)) => {
                self.ui_mode = UiMode::Categories;
                let result = self.store.delete_category(&name);
                if let Some(reset) = self.report(result) {
                    self.set_status(
                        MessageKind::Info,
                        format!("Deleted '{}' ({} tasks moved to '-')", name, reset),
                    );
                    self.clamp_category_index();
                    self.refresh_form_category();
                }
            }
            None => self.ui_mode = UiMode::Normal,
        }
    }

    pub fn confirm_no(&mut self) {
        self.ui_mode = match self.confirm.take() {
            Some(ConfirmAction::DeleteCategory(_)) => UiMode::Categories,
            _ => UiMode::Normal,
        };
    }

    // --- Category manager ---

    pub fn open_categories(&mut self) {
        self.category_index = 0;
        self.ui_mode = UiMode::Categories;
    }

    pub fn close_categories(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    pub fn category_selection_up(&mut self) {
        self.category_index = self.category_index.saturating_sub(1);
    }

    pub fn category_selection_down(&mut self) {
        if self.category_index + 1 < self.store.categories().len() {
            self.category_index += 1;
        }
    }

    fn clamp_category_index(&mut self) {
        let len = self.store.categories().len();
        if self.category_index >= len {
            self.category_index = len.saturating_sub(1);
        }
    }

    pub fn move_category_up(&mut self) {
        let from = self.category_index;
        if from == 0 || from >= self.store.categories().len() {
            return;
        }
        let result = self.store.move_category(from, from - 1);
        if self.report(result).is_some() {
            self.category_index = from - 1;
        }
    }

    pub fn move_category_down(&mut self) {
        let from = self.category_index;
        if from + 1 >= self.store.categories().len() {
            return;
        }
        let result = self.store.move_category(from, from + 1);
        if self.report(result).is_some() {
            self.category_index = from + 1;
        }
    }

    pub fn start_category_prompt(&mut self) {
        self.category_input.clear();
        self.ui_mode = UiMode::CategoryPrompt;
    }

    pub fn category_prompt_add_char(&mut self, c: char) {
        self.category_input.push(c);
    }

    pub fn category_prompt_backspace(&mut self) {
        self.category_input.pop();
    }

    /// Add the typed category; blank input just closes the prompt
    pub fn submit_category_prompt(&mut self) {
        let name = std::mem::take(&mut self.category_input);
        self.ui_mode = UiMode::Categories;
        if name.trim().is_empty() {
            return;
        }
        match self.store.add_category(&name) {
            Ok(()) => {
                self.category_index = self.store.categories().len() - 1;
                self.refresh_form_category();
            }
            Err(StoreError::DuplicateCategory(name)) => {
                self.set_status(
                    MessageKind::Info,
                    format!("Category '{}' already exists", name),
                );
            }
            Err(err) => self.report_error(&err),
        }
    }

    pub fn cancel_category_prompt(&mut self) {
        self.category_input.clear();
        self.ui_mode = UiMode::Categories;
    }

    // --- Chart ---

    /// Open the time breakdown chart
    #[cfg(feature = "chart")]
    pub fn open_chart(&mut self) {
        let snapshot = self.store.chart();
        if snapshot.is_empty() {
            self.set_status(MessageKind::Info, "No task data to chart");
            return;
        }
        self.chart = Some(ChartView::new(snapshot));
        self.ui_mode = UiMode::Chart;
    }

    /// Chart support was compiled out; say so instead of opening anything
    #[cfg(not(feature = "chart"))]
    pub fn open_chart(&mut self) {
        self.set_status(
            MessageKind::Error,
            "Chart view unavailable: rebuild with the `chart` feature enabled",
        );
    }

    pub fn close_chart(&mut self) {
        self.chart = None;
        self.ui_mode = UiMode::Normal;
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
