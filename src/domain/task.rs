use chrono::{Datelike, Local};
use serde::{Deserialize, Deserializer, Serialize};

/// Name of the placeholder category every store carries
pub const DEFAULT_CATEGORY: &str = "-";

/// A tracked unit of work, stored verbatim in the data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub name: String,
    #[serde(default = "placeholder")]
    pub worker: String,
    /// Estimated hours, kept as the text the user typed
    #[serde(default = "zero_text", deserialize_with = "text_or_number")]
    pub estimate: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default = "placeholder")]
    pub category: String,
    /// Accumulated seconds across all timer sessions
    #[serde(default, deserialize_with = "whole_seconds")]
    pub actual_sec: u64,
    /// Completion percentage (0-100)
    #[serde(default, deserialize_with = "clamped_percent")]
    pub progress: u8,
    #[serde(default)]
    pub memo: String,
}

fn placeholder() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn zero_text() -> String {
    "0".to_string()
}

/// Accept `"1.5"` as well as `1.5` for the estimate field
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

/// Integers and floats alike; fractions are truncated toward zero
fn truncated_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    Ok(match (number.as_i64(), number.as_u64()) {
        (Some(value), _) => value as f64,
        (None, Some(value)) => value as f64,
        (None, None) => number.as_f64().unwrap_or(0.0).trunc(),
    })
}

/// Accumulated seconds written as `12` or `12.0`; negatives read as zero
fn whole_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = truncated_number(deserializer)?;
    Ok(if value <= 0.0 { 0 } else { value as u64 })
}

/// Out-of-range progress values in hand-edited files are clamped, not rejected
fn clamped_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(clamp_progress(truncated_number(deserializer)? as i64))
}

/// Clamp a requested progress value to 0..=100
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

impl Task {
    /// Build a fresh task from a submitted form (no time, no progress, no memo)
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            name: draft.name,
            worker: draft.worker,
            estimate: draft.estimate,
            start_date: draft.start_date,
            end_date: draft.end_date,
            category: draft.category,
            actual_sec: 0,
            progress: 0,
            memo: String::new(),
        }
    }

    /// Overwrite the form-editable fields, keeping time, progress and memo
    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.name = draft.name;
        self.worker = draft.worker;
        self.estimate = draft.estimate;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.category = draft.category;
    }

    /// End date without the century, as shown in the list ("2025/03/01" -> "25/03/01")
    pub fn deadline_short(&self) -> &str {
        match self.end_date.char_indices().nth(2) {
            Some((split, _)) => &self.end_date[split..],
            None => "",
        }
    }

    /// Accumulated time as HH:MM:SS
    pub fn actual_formatted(&self) -> String {
        format_seconds(self.actual_sec)
    }
}

/// Payload of the add/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub worker: String,
    pub estimate: String,
    pub start_date: String,
    pub end_date: String,
    pub category: String,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Apply the form defaults: trimmed name, "-" worker/category, "0" estimate
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        if self.worker.is_empty() {
            self.worker = placeholder();
        }
        if self.estimate.is_empty() {
            self.estimate = zero_text();
        }
        if self.category.is_empty() {
            self.category = placeholder();
        }
        self
    }

    /// Pre-fill a draft from an existing task (edit mode)
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            worker: task.worker.clone(),
            estimate: task.estimate.clone(),
            start_date: task.start_date.clone(),
            end_date: task.end_date.clone(),
            category: task.category.clone(),
        }
    }
}

/// A date picked from year/month/day selectors, not validated against the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateParts {
    pub fn today() -> Self {
        let now = Local::now();
        Self {
            year: now.year(),
            month: now.month(),
            day: now.day(),
        }
    }

    /// Years offered by the selector: one back, five ahead
    pub fn year_range(current: i32) -> std::ops::RangeInclusive<i32> {
        (current - 1)..=(current + 5)
    }

    /// Parse "Y/M/D" text; None when it doesn't look like a date
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split('/');
        let year = parts.next()?.trim().parse().ok()?;
        let month = parts.next()?.trim().parse().ok()?;
        let day = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self { year, month, day })
    }

    pub fn format(&self) -> String {
        format!("{}/{:02}/{:02}", self.year, self.month, self.day)
    }

    /// Step the year within the selector range around `current`, wrapping
    pub fn cycle_year(&mut self, current: i32, forward: bool) {
        let range = Self::year_range(current);
        let (lo, hi) = (*range.start(), *range.end());
        self.year = if !range.contains(&self.year) {
            current
        } else if forward {
            if self.year >= hi { lo } else { self.year + 1 }
        } else if self.year <= lo {
            hi
        } else {
            self.year - 1
        };
    }

    pub fn cycle_month(&mut self, forward: bool) {
        self.month = wrap_step(self.month, 12, forward);
    }

    pub fn cycle_day(&mut self, forward: bool) {
        self.day = wrap_step(self.day, 31, forward);
    }
}

fn wrap_step(value: u32, max: u32, forward: bool) -> u32 {
    match (forward, value) {
        (true, v) if v >= max => 1,
        (true, v) => v + 1,
        (false, v) if v <= 1 => max,
        (false, v) => v - 1,
    }
}

/// Format seconds as HH:MM:SS (hours are not capped)
pub fn format_seconds(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "00:00:00");
        assert_eq!(format_seconds(59), "00:00:59");
        assert_eq!(format_seconds(3661), "01:01:01");
        assert_eq!(format_seconds(100 * 3600), "100:00:00");
    }

    #[test]
    fn test_draft_normalized_defaults() {
        let draft = TaskDraft::new("  Write report  ").normalized();
        assert_eq!(draft.name, "Write report");
        assert_eq!(draft.worker, "-");
        assert_eq!(draft.estimate, "0");
        assert_eq!(draft.category, "-");
    }

    #[test]
    fn test_task_from_json_with_missing_fields() {
        let task: Task = serde_json::from_str(r#"{"name": "Legacy"}"#).unwrap();
        assert_eq!(task.name, "Legacy");
        assert_eq!(task.worker, "-");
        assert_eq!(task.estimate, "0");
        assert_eq!(task.category, "-");
        assert_eq!(task.actual_sec, 0);
        assert_eq!(task.progress, 0);
        assert!(task.memo.is_empty());
    }

    #[test]
    fn test_numeric_estimate_is_kept_as_text() {
        let task: Task = serde_json::from_str(r#"{"name": "A", "estimate": 2.5}"#).unwrap();
        assert_eq!(task.estimate, "2.5");

        let task: Task = serde_json::from_str(r#"{"name": "B", "estimate": "abc"}"#).unwrap();
        assert_eq!(task.estimate, "abc");
    }

    #[test]
    fn test_progress_is_clamped_on_load() {
        let task: Task = serde_json::from_str(r#"{"name": "A", "progress": 140}"#).unwrap();
        assert_eq!(task.progress, 100);

        let task: Task = serde_json::from_str(r#"{"name": "A", "progress": -3}"#).unwrap();
        assert_eq!(task.progress, 0);
    }

    #[test]
    fn test_float_numbers_are_truncated_on_load() {
        let task: Task =
            serde_json::from_str(r#"{"name": "A", "progress": 50.7, "actual_sec": 12.9}"#).unwrap();
        assert_eq!(task.progress, 50);
        assert_eq!(task.actual_sec, 12);

        let task: Task =
            serde_json::from_str(r#"{"name": "A", "progress": 250.0, "actual_sec": -4.5}"#)
                .unwrap();
        assert_eq!(task.progress, 100);
        assert_eq!(task.actual_sec, 0);
    }

    #[test]
    fn test_apply_draft_keeps_tracking_fields() {
        let mut task = Task::from_draft(TaskDraft::new("Old").normalized());
        task.actual_sec = 120;
        task.progress = 40;
        task.memo = "notes".to_string();

        let mut draft = TaskDraft::new("New");
        draft.worker = "Kim".to_string();
        task.apply_draft(draft.normalized());

        assert_eq!(task.name, "New");
        assert_eq!(task.worker, "Kim");
        assert_eq!(task.actual_sec, 120);
        assert_eq!(task.progress, 40);
        assert_eq!(task.memo, "notes");
    }

    #[test]
    fn test_deadline_short() {
        let mut task = Task::from_draft(TaskDraft::new("A").normalized());
        task.end_date = "2025/03/01".to_string();
        assert_eq!(task.deadline_short(), "25/03/01");

        task.end_date = String::new();
        assert_eq!(task.deadline_short(), "");

        // Counts characters, not bytes
        task.end_date = "令和7年3月1日".to_string();
        assert_eq!(task.deadline_short(), "7年3月1日");

        task.end_date = "x".to_string();
        assert_eq!(task.deadline_short(), "");
    }

    #[test]
    fn test_date_parts_parse_and_format() {
        let date = DateParts::parse("2025/3/7").unwrap();
        assert_eq!(date, DateParts { year: 2025, month: 3, day: 7 });
        assert_eq!(date.format(), "2025/03/07");

        assert!(DateParts::parse("").is_none());
        assert!(DateParts::parse("2025/13/01").is_none());
        assert!(DateParts::parse("soon").is_none());
        assert!(DateParts::parse("2025/01/01/01").is_none());
    }

    #[test]
    fn test_date_parts_cycle_wraps() {
        let mut date = DateParts { year: 2031, month: 12, day: 31 };
        date.cycle_year(2026, true);
        date.cycle_month(true);
        date.cycle_day(true);
        assert_eq!(date, DateParts { year: 2025, month: 1, day: 1 });

        date.cycle_year(2026, false);
        date.cycle_month(false);
        date.cycle_day(false);
        assert_eq!(date, DateParts { year: 2031, month: 12, day: 31 });
    }

    #[test]
    fn test_year_outside_range_snaps_to_current() {
        let mut date = DateParts { year: 1999, month: 1, day: 1 };
        date.cycle_year(2026, true);
        assert_eq!(date.year, 2026);
    }
}
