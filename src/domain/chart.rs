use super::task::Task;
use std::collections::{HashMap, HashSet};

/// One stacked bar: total time for a task name, split by category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBar {
    pub label: String,
    pub total_secs: u64,
    /// (category, seconds) in the snapshot's category order, zero entries omitted
    pub segments: Vec<(String, u64)>,
}

impl ChartBar {
    pub fn total_hours(&self) -> f64 {
        self.total_secs as f64 / 3600.0
    }

    pub fn seconds_for(&self, category: &str) -> u64 {
        self.segments
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, secs)| *secs)
            .unwrap_or(0)
    }
}

/// Read-only aggregation of accumulated time, consumed by the chart view and reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSnapshot {
    /// Legend order: the store's categories, then any unknown ones referenced by tasks
    pub categories: Vec<String>,
    /// Sorted by total, largest first
    pub bars: Vec<ChartBar>,
}

impl ChartSnapshot {
    /// Sum `actual_sec` per task name, subdivided by category
    pub fn from_store(tasks: &[Task], categories: &[String]) -> Self {
        let mut legend: Vec<String> = categories.to_vec();
        let mut known: HashSet<&str> = categories.iter().map(String::as_str).collect();

        // name -> category -> seconds, keeping first-seen order of names
        let mut order: Vec<&str> = Vec::new();
        let mut sums: HashMap<&str, HashMap<&str, u64>> = HashMap::new();

        for task in tasks {
            if known.insert(task.category.as_str()) {
                legend.push(task.category.clone());
            }
            let per_category = sums.entry(task.name.as_str()).or_insert_with(|| {
                order.push(task.name.as_str());
                HashMap::new()
            });
            *per_category.entry(task.category.as_str()).or_insert(0) += task.actual_sec;
        }

        let mut bars: Vec<ChartBar> = order
            .into_iter()
            .map(|name| {
                let per_category = &sums[name];
                let segments: Vec<(String, u64)> = legend
                    .iter()
                    .filter_map(|category| {
                        per_category
                            .get(category.as_str())
                            .filter(|secs| **secs > 0)
                            .map(|secs| (category.clone(), *secs))
                    })
                    .collect();
                ChartBar {
                    label: name.to_string(),
                    total_secs: per_category.values().sum(),
                    segments,
                }
            })
            .collect();

        // Stable sort keeps first-seen order for equal totals
        bars.sort_by(|a, b| b.total_secs.cmp(&a.total_secs));

        Self {
            categories: legend,
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars whose label isn't in `hidden`
    pub fn visible<'a>(&'a self, hidden: &'a HashSet<String>) -> impl Iterator<Item = &'a ChartBar> {
        self.bars.iter().filter(move |bar| !hidden.contains(&bar.label))
    }

    /// Largest total among the visible bars
    pub fn max_total(&self, hidden: &HashSet<String>) -> u64 {
        self.visible(hidden).map(|bar| bar.total_secs).max().unwrap_or(0)
    }

    /// Segments shorter than 2% of the largest visible bar get no inline label
    pub fn shows_label(&self, secs: u64, hidden: &HashSet<String>) -> bool {
        secs.saturating_mul(50) >= self.max_total(hidden)
    }

    /// Whether per-bar selection is offered (only worthwhile for longer charts)
    pub fn is_selectable(&self) -> bool {
        self.bars.len() >= 5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskDraft;
    use pretty_assertions::assert_eq;

    fn task(name: &str, category: &str, secs: u64) -> Task {
        let mut draft = TaskDraft::new(name);
        draft.category = category.to_string();
        let mut task = Task::from_draft(draft.normalized());
        task.actual_sec = secs;
        task
    }

    fn categories(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_groups_by_name_and_category() {
        let tasks = vec![
            task("Design", "dev", 600),
            task("Review", "-", 300),
            task("Design", "meeting", 1200),
            task("Design", "dev", 60),
        ];
        let snapshot = ChartSnapshot::from_store(&tasks, &categories(&["-", "dev", "meeting"]));

        assert_eq!(snapshot.bars.len(), 2);
        assert_eq!(snapshot.bars[0].label, "Design");
        assert_eq!(snapshot.bars[0].total_secs, 1860);
        assert_eq!(
            snapshot.bars[0].segments,
            vec![("dev".to_string(), 660), ("meeting".to_string(), 1200)]
        );
        assert_eq!(snapshot.bars[1].label, "Review");
        assert_eq!(snapshot.bars[1].seconds_for("-"), 300);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let tasks = vec![task("A", "-", 10), task("B", "-", 50), task("C", "-", 10)];
        let snapshot = ChartSnapshot::from_store(&tasks, &categories(&["-"]));
        let labels: Vec<&str> = snapshot.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_unknown_category_is_appended_to_legend() {
        let tasks = vec![task("A", "ghost", 10)];
        let snapshot = ChartSnapshot::from_store(&tasks, &categories(&["-", "dev"]));
        assert_eq!(snapshot.categories, categories(&["-", "dev", "ghost"]));
        assert_eq!(snapshot.bars[0].seconds_for("ghost"), 10);
    }

    #[test]
    fn test_visible_and_threshold() {
        let tasks = vec![task("A", "-", 5000), task("B", "-", 100)];
        let snapshot = ChartSnapshot::from_store(&tasks, &categories(&["-"]));

        let none_hidden = HashSet::new();
        assert_eq!(snapshot.visible(&none_hidden).count(), 2);
        assert!(snapshot.shows_label(100, &none_hidden));
        assert!(!snapshot.shows_label(99, &none_hidden));

        let hidden: HashSet<String> = ["A".to_string()].into_iter().collect();
        assert_eq!(snapshot.visible(&hidden).count(), 1);
        assert_eq!(snapshot.max_total(&hidden), 100);
    }

    #[test]
    fn test_label_threshold_is_not_rounded_down() {
        // 2% of 149s is 2.98s, so a 2s segment stays unlabelled
        let tasks = vec![task("A", "-", 147), task("A", "dev", 2)];
        let snapshot = ChartSnapshot::from_store(&tasks, &categories(&["-", "dev"]));
        let none_hidden = HashSet::new();

        assert_eq!(snapshot.max_total(&none_hidden), 149);
        assert!(!snapshot.shows_label(2, &none_hidden));
        assert!(snapshot.shows_label(3, &none_hidden));
    }

    #[test]
    fn test_empty_store_gives_empty_snapshot() {
        let snapshot = ChartSnapshot::from_store(&[], &categories(&["-"]));
        assert!(snapshot.is_empty());
        assert!(!snapshot.is_selectable());
    }
}
