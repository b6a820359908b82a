use crate::domain::{format_seconds, ChartSnapshot, Task};
use crate::store::TaskStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Pad or cut a cell to a fixed display width (counted in chars)
fn cell(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Plain-text task table, in list order
pub fn render_task_table(tasks: &[Task]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} {} {} {} {}\n",
        cell("#", 3),
        cell("Name", 24),
        cell("Prog", 5),
        cell("Due", 9),
        cell("Worker", 12),
        cell("Category", 12)
    ));

    for (idx, task) in tasks.iter().enumerate() {
        out.push_str(&format!(
            "{} {} {} {} {} {} {}\n",
            cell(&(idx + 1).to_string(), 3),
            cell(&task.name, 24),
            cell(&format!("{}%", task.progress), 5),
            cell(task.deadline_short(), 9),
            cell(&task.worker, 12),
            cell(&task.category, 12),
            task.actual_formatted()
        ));
    }

    if tasks.is_empty() {
        out.push_str("(no tasks)\n");
    }

    out
}

/// Markdown breakdown of accumulated time per task name and category
pub fn render_chart_report(snapshot: &ChartSnapshot) -> String {
    let mut report = String::new();
    let grand_total: u64 = snapshot.bars.iter().map(|bar| bar.total_secs).sum();

    report.push_str("# Time by Task\n\n");
    report.push_str(&format!("- **Tasks:** {}\n", snapshot.bars.len()));
    report.push_str(&format!("- **Total Time:** {}\n\n", format_seconds(grand_total)));

    if snapshot.is_empty() {
        report.push_str("No task data to show.\n");
        return report;
    }

    for bar in &snapshot.bars {
        let share = if grand_total > 0 {
            bar.total_secs as f64 / grand_total as f64 * 100.0
        } else {
            0.0
        };
        report.push_str(&format!(
            "## {}\n\n- **Total:** {} ({:.2}h, {} of all time)\n",
            bar.label,
            format_seconds(bar.total_secs),
            bar.total_hours(),
            format_percent(share)
        ));
        for (category, secs) in &bar.segments {
            report.push_str(&format!("  - {}: {}\n", category, format_seconds(*secs)));
        }
        report.push('\n');
    }

    // Category totals, in legend order
    report.push_str("## By Category\n\n");
    for category in &snapshot.categories {
        let secs: u64 = snapshot.bars.iter().map(|bar| bar.seconds_for(category)).sum();
        if secs > 0 {
            report.push_str(&format!("- **{}:** {}\n", category, format_seconds(secs)));
        }
    }

    report
}

/// Full report for the CLI: task table followed by the time breakdown
pub fn generate_report(store: &TaskStore) -> String {
    let mut report = String::new();
    report.push_str("```\n");
    report.push_str(&render_task_table(store.tasks()));
    report.push_str("```\n\n");
    report.push_str(&render_chart_report(&store.chart()));
    report
}

/// Write the report to `output`, or return it for stdout when no path is given
pub fn write_report(store: &TaskStore, output: Option<&Path>) -> Result<Option<PathBuf>> {
    let report = generate_report(store);
    match output {
        Some(path) => {
            fs::write(path, report)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => {
            print!("{}", report);
            Ok(None)
        }
    }
}
