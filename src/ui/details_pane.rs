use crate::app::AppState;
use crate::domain::format_seconds;
use crate::ui::styles::{border_style, default_style, gauge_style, running_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(task) = app.selected_task() else {
        f.render_widget(Paragraph::new("No task selected").block(block), area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .percent(task.progress.min(100) as u16)
        .label(format!("{}%", task.progress));
    f.render_widget(gauge, chunks[0]);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled("Task:     ", title_style()),
        Span::raw(task.name.as_str()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Worker:   ", title_style()),
        Span::raw(task.worker.as_str()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Estimate: ", title_style()),
        Span::raw(format!("{} h", task.estimate)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Period:   ", title_style()),
        Span::raw(format!("{} - {}", task.start_date, task.end_date)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Category: ", title_style()),
        Span::raw(task.category.as_str()),
    ]));
    lines.push(Line::raw(""));

    // Session timer, only counting for the task it was started on
    let timing_this = app.is_timer_running() && app.timer_task == Some(app.selected_index);
    let (session, session_style) = if timing_this {
        let since = app
            .timer
            .started_at()
            .map(|t| format!("  (since {})", t.format("%H:%M")))
            .unwrap_or_default();
        (format!("{}{}", format_seconds(app.timer_elapsed()), since), running_style())
    } else {
        (format_seconds(0), default_style())
    };
    lines.push(Line::from(vec![
        Span::styled("Session:  ", title_style()),
        Span::styled(session, session_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Total:    ", title_style()),
        Span::raw(task.actual_formatted()),
    ]));
    lines.push(Line::raw(""));

    if task.memo.trim().is_empty() {
        lines.push(Line::from(Span::styled("Memo: (empty)", default_style())));
    } else {
        lines.push(Line::from(Span::styled("Memo:", title_style())));
        for memo_line in task.memo.lines() {
            lines.push(Line::raw(format!("  {}", memo_line)));
        }
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[1]);
}
