use crate::app::AppState;
use crate::domain::Task;
use crate::ui::styles::{
    border_style, default_style, header_style, running_selected_style, selected_style,
    title_style,
};
use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

const COLUMNS: [&str; 5] = ["Task", "Progress", "Due", "Worker", "Category"];

/// Cell texts for one row: name, progress, short deadline, worker, category
fn task_cells(task: &Task) -> [String; 5] {
    [
        task.name.clone(),
        format!("{}%", task.progress),
        task.deadline_short().to_string(),
        task.worker.clone(),
        task.category.clone(),
    ]
}

/// Render the task table
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let highlight = if app.is_timer_running() {
        running_selected_style()
    } else {
        selected_style()
    };

    let rows: Vec<Row> = app
        .store
        .tasks()
        .iter()
        .map(|task| Row::new(task_cells(task).map(Cell::from)).style(default_style()))
        .collect();

    let header = Row::new(COLUMNS.map(Cell::from)).style(header_style());

    let widths = [
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let title = format!(" Tasks ({}) ", app.store.tasks().len());
    let table = Table::new(rows, widths)
        .header(header)
        .highlight_style(highlight)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(title, title_style())),
        );

    // The table scrolls itself to keep the selected row visible
    let mut state = TableState::default();
    if app.selected_task().is_some() {
        state.select(Some(app.selected_index));
    }
    f.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use crate::store::TaskStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_task_cells() {
        let mut draft = TaskDraft::new("Write proposal");
        draft.end_date = "2024/03/15".to_string();
        draft.worker = "Kim".to_string();
        let mut task = Task::from_draft(draft.normalized());
        task.progress = 40;

        let cells = task_cells(&task);
        assert_eq!(cells[0], "Write proposal");
        assert_eq!(cells[1], "40%");
        assert_eq!(cells[2], "24/03/15");
        assert_eq!(cells[3], "Kim");
        assert_eq!(cells[4], "-");
    }

    #[test]
    fn test_selected_row_stays_visible() {
        let mut store = TaskStore::in_memory();
        for i in 0..30 {
            store.create_task(TaskDraft::new(format!("Task{:02}", i))).unwrap();
        }
        let mut app = AppState::new(store);
        app.selected_index = 29;

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| render_list_pane(f, &app, f.size()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Task29"));
        assert!(!text.contains("Task00"));
    }
}
