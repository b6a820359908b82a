use crate::app::AppState;
use crate::domain::{ConfirmAction, UiMode};
use crate::ui::{
    layout::create_modal_area,
    styles::{default_style, hint_style, modal_bg_style, modal_title_style, selected_style},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, modal_title_style()))
        .style(modal_bg_style())
}

/// Question asked before a destructive action
fn confirm_message(app: &AppState, action: &ConfirmAction) -> String {
    match action {
        ConfirmAction::DeleteTask(index) => {
            let name = app
                .store
                .tasks()
                .get(*index)
                .map(|t| t.name.as_str())
                .unwrap_or("?");
            format!("Delete task '{}'?", name)
        }
        ConfirmAction::DeleteCategory(name) => {
            let affected = app
                .store
                .tasks()
                .iter()
                .filter(|t| t.category == *name)
                .count();
            format!(
                "Delete category '{}'? {} task(s) will move to '-'.",
                name, affected
            )
        }
    }
}

/// Render the y/n confirmation modal
pub fn render_confirm_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(action) = &app.confirm else {
        return;
    };
    let modal_area = create_modal_area(area, 7);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", confirm_message(app, action))),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Delete  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(modal_block(" Confirm "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}

/// Render the category manager: scrolling list with the prompt pinned below it
pub fn render_category_manager(f: &mut Frame, app: &AppState, area: Rect) {
    let categories = app.store.categories();
    let height = (categories.len() as u16 + 6).clamp(8, area.height.max(8));
    let modal_area = create_modal_area(area, height);
    f.render_widget(Clear, modal_area);

    let block = modal_block(" Categories ");
    let inner = block.inner(modal_area);
    f.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Category list
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Prompt or hints
        ])
        .split(inner);

    let items: Vec<ListItem> = categories
        .iter()
        .map(|name| ListItem::new(format!("  {}  ", name)).style(default_style()))
        .collect();
    let list = List::new(items).highlight_style(selected_style());
    let mut state = ListState::default();
    if app.category_index < categories.len() {
        state.select(Some(app.category_index));
    }
    f.render_stateful_widget(list, chunks[1], &mut state);

    let footer = if app.ui_mode == UiMode::CategoryPrompt {
        Line::from(vec![
            Span::raw("  New category > "),
            Span::styled(app.category_input.as_str(), modal_title_style()),
            Span::styled("█", modal_title_style()),
        ])
    } else {
        Line::styled(
            "  a add  ·  d delete  ·  Shift+↑/↓ reorder  ·  Esc close",
            hint_style(),
        )
    };
    f.render_widget(Paragraph::new(footer), chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use crate::store::TaskStore;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_confirm_message_counts_affected_tasks() {
        let mut store = TaskStore::in_memory();
        store.add_category("dev").unwrap();
        let mut draft = TaskDraft::new("A");
        draft.category = "dev".to_string();
        store.create_task(draft.clone()).unwrap();
        store.create_task(draft).unwrap();
        let app = AppState::new(store);

        let message = confirm_message(&app, &ConfirmAction::DeleteCategory("dev".to_string()));
        assert!(message.contains("2 task(s)"));

        let message = confirm_message(&app, &ConfirmAction::DeleteTask(0));
        assert_eq!(message, "Delete task 'A'?");
    }

    #[test]
    fn test_category_manager_scrolls_and_keeps_prompt() {
        let mut store = TaskStore::in_memory();
        for i in 0..30 {
            store.add_category(&format!("cat{:02}", i)).unwrap();
        }
        let mut app = AppState::new(store);
        app.open_categories();
        app.category_index = 30;
        app.start_category_prompt();

        let mut terminal = Terminal::new(TestBackend::new(80, 14)).unwrap();
        terminal
            .draw(|f| render_category_manager(f, &app, f.size()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("cat29"));
        assert!(!text.contains("cat00"));
        assert!(text.contains("New category >"));
    }
}
