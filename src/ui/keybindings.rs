use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{hint_style, message_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Hints for the current mode
fn hints_for(mode: UiMode) -> &'static str {
    match mode {
        UiMode::Normal => {
            " ↑/↓ select   Shift+↑/↓ reorder   Enter start/stop   +/- progress   a add   e edit   d delete   n memo   c categories   g chart   q quit"
        }
        UiMode::Form => " Tab/↑/↓ field   ←/→ change   Enter save   Esc cancel",
        UiMode::Confirm => " y confirm   n cancel",
        UiMode::Categories => " ↑/↓ select   Shift+↑/↓ reorder   a add   d delete   Esc close",
        UiMode::CategoryPrompt => " Enter add   Esc cancel",
        UiMode::Chart => " ↑/↓ select   Space show/hide   a all   n none   Esc close",
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints_for(app.ui_mode))).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the status message bar
pub fn render_status_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(
            format!(" {}", status.text),
            message_style(status.kind),
        )),
        None => Line::raw(""),
    };
    f.render_widget(Paragraph::new(line), area);
}
