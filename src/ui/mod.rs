#[cfg(feature = "chart")]
pub mod chart_pane;
pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use crate::domain::{ConfirmAction, UiMode};
use details_pane::render_details_pane;
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status_bar};
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_category_manager, render_confirm_modal};
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);
    render_details_pane(f, app, layout.details_area);
    render_status_bar(f, app, layout.status_area);

    match app.ui_mode {
        UiMode::Normal => {}
        UiMode::Form => render_input_form(f, app, size),
        UiMode::Categories | UiMode::CategoryPrompt => render_category_manager(f, app, size),
        UiMode::Confirm => {
            // Category deletion is confirmed on top of the manager
            if matches!(app.confirm, Some(ConfirmAction::DeleteCategory(_))) {
                render_category_manager(f, app, size);
            }
            render_confirm_modal(f, app, size);
        }
        UiMode::Chart => {
            #[cfg(feature = "chart")]
            chart_pane::render_chart_pane(f, app, size);
        }
    }
}
