use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub list_area: Rect,
    pub details_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: List (65%) | Details (35%)
/// - Bottom bar: status message (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let horizontal_split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65), // List pane
            Constraint::Percentage(35), // Details pane
        ])
        .split(main_chunks[1]);

    MainLayout {
        keybindings_area: main_chunks[0],
        list_area: horizontal_split[0],
        details_area: horizontal_split[1],
        status_area: main_chunks[2],
    }
}

/// Create centered modal area with a fixed height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

/// Near-fullscreen area for the chart view
pub fn create_overlay_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

/// First row to draw so that `row` stays inside a window `height` rows tall
pub fn scroll_to_show(row: usize, height: u16) -> u16 {
    let height = height.max(1) as usize;
    u16::try_from(row.saturating_sub(height - 1)).unwrap_or(u16::MAX)
}
