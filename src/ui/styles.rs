use crate::domain::MessageKind;
use ratatui::style::{Color, Modifier, Style};

/// Category palette (20 colours, light/dark pairs), cycled by category index
const CATEGORY_PALETTE: [(u8, u8, u8); 20] = [
    (31, 119, 180),
    (174, 199, 232),
    (255, 127, 14),
    (255, 187, 120),
    (44, 160, 44),
    (152, 223, 138),
    (214, 39, 40),
    (255, 152, 150),
    (148, 103, 189),
    (197, 176, 213),
    (140, 86, 75),
    (196, 156, 148),
    (227, 119, 194),
    (247, 182, 210),
    (127, 127, 127),
    (199, 199, 199),
    (188, 189, 34),
    (219, 219, 141),
    (23, 190, 207),
    (158, 218, 229),
];

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Selected row while the timer locks the selection
pub fn running_selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Running timer label style
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Column header style
pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Progress gauge style
pub fn gauge_style() -> Style {
    Style::default().fg(Color::Green).bg(Color::DarkGray)
}

/// Status bar style for each message severity
pub fn message_style(kind: MessageKind) -> Style {
    match kind {
        MessageKind::Info => Style::default().fg(Color::Green),
        MessageKind::Warning => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        MessageKind::Error => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

/// Fill colour for the category at `index` in the legend
pub fn category_color(index: usize) -> Color {
    let (r, g, b) = CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()];
    Color::Rgb(r, g, b)
}

/// Black or white, whichever reads better on `background`
pub fn text_color_on(background: Color) -> Color {
    match background {
        Color::Rgb(r, g, b) => {
            let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            if luminance > 140.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => Color::White,
    }
}

/// Segment style: category fill with a readable label colour
pub fn segment_style(index: usize) -> Style {
    let fill = category_color(index);
    Style::default().bg(fill).fg(text_color_on(fill))
}
