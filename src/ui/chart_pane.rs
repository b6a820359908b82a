use crate::app::{AppState, ChartView};
use crate::domain::{format_seconds, ChartBar};
use crate::ui::{
    layout::{create_overlay_area, scroll_to_show},
    styles::{
        border_style, category_color, default_style, hint_style, modal_bg_style,
        modal_title_style, segment_style, selected_style,
    },
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const TOTAL_WIDTH: usize = 10;

/// One coloured run of a stacked bar
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    category_index: usize,
    width: usize,
    secs: u64,
}

/// Split `width` cells across the bar's segments in proportion to `max_total`.
/// Cumulative rounding keeps the runs from overflowing the bar.
fn layout_segments(bar: &ChartBar, categories: &[String], max_total: u64, width: usize) -> Vec<Segment> {
    if max_total == 0 || width == 0 {
        return Vec::new();
    }

    let mut cumulative = 0u64;
    let mut prev_end = 0usize;
    bar.segments
        .iter()
        .map(|(category, secs)| {
            cumulative += secs;
            let end = ((cumulative as f64 / max_total as f64) * width as f64).round() as usize;
            let end = end.min(width);
            let segment = Segment {
                category_index: categories.iter().position(|c| c == category).unwrap_or(0),
                width: end.saturating_sub(prev_end),
                secs: *secs,
            };
            prev_end = end.max(prev_end);
            segment
        })
        .collect()
}

/// Inline text for a segment: its time when big enough and when it fits
fn segment_label(segment: &Segment, labelled: bool) -> String {
    let text = format_seconds(segment.secs);
    if labelled && text.chars().count() <= segment.width {
        format!("{:^width$}", text, width = segment.width)
    } else {
        " ".repeat(segment.width)
    }
}

fn legend_line(categories: &[String]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (idx, name) in categories.iter().enumerate() {
        spans.push(Span::styled("  ", Style::default().bg(category_color(idx))));
        spans.push(Span::raw(format!(" {}   ", name)));
    }
    Line::from(spans)
}

fn bar_line(
    view: &ChartView,
    idx: usize,
    bar: &ChartBar,
    label_width: usize,
    bar_width: usize,
) -> Line<'static> {
    let snapshot = &view.snapshot;
    let selectable = snapshot.is_selectable();
    let hidden = view.is_hidden(&bar.label);

    let mut spans = Vec::new();
    if selectable {
        let marker = if hidden { "[ ] " } else { "[x] " };
        let style = if idx == view.cursor {
            selected_style()
        } else {
            default_style()
        };
        spans.push(Span::styled(marker, style));
        spans.push(Span::styled(
            format!("{:<width$} ", truncate(&bar.label, label_width), width = label_width),
            style,
        ));
    } else {
        spans.push(Span::raw(format!(
            "{:<width$} ",
            truncate(&bar.label, label_width),
            width = label_width
        )));
    }

    if hidden {
        return Line::from(spans);
    }

    let max_total = snapshot.max_total(&view.hidden);
    let mut used = 0;
    for segment in layout_segments(bar, &snapshot.categories, max_total, bar_width) {
        used += segment.width;
        let labelled = snapshot.shows_label(segment.secs, &view.hidden);
        spans.push(Span::styled(
            segment_label(&segment, labelled),
            segment_style(segment.category_index),
        ));
    }
    spans.push(Span::raw(" ".repeat(bar_width.saturating_sub(used) + 1)));
    spans.push(Span::styled(format_seconds(bar.total_secs), modal_title_style()));

    Line::from(spans)
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Render the stacked time-per-task chart
pub fn render_chart_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(view) = &app.chart else {
        return;
    };
    let overlay = create_overlay_area(area);
    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Time by Task ", modal_title_style()))
        .style(modal_bg_style());
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let snapshot = &view.snapshot;
    let label_width = snapshot
        .bars
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, (inner.width as usize / 3).max(4));
    let marker_width = if snapshot.is_selectable() { 4 } else { 0 };
    let bar_width = (inner.width as usize)
        .saturating_sub(marker_width + label_width + 1 + TOTAL_WIDTH + 1);

    let mut header = vec![legend_line(&snapshot.categories), Line::raw("")];
    if snapshot.visible(&view.hidden).next().is_none() {
        header.push(Line::styled(
            " No tasks selected. Press a to show all.",
            hint_style(),
        ));
        header.push(Line::raw(""));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header.len() as u16), Constraint::Min(0)])
        .split(inner);
    f.render_widget(Paragraph::new(header), chunks[0]);

    // Bars scroll so the cursor row stays on screen
    let bars: Vec<Line> = snapshot
        .bars
        .iter()
        .enumerate()
        .map(|(idx, bar)| bar_line(view, idx, bar, label_width, bar_width))
        .collect();
    let offset = scroll_to_show(view.cursor, chunks[1].height);
    f.render_widget(Paragraph::new(bars).scroll((offset, 0)), chunks[1]);
}
