use crate::app::{AppState, FormState};
use crate::domain::{DateParts, FormField};
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style, selected_style},
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const FORM_HEIGHT: u16 = 16;

fn field_style(form: &FormState, field: FormField) -> Style {
    if form.field == field {
        selected_style()
    } else {
        modal_title_style()
    }
}

/// One free-text field with a cursor when focused
fn text_line<'a>(form: &'a FormState, field: FormField, value: &'a str) -> Line<'a> {
    let focused = form.field == field;
    Line::from(vec![
        Span::raw(format!("{:<13}", field.label())),
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if focused {
            Span::styled("█", modal_title_style())
        } else {
            Span::raw("")
        },
    ])
}

/// Year / month / day selectors for one date
fn date_line(form: &FormState, date: &DateParts, fields: [FormField; 3]) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<13}", fields[0].label())),
        Span::raw("  "),
        Span::styled(format!("‹{:04}›", date.year), field_style(form, fields[0])),
        Span::raw(" / "),
        Span::styled(format!("‹{:02}›", date.month), field_style(form, fields[1])),
        Span::raw(" / "),
        Span::styled(format!("‹{:02}›", date.day), field_style(form, fields[2])),
    ])
}

/// Render the add/edit task form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.form else {
        return;
    };
    let modal_area = create_modal_area(area, FORM_HEIGHT);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let title_text = if form.is_editing() {
        " Edit Task "
    } else {
        " Add Task "
    };

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.push(text_line(form, FormField::Name, &form.name));
    lines.push(text_line(form, FormField::Worker, &form.worker));
    lines.push(text_line(form, FormField::Estimate, &form.estimate));
    lines.push(Line::from(vec![
        Span::raw(format!("{:<13}", FormField::Category.label())),
        Span::raw("  "),
        Span::styled(
            format!("‹{}›", form.category),
            field_style(form, FormField::Category),
        ),
    ]));
    lines.push(Line::raw(""));
    lines.push(date_line(
        form,
        &form.start,
        [FormField::StartYear, FormField::StartMonth, FormField::StartDay],
    ));
    lines.push(date_line(
        form,
        &form.end,
        [FormField::EndYear, FormField::EndMonth, FormField::EndDay],
    ));
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Tab to switch fields  ·  ←/→ to change  ·  Enter to save  ·  Esc to cancel",
        hint_style(),
    ));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title_text, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
