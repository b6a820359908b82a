use crate::app::{AppState, PROGRESS_STEP};
use crate::domain::{MessageKind, UiMode};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use std::env;
use std::fs;
use std::process::Command;
use tempfile::NamedTempFile;

/// Handle keyboard input events; returns true when the app should quit
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    app.clear_status();

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Form => handle_form_mode(app, key),
        UiMode::Confirm => handle_confirm_mode(app, key),
        UiMode::Categories => handle_categories_mode(app, key),
        UiMode::CategoryPrompt => handle_category_prompt_mode(app, key),
        UiMode::Chart => handle_chart_mode(app, key),
    }
}

/// Whether this key spawns the external memo editor (the caller must release the terminal)
pub fn opens_editor(app: &AppState, key: &KeyEvent) -> bool {
    app.ui_mode == UiMode::Normal
        && matches!(key.code, KeyCode::Char('n') | KeyCode::Char('N'))
        && app.selected_task().is_some()
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation (with Shift modifier for reordering)
        KeyCode::Up => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_task_up();
            } else {
                app.move_selection_up();
            }
        }
        KeyCode::Down => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_task_down();
            } else {
                app.move_selection_down();
            }
        }

        // Start/stop the session timer
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_timer(),

        // Progress
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_progress(PROGRESS_STEP),
        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_progress(-PROGRESS_STEP),

        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_task(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_task(),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => app.request_delete_task(),

        KeyCode::Char('n') | KeyCode::Char('N') => {
            if let Err(e) = edit_memo_external(app) {
                warn!("memo edit failed: {:#}", e);
                app.set_status(MessageKind::Error, format!("Memo edit failed: {}", e));
            }
        }

        KeyCode::Char('c') | KeyCode::Char('C') => app.open_categories(),
        KeyCode::Char('g') | KeyCode::Char('G') => app.open_chart(),

        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while the add/edit form is open
fn handle_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let on_text_field = app.form.as_ref().is_some_and(|f| f.field.is_text());

    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => app.form_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.form_prev_field(),
        KeyCode::Left => app.form_cycle(false),
        KeyCode::Right => app.form_cycle(true),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) if on_text_field => app.form_add_char(c),
        KeyCode::Char('-') | KeyCode::Char('h') => app.form_cycle(false),
        KeyCode::Char('+') | KeyCode::Char('l') => app.form_cycle(true),
        _ => {}
    }
    Ok(false)
}

fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_yes(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_no(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the category manager
fn handle_categories_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_category_up();
            } else {
                app.category_selection_up();
            }
        }
        KeyCode::Down => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_category_down();
            } else {
                app.category_selection_down();
            }
        }
        KeyCode::Char('a') | KeyCode::Char('A') => app.start_category_prompt(),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            app.request_delete_category()
        }
        KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => app.close_categories(),
        _ => {}
    }
    Ok(false)
}

fn handle_category_prompt_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.cancel_category_prompt(),
        KeyCode::Enter => app.submit_category_prompt(),
        KeyCode::Backspace => app.category_prompt_backspace(),
        KeyCode::Char(c) => app.category_prompt_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the chart view
fn handle_chart_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('g') | KeyCode::Char('q')
    ) {
        app.close_chart();
        return Ok(false);
    }

    let Some(chart) = app.chart.as_mut() else {
        app.close_chart();
        return Ok(false);
    };

    match key.code {
        KeyCode::Up => chart.cursor_up(),
        KeyCode::Down => chart.cursor_down(),
        KeyCode::Char(' ') | KeyCode::Enter => chart.toggle_current(),
        KeyCode::Char('a') => chart.show_all(),
        KeyCode::Char('n') => chart.hide_all(),
        _ => {}
    }
    Ok(false)
}

/// Open the selected task's memo in $EDITOR and store what comes back
fn edit_memo_external(app: &mut AppState) -> Result<()> {
    let Some(memo) = app.selected_task().map(|t| t.memo.clone()) else {
        return Ok(());
    };

    // Get editor from environment, default to vi
    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(windows) {
            "notepad".to_string()
        } else {
            "vi".to_string()
        }
    });

    let mut temp_file = NamedTempFile::new().context("Failed to create temp file")?;
    std::io::Write::write_all(&mut temp_file, memo.as_bytes())?;
    let temp_path = temp_file.into_temp_path();

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to launch editor `{}`", editor))?;

    if status.success() {
        let edited = fs::read_to_string(&temp_path)?;
        app.save_memo(&edited);
    }

    Ok(())
}
