//! Margin CLI - Terminal-based text annotation tool with undo/redo

mod config;
mod io;
mod logging;
mod ui;

use std::io::stdout;
use std::path::Path;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use margin_core::{App, Category, Focus, InputTarget, Mode, Severity};

use config::Config;

/// Settings read before the UI starts. Every piece is optional: without a
/// home directory the app runs on defaults and without a log file.
struct Startup {
    config: Config,
    log_guard: Option<WorkerGuard>,
    notice: Option<String>,
}

fn startup(dir: Option<&Path>) -> Startup {
    let Some(dir) = dir else {
        return Startup {
            config: Config::default(),
            log_guard: None,
            notice: Some("No home directory: using defaults, logging disabled".to_string()),
        };
    };

    let loaded = Config::load(dir);
    let config = loaded.as_ref().ok().cloned().flatten().unwrap_or_default();
    let log_guard = match logging::init(dir, config.log_filter.as_deref()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {e:#}");
            None
        }
    };

    let notice = loaded.err().map(|e| {
        warn!("Using default configuration: {e:#}");
        format!("Config ignored: {e}")
    });

    Startup {
        config,
        log_guard,
        notice,
    }
}

fn main() -> Result<()> {
    let file_path = std::env::args().nth(1);

    let dir = io::margin_dir()
        .map_err(|e| eprintln!("Running without ~/.margin: {e:#}"))
        .ok();
    let Startup {
        config,
        log_guard: _log_guard,
        notice,
    } = startup(dir.as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), "Margin starting");

    let mut app = App::with_history_config(config.history);
    if let Some(notice) = &notice {
        app.set_status(notice);
    }

    match file_path {
        Some(path) => open_file(&mut app, &path),
        None if app.status_message.is_none() => {
            app.set_status("No file loaded. Pass a file path as argument or press 'o'.");
        }
        None => {}
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        error!("Event loop failed: {e:#}");
        eprintln!("Error: {}", e);
    }

    info!("Margin exiting");
    Ok(())
}

fn open_file(app: &mut App, path: &str) {
    match io::load_file(path) {
        Ok(doc) => {
            app.load_document(doc);
            app.set_status(&format!("Loaded {}", path));
        }
        Err(e) => {
            warn!("Could not open {path}: {e:#}");
            app.set_status(&format!("Error: {}", e));
        }
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.clear_status();

            match app.mode {
                Mode::Normal => handle_normal_mode(app, key.code, key.modifiers),
                Mode::Visual => handle_visual_mode(app, key.code),
                Mode::Input => handle_input_mode(app, key.code),
                Mode::SeverityPicker => handle_severity_picker(app, key.code),
                Mode::CategoryPicker => handle_category_picker(app, key.code),
                Mode::Help => app.mode = Mode::Normal,
            }
        }
    }
    Ok(())
}

fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let shift = modifiers.contains(KeyModifiers::SHIFT);

    match code {
        // History. Legacy terminals report Ctrl+Shift+Z as a lowercase 'z'
        // with both modifiers, so shift decides between undo and redo.
        KeyCode::Char('z' | 'Z') if ctrl && shift => {
            app.redo();
        }
        KeyCode::Char('z') if ctrl => {
            app.undo();
        }
        KeyCode::Char('r' | 'y') if ctrl => {
            app.redo();
        }
        // Other control chords are not bound
        _ if ctrl => {}

        KeyCode::Char('u') => {
            app.undo();
        }

        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.mode = Mode::Help,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            Focus::Editor => app.move_down(),
            Focus::Sidebar => app.next_annotation(),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            Focus::Editor => app.move_up(),
            Focus::Sidebar => app.prev_annotation(),
        },
        KeyCode::Char('h') | KeyCode::Left => app.move_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_right(),
        KeyCode::Char('w') => app.move_word_forward(),
        KeyCode::Char('b') => app.move_word_back(),
        KeyCode::Char('g') => app.move_to_top(),
        KeyCode::Char('G') => app.move_to_bottom(),

        // Annotation navigation
        KeyCode::Char(']') => app.next_annotation(),
        KeyCode::Char('[') => app.prev_annotation(),

        KeyCode::Char('v') => app.enter_visual_mode(),

        // Annotation edits, each one undoable
        KeyCode::Char('d') => {
            app.delete_selected_annotation();
        }
        KeyCode::Char('r') => {
            app.toggle_selected_resolved();
        }
        KeyCode::Char('>') => {
            app.nudge_selected(1);
        }
        KeyCode::Char('<') => {
            app.nudge_selected(-1);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.resize_selected(1);
        }
        KeyCode::Char('-') => {
            app.resize_selected(-1);
        }

        KeyCode::Tab => app.toggle_focus(),

        KeyCode::Char('o') => {
            app.input_buffer.clear();
            app.input_target = InputTarget::FilePath;
            app.mode = Mode::Input;
        }

        _ => {}
    }
}

fn handle_visual_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.cancel_visual_mode();
            return;
        }
        KeyCode::Char('a') => {
            app.start_annotation();
            return;
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('h') | KeyCode::Left => app.move_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_right(),
        KeyCode::Char('w') => app.move_word_forward(),
        KeyCode::Char('b') => app.move_word_back(),
        _ => return,
    }
    app.update_selection();
}

fn handle_input_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_pending(),
        KeyCode::Enter => match app.input_target {
            InputTarget::Comment => {
                app.complete_annotation();
            }
            InputTarget::FilePath => {
                let path = std::mem::take(&mut app.input_buffer);
                app.mode = Mode::Normal;
                open_file(app, path.trim());
            }
        },
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.input_buffer.push(c),
        _ => {}
    }
}

fn choose_severity(app: &mut App, severity: Severity) {
    app.pending_severity = severity;
    app.category_selected = 0;
    app.mode = Mode::CategoryPicker;
}

fn handle_severity_picker(app: &mut App, code: KeyCode) {
    let len = Severity::all().len();

    match code {
        KeyCode::Esc => app.cancel_pending(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.severity_selected = (app.severity_selected + 1) % len;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.severity_selected = (app.severity_selected + len - 1) % len;
        }
        KeyCode::Enter => choose_severity(app, Severity::all()[app.severity_selected]),
        // Quick select
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            choose_severity(app, Severity::all()[index]);
        }
        _ => {}
    }
}

fn choose_category(app: &mut App, category: Option<Category>) {
    app.pending_category = category;
    app.input_buffer.clear();
    app.input_target = InputTarget::Comment;
    app.mode = Mode::Input;
}

fn handle_category_picker(app: &mut App, code: KeyCode) {
    let total = Category::all().len() + 1; // +1 for "None"

    match code {
        KeyCode::Esc => app.cancel_pending(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.category_selected = (app.category_selected + 1) % total;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.category_selected = (app.category_selected + total - 1) % total;
        }
        KeyCode::Enter => {
            let category = app
                .category_selected
                .checked_sub(1)
                .and_then(|i| Category::all().get(i).copied());
            choose_category(app, category);
        }
        KeyCode::Char('0') => choose_category(app, None),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use margin_core::{Document, TextRange};

    fn app_with_one_annotation() -> App {
        let mut app = App::new();
        app.load_document(Document::new("Test".to_string(), "Hello world".to_string()));
        app.pending_range = Some(TextRange::new(0, 5));
        app.input_buffer = "greeting".to_string();
        assert!(app.complete_annotation());
        app
    }

    fn annotation_count(app: &App) -> usize {
        app.document.as_ref().map_or(0, |d| d.annotations.len())
    }

    #[test]
    fn test_undo_keys() {
        for (code, modifiers) in [
            (KeyCode::Char('u'), KeyModifiers::NONE),
            (KeyCode::Char('z'), KeyModifiers::CONTROL),
        ] {
            let mut app = app_with_one_annotation();
            handle_normal_mode(&mut app, code, modifiers);
            assert_eq!(annotation_count(&app), 0, "{code:?} {modifiers:?}");
            assert!(app.can_redo());
        }
    }

    #[test]
    fn test_redo_keys() {
        for (code, modifiers) in [
            (KeyCode::Char('r'), KeyModifiers::CONTROL),
            (KeyCode::Char('y'), KeyModifiers::CONTROL),
            (KeyCode::Char('z'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            (KeyCode::Char('Z'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
        ] {
            let mut app = app_with_one_annotation();
            assert!(app.undo());
            handle_normal_mode(&mut app, code, modifiers);
            assert_eq!(annotation_count(&app), 1, "{code:?} {modifiers:?}");
            assert!(!app.can_redo());
        }
    }

    #[test]
    fn test_unbound_control_chords_do_nothing() {
        for ch in ['d', 'u', '>', '-', 'q'] {
            let mut app = app_with_one_annotation();
            handle_normal_mode(&mut app, KeyCode::Char(ch), KeyModifiers::CONTROL);

            assert_eq!(annotation_count(&app), 1, "Ctrl+{ch}");
            assert!(app.running);
            assert_eq!(app.selected_annotation().map(|a| a.range), Some(TextRange::new(0, 5)));
            assert!(!app.selected_annotation().is_some_and(|a| a.is_resolved));
        }
    }

    #[test]
    fn test_plain_keys_still_edit() {
        let mut app = app_with_one_annotation();
        handle_normal_mode(&mut app, KeyCode::Char('d'), KeyModifiers::NONE);
        assert_eq!(annotation_count(&app), 0);
    }

    #[test]
    fn test_startup_without_home_uses_defaults() {
        let settings = startup(None);

        assert_eq!(settings.config, Config::default());
        assert!(settings.log_guard.is_none());
        assert!(settings.notice.is_some());
    }
}
