//! Terminal rendering

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use margin_core::{Annotation, App, Category, Focus, History, InputTarget, Mode, Severity, TextRange};

pub fn draw(f: &mut Frame, app: &App) {
    let [main, status] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());
    let [editor, sidebar] =
        Layout::horizontal([Constraint::Percentage(68), Constraint::Percentage(32)]).areas(main);

    draw_editor(f, app, editor);
    draw_sidebar(f, app, sidebar);
    draw_status(f, app, status);

    match app.mode {
        Mode::SeverityPicker => draw_severity_picker(f, app),
        Mode::CategoryPicker => draw_category_picker(f, app),
        Mode::Input => draw_input(f, app),
        Mode::Help => draw_help(f),
        Mode::Normal | Mode::Visual => {}
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::MustFix => Color::Red,
        Severity::ShouldFix => Color::Yellow,
        Severity::Consider => Color::Cyan,
    }
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Style for the character at `offset`
fn char_style(offset: usize, selection: Option<TextRange>, annotations: &[&Annotation]) -> Style {
    if selection.is_some_and(|r| r.contains(offset)) {
        return Style::default().bg(Color::Blue).fg(Color::White);
    }

    // Later annotations paint over earlier ones
    match annotations.iter().rev().find(|a| a.range.contains(offset)) {
        Some(ann) if ann.is_resolved => Style::default().add_modifier(Modifier::DIM | Modifier::UNDERLINED),
        Some(ann) => Style::default()
            .fg(severity_color(ann.severity))
            .add_modifier(Modifier::UNDERLINED),
        None => Style::default(),
    }
}

fn draw_editor(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.title()))
        .border_style(focus_border(app.focus == Focus::Editor));

    let Some(doc) = &app.document else {
        let empty = Paragraph::new("No document loaded. Press 'o' to open a file.").block(block);
        f.render_widget(empty, area);
        return;
    };

    let height = area.height.saturating_sub(2) as usize;
    let (caret_row, caret_col) = app.caret_pos();
    let scroll = caret_row.saturating_sub(height.saturating_sub(1));
    let selection = app.selection_range();
    let annotations = doc.annotations_sorted();

    let lines: Vec<Line> = (scroll..app.caret.line_count())
        .take(height)
        .map(|row| {
            let start = app.caret.line_start(row);
            let text = app.caret.line(row).unwrap_or_default();

            let mut spans: Vec<Span> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();

            for (col, ch) in text.chars().enumerate() {
                let mut style = char_style(start + col, selection, &annotations);
                if row == caret_row && col == caret_col {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(ch);
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            // Caret parked past the last character
            if row == caret_row && caret_col >= text.chars().count() {
                spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
            }

            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let annotations = app
        .document
        .as_ref()
        .map(|d| d.annotations_sorted())
        .unwrap_or_default();

    let items: Vec<ListItem> = annotations
        .iter()
        .map(|ann| {
            let marker = if ann.is_resolved { "✓" } else { " " };
            let header = Line::from(vec![
                Span::raw(format!("{marker} ")),
                Span::styled(
                    format!("[{}]", ann.severity.short()),
                    Style::default().fg(severity_color(ann.severity)),
                ),
                Span::raw(" "),
                Span::styled(
                    ann.category.map(|c| c.as_str()).unwrap_or(""),
                    Style::default().fg(Color::Magenta),
                ),
            ]);
            let quote = Line::from(Span::styled(
                format!("  \"{}\"", ann.selected_text.replace('\n', " ")),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
            let comment = Line::from(format!("  {}", ann.comment));
            ListItem::new(vec![header, quote, comment])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Annotations ({}) ", annotations.len()))
                .border_style(focus_border(app.focus == Focus::Sidebar)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if !annotations.is_empty() {
        state.select(Some(app.sidebar_selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let mode = match app.mode {
        Mode::Normal => "NORMAL",
        Mode::Visual => "VISUAL",
        Mode::Input => "INPUT",
        Mode::CategoryPicker | Mode::SeverityPicker => "ANNOTATE",
        Mode::Help => "HELP",
    };

    let message = app
        .status_message
        .clone()
        .unwrap_or_else(|| "v select · a annotate · u undo · ^R redo · ? help".to_string());

    let mut spans = vec![
        Span::styled(format!(" {mode} "), Style::default().bg(Color::Green).fg(Color::Black)),
        Span::raw(format!(" {message}")),
    ];

    if let Some(history) = app.history() {
        let position = history_summary(history);
        let used = spans.iter().map(|s| s.width()).sum::<usize>() + position.chars().count();
        let pad = (area.width as usize).saturating_sub(used);
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(position, Style::default().fg(Color::DarkGray)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Undo/redo depth and the current step within the retained log
fn history_summary(history: &History<Annotation>) -> String {
    format!(
        "  undo {} | redo {}  {}/{} ",
        history.undo_count(),
        history.redo_count(),
        history.position() + 1,
        history.snapshot_count()
    )
}

fn popup_area(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_picker(f: &mut Frame, title: &str, labels: Vec<String>, selected: usize) {
    let area = popup_area(30, labels.len() as u16 + 2, f.area());
    let items: Vec<ListItem> = labels.into_iter().map(ListItem::new).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(selected));
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_severity_picker(f: &mut Frame, app: &App) {
    let labels = Severity::all()
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", i + 1, s.as_str()))
        .collect();
    draw_picker(f, "Severity", labels, app.severity_selected);
}

fn draw_category_picker(f: &mut Frame, app: &App) {
    let labels = std::iter::once("0 None".to_string())
        .chain(Category::all().iter().map(|c| format!("  {}", c.as_str())))
        .collect();
    draw_picker(f, "Category", labels, app.category_selected);
}

fn draw_input(f: &mut Frame, app: &App) {
    let title = match app.input_target {
        InputTarget::Comment => " Comment (Enter to save) ",
        InputTarget::FilePath => " Open file ",
    };
    let area = popup_area(60, 5, f.area());
    let input = Paragraph::new(format!("{}_", app.input_buffer))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(Clear, area);
    f.render_widget(input, area);
}

const HELP: &[(&str, &str)] = &[
    ("h j k l / arrows", "Move caret"),
    ("w / b", "Next / previous word"),
    ("g / G", "Top / bottom"),
    ("v", "Start selection"),
    ("a", "Annotate selection"),
    ("Tab", "Switch editor / sidebar"),
    ("[ / ]", "Previous / next annotation"),
    ("d", "Delete annotation"),
    ("r", "Toggle resolved"),
    ("< / >", "Move annotation"),
    ("- / +", "Shrink / grow annotation"),
    ("u / Ctrl+Z", "Undo"),
    ("Ctrl+R / Ctrl+Y", "Redo (also Ctrl+Shift+Z)"),
    ("o", "Open file"),
    ("q", "Quit"),
];

fn draw_help(f: &mut Frame) {
    let area = popup_area(48, HELP.len() as u16 + 2, f.area());
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:>18}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Keys ")),
        area,
    );
}
