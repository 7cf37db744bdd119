use tracing::{debug, info};
use uuid::Uuid;

use crate::caret::Caret;
use crate::history::{History, HistoryConfig};
use crate::model::{Annotation, Category, Document, Severity, TextRange};

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Visual,
    Input,
    CategoryPicker,
    SeverityPicker,
    Help,
}

/// Focus area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Sidebar,
}

/// Input target for text input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Comment,
    FilePath,
}

/// Platform-agnostic application state
pub struct App {
    pub document: Option<Document>,
    /// Annotation history for the open document, replaced on every load
    history: Option<History<Annotation>>,
    history_config: HistoryConfig,

    pub caret: Caret,
    pub mode: Mode,
    pub focus: Focus,
    pub running: bool,

    // Selection state
    pub selection_start: Option<(usize, usize)>, // (row, col)
    pub selection_end: Option<(usize, usize)>,

    // Sidebar state
    pub sidebar_selected: usize,

    // Input state
    pub input_buffer: String,
    pub input_target: InputTarget,

    // Picker state
    pub category_selected: usize,
    pub severity_selected: usize,

    // Pending annotation (during creation workflow)
    pub pending_range: Option<TextRange>,
    pub pending_category: Option<Category>,
    pub pending_severity: Severity,

    pub status_message: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::with_history_config(HistoryConfig::default())
    }

    pub fn with_history_config(history_config: HistoryConfig) -> Self {
        Self {
            document: None,
            history: None,
            history_config,

            caret: Caret::new(),
            mode: Mode::Normal,
            focus: Focus::Editor,
            running: true,

            selection_start: None,
            selection_end: None,

            sidebar_selected: 0,

            input_buffer: String::new(),
            input_target: InputTarget::Comment,

            category_selected: 0,
            severity_selected: 1, // ShouldFix

            pending_range: None,
            pending_category: None,
            pending_severity: Severity::default(),

            status_message: None,
        }
    }

    /// Open a document and start a fresh edit history seeded with its annotations
    pub fn load_document(&mut self, doc: Document) {
        info!(
            title = %doc.title,
            annotations = doc.annotations.len(),
            capacity = self.history_config.capacity,
            "Starting editing session"
        );
        self.caret.set_content(&doc.content);
        self.history = Some(History::with_config(&doc.annotations, self.history_config));
        self.document = Some(doc);
        self.sidebar_selected = 0;
        self.mode = Mode::Normal;
    }

    pub fn history(&self) -> Option<&History<Annotation>> {
        self.history.as_ref()
    }

    /// Record the document's current annotations as a finished edit
    fn commit_edit(&mut self) {
        if let (Some(doc), Some(history)) = (&self.document, self.history.as_mut()) {
            history.commit(&doc.annotations);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.as_ref().is_some_and(History::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.history.as_ref().is_some_and(History::can_redo)
    }

    /// Restore the previous annotation state
    pub fn undo(&mut self) -> bool {
        let restored = self.history.as_mut().and_then(History::undo);
        self.restore(restored, "Undone", "Nothing to undo")
    }

    /// Restore the next annotation state
    pub fn redo(&mut self) -> bool {
        let restored = self.history.as_mut().and_then(History::redo);
        self.restore(restored, "Redone", "Nothing to redo")
    }

    fn restore(&mut self, restored: Option<Vec<Annotation>>, done: &str, nothing: &str) -> bool {
        let Some(annotations) = restored else {
            self.set_status(nothing);
            return false;
        };
        let Some(doc) = self.document.as_mut() else {
            return false;
        };

        let committed_at = self.history.as_ref().map(|h| h.current_snapshot().committed_at());
        debug!(annotations = annotations.len(), ?committed_at, "{}", done);
        doc.replace_annotations(annotations);
        self.clamp_sidebar();
        self.set_status(done);
        true
    }

    fn clamp_sidebar(&mut self) {
        let count = self.document.as_ref().map_or(0, |d| d.annotations.len());
        self.sidebar_selected = self.sidebar_selected.min(count.saturating_sub(1));
    }

    pub fn caret_pos(&self) -> (usize, usize) {
        self.caret.position()
    }

    pub fn set_caret_offset(&mut self, offset: usize) {
        self.caret.set_offset(offset);
    }

    // Caret movement methods
    pub fn move_up(&mut self) {
        self.caret.move_up();
    }

    pub fn move_down(&mut self) {
        self.caret.move_down();
    }

    pub fn move_left(&mut self) {
        self.caret.move_left();
    }

    pub fn move_right(&mut self) {
        self.caret.move_right();
    }

    pub fn move_to_top(&mut self) {
        self.caret.move_to_top();
    }

    pub fn move_to_bottom(&mut self) {
        self.caret.move_to_bottom();
    }

    pub fn move_word_forward(&mut self) {
        self.caret.move_word_forward();
    }

    pub fn move_word_back(&mut self) {
        self.caret.move_word_back();
    }

    /// Enter visual/selection mode
    pub fn enter_visual_mode(&mut self) {
        if self.document.is_none() {
            return;
        }
        self.mode = Mode::Visual;
        let pos = self.caret.position();
        self.selection_start = Some(pos);
        self.selection_end = Some(pos);
    }

    pub fn cancel_visual_mode(&mut self) {
        self.mode = Mode::Normal;
        self.selection_start = None;
        self.selection_end = None;
    }

    /// Update selection end position
    pub fn update_selection(&mut self) {
        if self.mode == Mode::Visual {
            self.selection_end = Some(self.caret.position());
        }
    }

    /// Selected char range for highlighting. The character under the caret is
    /// included, but a caret parked past the end of a line never takes the newline.
    pub fn selection_range(&self) -> Option<TextRange> {
        if self.mode != Mode::Visual {
            return None;
        }

        let (a, b) = (self.selection_start?, self.selection_end?);
        let (first, last) = if a <= b { (a, b) } else { (b, a) };
        let start = self.caret.to_offset(first.0, first.1);
        let last_offset = self.caret.to_offset(last.0, last.1);
        let (row, col) = self.caret.to_position(last_offset);

        let end = if col < self.caret.line_len(row) {
            last_offset + 1
        } else {
            last_offset
        };
        Some(TextRange::new(start, end))
    }

    /// Start annotation creation workflow from the current selection
    pub fn start_annotation(&mut self) {
        let range = self.selection_range().filter(|r| !r.is_empty());
        self.cancel_visual_mode();

        if let Some(range) = range {
            self.pending_range = Some(range);
            self.pending_category = None;
            self.pending_severity = Severity::default();
            self.mode = Mode::SeverityPicker;
        }
    }

    /// Abandon the annotation being created
    pub fn cancel_pending(&mut self) {
        self.pending_range = None;
        self.input_buffer.clear();
        self.mode = Mode::Normal;
    }

    /// Complete annotation creation
    pub fn complete_annotation(&mut self) -> bool {
        let Some(range) = self.pending_range.take() else {
            return false;
        };
        let Some(doc) = self.document.as_mut() else {
            return false;
        };

        let mut annotation = Annotation::new(range, doc.excerpt(range), self.input_buffer.clone());
        annotation.category = self.pending_category;
        annotation.severity = self.pending_severity;
        doc.add_annotation(annotation);

        self.input_buffer.clear();
        self.pending_category = None;
        self.pending_severity = Severity::default();
        self.mode = Mode::Normal;

        self.commit_edit();
        self.set_status("Annotation added");
        true
    }

    /// Get currently selected annotation
    pub fn selected_annotation(&self) -> Option<&Annotation> {
        let doc = self.document.as_ref()?;
        doc.annotations_sorted().get(self.sidebar_selected).copied()
    }

    /// Navigate to next annotation
    pub fn next_annotation(&mut self) {
        let count = self.document.as_ref().map_or(0, |d| d.annotations.len());
        if count > 0 {
            self.sidebar_selected = (self.sidebar_selected + 1) % count;
            self.jump_to_selected();
        }
    }

    /// Navigate to previous annotation
    pub fn prev_annotation(&mut self) {
        let count = self.document.as_ref().map_or(0, |d| d.annotations.len());
        if count > 0 {
            self.sidebar_selected = (self.sidebar_selected + count - 1) % count;
            self.jump_to_selected();
        }
    }

    fn jump_to_selected(&mut self) {
        if let Some(offset) = self.selected_annotation().map(|a| a.range.start_offset) {
            self.set_caret_offset(offset);
        }
    }

    /// Delete selected annotation
    pub fn delete_selected_annotation(&mut self) -> bool {
        self.edit_selected("Annotation deleted", |doc, id| doc.remove_annotation(id).is_some())
    }

    /// Toggle resolved status of selected annotation
    pub fn toggle_selected_resolved(&mut self) -> bool {
        self.edit_selected("Toggled resolved status", Document::toggle_resolved)
    }

    /// Slide the selected annotation by `delta` characters
    pub fn nudge_selected(&mut self, delta: isize) -> bool {
        self.edit_selected("Annotation moved", |doc, id| doc.move_annotation(id, delta))
    }

    /// Grow or shrink the selected annotation from its end
    pub fn resize_selected(&mut self, delta: isize) -> bool {
        self.edit_selected("Annotation resized", |doc, id| doc.resize_annotation(id, delta))
    }

    fn edit_selected(&mut self, status: &str, edit: impl FnOnce(&mut Document, Uuid) -> bool) -> bool {
        let Some(id) = self.selected_annotation().map(|a| a.id) else {
            return false;
        };
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        if !edit(doc, id) {
            return false;
        }

        // Keep the same annotation selected if it survived and was re-sorted
        let position = doc.annotations_sorted().iter().position(|a| a.id == id);
        match position {
            Some(pos) => self.sidebar_selected = pos,
            None => self.clamp_sidebar(),
        }
        self.commit_edit();
        self.set_status(status);
        true
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Toggle focus between editor and sidebar
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Sidebar,
            Focus::Sidebar => Focus::Editor,
        };
    }

    /// Get title for display
    pub fn title(&self) -> String {
        self.document
            .as_ref()
            .and_then(|d| d.filename.clone())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(content: &str) -> App {
        let mut app = App::new();
        app.load_document(Document::new("Test".to_string(), content.to_string()));
        app
    }

    fn annotate(app: &mut App, range: TextRange, comment: &str) {
        app.pending_range = Some(range);
        app.input_buffer = comment.to_string();
        assert!(app.complete_annotation());
    }

    fn comments(app: &App) -> Vec<String> {
        app.document
            .as_ref()
            .map(|d| d.annotations.iter().map(|a| a.comment.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_fresh_document_has_no_history() {
        let mut app = app_with("Hello world");

        assert!(!app.can_undo());
        assert!(!app.can_redo());
        assert!(!app.undo());
        assert_eq!(app.status_message.as_deref(), Some("Nothing to undo"));
    }

    #[test]
    fn test_undo_redo_annotations() {
        let mut app = app_with("The quick brown fox");
        annotate(&mut app, TextRange::new(0, 3), "first");
        annotate(&mut app, TextRange::new(4, 9), "second");

        assert!(app.undo());
        assert_eq!(comments(&app), vec!["first"]);
        assert!(app.undo());
        assert!(comments(&app).is_empty());
        assert!(!app.undo());

        assert!(app.redo());
        assert!(app.redo());
        assert_eq!(comments(&app), vec!["first", "second"]);
        assert!(!app.can_redo());
    }

    #[test]
    fn test_new_edit_discards_redo() {
        let mut app = app_with("The quick brown fox");
        annotate(&mut app, TextRange::new(0, 3), "first");
        annotate(&mut app, TextRange::new(4, 9), "second");
        app.undo();

        annotate(&mut app, TextRange::new(10, 15), "third");

        assert!(!app.can_redo());
        assert!(!app.redo());
        assert_eq!(comments(&app), vec!["first", "third"]);
    }

    #[test]
    fn test_move_and_resize_are_undoable() {
        let mut app = app_with("The quick brown fox");
        annotate(&mut app, TextRange::new(4, 9), "quick");

        assert!(app.nudge_selected(6));
        assert!(app.resize_selected(-2));
        assert_eq!(app.selected_annotation().map(|a| a.selected_text.as_str()), Some("bro"));

        assert!(app.undo());
        assert_eq!(app.selected_annotation().map(|a| a.selected_text.as_str()), Some("brown"));
        assert!(app.undo());
        assert_eq!(app.selected_annotation().map(|a| a.range), Some(TextRange::new(4, 9)));
    }

    #[test]
    fn test_delete_undo_restores_and_clamps_sidebar() {
        let mut app = app_with("The quick brown fox");
        annotate(&mut app, TextRange::new(0, 3), "first");
        annotate(&mut app, TextRange::new(4, 9), "second");
        app.sidebar_selected = 1;

        assert!(app.delete_selected_annotation());
        assert_eq!(app.sidebar_selected, 0);
        assert_eq!(comments(&app), vec!["first"]);

        assert!(app.undo());
        assert_eq!(comments(&app), vec!["first", "second"]);
    }

    #[test]
    fn test_noop_edit_is_not_recorded() {
        let mut app = app_with("abc");
        annotate(&mut app, TextRange::new(0, 1), "a");
        let before = app.history().map(History::snapshot_count);

        assert!(!app.nudge_selected(-1));
        assert_eq!(app.history().map(History::snapshot_count), before);
    }

    #[test]
    fn test_history_capacity_from_config() {
        let mut app = App::with_history_config(HistoryConfig { capacity: 3 });
        app.load_document(Document::new("Test".to_string(), "abcdef".to_string()));
        for i in 0..5 {
            annotate(&mut app, TextRange::new(i, i + 1), "x");
        }

        assert_eq!(app.history().map(History::snapshot_count), Some(3));
        assert!(app.undo());
        assert!(app.undo());
        assert!(!app.undo());
        assert_eq!(comments(&app).len(), 3);
    }

    #[test]
    fn test_loading_document_resets_history() {
        let mut app = app_with("one");
        annotate(&mut app, TextRange::new(0, 1), "o");
        assert!(app.can_undo());

        app.load_document(Document::new("Other".to_string(), "two".to_string()));
        assert!(!app.can_undo());
    }

    #[test]
    fn test_selection_stops_before_newline() {
        let mut app = app_with("Hello\nWorld");
        app.enter_visual_mode();
        for _ in 0..5 {
            app.move_right();
        }
        app.update_selection();
        assert_eq!(app.caret_pos(), (0, 5));
        assert_eq!(app.selection_range(), Some(TextRange::new(0, 5)));

        app.start_annotation();
        assert_eq!(app.pending_range, Some(TextRange::new(0, 5)));
    }

    #[test]
    fn test_selection_backwards_includes_anchor_char() {
        let mut app = app_with("Hello\nWorld");
        app.move_down();
        app.move_right();
        app.enter_visual_mode();
        app.move_up();
        app.update_selection();

        // From (0, 1) back to the anchor at (1, 1): "ello\nWo"
        assert_eq!(app.selection_range(), Some(TextRange::new(1, 8)));
    }

    #[test]
    fn test_selection_includes_caret_char() {
        let mut app = app_with("Hello\nWorld");
        app.enter_visual_mode();
        for _ in 0..4 {
            app.move_right();
        }
        app.update_selection();

        assert_eq!(app.selection_range(), Some(TextRange::new(0, 5)));

        app.start_annotation();
        assert_eq!(app.mode, Mode::SeverityPicker);
        assert_eq!(app.pending_range, Some(TextRange::new(0, 5)));
    }
}
