use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Annotation, TextRange};

/// A text document and the annotations placed on it
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub filename: Option<String>,
    pub filepath: Option<String>,
    pub annotations: Vec<Annotation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            filename: None,
            filepath: None,
            annotations: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a document with filename metadata (used by CLI when loading from file)
    pub fn with_file_info(title: String, content: String, filepath: String, filename: String) -> Self {
        let mut doc = Self::new(title, content);
        doc.filepath = Some(filepath);
        doc.filename = Some(filename);
        doc
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Text covered by `range`, by character offsets
    pub fn excerpt(&self, range: TextRange) -> String {
        self.content
            .chars()
            .skip(range.start_offset)
            .take(range.len())
            .collect()
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
        self.touch();
    }

    pub fn remove_annotation(&mut self, id: Uuid) -> Option<Annotation> {
        let pos = self.annotations.iter().position(|a| a.id == id)?;
        self.touch();
        Some(self.annotations.remove(pos))
    }

    pub fn toggle_resolved(&mut self, id: Uuid) -> bool {
        match self.annotations.iter_mut().find(|a| a.id == id) {
            Some(ann) => {
                ann.is_resolved = !ann.is_resolved;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Slide an annotation along the text. Returns false if nothing moved.
    pub fn move_annotation(&mut self, id: Uuid, delta: isize) -> bool {
        self.reshape_annotation(id, |range, limit| range.shifted(delta, limit))
    }

    /// Grow or shrink an annotation from its end. Returns false if nothing changed.
    pub fn resize_annotation(&mut self, id: Uuid, delta: isize) -> bool {
        self.reshape_annotation(id, |range, limit| range.resized(delta, limit))
    }

    fn reshape_annotation(&mut self, id: Uuid, reshape: impl FnOnce(TextRange, usize) -> TextRange) -> bool {
        let limit = self.char_count();
        let Some(index) = self.annotations.iter().position(|a| a.id == id) else {
            return false;
        };

        let range = reshape(self.annotations[index].range, limit);
        if range == self.annotations[index].range {
            return false;
        }

        let text = self.excerpt(range);
        let ann = &mut self.annotations[index];
        ann.range = range;
        ann.selected_text = text;
        self.touch();
        true
    }

    /// Swap in a whole annotation list, e.g. a state restored from history
    pub fn replace_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        self.touch();
    }

    /// Get annotations sorted by start offset
    pub fn annotations_sorted(&self) -> Vec<&Annotation> {
        let mut sorted: Vec<_> = self.annotations.iter().collect();
        sorted.sort_by_key(|a| a.range.start_offset);
        sorted
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, Uuid) {
        let mut doc = Document::new("Sample".to_string(), "héllo wörld, again".to_string());
        let range = TextRange::new(0, 5);
        let ann = Annotation::new(range, doc.excerpt(range), "greeting".to_string());
        let id = ann.id;
        doc.add_annotation(ann);
        (doc, id)
    }

    #[test]
    fn test_excerpt_uses_char_offsets() {
        let (doc, _) = sample();
        assert_eq!(doc.excerpt(TextRange::new(0, 5)), "héllo");
        assert_eq!(doc.excerpt(TextRange::new(6, 11)), "wörld");
        assert_eq!(doc.char_count(), 18);
    }

    #[test]
    fn test_move_annotation_refreshes_text() {
        let (mut doc, id) = sample();

        assert!(doc.move_annotation(id, 6));
        assert_eq!(doc.annotations[0].range, TextRange::new(6, 11));
        assert_eq!(doc.annotations[0].selected_text, "wörld");

        assert!(!doc.move_annotation(Uuid::new_v4(), 1));
    }

    #[test]
    fn test_move_at_edge_is_noop() {
        let (mut doc, id) = sample();
        assert!(!doc.move_annotation(id, -1));
    }

    #[test]
    fn test_resize_annotation() {
        let (mut doc, id) = sample();

        assert!(doc.resize_annotation(id, 6));
        assert_eq!(doc.annotations[0].selected_text, "héllo wörld");

        assert!(doc.resize_annotation(id, -100));
        assert_eq!(doc.annotations[0].selected_text, "h");
        assert!(!doc.resize_annotation(id, -1));
    }

    #[test]
    fn test_remove_and_toggle() {
        let (mut doc, id) = sample();

        assert!(doc.toggle_resolved(id));
        assert!(doc.annotations[0].is_resolved);

        let removed = doc.remove_annotation(id);
        assert_eq!(removed.map(|a| a.id), Some(id));
        assert!(doc.annotations.is_empty());
        assert!(doc.remove_annotation(id).is_none());
        assert!(!doc.toggle_resolved(id));
    }
}
