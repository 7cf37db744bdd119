use serde::{Deserialize, Serialize};

/// A range of document text by character offsets, end exclusive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_offset: usize,
    pub end_offset: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start_offset: start.min(end),
            end_offset: start.max(end),
        }
    }

    /// Check if this range contains the given offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start_offset && offset < self.end_offset
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Move the whole range by `delta` characters, keeping it inside `0..limit`
    pub fn shifted(&self, delta: isize, limit: usize) -> Self {
        let len = self.len().min(limit);
        let max_start = limit - len;
        let start = self.start_offset.saturating_add_signed(delta).min(max_start);
        Self::new(start, start + len)
    }

    /// Move the end of the range by `delta` characters. The range never
    /// collapses below one character and never runs past `limit`.
    pub fn resized(&self, delta: isize, limit: usize) -> Self {
        let min_end = (self.start_offset + 1).min(limit);
        let end = self
            .end_offset
            .saturating_add_signed(delta)
            .clamp(min_end, limit);
        Self::new(self.start_offset, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_order() {
        let range = TextRange::new(9, 4);
        assert_eq!(range.start_offset, 4);
        assert_eq!(range.end_offset, 9);
        assert_eq!(range.len(), 5);
        assert!(range.contains(4));
        assert!(!range.contains(9));
    }

    #[test]
    fn test_shifted_clamps_to_bounds() {
        let range = TextRange::new(2, 5);

        assert_eq!(range.shifted(3, 20), TextRange::new(5, 8));
        assert_eq!(range.shifted(-10, 20), TextRange::new(0, 3));
        assert_eq!(range.shifted(100, 20), TextRange::new(17, 20));
    }

    #[test]
    fn test_resized_keeps_one_char() {
        let range = TextRange::new(2, 5);

        assert_eq!(range.resized(2, 20), TextRange::new(2, 7));
        assert_eq!(range.resized(-10, 20), TextRange::new(2, 3));
        assert_eq!(range.resized(100, 20), TextRange::new(2, 20));
    }
}
