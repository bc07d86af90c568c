use unicode_segmentation::UnicodeSegmentation;

/// Cursor over a list of `len` items.
/// Always within `[0, len - 1]`, or `0` when the list is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    index: usize,
    len: usize,
}

impl ListCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Change the list length, keeping the cursor where it was if still valid.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.index = self.index.min(len.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Move selection by delta, clamping to bounds
    pub fn move_by(&mut self, delta: isize) {
        if self.len == 0 {
            return;
        }
        self.index = self
            .index
            .saturating_add_signed(delta)
            .min(self.len - 1);
    }

    pub fn up(&mut self) {
        self.move_by(-1);
    }

    pub fn down(&mut self) {
        self.move_by(1);
    }

    pub fn top(&mut self) {
        self.index = 0;
    }

    pub fn bottom(&mut self) {
        self.index = self.len.saturating_sub(1);
    }
}

/// Two-press confirmation for destructive actions.
///
/// The first press stages an index, a second press on the same index
/// confirms it. Pressing on another index re-stages there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteStaging {
    staged: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageResult {
    Staged(usize),
    Confirmed(usize),
}

impl DeleteStaging {
    pub fn press(&mut self, index: usize) -> StageResult {
        if self.staged == Some(index) {
            self.staged = None;
            StageResult::Confirmed(index)
        } else {
            self.staged = Some(index);
            StageResult::Staged(index)
        }
    }

    pub fn clear(&mut self) {
        self.staged = None;
    }

    pub fn staged(&self) -> Option<usize> {
        self.staged
    }
}

/// Single-line text buffer with a grapheme-aware cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    /// Byte offset, always on a grapheme boundary
    cursor: usize,
    max_chars: Option<usize>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text` with the cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.len(),
            max_chars: None,
        }
    }

    #[must_use]
    pub fn max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text before the cursor, used for cursor placement when drawing.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    fn boundaries(&self) -> Vec<usize> {
        let mut boundaries: Vec<usize> = self.text.grapheme_indices(true).map(|(i, _)| i).collect();
        boundaries.push(self.text.len());
        boundaries
    }

    fn boundary_index(&self, boundaries: &[usize]) -> usize {
        match boundaries.binary_search(&self.cursor) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Insert a character at the current cursor position
    pub fn insert(&mut self, c: char) {
        if self
            .max_chars
            .is_some_and(|max| self.text.chars().count() >= max)
        {
            return;
        }
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the grapheme cluster before the cursor
    pub fn backspace(&mut self) -> bool {
        let boundaries = self.boundaries();
        let idx = self.boundary_index(&boundaries);
        if idx == 0 {
            return false;
        }
        let prev = boundaries[idx - 1];
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    /// Remove the grapheme cluster at the cursor
    pub fn delete(&mut self) -> bool {
        let boundaries = self.boundaries();
        let idx = self.boundary_index(&boundaries);
        let Some(&end) = boundaries.get(idx + 1) else {
            return false;
        };
        self.text.drain(self.cursor..end);
        true
    }

    pub fn left(&mut self) {
        let boundaries = self.boundaries();
        let idx = self.boundary_index(&boundaries);
        if idx > 0 {
            self.cursor = boundaries[idx - 1];
        }
    }

    pub fn right(&mut self) {
        let boundaries = self.boundaries();
        let idx = self.boundary_index(&boundaries);
        if let Some(&next) = boundaries.get(idx + 1) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}
