use std::borrow::Cow;
use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use super::{Patch, Position, SpliceSink};

/// Edits a [`TextBuffer`] understands. Offsets are bytes into the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
}

impl Edit {
    fn range(&self) -> Range<usize> {
        match self {
            Edit::InsertText { at, .. } => *at..*at,
            Edit::DeleteRange { range } | Edit::ReplaceRange { range, .. } => range.clone(),
        }
    }

    fn text(&self) -> &str {
        match self {
            Edit::InsertText { text, .. } | Edit::ReplaceRange { text, .. } => text,
            Edit::DeleteRange { .. } => "",
        }
    }
}

/// A note held in an `xi_rope::Rope`, with a single cursor.
///
/// Saving writes `text()` verbatim; nothing is re-rendered from a model.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    buffer: Rope,
    /// Byte offset, always on a char boundary.
    cursor: usize,
    version: u64,
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            cursor: 0,
            version: 0,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of lines, counting the empty line after a trailing newline.
    pub fn line_count(&self) -> usize {
        self.buffer.line_of_offset(self.buffer.len()) + 1
    }

    /// Byte range of `line` without its line terminator.
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        if line >= self.line_count() {
            return None;
        }
        let start = self.buffer.offset_of_line(line);
        let end = if line + 1 < self.line_count() {
            self.buffer.offset_of_line(line + 1)
        } else {
            self.buffer.len()
        };
        let raw = self.buffer.slice_to_cow(start..end);
        let content = raw.strip_suffix('\n').unwrap_or(&raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        Some(start..start + content.len())
    }

    pub fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        self.line_range(line)
            .map(|range| self.buffer.slice_to_cow(range))
    }

    /// Buffer offset of `position`, clamped into the buffer and floored to a
    /// char boundary.
    pub fn offset_of(&self, position: Position) -> usize {
        let line = position.line.min(self.line_count().saturating_sub(1));
        let Some(range) = self.line_range(line) else {
            return 0;
        };
        let text = self.buffer.slice_to_cow(range.clone());
        let mut ch = position.ch.min(text.len());
        while ch > 0 && !text.is_char_boundary(ch) {
            ch -= 1;
        }
        range.start + ch
    }

    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.buffer.len());
        let line = self.buffer.line_of_offset(offset);
        Position::new(line, offset - self.buffer.offset_of_line(line))
    }

    pub fn cursor(&self) -> Position {
        self.position_of(self.cursor)
    }

    pub fn cursor_offset(&self) -> usize {
        self.cursor
    }

    /// Text of the cursor's line and the cursor's byte offset within it.
    pub fn cursor_line(&self) -> (usize, String, usize) {
        let Position { line, ch } = self.cursor();
        let text = self.line(line).map(Cow::into_owned).unwrap_or_default();
        (line, text, ch)
    }

    /// Applies one edit, moving the cursor along with the text around it.
    pub fn apply(&mut self, edit: Edit) -> Patch {
        let requested = edit.range();
        let start = self.offset_of(self.position_of(requested.start));
        let end = self.offset_of(self.position_of(requested.end)).max(start);
        let text = edit.text();

        let delta = compile(self.buffer.len(), start..end, text);
        self.buffer = delta.apply(&self.buffer);
        self.version += 1;

        let inserted_end = start + text.len();
        self.cursor = if self.cursor >= end {
            self.cursor - (end - start) + text.len()
        } else if self.cursor > start {
            inserted_end
        } else {
            self.cursor
        };

        Patch {
            changed: start..inserted_end,
            cursor: self.cursor(),
            version: self.version,
        }
    }

    /// Types `text` at the cursor and leaves the cursor after it.
    pub fn insert_at_cursor(&mut self, text: &str) -> Patch {
        self.apply(Edit::InsertText {
            at: self.cursor,
            text: text.to_string(),
        })
    }

    /// Deletes the char before the cursor, joining lines at a line start.
    pub fn delete_backward(&mut self) -> Option<Patch> {
        let previous = self.previous_offset()?;
        Some(self.apply(Edit::DeleteRange {
            range: previous..self.cursor,
        }))
    }

    pub fn move_left(&mut self) {
        if let Some(previous) = self.previous_offset() {
            self.cursor = previous;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_offset() {
            self.cursor = next;
        }
    }

    pub fn move_up(&mut self) {
        let Position { line, ch } = self.cursor();
        if line > 0 {
            self.cursor = self.offset_of(Position::new(line - 1, ch));
        }
    }

    pub fn move_down(&mut self) {
        let Position { line, ch } = self.cursor();
        if line + 1 < self.line_count() {
            self.cursor = self.offset_of(Position::new(line + 1, ch));
        }
    }

    fn previous_offset(&self) -> Option<usize> {
        let Position { line, ch } = self.cursor();
        if ch > 0 {
            let text = self.line(line)?;
            let width = text[..ch].chars().next_back()?.len_utf8();
            Some(self.cursor - width)
        } else if line > 0 {
            self.line_range(line - 1).map(|range| range.end)
        } else {
            None
        }
    }

    fn next_offset(&self) -> Option<usize> {
        let Position { line, ch } = self.cursor();
        let text = self.line(line)?;
        if ch < text.len() {
            let width = text[ch..].chars().next()?.len_utf8();
            Some(self.cursor + width)
        } else if line + 1 < self.line_count() {
            Some(self.buffer.offset_of_line(line + 1))
        } else {
            None
        }
    }
}

fn compile(len: usize, range: Range<usize>, text: &str) -> Delta<RopeInfo> {
    let mut builder = Builder::new(len);
    if text.is_empty() {
        builder.delete(range);
    } else {
        builder.replace(range, Rope::from(text));
    }
    builder.build()
}

impl SpliceSink for TextBuffer {
    fn replace_range(&mut self, start: Position, end: Position, text: &str) {
        let start = self.offset_of(start);
        let end = self.offset_of(end).max(start);
        log::trace!("splice {start}..{end} <- {text:?}");
        self.apply(Edit::ReplaceRange {
            range: start..end,
            text: text.to_string(),
        });
    }

    fn set_cursor(&mut self, position: Position) {
        self.cursor = self.offset_of(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn round_trips_text_verbatim() {
        let text = "# Title\r\n\r\n- item\nlast";
        assert_eq!(TextBuffer::new(text).text(), text);
    }

    #[test]
    fn lines_exclude_terminators() {
        let buffer = TextBuffer::new("one\r\ntwo\nthree\n");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.line(0).as_deref(), Some("one"));
        assert_eq!(buffer.line(1).as_deref(), Some("two"));
        assert_eq!(buffer.line(2).as_deref(), Some("three"));
        assert_eq!(buffer.line(3).as_deref(), Some(""));
        assert_eq!(buffer.line(4), None);
    }

    #[rstest]
    #[case(Position::new(0, 2), 2)]
    #[case(Position::new(1, 0), 4)]
    #[case(Position::new(1, 99), 7)]
    #[case(Position::new(9, 1), 9)]
    fn offsets_are_clamped(#[case] position: Position, #[case] offset: usize) {
        let buffer = TextBuffer::new("abc\ndef\nghi");
        assert_eq!(buffer.offset_of(position), offset);
    }

    #[test]
    fn offsets_floor_to_char_boundaries() {
        let buffer = TextBuffer::new("aé");
        // byte 2 is inside 'é'
        assert_eq!(buffer.offset_of(Position::new(0, 2)), 1);
    }

    #[test]
    fn position_of_inverts_offset_of() {
        let buffer = TextBuffer::new("abc\ndef");
        assert_eq!(buffer.position_of(5), Position::new(1, 1));
        assert_eq!(buffer.offset_of(Position::new(1, 1)), 5);
    }

    #[test]
    fn apply_bumps_version_and_shifts_cursor() {
        let mut buffer = TextBuffer::new("hello world");
        buffer.set_cursor(Position::new(0, 8));
        let patch = buffer.apply(Edit::ReplaceRange {
            range: 0..5,
            text: "hi".to_string(),
        });
        assert_eq!(buffer.text(), "hi world");
        assert_eq!(patch.changed, 0..2);
        assert_eq!(patch.version, 1);
        assert_eq!(buffer.cursor(), Position::new(0, 5));
    }

    #[test]
    fn cursor_inside_replaced_range_moves_after_insert() {
        let mut buffer = TextBuffer::new("abcdef");
        buffer.set_cursor(Position::new(0, 3));
        buffer.apply(Edit::ReplaceRange {
            range: 1..5,
            text: "XY".to_string(),
        });
        assert_eq!(buffer.text(), "aXYf");
        assert_eq!(buffer.cursor_offset(), 3);
    }

    #[test]
    fn splice_sink_replaces_within_a_line() {
        let mut buffer = TextBuffer::new("first\nsee ((#test)) more");
        buffer.replace_range(Position::new(1, 4), Position::new(1, 13), "[[Target]]");
        buffer.set_cursor(Position::new(1, 14));
        assert_eq!(buffer.text(), "first\nsee [[Target]] more");
        assert_eq!(buffer.cursor(), Position::new(1, 14));
    }

    #[test]
    fn typing_and_deleting() {
        let mut buffer = TextBuffer::new("ab");
        buffer.set_cursor(Position::new(0, 1));
        buffer.insert_at_cursor("é");
        assert_eq!(buffer.text(), "aéb");
        assert_eq!(buffer.cursor_offset(), 3);

        buffer.delete_backward();
        assert_eq!(buffer.text(), "ab");
        assert_eq!(buffer.cursor_offset(), 1);
    }

    #[test]
    fn delete_backward_joins_lines() {
        let mut buffer = TextBuffer::new("ab\ncd");
        buffer.set_cursor(Position::new(1, 0));
        buffer.delete_backward();
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), Position::new(0, 2));
    }

    #[test]
    fn delete_backward_at_start_is_noop() {
        let mut buffer = TextBuffer::new("ab");
        assert_eq!(buffer.delete_backward(), None);
        assert_eq!(buffer.version(), 0);
    }

    #[test]
    fn cursor_motion_crosses_lines_and_multibyte_chars() {
        let mut buffer = TextBuffer::new("aé\nxyz");
        buffer.set_cursor(Position::new(0, 3));
        buffer.move_right();
        assert_eq!(buffer.cursor(), Position::new(1, 0));
        buffer.move_left();
        assert_eq!(buffer.cursor(), Position::new(0, 3));
        buffer.move_left();
        assert_eq!(buffer.cursor(), Position::new(0, 1));
        buffer.move_down();
        assert_eq!(buffer.cursor(), Position::new(1, 1));
        buffer.move_up();
        assert_eq!(buffer.cursor(), Position::new(0, 1));
    }
}
