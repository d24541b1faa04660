use std::ops::Range;

use super::Position;

/// Result of applying an edit to a [`TextBuffer`](super::TextBuffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte range of the buffer that now holds the inserted text.
    pub changed: Range<usize>,
    pub cursor: Position,
    pub version: u64,
}
