//! # Editing
//!
//! The seam between link commands and whatever holds the text.
//!
//! Commands never mutate text themselves. They produce a replacement and a
//! cursor, then hand both to a [`SpliceSink`]. [`TextBuffer`] is the sink
//! the bundled host uses: an `xi_rope::Rope` edited through [`Edit`]
//! commands that compile to deltas.
//!
//! Positions are `(line, ch)` pairs where `ch` is a byte offset into the
//! line, matching the offsets the search locator reports.

pub mod buffer;
pub mod patch;

pub use buffer::{Edit, TextBuffer};
pub use patch::Patch;

/// A place in a line-oriented buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    /// Byte offset within the line.
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// Receives one replacement and a cursor move from a link command.
pub trait SpliceSink {
    /// Replaces the text between `start` and `end` with `text`.
    fn replace_range(&mut self, start: Position, end: Position, text: &str);

    fn set_cursor(&mut self, position: Position);
}
