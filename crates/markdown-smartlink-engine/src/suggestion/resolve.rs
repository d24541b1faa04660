use std::ops::Range;

use crate::editing::{Position, SpliceSink};
use crate::error::LinkError;
use crate::search::{DelimiterPair, Span};

use super::Candidate;

/// The edit that turns an accepted suggestion into a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Canonical link text, brackets included.
    pub replacement: String,
    /// Byte range of the line being replaced, delimiters included.
    pub range: Range<usize>,
    /// Cursor offset after the edit, directly behind the inserted link.
    pub cursor: usize,
}

/// Serializes `candidate` into a link replacing the whole search, delimiters
/// and all.
///
/// `span` must come from locating with the same `delimiters`; its inner
/// bounds are widened by the left and right literal lengths.
pub fn resolve(
    span: &Span,
    delimiters: &DelimiterPair,
    candidate: &Candidate,
) -> Result<Resolution, LinkError> {
    if candidate.file.name.is_empty() {
        return Err(LinkError::MissingFile);
    }

    let replacement = candidate.to_link();
    let start = span.start.saturating_sub(delimiters.left().len());
    let end = span.end + delimiters.right().len();
    let cursor = start + replacement.len();

    log::debug!(
        "resolved {:?} over {}..{} to {replacement}",
        span.inner_text,
        start,
        end
    );

    Ok(Resolution {
        replacement,
        range: start..end,
        cursor,
    })
}

impl Resolution {
    /// Applies the edit to a copy of `line`.
    pub fn apply_to_line(&self, line: &str) -> Result<String, LinkError> {
        let Range { start, end } = self.range;
        if end > line.len() || !line.is_char_boundary(start) || !line.is_char_boundary(end) {
            return Err(LinkError::StaleSpan {
                start,
                end,
                len: line.len(),
            });
        }
        let mut out = line.to_string();
        out.replace_range(start..end, &self.replacement);
        Ok(out)
    }

    /// Hands the edit to a host buffer: one replacement, then the cursor.
    pub fn apply<S: SpliceSink + ?Sized>(&self, line: usize, sink: &mut S) {
        sink.replace_range(
            Position::new(line, self.range.start),
            Position::new(line, self.range.end),
            &self.replacement,
        );
        sink.set_cursor(Position::new(line, self.cursor));
    }
}
