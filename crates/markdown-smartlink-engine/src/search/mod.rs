//! # Search
//!
//! The in-line search pipeline: find the delimited span around the cursor,
//! classify its text into a [`Query`], scan the corpus for candidates.
//!
//! - **`delimiter`**: user delimiter literals and their escaped patterns
//! - **`span`**: locating the span that contains the cursor
//! - **`query`**: sigil parsing and candidate class selection
//! - **`scan`**: substring matching over the corpus
//!
//! [`SmartLinkSearch`] holds the compiled state for one configuration. It
//! is a plain value; when settings change, build a new one.

pub mod delimiter;
pub mod query;
pub mod scan;
pub mod span;

pub use delimiter::{Delimiter, DelimiterPair};
pub use query::{Query, SearchClasses, SearchOptions, Sigil};
pub use scan::{Matcher, scan};
pub use span::{DEFAULT_CONTENT_GRAMMAR, Span, SpanLocator, locate};

use crate::corpus::Corpus;
use crate::error::LinkError;
use crate::suggestion::{self, Candidate, Instruction, Resolution};

/// What the popover shows for one cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub span: Span,
    pub query: Query,
    pub candidates: Vec<Candidate>,
}

impl Suggestions {
    pub fn instructions(&self) -> Vec<Instruction> {
        suggestion::instructions(&self.query.options)
    }
}

#[derive(Debug, Clone)]
pub struct SmartLinkSearch {
    delimiters: DelimiterPair,
    locator: SpanLocator,
    ignore_case: bool,
}

impl SmartLinkSearch {
    pub fn new(delimiters: DelimiterPair, ignore_case: bool) -> Result<Self, LinkError> {
        Self::with_grammar(delimiters, DEFAULT_CONTENT_GRAMMAR, ignore_case)
    }

    /// Like [`Self::new`] with a custom pattern for the text between the
    /// delimiters.
    pub fn with_grammar(
        delimiters: DelimiterPair,
        grammar: &str,
        ignore_case: bool,
    ) -> Result<Self, LinkError> {
        let (left, right) = delimiters.compile();
        let locator = SpanLocator::new(&left, &right, grammar)?;
        log::debug!(
            "search delimiters {:?} {:?}, ignore_case={ignore_case}",
            delimiters.left(),
            delimiters.right()
        );
        Ok(Self {
            delimiters,
            locator,
            ignore_case,
        })
    }

    pub fn delimiters(&self) -> &DelimiterPair {
        &self.delimiters
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn locate(&self, line: &str, cursor: usize) -> Option<Span> {
        self.locator.locate(line, cursor)
    }

    /// Runs the whole pipeline. `None` when the cursor is not in a search.
    pub fn suggest(&self, line: &str, cursor: usize, corpus: &Corpus) -> Option<Suggestions> {
        let span = self.locate(line, cursor)?;
        let query = Query::classify(&span.inner_text);
        let candidates = scan(corpus, &query, self.ignore_case);
        Some(Suggestions {
            span,
            query,
            candidates,
        })
    }

    pub fn resolve(&self, span: &Span, candidate: &Candidate) -> Result<Resolution, LinkError> {
        suggestion::resolve(span, &self.delimiters, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusDocument, Heading};
    use crate::suggestion::FileRef;
    use pretty_assertions::assert_eq;

    fn corpus() -> Corpus {
        Corpus::new(vec![
            CorpusDocument::new("Test Plan", "")
                .with_headings([Heading::new("Testing", 2)]),
            CorpusDocument::new("Other", "x/"),
        ])
    }

    #[test]
    fn suggest_outside_a_search_is_none() {
        let search = SmartLinkSearch::new(DelimiterPair::default(), true).unwrap();
        assert_eq!(search.suggest("no search here", 3, &corpus()), None);
    }

    #[test]
    fn suggest_classifies_and_scans() {
        let search = SmartLinkSearch::new(DelimiterPair::default(), true).unwrap();
        let suggestions = search.suggest("a ((#test)) b", 6, &corpus()).unwrap();

        assert_eq!(suggestions.span.inner_text, "#test");
        assert_eq!(suggestions.query.text, "test");
        assert_eq!(
            suggestions.candidates,
            vec![Candidate::heading(
                Heading::new("Testing", 2),
                FileRef::new("Test Plan", "")
            )]
        );
        assert_eq!(
            suggestions.instructions(),
            vec![Instruction::ALIAS, Instruction::ACCEPT]
        );
    }

    #[test]
    fn suggest_then_resolve_end_to_end() {
        let search = SmartLinkSearch::new(DelimiterPair::default(), true).unwrap();
        let line = "see ((plan)) ok";
        let suggestions = search.suggest(line, 7, &corpus()).unwrap();
        let resolution = search
            .resolve(&suggestions.span, &suggestions.candidates[0])
            .unwrap();
        assert_eq!(resolution.apply_to_line(line).unwrap(), "see [[Test Plan]] ok");
    }

    #[test]
    fn case_sensitive_search() {
        let search = SmartLinkSearch::new(DelimiterPair::default(), false).unwrap();
        let suggestions = search.suggest("((test))", 3, &corpus()).unwrap();
        assert!(suggestions.candidates.is_empty());
    }

    #[test]
    fn custom_delimiters() {
        let pair = DelimiterPair::new("{{", "}}").unwrap();
        let search = SmartLinkSearch::new(pair, true).unwrap();
        assert!(search.locate("((other))", 3).is_none());
        let suggestions = search.suggest("{{other}}", 3, &corpus()).unwrap();
        assert_eq!(suggestions.candidates.len(), 1);
    }

    #[test]
    fn invalid_grammar_is_a_pattern_error() {
        let err = SmartLinkSearch::with_grammar(DelimiterPair::default(), "[unclosed", true)
            .unwrap_err();
        assert!(matches!(err, LinkError::Pattern(_)));
    }
}
