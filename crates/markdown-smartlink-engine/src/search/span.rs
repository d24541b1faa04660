use regex::Regex;
use serde::Serialize;

use super::delimiter::Delimiter;

/// Characters allowed between the delimiters of a search: letters, numbers,
/// symbols, punctuation, combining marks and whitespace.
pub const DEFAULT_CONTENT_GRAMMAR: &str = r"[\p{L}\p{N}\p{S}\p{P}\p{M}\s]+";

/// The inside of a delimiter-bounded search on one line.
///
/// `start..end` are byte offsets of the inner text, i.e. the delimiters
/// themselves are excluded. `inner_text` holds sigils and query body as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub inner_text: String,
}

/// Finds the search span around a cursor.
///
/// Built from two compiled delimiters and a content grammar as
/// `left(grammar)?right`. Rebuild it whenever a delimiter changes.
#[derive(Debug, Clone)]
pub struct SpanLocator {
    regex: Regex,
    left_len: usize,
    right_len: usize,
}

impl SpanLocator {
    pub fn new(left: &Delimiter, right: &Delimiter, grammar: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(
            "{}({})?{}",
            left.pattern(),
            grammar,
            right.pattern()
        ))?;
        Ok(Self {
            regex,
            left_len: left.len(),
            right_len: right.len(),
        })
    }

    pub fn with_default_grammar(left: &Delimiter, right: &Delimiter) -> Result<Self, regex::Error> {
        Self::new(left, right, DEFAULT_CONTENT_GRAMMAR)
    }

    /// Returns the span whose full match strictly contains `cursor`.
    ///
    /// Matches are visited left to right without overlap; the first one with
    /// `match_start < cursor < match_end` wins. A cursor sitting exactly on
    /// the outer edge of a delimiter is outside.
    pub fn locate(&self, line: &str, cursor: usize) -> Option<Span> {
        for caps in self.regex.captures_iter(line) {
            let Some(full) = caps.get(0) else {
                continue;
            };
            if full.start() < cursor && cursor < full.end() {
                let inner_text = caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                return Some(Span {
                    start: full.start() + self.left_len,
                    end: full.end() - self.right_len,
                    inner_text,
                });
            }
        }
        None
    }
}

/// One-shot form of [`SpanLocator::locate`].
pub fn locate(
    line: &str,
    cursor: usize,
    left: &Delimiter,
    right: &Delimiter,
    grammar: &str,
) -> Result<Option<Span>, regex::Error> {
    Ok(SpanLocator::new(left, right, grammar)?.locate(line, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const LINE: &str = "beginning text ((#test)) end text";

    fn locator(left: &str, right: &str) -> SpanLocator {
        SpanLocator::with_default_grammar(&Delimiter::compile(left), &Delimiter::compile(right))
            .unwrap()
    }

    fn test_span() -> Span {
        Span {
            start: 18,
            end: 22,
            inner_text: "test".to_string(),
        }
    }

    #[rstest]
    #[case::inside_match(21, Some(test_span()))]
    #[case::left_of_match(9, None)]
    #[case::right_of_match(25, None)]
    #[case::just_inside_left_edge(16, Some(test_span()))]
    #[case::on_left_edge(15, None)]
    #[case::just_inside_right_edge(23, Some(test_span()))]
    #[case::on_right_edge(24, None)]
    fn cursor_positions(#[case] cursor: usize, #[case] expected: Option<Span>) {
        assert_eq!(locator("((#", "))").locate(LINE, cursor), expected);
    }

    #[test]
    fn no_delimiters_in_line() {
        assert_eq!(locator("((#", "))").locate("beginning text end text", 5), None);
    }

    #[test]
    fn empty_content_is_a_present_span() {
        let span = locator("((#", "))").locate("beginning text ((#)) end text", 18);
        assert_eq!(
            span,
            Some(Span {
                start: 18,
                end: 18,
                inner_text: String::new(),
            })
        );
    }

    #[test]
    fn inner_text_keeps_sigils() {
        let span = locator("((", "))").locate("see ((#test)) more", 9).unwrap();
        assert_eq!(span.start, 6);
        assert_eq!(span.end, 11);
        assert_eq!(span.inner_text, "#test");
    }

    #[test]
    fn end_to_end_example_span() {
        let span = locator("((#", "))").locate("see ((#test)) more", 9).unwrap();
        assert_eq!(
            span,
            Span {
                start: 7,
                end: 11,
                inner_text: "test".to_string(),
            }
        );
    }

    #[test]
    fn inner_text_equals_text_between_delimiters() {
        let line = "a ((Über Café 🙂 notes/2024.md)) z";
        let span = locator("((", "))").locate(line, 5).unwrap();
        assert_eq!(&line[span.start..span.end], span.inner_text);
        assert_eq!(span.inner_text, "Über Café 🙂 notes/2024.md");
    }

    #[test]
    fn regex_metacharacters_in_delimiters() {
        let line = "x [?test?] y";
        let span = locator("[?", "?]").locate(line, 5).unwrap();
        assert_eq!(span.inner_text, "test");
        assert_eq!(span.start, 4);
        assert_eq!(span.end, 8);
    }

    #[test]
    fn restricted_grammar_separates_neighbouring_searches() {
        let left = Delimiter::compile("((");
        let right = Delimiter::compile("))");
        let line = "((one)) and ((two))";

        let first = locate(line, 3, &left, &right, "[a-z]+").unwrap().unwrap();
        assert_eq!(first.inner_text, "one");

        let second = locate(line, 15, &left, &right, "[a-z]+").unwrap().unwrap();
        assert_eq!(second.inner_text, "two");
        assert_eq!(second.start, 14);

        assert_eq!(locate(line, 9, &left, &right, "[a-z]+").unwrap(), None);
    }

    fn span(start: usize, end: usize, inner_text: &str) -> Option<Span> {
        Some(Span {
            start,
            end,
            inner_text: inner_text.to_string(),
        })
    }

    #[rstest]
    #[case::before_left("a ::ab:: z", 2, None)]
    #[case::inside_left("a ::ab:: z", 3, span(4, 6, "ab"))]
    #[case::inside_content("a ::ab:: z", 5, span(4, 6, "ab"))]
    #[case::inside_right("a ::ab:: z", 7, span(4, 6, "ab"))]
    #[case::after_right("a ::ab:: z", 8, None)]
    #[case::empty_content("::::", 2, span(2, 2, ""))]
    #[case::first_left_reaches_last_right("a ::x:: b ::y:: c", 12, span(4, 13, "x:: b ::y"))]
    fn identical_delimiters(
        #[case] line: &str,
        #[case] cursor: usize,
        #[case] expected: Option<Span>,
    ) {
        assert_eq!(locator("::", "::").locate(line, cursor), expected);
    }

    #[rstest]
    #[case::inside_content("a (x(( b", 3, span(3, 4, "x"))]
    #[case::between_closing_parens("a (x(( b", 5, span(3, 4, "x"))]
    #[case::after_right("a (x(( b", 6, None)]
    #[case::second_left_is_content("((x((", 2, span(1, 3, "(x"))]
    fn left_is_prefix_of_right(
        #[case] line: &str,
        #[case] cursor: usize,
        #[case] expected: Option<Span>,
    ) {
        assert_eq!(locator("(", "((").locate(line, cursor), expected);
    }

    #[rstest]
    #[case::inside_left("((x(", 1, span(2, 3, "x"))]
    #[case::inside_content("((x(", 3, span(2, 3, "x"))]
    #[case::on_right_edge("((x(", 4, None)]
    fn right_is_prefix_of_left(
        #[case] line: &str,
        #[case] cursor: usize,
        #[case] expected: Option<Span>,
    ) {
        assert_eq!(locator("((", "(").locate(line, cursor), expected);
    }

    #[test]
    fn identical_delimiters_with_restricted_grammar_stay_apart() {
        let colons = Delimiter::compile("::");
        let line = "::a:: ::b::";
        assert_eq!(
            locate(line, 8, &colons, &colons, "[a-z]+").unwrap(),
            span(8, 9, "b")
        );
        assert_eq!(locate(line, 5, &colons, &colons, "[a-z]+").unwrap(), None);
    }

    #[test]
    fn content_outside_grammar_is_not_a_search() {
        let left = Delimiter::compile("((");
        let right = Delimiter::compile("))");
        assert_eq!(locate("((a b))", 3, &left, &right, "[a-z]+").unwrap(), None);
    }
}
