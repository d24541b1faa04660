use crate::error::LinkError;

/// A user-configured delimiter literal together with its compiled pattern
/// fragment.
///
/// The fragment is derived from the literal once, at construction. A changed
/// literal means a new `Delimiter`; nothing is ever patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    literal: String,
    pattern: String,
}

impl Delimiter {
    /// Compiles `literal` into a fragment that matches exactly that text.
    ///
    /// Every character outside `[A-Za-z0-9]` is written as a `\x{..}` escape,
    /// so literals containing `(`, `[`, `|`, `\`, whitespace or non-ASCII text
    /// are all safe. The empty literal compiles to the empty fragment, which
    /// matches the empty position.
    pub fn compile(literal: &str) -> Self {
        Self {
            literal: literal.to_string(),
            pattern: escape_literal(literal),
        }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// The compiled regex fragment (unanchored, no capture groups).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Length of the literal in bytes.
    pub fn len(&self) -> usize {
        self.literal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literal.is_empty()
    }
}

fn escape_literal(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() * 2);
    for ch in literal.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else {
            out.push_str(&format!("\\x{{{:X}}}", ch as u32));
        }
    }
    out
}

/// The left/right literals that bracket a smart link search, e.g. `((` and `))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterPair {
    left: String,
    right: String,
}

impl DelimiterPair {
    pub const DEFAULT_LEFT: &'static str = "((";
    pub const DEFAULT_RIGHT: &'static str = "))";

    /// Both literals must be non-empty.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Result<Self, LinkError> {
        let left = left.into();
        let right = right.into();
        if left.is_empty() || right.is_empty() {
            return Err(LinkError::EmptyDelimiter);
        }
        Ok(Self { left, right })
    }

    /// Pair from user settings: a blank side falls back to its default.
    pub fn from_settings(left: &str, right: &str) -> Self {
        let pick = |value: &str, default: &str| {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            left: pick(left, Self::DEFAULT_LEFT),
            right: pick(right, Self::DEFAULT_RIGHT),
        }
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    /// Compiles both sides.
    pub fn compile(&self) -> (Delimiter, Delimiter) {
        (Delimiter::compile(&self.left), Delimiter::compile(&self.right))
    }
}

impl Default for DelimiterPair {
    fn default() -> Self {
        Self {
            left: Self::DEFAULT_LEFT.to_string(),
            right: Self::DEFAULT_RIGHT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use rstest::rstest;

    fn matches_exactly(literal: &str, haystack: &str) -> bool {
        let delimiter = Delimiter::compile(literal);
        let re = Regex::new(&format!("^{}$", delimiter.pattern())).unwrap();
        re.is_match(haystack)
    }

    #[rstest]
    #[case("((")]
    #[case("))")]
    #[case("((#")]
    #[case("[[")]
    #[case("{{")]
    #[case(".*+?^$|\\")]
    #[case("<<")]
    #[case("a b")]
    #[case("«»")]
    #[case("🔗")]
    #[case("abc123")]
    fn compiled_literal_matches_itself(#[case] literal: &str) {
        assert!(matches_exactly(literal, literal));
    }

    #[rstest]
    #[case("((", "xx")]
    #[case(".", "a")]
    #[case("a*", "aaa")]
    #[case("[ab]", "a")]
    fn metacharacters_lose_their_meaning(#[case] literal: &str, #[case] other: &str) {
        assert!(!matches_exactly(literal, other));
    }

    #[test]
    fn alphanumerics_are_kept_verbatim() {
        assert_eq!(Delimiter::compile("ab12").pattern(), "ab12");
        assert_eq!(Delimiter::compile("(").pattern(), "\\x{28}");
    }

    #[test]
    fn empty_literal_matches_empty_position() {
        let delimiter = Delimiter::compile("");
        assert!(delimiter.is_empty());
        assert_eq!(delimiter.pattern(), "");
        assert!(matches_exactly("", ""));
    }

    #[test]
    fn len_counts_bytes_of_literal() {
        assert_eq!(Delimiter::compile("((#").len(), 3);
        assert_eq!(Delimiter::compile("«").len(), 2);
    }

    #[test]
    fn pair_rejects_empty_sides() {
        assert!(matches!(
            DelimiterPair::new("", "))"),
            Err(LinkError::EmptyDelimiter)
        ));
        assert!(matches!(
            DelimiterPair::new("((", ""),
            Err(LinkError::EmptyDelimiter)
        ));
    }

    #[rstest]
    #[case("", "", "((", "))")]
    #[case("  ", "]]", "((", "]]")]
    #[case("[[", "", "[[", "))")]
    #[case("<<", ">>", "<<", ">>")]
    fn settings_fall_back_per_side(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected_left: &str,
        #[case] expected_right: &str,
    ) {
        let pair = DelimiterPair::from_settings(left, right);
        assert_eq!(pair.left(), expected_left);
        assert_eq!(pair.right(), expected_right);
    }

    #[test]
    fn default_pair_uses_double_parentheses() {
        let pair = DelimiterPair::default();
        assert_eq!(pair.left(), "((");
        assert_eq!(pair.right(), "))");
    }
}
