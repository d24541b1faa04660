//! # Links
//!
//! Canonical wiki link syntax (`[[path/name##heading|alias]]`) owned in one
//! place: formatting a link from its parts, finding a typed link under the
//! cursor and splitting it back into parts.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::corpus::Heading;
use crate::error::LinkError;
use crate::suggestion::FileRef;

pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static str = "[[";
    pub const CLOSE: &'static str = "]]";
    pub const HEADING: char = '#';
    pub const ALIAS: char = '|';
    pub const MAX_HEADING_LEVEL: usize = 6;

    /// `path + name`, then `#` × level + heading text, then `|` + alias.
    pub fn body(file: &FileRef, heading: Option<&Heading>, alias: Option<&str>) -> String {
        let mut body = format!("{}{}", file.path, file.name);
        if let Some(heading) = heading {
            body.extend(std::iter::repeat_n(Self::HEADING, heading.level as usize));
            body.push_str(&heading.text);
        }
        if let Some(alias) = alias {
            body.push(Self::ALIAS);
            body.push_str(alias);
        }
        body
    }

    pub fn format(file: &FileRef, heading: Option<&Heading>, alias: Option<&str>) -> String {
        format!(
            "{}{}{}",
            Self::OPEN,
            Self::body(file, heading, alias),
            Self::CLOSE
        )
    }
}

/// Byte range of the `[[...]]` link strictly containing `cursor`, if any.
pub fn current_link(line: &str, cursor: usize) -> Option<Range<usize>> {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    let link_regex =
        LINK_REGEX.get_or_init(|| Regex::new(r"\[\[.*?\]\]").expect("Invalid link regex"));

    link_regex
        .find_iter(line)
        .find(|m| m.start() < cursor && cursor < m.end())
        .map(|m| m.range())
}

/// A typed link split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkParts {
    /// File reference as typed: a bare name or `dir/name`.
    pub file: String,
    pub heading: Option<Heading>,
    pub alias: Option<String>,
}

impl LinkParts {
    /// Parses the first `[[file#heading|alias]]` in `text`.
    ///
    /// The heading level is the number of `#` characters. A `#` with no
    /// text after it is not a heading reference.
    pub fn parse(text: &str) -> Result<Self, LinkError> {
        static PARTS_REGEX: OnceLock<Regex> = OnceLock::new();
        let parts_regex = PARTS_REGEX.get_or_init(|| {
            Regex::new(r"\[\[([^|#\]]+)(#(#*)([^|\]]+))?(\|([^\]]+))?\]\]")
                .expect("Invalid link parts regex")
        });

        let caps = parts_regex
            .captures(text)
            .ok_or_else(|| LinkError::InvalidLinkSyntax(text.to_string()))?;

        let file = caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| LinkError::InvalidLinkSyntax(text.to_string()))?;

        let heading = match (caps.get(2), caps.get(3), caps.get(4)) {
            (Some(_), hashes, Some(heading_text)) => {
                let level = 1 + hashes.map_or(0, |m| m.as_str().len());
                if level > WikiLink::MAX_HEADING_LEVEL {
                    return Err(LinkError::HeadingLevelOutOfRange(level));
                }
                Some(Heading::new(heading_text.as_str(), level as u8))
            }
            _ => None,
        };

        let alias = caps.get(6).map(|m| m.as_str().to_string());

        Ok(Self {
            file,
            heading,
            alias,
        })
    }
}

/// Splits a file reference at its last `/`.
///
/// Returns the directory prefix including the trailing slash, or `None` for
/// a bare name.
pub fn split_path(reference: &str) -> (Option<&str>, &str) {
    match reference.rfind('/') {
        Some(idx) => (Some(&reference[..=idx]), &reference[idx + 1..]),
        None => (None, reference),
    }
}
