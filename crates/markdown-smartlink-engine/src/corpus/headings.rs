use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use super::Heading;
use super::frontmatter;

/// Headings of a markdown note in document order.
///
/// Front matter is skipped. Inline markup is flattened to its text, so
/// `## Using `cargo`` yields `Using cargo`.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let body = frontmatter::split(markdown).body;
    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level as u8, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        headings.push(Heading::new(text, level));
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn atx_and_setext_headings() {
        let markdown = "# Top\n\ntext\n\n### Deep\n\nUnder\n-----\n";
        assert_eq!(
            extract_headings(markdown),
            vec![
                Heading::new("Top", 1),
                Heading::new("Deep", 3),
                Heading::new("Under", 2),
            ]
        );
    }

    #[test]
    fn inline_markup_is_flattened() {
        let markdown = "## Using `cargo` *fast*\n";
        assert_eq!(
            extract_headings(markdown),
            vec![Heading::new("Using cargo fast", 2)]
        );
    }

    #[test]
    fn front_matter_is_not_a_heading() {
        let markdown = "---\naliases: [x]\n---\n# Real\n";
        assert_eq!(extract_headings(markdown), vec![Heading::new("Real", 1)]);
    }

    #[test]
    fn hashes_in_code_blocks_are_ignored() {
        let markdown = "```sh\n# comment\n```\n\n###### Six\n";
        assert_eq!(extract_headings(markdown), vec![Heading::new("Six", 6)]);
    }

    #[test]
    fn empty_headings_are_skipped() {
        assert!(extract_headings("#\n\n##   \n").is_empty());
    }
}
