//! # Commands
//!
//! User-invoked actions around smart links that are not part of the
//! suggestion flow itself.

use std::path::Path;

use relative_path::RelativePathBuf;

use crate::corpus::frontmatter::{self, AliasOutcome, Updated};
use crate::corpus::{Corpus, HeadingAlias, lookup};
use crate::editing::{Position, SpliceSink};
use crate::error::LinkError;
use crate::io;
use crate::link::{LinkParts, current_link};
use crate::search::DelimiterPair;

/// The alias a link asks for: on the file, or on one of its headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewAlias {
    File(String),
    Heading(HeadingAlias),
}

impl NewAlias {
    /// Adds the alias to the front matter of `text`.
    pub fn add_to(&self, text: &str) -> Result<Updated, serde_yaml::Error> {
        match self {
            NewAlias::File(alias) => frontmatter::add_alias(text, alias),
            NewAlias::Heading(heading_alias) => {
                frontmatter::add_heading_alias(text, heading_alias)
            }
        }
    }
}

/// Result of [`create_alias`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasCreated {
    pub outcome: AliasOutcome,
    /// The note whose front matter was checked or changed.
    pub path: RelativePathBuf,
    pub alias: NewAlias,
}

/// Stores the alias of the link under the cursor in the linked note.
///
/// `[[Doc|short]]` adds `short` to `Doc`'s `aliases`; `[[Doc##Intro|short]]`
/// adds `{heading: Intro, alias: short, level: 2}` to its
/// `heading-aliases`. When the note changes on disk its corpus entry is
/// reloaded so the new alias is searchable right away.
pub fn create_alias(
    line: &str,
    cursor: usize,
    corpus: &mut Corpus,
    notes_root: &Path,
) -> Result<AliasCreated, LinkError> {
    let range = current_link(line, cursor).ok_or(LinkError::NotInsideLink)?;
    let LinkParts {
        file,
        heading,
        alias,
    } = LinkParts::parse(&line[range])?;
    let alias = alias.ok_or(LinkError::MissingAlias)?;

    let path = lookup::find_document(corpus, &file)?.relative_path();
    let text = io::read_file(&path, notes_root)?;

    let alias = match heading {
        Some(heading) => NewAlias::Heading(HeadingAlias::new(alias, heading.text, heading.level)),
        None => NewAlias::File(alias),
    };
    let updated = alias
        .add_to(&text)
        .map_err(|source| LinkError::Frontmatter {
            path: path.to_path(notes_root),
            source,
        })?;

    if updated.outcome == AliasOutcome::Added {
        io::write_file(&path, notes_root, &updated.text)?;
        corpus.upsert(io::load_document(&path, notes_root)?);
        log::info!("Added alias to {path}");
    } else {
        log::info!("Alias already present in {path}");
    }

    Ok(AliasCreated {
        outcome: updated.outcome,
        path,
        alias,
    })
}

/// Inserts an empty search (`left` + `right`) at `cursor` and puts the
/// cursor between the two delimiters.
pub fn insert_search<S: SpliceSink + ?Sized>(
    sink: &mut S,
    cursor: Position,
    delimiters: &DelimiterPair,
) {
    let text = format!("{}{}", delimiters.left(), delimiters.right());
    sink.replace_range(cursor, cursor, &text);
    sink.set_cursor(Position::new(
        cursor.line,
        cursor.ch + delimiters.left().len(),
    ));
}
