//! # Corpus
//!
//! The documents a smart link search runs over, already normalized into one
//! shape. Whatever the host stores (front matter maps, heading caches, files
//! on disk) is converted at this boundary; the scanner never inspects raw
//! metadata.
//!
//! - **`frontmatter`**: YAML front matter adapter (alias / heading-alias keys)
//! - **`headings`**: heading extraction from markdown bodies
//! - **`lookup`**: resolving a typed file reference to one document

pub mod frontmatter;
pub mod headings;
pub mod lookup;

use relative_path::RelativePathBuf;
use serde::{Deserialize, Serialize};

use crate::suggestion::FileRef;

/// A heading and its depth (1 for `#`, up to 6).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub level: u8,
}

impl Heading {
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// An alias declared for one heading of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeadingAlias {
    pub alias: String,
    pub heading: String,
    pub level: u8,
}

impl HeadingAlias {
    pub fn new(alias: impl Into<String>, heading: impl Into<String>, level: u8) -> Self {
        Self {
            alias: alias.into(),
            heading: heading.into(),
            level,
        }
    }

    pub fn heading(&self) -> Heading {
        Heading::new(self.heading.clone(), self.level)
    }
}

/// One note in the corpus.
///
/// `path` is the directory prefix ending in `/`, or empty for notes at the
/// root; `name` is the base name without the `.md` extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusDocument {
    pub name: String,
    pub path: String,
    pub aliases: Vec<String>,
    pub headings: Vec<Heading>,
    pub heading_aliases: Vec<HeadingAlias>,
}

impl CorpusDocument {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Splits a vault-relative path such as `notes/Doc.md` into directory
    /// prefix and base name.
    pub fn from_relative_path(relative_path: &str) -> Self {
        let relative_path = RelativePathBuf::from(relative_path);
        let name = relative_path
            .file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string();
        let path = match relative_path.parent() {
            Some(parent) if !parent.as_str().is_empty() => format!("{}/", parent.as_str()),
            _ => String::new(),
        };
        Self::new(name, path)
    }

    /// Builds the document for a note from its full text.
    pub fn from_markdown(relative_path: &str, text: &str) -> Result<Self, serde_yaml::Error> {
        let frontmatter::Frontmatter {
            aliases,
            heading_aliases,
        } = frontmatter::read(text)?;
        Ok(Self::from_markdown_body(relative_path, text)
            .with_aliases(aliases)
            .with_heading_aliases(heading_aliases))
    }

    /// Like [`Self::from_markdown`] but only file name and headings.
    pub fn from_markdown_body(relative_path: &str, text: &str) -> Self {
        Self::from_relative_path(relative_path).with_headings(headings::extract_headings(text))
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn with_headings(mut self, headings: impl IntoIterator<Item = Heading>) -> Self {
        self.headings.extend(headings);
        self
    }

    pub fn with_heading_aliases(
        mut self,
        heading_aliases: impl IntoIterator<Item = HeadingAlias>,
    ) -> Self {
        self.heading_aliases.extend(heading_aliases);
        self
    }

    pub fn file_ref(&self) -> FileRef {
        FileRef::new(self.name.clone(), self.path.clone())
    }

    /// `path + name + ".md"`, the document's location inside the vault.
    pub fn relative_path(&self) -> RelativePathBuf {
        RelativePathBuf::from(format!("{}{}.md", self.path, self.name))
    }

    /// The reference a link would use: `path + name`.
    pub fn link_target(&self) -> String {
        format!("{}{}", self.path, self.name)
    }
}

/// An ordered, read-only collection of documents.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<CorpusDocument>,
}

impl Corpus {
    pub fn new(documents: Vec<CorpusDocument>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[CorpusDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Replaces the document at the same relative path, or appends it.
    pub fn upsert(&mut self, document: CorpusDocument) {
        match self
            .documents
            .iter_mut()
            .find(|d| d.path == document.path && d.name == document.name)
        {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }
}

impl FromIterator<CorpusDocument> for Corpus {
    fn from_iter<T: IntoIterator<Item = CorpusDocument>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a CorpusDocument;
    type IntoIter = std::slice::Iter<'a, CorpusDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
