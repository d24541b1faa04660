use crate::error::LinkError;
use crate::link::split_path;

use super::{Corpus, CorpusDocument};

/// Resolves a file reference typed in a link to exactly one document.
///
/// Tried in order: the vault-relative path with extension
/// (`Notes/Doc.md`), then `dir/name` inside that directory, then a bare
/// name anywhere in the vault. A bare name shared by several documents is
/// ambiguous.
pub fn find_document<'a>(
    corpus: &'a Corpus,
    reference: &str,
) -> Result<&'a CorpusDocument, LinkError> {
    if let Some(document) = corpus
        .documents()
        .iter()
        .find(|d| d.relative_path().as_str() == reference)
    {
        return Ok(document);
    }

    match split_path(reference) {
        (None, name) => {
            let mut matches = corpus.documents().iter().filter(|d| d.name == name);
            match (matches.next(), matches.count()) {
                (None, _) => Err(LinkError::FileNotFound(name.to_string())),
                (Some(document), 0) => Ok(document),
                (Some(_), rest) => Err(LinkError::AmbiguousFileReference {
                    name: name.to_string(),
                    count: rest + 1,
                }),
            }
        }
        (Some(folder), name) => {
            if !corpus.documents().iter().any(|d| d.path.starts_with(folder)) {
                return Err(LinkError::FolderNotFound(folder.to_string()));
            }
            corpus
                .documents()
                .iter()
                .find(|d| d.path == folder && d.name == name)
                .ok_or_else(|| LinkError::FileNotFoundInFolder {
                    name: name.to_string(),
                    folder: folder.to_string(),
                })
        }
    }
}
