use std::path::PathBuf;

/// Failures of a single user-initiated link operation.
///
/// Every variant is terminal for the operation that raised it: nothing is
/// retried and no text or file is mutated once one of these is returned.
/// "Cursor not inside a search" is not an error and is reported as `None`
/// by the locating functions instead.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Cursor is not inside a link")]
    NotInsideLink,

    #[error("Invalid link format: {0}")]
    InvalidLinkSyntax(String),

    #[error("Maximum heading level of 6 exceeded (found {0})")]
    HeadingLevelOutOfRange(usize),

    #[error("No alias found in link")]
    MissingAlias,

    #[error("Invalid file: suggestion has no file name")]
    MissingFile,

    #[error("File {0} not found")]
    FileNotFound(String),

    #[error("Folder {0} not found")]
    FolderNotFound(String),

    #[error("File {name} not found in folder {folder}")]
    FileNotFoundInFolder { name: String, folder: String },

    #[error(
        "Multiple files found with name {name} ({count} matches), please specify the full path of the file"
    )]
    AmbiguousFileReference { name: String, count: usize },

    #[error("Search span {start}..{end} no longer fits the line (length {len})")]
    StaleSpan { start: usize, end: usize, len: usize },

    #[error("Delimiter must not be empty")]
    EmptyDelimiter,

    #[error("Failed to compile search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to parse front matter in {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Io(#[from] crate::io::IoError),
}
