use crate::corpus::{Corpus, CorpusDocument};
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
    #[error("{0} is not inside the notes directory")]
    OutsideNotesDir(PathBuf),
}

/// Read a note relative to the notes root
pub fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write a note relative to the notes root, creating folders as needed
pub fn write_file(
    relative_path: &RelativePath,
    notes_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(notes_root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// All `.md` files below the notes root, sorted by path
pub fn scan_markdown_files(notes_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_notes_dir(notes_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(notes_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidNotesDir(format!(
            "{} does not exist or is not a directory",
            path.display()
        )));
    }

    Ok(())
}

/// Vault-relative form of a path below `notes_root`
pub fn relative_to_root(path: &Path, notes_root: &Path) -> Result<RelativePathBuf, IoError> {
    path.strip_prefix(notes_root)
        .ok()
        .and_then(|relative| RelativePathBuf::from_path(relative).ok())
        .ok_or_else(|| IoError::OutsideNotesDir(path.to_path_buf()))
}

/// Reads one note into a corpus document.
///
/// Front matter that fails to parse is logged and ignored, so the note is
/// still searchable by name and headings.
pub fn load_document(
    relative_path: &RelativePath,
    notes_root: &Path,
) -> Result<CorpusDocument, IoError> {
    let text = read_file(relative_path, notes_root)?;
    Ok(
        CorpusDocument::from_markdown(relative_path.as_str(), &text).unwrap_or_else(|err| {
            log::warn!("Ignoring front matter of {relative_path}: {err}");
            CorpusDocument::from_markdown_body(relative_path.as_str(), &text)
        }),
    )
}

/// Loads every note below `notes_root` in path order
pub fn load_vault(notes_root: &Path) -> Result<Corpus, IoError> {
    let files = scan_markdown_files(notes_root)?;
    let mut documents = Vec::with_capacity(files.len());

    for path in &files {
        let relative_path = relative_to_root(path, notes_root)?;
        documents.push(load_document(&relative_path, notes_root)?);
    }

    log::info!(
        "Loaded {} notes from {}",
        documents.len(),
        notes_root.display()
    );
    Ok(Corpus::new(documents))
}
