use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary vault directory
pub fn create_test_notes_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a note (or any file) inside the vault, creating folders on the way
pub fn create_test_file(notes_dir: &TempDir, relative_path: &str, content: &str) -> PathBuf {
    let file_path = notes_dir.path().join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
