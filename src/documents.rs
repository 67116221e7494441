use std::fs;
use std::path::{Path, PathBuf};

/// PDF files directly inside `dir`, sorted by path. A missing directory
/// yields an empty list.
pub fn find_documents(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if dir.is_dir()
        && let Ok(entries) = fs::read_dir(dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext.eq_ignore_ascii_case("pdf")
            {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}
