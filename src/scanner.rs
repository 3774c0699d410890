use crate::error::PruneError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// A regular file as seen when the directory was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: SystemTime,
}

/// List the regular files directly inside `dir`.
///
/// Symlinks, subdirectories and special files are skipped. Any failure to
/// read the directory or a file's size or modification time aborts the scan.
pub fn scan(dir: &Path) -> Result<Vec<FileEntry>, PruneError> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let metadata = entry.metadata().map_err(|err| PruneError::Metadata {
            path: path.to_path_buf(),
            source: err.into(),
        })?;
        let modified = metadata.modified().map_err(|source| PruneError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;

        found.push(FileEntry {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            modified,
        });
    }

    tracing::debug!(directory = %dir.display(), files = found.len(), "Scanned directory");
    Ok(found)
}

/// Oldest first; files modified at the same instant go by path.
pub fn deletion_order(mut entries: Vec<FileEntry>) -> Vec<FileEntry> {
    entries.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));
    entries
}

pub fn total_size(entries: &[FileEntry]) -> u64 {
    entries.iter().map(|e| e.size_bytes).sum()
}
