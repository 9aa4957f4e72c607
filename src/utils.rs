use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File extensions that are geotagged, compared case-insensitively.
const PHOTO_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Checks if a directory entry is hidden (starts with '.').
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Whether `path` has a JPEG extension.
pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PHOTO_EXTENSIONS
                .iter()
                .any(|photo_ext| ext.eq_ignore_ascii_case(photo_ext))
        })
}

/// Lists the JPEG photos in `dir`, sorted by file name.
///
/// Only the top level is listed unless `recursive` is set. Hidden files and
/// directories are left out unless `include_hidden` is set; `dir` itself is always read.
/// I/O errors encountered during traversal are propagated.
pub fn list_photos(
    dir: &Path,
    recursive: bool,
    include_hidden: bool,
) -> Result<Vec<PathBuf>, walkdir::Error> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    WalkDir::new(dir)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || include_hidden || !is_hidden(e))
        .filter_map(|entry_result| match entry_result {
            Ok(entry) if entry.file_type().is_file() && is_photo(entry.path()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}
