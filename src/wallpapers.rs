use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::SelectorError;

/// Lists candidate wallpapers under `dir`, sorted by path. A flat scan only
/// looks at the top level; directories themselves are never candidates.
pub fn load_wallpapers(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, SelectorError> {
    if !dir.is_dir() {
        return Err(SelectorError::MissingSource(dir.to_path_buf()));
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(true);

    let mut wallpapers = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() {
            wallpapers.push(entry.into_path());
        }
    }

    wallpapers.sort();
    debug!(
        dir = %dir.display(),
        recursive,
        count = wallpapers.len(),
        "scanned wallpapers"
    );

    Ok(wallpapers)
}
