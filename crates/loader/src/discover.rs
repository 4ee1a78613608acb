use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{LoadError, Result};

/// Collects every regular file under `root` accepted by `keep`, sorted by path.
///
/// Symlinks are followed. A missing root yields no files; any other walk
/// error, including a symlink loop or an unreadable subdirectory, aborts.
pub fn collect_files_sorted(root: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
	let mut paths = Vec::new();
	for entry in WalkDir::new(root).follow_links(true) {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) if e.depth() == 0 && e.io_error().is_some_and(|io| io.kind() == ErrorKind::NotFound) => {
				debug!(root = %root.display(), "data directory does not exist");
				return Ok(Vec::new());
			}
			Err(source) => {
				let path = source.path().unwrap_or(root).to_path_buf();
				return Err(LoadError::Walk { path, source });
			}
		};
		if entry.file_type().is_file() && keep(entry.path()) {
			paths.push(entry.into_path());
		}
	}
	paths.sort();
	Ok(paths)
}

/// Returns true if `path` has one of `exts` as its extension.
pub fn has_extension(path: &Path, exts: &[&str]) -> bool {
	path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| exts.contains(&ext))
}
