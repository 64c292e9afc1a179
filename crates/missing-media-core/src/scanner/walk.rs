use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::ignore::IgnoreFilter;
use super::non_overlapping_directories;
use crate::error::Error;
use crate::media::is_media_file;
use crate::path::{normalize, FileSet};
use crate::progress::ProgressReporter;

const PROGRESS_EVERY: usize = 1000;

/// Walk every root and collect the normalized paths of regular files whose
/// extension is in `whitelist`.
///
/// A root that is missing or not a directory is a configuration error.
/// Unreadable subtrees and entries are logged and skipped; the walk carries on.
/// Symlinks to files are collected under the link's own path; symlinked
/// directories are not descended into.
pub fn collect_media_files(
    roots: &[String],
    whitelist: &[&str],
    ignore: &IgnoreFilter,
    reporter: &dyn ProgressReporter,
) -> Result<FileSet, Error> {
    for root in roots {
        if !Path::new(root).is_dir() {
            return Err(Error::Configuration(format!(
                "library root '{}' does not exist or is not a directory",
                root
            )));
        }
    }

    let start = Instant::now();
    let mut on_disk = FileSet::new();
    let mut files_seen = 0usize;

    for root in non_overlapping_directories(roots) {
        info!("Reading \"{}\"", root);
        reporter.on_walk_start(&root);

        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let at = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.clone());
                    warn!("Skipping unreadable entry under {}: {}", at, err);
                    continue;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            files_seen += 1;
            if files_seen % PROGRESS_EVERY == 0 {
                debug!("Processed {} files", files_seen);
                reporter.on_walk_progress(files_seen);
            }

            if !is_media_file(entry.path(), whitelist) {
                continue;
            }

            let key = normalize(&entry.path().to_string_lossy());
            if ignore.is_ignored(key.as_str()) {
                continue;
            }
            on_disk.insert(key);
        }
    }

    reporter.on_walk_complete(on_disk.len(), start.elapsed().as_secs_f64());
    debug!(
        "Walk completed in {:.2}s: {} files seen, {} media files",
        start.elapsed().as_secs_f64(),
        files_seen,
        on_disk.len()
    );

    Ok(on_disk)
}

/// Plex indexes a symlinked file by the link path, so a link whose target is a
/// file counts. Dangling links do not.
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    match fs::metadata(entry.path()) {
        Ok(meta) => meta.is_file(),
        Err(err) => {
            debug!("Skipping dangling link {}: {}", entry.path().display(), err);
            false
        }
    }
}
