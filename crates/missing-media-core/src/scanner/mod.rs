mod ignore;
mod walk;

pub use ignore::IgnoreFilter;
pub use walk::collect_media_files;

use std::path::Path;

/// Remove directories that are subdirectories of other directories in the
/// list, so overlapping section locations are only walked once.
pub fn non_overlapping_directories(dirs: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for dir in dirs {
        let dir_path = Path::new(dir);

        if result.iter().any(|kept| dir_path.starts_with(Path::new(kept))) {
            continue;
        }

        result.retain(|kept| !Path::new(kept).starts_with(dir_path));
        result.push(dir.clone());
    }

    result
}
