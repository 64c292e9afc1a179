use std::collections::HashSet;
use std::fmt;
use std::path::MAIN_SEPARATOR;

/// Comparison key for a media file path.
///
/// Lowercased, with both `/` and `\` mapped to the native separator. Two
/// paths name the same file iff their keys are equal. On case-sensitive
/// filesystems two distinct files that differ only by case collapse to one
/// key; that approximation is intentional and kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalized paths from one source (disk walk or library index).
pub type FileSet = HashSet<NormalizedPath>;

pub fn normalize(raw: &str) -> NormalizedPath {
    let key = raw
        .chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect::<String>()
        .to_lowercase();
    NormalizedPath(key)
}

/// Append a separator to `root` unless it already ends with one, so that it
/// can be used as a prefix without `/Movies` matching `/Movies2/...`.
///
/// The separator style already used in `root` wins; the native separator is
/// only used when `root` contains none.
pub fn with_trailing_separator(root: &str) -> String {
    if root.ends_with('/') || root.ends_with('\\') {
        return root.to_string();
    }
    let sep = if root.contains('\\') && !root.contains('/') {
        '\\'
    } else if root.contains('/') {
        '/'
    } else {
        MAIN_SEPARATOR
    };
    format!("{}{}", root, sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "/Media/Movies/Film (2001)/Film.MKV",
            "C:\\Media\\TV\\Show\\S01E01.mp4",
            "mixed/Sep\\Path.AVI",
            "",
        ] {
            let once = normalize(raw);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_case_and_separator_variants_collide() {
        assert_eq!(
            normalize("/Media/Movies/A.mkv"),
            normalize("\\media\\MOVIES\\a.MKV")
        );
    }

    #[test]
    fn test_different_files_stay_distinct() {
        assert_ne!(normalize("/media/a.mkv"), normalize("/media/b.mkv"));
    }

    #[test]
    fn test_trailing_separator_added_once() {
        assert_eq!(with_trailing_separator("/media/Movies"), "/media/Movies/");
        assert_eq!(with_trailing_separator("/media/Movies/"), "/media/Movies/");
        assert_eq!(with_trailing_separator("C:\\Movies"), "C:\\Movies\\");
        assert_eq!(with_trailing_separator("C:\\Movies\\"), "C:\\Movies\\");
    }
}
