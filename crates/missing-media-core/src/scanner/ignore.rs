use glob::{MatchOptions, Pattern};

use crate::error::Error;
use crate::path::FileSet;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Glob patterns excluding files from both sides of a reconciliation.
///
/// Patterns are matched case-insensitively against normalized paths, so the
/// disk walk and the library index are filtered identically.
#[derive(Debug, Default, Clone)]
pub struct IgnoreFilter {
    patterns: Vec<Pattern>,
}

impl IgnoreFilter {
    pub fn new(globs: &[String]) -> Result<Self, Error> {
        let patterns = globs
            .iter()
            .map(|glob| {
                Pattern::new(glob).map_err(|e| {
                    Error::Configuration(format!("invalid ignore pattern '{}': {}", glob, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }

    /// Drop ignored paths from `set`, returning how many were removed.
    pub fn retain(&self, set: &mut FileSet) -> usize {
        if self.is_empty() {
            return 0;
        }
        let before = set.len();
        set.retain(|path| !self.is_ignored(path.as_str()));
        before - set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::normalize;

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let err = IgnoreFilter::new(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_matching_ignores_case() {
        let filter = IgnoreFilter::new(&["*-SAMPLE.mkv".to_string()]).unwrap();
        assert!(filter.is_ignored(normalize("/m/Film-sample.MKV").as_str()));
        assert!(!filter.is_ignored(normalize("/m/Film.mkv").as_str()));
    }

    #[test]
    fn test_retain_counts_removed() {
        let filter = IgnoreFilter::new(&["*/extras/*".to_string()]).unwrap();
        let mut set: FileSet = ["/m/a.mkv", "/m/Extras/trailer.mkv"]
            .iter()
            .map(|p| normalize(p))
            .collect();
        assert_eq!(filter.retain(&mut set), 1);
        assert!(set.contains(&normalize("/m/a.mkv")));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = IgnoreFilter::default();
        let mut set: FileSet = [normalize("/m/a.mkv")].into_iter().collect();
        assert_eq!(filter.retain(&mut set), 0);
        assert_eq!(set.len(), 1);
    }
}
