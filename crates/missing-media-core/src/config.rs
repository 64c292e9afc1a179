use std::fmt;
use std::path::PathBuf;

/// Where the library side of a reconciliation comes from.
#[derive(Clone)]
pub enum LibrarySource {
    /// The Plex HTTP API, authenticated with a pre-obtained token.
    Api { host: String, token: String },
    /// The server's SQLite database, read directly.
    Database { path: PathBuf },
}

impl fmt::Debug for LibrarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibrarySource::Api { host, .. } => f
                .debug_struct("Api")
                .field("host", host)
                .field("token", &"<redacted>")
                .finish(),
            LibrarySource::Database { path } => {
                f.debug_struct("Database").field("path", path).finish()
            }
        }
    }
}

/// Fully resolved settings for one run. Built by the caller; the core never
/// consults files, the environment or the operator to fill these in.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: LibrarySource,
    pub section_id: Option<i64>,
    pub find_extras: bool,
    pub ignore_patterns: Vec<String>,
}

impl RunConfig {
    pub fn new(source: LibrarySource) -> Self {
        Self {
            source,
            section_id: None,
            find_extras: false,
            ignore_patterns: Vec::new(),
        }
    }

    pub fn with_section(mut self, section_id: i64) -> Self {
        self.section_id = Some(section_id);
        self
    }

    pub fn with_find_extras(mut self, find_extras: bool) -> Self {
        self.find_extras = find_extras;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let source = LibrarySource::Api {
            host: "http://localhost:32400".to_string(),
            token: "s3cret".to_string(),
        };
        let printed = format!("{:?}", RunConfig::new(source));
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("localhost:32400"));
    }

    #[test]
    fn test_builder_defaults() {
        let config = RunConfig::new(LibrarySource::Database {
            path: PathBuf::from("/tmp/plex.db"),
        });
        assert_eq!(config.section_id, None);
        assert!(!config.find_extras);
        assert!(config.ignore_patterns.is_empty());

        let config = config.with_section(3).with_find_extras(true);
        assert_eq!(config.section_id, Some(3));
        assert!(config.find_extras);
    }
}
