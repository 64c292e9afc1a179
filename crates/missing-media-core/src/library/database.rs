use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rusqlite::{params, Connection, ErrorCode, OpenFlags};
use tracing::{debug, info};

use super::LibraryIndex;
use crate::error::Error;
use crate::media::SectionKind;
use crate::path::{normalize, with_trailing_separator, FileSet};
use crate::progress::ProgressReporter;
use crate::section::Section;

const DATABASE_FILE: [&str; 4] = [
    "Plex Media Server",
    "Plug-in Support",
    "Databases",
    "com.plexapp.plugins.library.db",
];

const REQUIRED_TABLES: [&str; 3] = ["library_sections", "section_locations", "media_parts"];

/// Library index read straight from the server's SQLite database.
///
/// The database is opened read-only for each operation and closed when that
/// operation returns, successfully or not.
pub struct PlexDatabase {
    path: PathBuf,
}

impl PlexDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, Error> {
        if !self.path.is_file() {
            return Err(Error::Configuration(format!(
                "Plex database '{}' does not exist",
                self.path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        // the server may be writing while we read
        conn.busy_timeout(Duration::from_secs(5))?;
        debug!("Opened {} read-only", self.path.display());
        Ok(conn)
    }

    /// SQLite only notices a foreign file on first read; report it like any
    /// other wrong file.
    fn not_a_database(&self, err: rusqlite::Error) -> Error {
        match err.sqlite_error_code() {
            Some(ErrorCode::NotADatabase) => Error::Configuration(format!(
                "'{}' is not a Plex library database ({})",
                self.path.display(),
                err
            )),
            _ => Error::Database(err),
        }
    }
}

impl LibraryIndex for PlexDatabase {
    fn check_connection(&self) -> Result<(), Error> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .map_err(|e| self.not_a_database(e))?;
        for table in REQUIRED_TABLES {
            let found: i64 = stmt
                .query_row(params![table], |row| row.get(0))
                .map_err(|e| self.not_a_database(e))?;
            if found == 0 {
                return Err(Error::Configuration(format!(
                    "'{}' is not a Plex library database (no {} table)",
                    self.path.display(),
                    table
                )));
            }
        }
        info!("Using Plex database {}", self.path.display());
        Ok(())
    }

    fn sections(&self) -> Result<Vec<Section>, Error> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.section_type, sl.root_path \
             FROM library_sections s \
             INNER JOIN section_locations sl ON s.id = sl.library_section_id \
             ORDER BY s.id, sl.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut sections: Vec<Section> = Vec::new();
        for row in rows {
            let (key, title, section_type, root_path) = row?;
            match sections.last_mut() {
                Some(section) if section.key == key => section.locations.push(root_path),
                _ => sections.push(Section {
                    key,
                    title,
                    kind: SectionKind::from_db_code(section_type),
                    locations: vec![root_path],
                }),
            }
        }
        Ok(sections)
    }

    /// Files under each of the section's roots. Extras are media parts like
    /// any other, so `find_extras` changes nothing here.
    fn collect(
        &self,
        section: &Section,
        _find_extras: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<FileSet, Error> {
        let start = Instant::now();
        let conn = self.open()?;
        // Exact, case-sensitive prefix match. LIKE would fold ASCII case and
        // treat `_` and `%` in folder names as wildcards.
        let mut stmt =
            conn.prepare("SELECT file FROM media_parts WHERE substr(file, 1, length(?1)) = ?1")?;

        reporter.on_library_start(section.locations.len());
        let mut in_library = FileSet::new();
        for (done, location) in section.locations.iter().enumerate() {
            let prefix = with_trailing_separator(location);
            let files = stmt.query_map(params![prefix], |row| row.get::<_, String>(0))?;
            for file in files {
                in_library.insert(normalize(&file?));
            }
            debug!("{} library files under {}", in_library.len(), prefix);
            reporter.on_library_progress(done + 1, section.locations.len());
        }

        reporter.on_library_complete(in_library.len(), start.elapsed().as_secs_f64());
        Ok(in_library)
    }
}

/// Well-known locations of the library database for this OS, most likely
/// first.
pub fn default_locations() -> Vec<PathBuf> {
    let mut bases: Vec<PathBuf> = Vec::new();

    if let Some(dir) = env::var_os("PLEX_MEDIA_SERVER_APPLICATION_SUPPORT_DIR") {
        bases.push(PathBuf::from(dir));
    }

    if cfg!(target_os = "windows") {
        if let Some(dir) = dirs::data_local_dir() {
            bases.push(dir);
        }
    } else if cfg!(target_os = "macos") {
        if let Some(dir) = dirs::data_dir() {
            bases.push(dir);
        }
    } else {
        if let Some(home) = env::var_os("PLEX_HOME") {
            bases.push(PathBuf::from(home).join("Library").join("Application Support"));
        }
        bases.push(PathBuf::from(
            "/var/lib/plexmediaserver/Library/Application Support",
        ));
        bases.push(PathBuf::from(
            "/var/snap/plexmediaserver/common/Library/Application Support",
        ));
    }

    bases
        .into_iter()
        .map(|base| DATABASE_FILE.iter().fold(base, |path, part| path.join(part)))
        .collect()
}

/// First default location holding a database file, if any.
pub fn find_default_database() -> Option<PathBuf> {
    let found = default_locations().into_iter().find(|p| p.is_file());
    match &found {
        Some(path) => debug!("Found Plex database at {}", path.display()),
        None => debug!("No Plex database at any default location"),
    }
    found
}
