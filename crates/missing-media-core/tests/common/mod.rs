#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use missing_media_core::library::{HttpResponse, HttpTransport};
use missing_media_core::{Error, ProgressReporter};
use rusqlite::{params, Connection};
use url::Url;

/// In-memory stand-in for a Plex server, answering by URL path.
#[derive(Default)]
pub struct FakePlex {
    routes: HashMap<String, (u16, String)>,
    unreachable: bool,
    pub requests: RefCell<Vec<Url>>,
}

impl FakePlex {
    pub fn new() -> Self {
        Self::default().route("/", 200, "{}")
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn route(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(path.to_string(), (status, body.to_string()));
        self
    }

    pub fn paths_requested(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|u| u.path().to_string())
            .collect()
    }
}

impl HttpTransport for FakePlex {
    fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        self.requests.borrow_mut().push(url.clone());
        if self.unreachable {
            return Err(Error::Connectivity {
                host: url.origin().ascii_serialization(),
                reason: "connection refused".to_string(),
            });
        }
        let (status, body) = self
            .routes
            .get(url.path())
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(HttpResponse { status, body })
    }
}

/// Records which phases a run reached.
#[derive(Default)]
pub struct RecordingReporter {
    pub walks: RefCell<Vec<String>>,
    pub library_started: RefCell<bool>,
    pub library_progress: RefCell<Vec<(usize, usize)>>,
}

impl ProgressReporter for RecordingReporter {
    fn on_walk_start(&self, root: &str) {
        self.walks.borrow_mut().push(root.to_string());
    }

    fn on_library_start(&self, _total_items: usize) {
        *self.library_started.borrow_mut() = true;
    }

    fn on_library_progress(&self, items_done: usize, total_items: usize) {
        self.library_progress
            .borrow_mut()
            .push((items_done, total_items));
    }
}

/// Create a minimal Plex library database at `path`.
///
/// `sections` is (id, name, section_type, root paths); `files` are
/// `media_parts.file` values.
pub fn create_plex_db(path: &Path, sections: &[(i64, &str, i64, &[&str])], files: &[&str]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE library_sections (id INTEGER PRIMARY KEY, name TEXT, section_type INTEGER);
         CREATE TABLE section_locations (id INTEGER PRIMARY KEY, library_section_id INTEGER, root_path TEXT);
         CREATE TABLE media_parts (id INTEGER PRIMARY KEY, file TEXT);",
    )
    .unwrap();

    for (id, name, section_type, roots) in sections {
        conn.execute(
            "INSERT INTO library_sections (id, name, section_type) VALUES (?1, ?2, ?3)",
            params![id, name, section_type],
        )
        .unwrap();
        for root in roots.iter() {
            conn.execute(
                "INSERT INTO section_locations (library_section_id, root_path) VALUES (?1, ?2)",
                params![id, root],
            )
            .unwrap();
        }
    }

    for file in files {
        conn.execute("INSERT INTO media_parts (file) VALUES (?1)", params![file])
            .unwrap();
    }
}

pub fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"x").unwrap();
}
