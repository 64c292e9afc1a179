mod common;

use common::create_plex_db;
use missing_media_core::library::PlexDatabase;
use missing_media_core::path::normalize;
use missing_media_core::{Error, LibraryIndex, SectionKind, SilentReporter};
use rusqlite::Connection;
use tempfile::tempdir;

#[test]
fn test_sections_group_locations_and_map_kinds() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("library.db");
    create_plex_db(
        &db_path,
        &[
            (1, "Movies", 1, &["/media/Movies", "/media/Movies 4K"]),
            (2, "TV Shows", 2, &["/media/TV"]),
            (3, "Music", 8, &["/media/Music"]),
            (4, "Photos", 13, &["/media/Photos"]),
        ],
        &[],
    );

    let sections = PlexDatabase::new(&db_path).sections().unwrap();
    assert_eq!(sections.len(), 4);

    let movies = &sections[0];
    assert_eq!(movies.key, 1);
    assert_eq!(movies.title, "Movies");
    assert_eq!(movies.kind, SectionKind::Movie);
    assert_eq!(movies.locations, vec!["/media/Movies", "/media/Movies 4K"]);

    assert_eq!(sections[1].kind, SectionKind::Show);
    assert_eq!(sections[2].kind, SectionKind::Artist);
    assert!(!sections[3].kind.is_supported());
}

#[test]
fn test_root_prefix_does_not_match_sibling_directory() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("library.db");
    create_plex_db(
        &db_path,
        &[(1, "Movies", 1, &["/media/Movies"])],
        &[
            "/media/Movies/x.mkv",
            "/media/Movies2/x.mkv",
            "/media/Movies/Sub/y.mkv",
        ],
    );

    let db = PlexDatabase::new(&db_path);
    let section = db.sections().unwrap().remove(0);
    let files = db.collect(&section, false, &SilentReporter).unwrap();

    assert_eq!(files.len(), 2);
    assert!(files.contains(&normalize("/media/Movies/x.mkv")));
    assert!(files.contains(&normalize("/media/Movies/Sub/y.mkv")));
    assert!(!files.contains(&normalize("/media/Movies2/x.mkv")));
}

#[test]
fn test_prefix_is_case_sensitive_and_literal() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("library.db");
    create_plex_db(
        &db_path,
        &[(1, "Movies", 1, &["/media/My_Movies/"])],
        &[
            "/media/My_Movies/a.mkv",
            "/media/MyXMovies/b.mkv",
            "/media/my_movies/c.mkv",
        ],
    );

    let db = PlexDatabase::new(&db_path);
    let section = db.sections().unwrap().remove(0);
    let files = db.collect(&section, false, &SilentReporter).unwrap();

    assert_eq!(files.len(), 1);
    assert!(files.contains(&normalize("/media/My_Movies/a.mkv")));
}

#[test]
fn test_files_from_every_location_are_collected() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("library.db");
    create_plex_db(
        &db_path,
        &[(5, "TV", 2, &["/tv/a", "/tv/b"])],
        &["/tv/a/Show/S01E01.mkv", "/tv/b/Other/S01E01.mkv", "/tv/c/S01E01.mkv"],
    );

    let db = PlexDatabase::new(&db_path);
    let section = db.sections().unwrap().remove(0);
    let files = db.collect(&section, true, &SilentReporter).unwrap();
    assert_eq!(files.len(), 2);
}

#[test]
fn test_check_connection_requires_plex_tables() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("not-plex.db");
    Connection::open(&db_path)
        .unwrap()
        .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY);")
        .unwrap();

    let err = PlexDatabase::new(&db_path).check_connection().unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "{:?}", err);
}

#[test]
fn test_check_connection_rejects_non_sqlite_file() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("library.db");
    std::fs::write(&db_path, "not a database\n".repeat(128)).unwrap();

    let err = PlexDatabase::new(&db_path).check_connection().unwrap_err();
    assert_eq!(err.exit_code(), 2);
    match err {
        Error::Configuration(msg) => assert!(msg.contains("not a Plex library database"), "{}", msg),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_database_is_not_modified() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("library.db");
    create_plex_db(
        &db_path,
        &[(1, "Movies", 1, &["/media/Movies"])],
        &["/media/Movies/x.mkv"],
    );
    let before = std::fs::read(&db_path).unwrap();

    let db = PlexDatabase::new(&db_path);
    db.check_connection().unwrap();
    let section = db.sections().unwrap().remove(0);
    db.collect(&section, false, &SilentReporter).unwrap();

    assert_eq!(std::fs::read(&db_path).unwrap(), before);
}
