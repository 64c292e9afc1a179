//! The library side of a reconciliation: what Plex believes it has indexed.
//!
//! Two interchangeable sources sit behind [`LibraryIndex`]: the HTTP API
//! ([`api::PlexApi`]) and the server's SQLite database read directly
//! ([`database::PlexDatabase`]). Both return paths in the same normalized
//! form as the disk walk.

pub mod api;
pub mod database;
pub mod transport;

use crate::config::LibrarySource;
use crate::error::Error;
use crate::path::FileSet;
use crate::progress::ProgressReporter;
use crate::section::Section;

pub use api::PlexApi;
pub use database::PlexDatabase;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

pub trait LibraryIndex {
    /// Make sure the source is reachable and accepts our credentials before
    /// any work is done.
    fn check_connection(&self) -> Result<(), Error>;

    /// Every section the source knows about, supported or not.
    fn sections(&self) -> Result<Vec<Section>, Error>;

    /// Normalized paths of every file in `section`. Either the complete set
    /// or an error; never a partial result.
    fn collect(
        &self,
        section: &Section,
        find_extras: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<FileSet, Error>;
}

/// Build the index for a configured source.
pub fn open(source: &LibrarySource) -> Result<Box<dyn LibraryIndex>, Error> {
    match source {
        LibrarySource::Api { host, token } => Ok(Box::new(PlexApi::new(
            host,
            token,
            ReqwestTransport::new()?,
        )?)),
        LibrarySource::Database { path } => Ok(Box::new(PlexDatabase::new(path))),
    }
}
