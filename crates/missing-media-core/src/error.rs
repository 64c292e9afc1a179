use thiserror::Error;

/// Every failure here is terminal for a run: nothing is retried and no
/// report is produced once one of these has been raised.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unable to connect to {host}: {reason}")]
    Connectivity { host: String, reason: String },

    #[error("Plex rejected the provided token (HTTP {status})")]
    Auth { status: u16 },

    #[error("Unexpected response from Plex: {0}")]
    Protocol(String),

    #[error("Unable to find the right library section: {0}")]
    Resolution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl Error {
    /// Process exit code the CLI uses for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Configuration(_) => 2,
            Error::Connectivity { .. } => 3,
            Error::Auth { .. } => 4,
            Error::Protocol(_) => 5,
            Error::Resolution(_) => 6,
            Error::Io(_) | Error::Database(_) => 1,
        }
    }
}
