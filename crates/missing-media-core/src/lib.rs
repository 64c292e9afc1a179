pub mod config;
pub mod engine;
pub mod error;
pub mod library;
pub mod media;
pub mod path;
pub mod progress;
pub mod reconcile;
pub mod scanner;
pub mod section;

pub use config::{LibrarySource, RunConfig};
pub use engine::{ReconciliationEngine, Report};
pub use error::Error;
pub use library::LibraryIndex;
pub use media::SectionKind;
pub use path::{FileSet, NormalizedPath};
pub use progress::{ProgressReporter, SilentReporter};
pub use reconcile::{reconcile, Reconciliation};
pub use section::{NoPromptChooser, PromptChooser, Section, SectionChooser};

pub type Result<T, E = Error> = std::result::Result<T, E>;
