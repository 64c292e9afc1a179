/// Trait for reporting reconciliation progress.
///
/// The CLI implements it with indicatif; tests use `SilentReporter`.
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_walk_start(&self, _root: &str) {}
    fn on_walk_progress(&self, _files_seen: usize) {}
    fn on_walk_complete(&self, _media_files: usize, _duration_secs: f64) {}
    fn on_library_start(&self, _total_items: usize) {}
    fn on_library_progress(&self, _items_done: usize, _total_items: usize) {}
    fn on_library_complete(&self, _library_files: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
