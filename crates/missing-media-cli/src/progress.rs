use std::cell::RefCell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use missing_media_core::ProgressReporter;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Disk walk: spinner (total files unknown upfront)
/// - Library collection: progress bar over items (or locations)
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }

    fn spinner(message: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl ProgressReporter for CliReporter {
    fn on_walk_start(&self, root: &str) {
        self.set_bar(Self::spinner(format!("Reading \"{}\"...", root)));
    }

    fn on_walk_progress(&self, files_seen: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("Reading... processed {} files", files_seen));
        }
    }

    fn on_walk_complete(&self, media_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Disk scan complete: {} media files in {:.2}s",
            media_files, duration_secs
        );
    }

    fn on_library_start(&self, total_items: usize) {
        let pb = ProgressBar::new(total_items as u64);
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} Reading library [{bar:30.cyan/dim}] {pos}/{len} ({eta} remaining)",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_library_progress(&self, items_done: usize, total_items: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            if pb.length() != Some(total_items as u64) {
                pb.set_length(total_items as u64);
            }
            pb.set_position(items_done as u64);
        }
    }

    fn on_library_complete(&self, library_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Library read complete: {} files in {:.2}s",
            library_files, duration_secs
        );
    }
}
