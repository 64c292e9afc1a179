use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::Error;
use crate::library::LibraryIndex;
use crate::media;
use crate::progress::ProgressReporter;
use crate::reconcile::{reconcile, Reconciliation};
use crate::scanner::{self, IgnoreFilter};
use crate::section::{self, Section, SectionChooser};

pub struct ReconciliationEngine {
    config: RunConfig,
}

/// Outcome of a complete run against one section.
#[derive(Debug)]
pub struct Report {
    pub section: Section,
    pub files_on_disk: usize,
    pub files_in_library: usize,
    /// Library paths dropped by the ignore patterns.
    pub ignored_in_library: usize,
    pub walk_duration: Duration,
    pub library_duration: Duration,
    pub reconciliation: Reconciliation,
}

impl ReconciliationEngine {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Supported sections of the index, sorted by key.
    pub fn list_sections(&self, index: &dyn LibraryIndex) -> Result<Vec<Section>, Error> {
        index.check_connection()?;
        let mut sections: Vec<Section> = index
            .sections()?
            .into_iter()
            .filter(|s| s.kind.is_supported())
            .collect();
        sections.sort_by_key(|s| s.key);
        Ok(sections)
    }

    /// Run the full reconciliation:
    /// 1. Check the library source is reachable
    /// 2. Resolve the section, asking `chooser` if needed
    /// 3. Walk the section's roots on disk
    /// 4. Collect the library's view of the same roots
    /// 5. Diff the two
    ///
    /// Any failure aborts the run; a diff is only produced from two complete
    /// sets.
    pub fn run(
        &self,
        index: &dyn LibraryIndex,
        chooser: &mut dyn SectionChooser,
        reporter: &dyn ProgressReporter,
    ) -> Result<Report, Error> {
        let ignore = IgnoreFilter::new(&self.config.ignore_patterns)?;

        index.check_connection()?;

        let section = section::resolve(self.config.section_id, index.sections()?, chooser)?
            .ok_or_else(|| Error::Resolution("no library section selected".to_string()))?;
        if section.locations.is_empty() {
            return Err(Error::Configuration(format!(
                "library section {} (\"{}\") has no root paths",
                section.key, section.title
            )));
        }

        // Phase 1: disk
        let walk_start = Instant::now();
        let whitelist = media::whitelist(&section.kind);
        let on_disk =
            scanner::collect_media_files(&section.locations, whitelist, &ignore, reporter)?;
        let walk_duration = walk_start.elapsed();
        info!(
            "Found {} files for library section {}'s root path(s).",
            on_disk.len(),
            section.key
        );

        // Phase 2: library
        let library_start = Instant::now();
        let mut in_library = index.collect(&section, self.config.find_extras, reporter)?;
        let ignored_in_library = ignore.retain(&mut in_library);
        let library_duration = library_start.elapsed();
        info!("Found {} items in library", in_library.len());
        if ignored_in_library > 0 {
            debug!("{} library items matched ignore patterns", ignored_in_library);
        }

        // Phase 3: diff
        let reconciliation = reconcile(&on_disk, &in_library);
        debug!(
            "{} missing from library, {} missing from disk",
            reconciliation.missing_from_library.len(),
            reconciliation.missing_from_disk.len()
        );

        Ok(Report {
            section,
            files_on_disk: on_disk.len(),
            files_in_library: in_library.len(),
            ignored_in_library,
            walk_duration,
            library_duration,
            reconciliation,
        })
    }
}
