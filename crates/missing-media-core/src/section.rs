use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::error::Error;
use crate::media::SectionKind;

/// A Plex library section and the root paths it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: i64,
    pub title: String,
    pub kind: SectionKind,
    pub locations: Vec<String>,
}

/// Picks a section when the requested one is missing or unusable.
pub trait SectionChooser {
    /// `candidates` are the supported sections sorted by key. Returns the
    /// chosen key, or `None` if the operator cancelled.
    fn choose(&mut self, candidates: &[Section]) -> Result<Option<i64>, Error>;
}

/// Interactive chooser reading the operator's answer line by line.
///
/// Unknown or non-numeric answers re-prompt; `-1` or end of input cancels.
pub struct PromptChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> SectionChooser for PromptChooser<R, W> {
    fn choose(&mut self, candidates: &[Section]) -> Result<Option<i64>, Error> {
        writeln!(self.output, "\nChoose a library to search.\n\nAvailable Libraries:\n")?;
        for section in candidates {
            writeln!(self.output, "[{}] {}", section.key, section.title)?;
        }
        writeln!(self.output)?;
        write!(self.output, "Enter the library number (-1 to cancel): ")?;
        self.output.flush()?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let answer = line.trim();
            if answer == "-1" {
                return Ok(None);
            }

            if let Ok(key) = answer.parse::<i64>() {
                if let Some(section) = candidates.iter().find(|s| s.key == key) {
                    writeln!(self.output, "\nSelected \"{}\"\n", section.title)?;
                    return Ok(Some(key));
                }
            }

            write!(self.output, "Invalid section, please try again (-1 to cancel): ")?;
            self.output.flush()?;
        }
    }
}

/// Chooser for unattended runs: never substitutes a section.
pub struct NoPromptChooser;

impl SectionChooser for NoPromptChooser {
    fn choose(&mut self, _candidates: &[Section]) -> Result<Option<i64>, Error> {
        Ok(None)
    }
}

/// Select the section to reconcile.
///
/// A requested id is used directly when it names a supported section.
/// Otherwise the supported sections, sorted by key, go to `chooser`.
/// `Ok(None)` means the operator cancelled.
pub fn resolve(
    requested: Option<i64>,
    mut sections: Vec<Section>,
    chooser: &mut dyn SectionChooser,
) -> Result<Option<Section>, Error> {
    if let Some(find) = requested {
        match sections.iter().find(|s| s.key == find) {
            Some(section) if section.kind.is_supported() => {
                info!("Found section {}: \"{}\"", find, section.title);
                return Ok(Some(section.clone()));
            }
            Some(section) => {
                warn!(
                    "Found section {}, but it's not a Movie, TV, or Music library ({})",
                    find, section.kind
                );
            }
            None => warn!("Provided library section {} could not be found", find),
        }
    }

    sections.retain(|s| s.kind.is_supported());
    sections.sort_by_key(|s| s.key);
    if sections.is_empty() {
        return Err(Error::Resolution(
            "no Movie, TV, or Music libraries are available".to_string(),
        ));
    }

    match chooser.choose(&sections)? {
        Some(key) => sections
            .into_iter()
            .find(|s| s.key == key)
            .map(Some)
            .ok_or_else(|| Error::Resolution(format!("section {} is not selectable", key))),
        None => Ok(None),
    }
}
