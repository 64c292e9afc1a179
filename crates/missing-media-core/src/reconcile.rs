use crate::path::{FileSet, NormalizedPath};

/// Two-way difference between what is on disk and what the library holds,
/// each side sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// On disk, unknown to the library.
    pub missing_from_library: Vec<NormalizedPath>,
    /// In the library, not found on disk.
    pub missing_from_disk: Vec<NormalizedPath>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.missing_from_library.is_empty() && self.missing_from_disk.is_empty()
    }
}

pub fn reconcile(on_disk: &FileSet, in_library: &FileSet) -> Reconciliation {
    let mut missing_from_library: Vec<NormalizedPath> =
        on_disk.difference(in_library).cloned().collect();
    let mut missing_from_disk: Vec<NormalizedPath> =
        in_library.difference(on_disk).cloned().collect();
    missing_from_library.sort();
    missing_from_disk.sort();

    Reconciliation {
        missing_from_library,
        missing_from_disk,
    }
}
