//! Output directory bookkeeping for downloaded images.
//!
//! File indices come from a scan of the directory, not from a stored counter.
//! The scan is advisory: two writers sharing one directory at the same time
//! can still pick the same name, so callers serialize writes per directory.

use std::collections::HashSet;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// An image written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub index: usize,
}

/// Picks names for new files in one output directory.
#[derive(Debug)]
pub(crate) struct FileSequence {
    dir: PathBuf,
    prefix: String,
    taken: HashSet<OsString>,
    next: usize,
}

impl FileSequence {
    /// Starts numbering at the number of entries `dir` held when scanned.
    pub(crate) fn new(
        dir: &Path,
        prefix: Option<&str>,
        entries: Vec<OsString>,
    ) -> io::Result<Self> {
        Ok(Self {
            dir: std::path::absolute(dir)?,
            prefix: prefix.map(|p| format!("{p}_")).unwrap_or_default(),
            next: entries.len(),
            taken: entries.into_iter().collect(),
        })
    }

    /// Returns the next index whose file name is not taken yet, and its path.
    ///
    /// The index is only consumed by [`FileSequence::advance`], so a failed
    /// download does not leave a gap.
    pub(crate) fn peek_free(&mut self) -> (usize, PathBuf) {
        while self.taken.contains(&self.file_name(self.next)) {
            self.next += 1;
        }
        (self.next, self.dir.join(self.file_name(self.next)))
    }

    pub(crate) fn advance(&mut self) {
        self.taken.insert(self.file_name(self.next));
        self.next += 1;
    }

    fn file_name(&self, index: usize) -> OsString {
        format!("{}{}.jpeg", self.prefix, index).into()
    }
}
