use std::collections::HashSet;
use std::sync::OnceLock;

use crate::types::Entry;

/// One directory's contents plus, if requested, its recursively fetched
/// descendants.
///
/// `files` holds directories first, then files, each group in ascending
/// name order. `subdirs` is populated only by a recursive fetch and then
/// carries exactly one listing per directory entry, in entry order.
#[derive(Debug, Clone)]
pub struct Filelist {
    /// Path of the directory this listing describes
    pub dir: String,
    /// Sorted entries of the directory
    pub files: Vec<Entry>,
    /// Listings of subdirectories, present after a recursive fetch
    pub subdirs: Vec<Filelist>,
    index: OnceLock<HashSet<String>>,
}

impl Filelist {
    /// Assemble a listing from fully drained pages. Directories sort
    /// before files, ties within a kind resolve by ascending name.
    /// `Vec::sort_by` is stable, so equal elements keep arrival order.
    pub(crate) fn assemble(dir: String, mut files: Vec<Entry>) -> Self {
        files.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name.cmp(&b.name)));
        Filelist {
            dir,
            files,
            subdirs: Vec::new(),
            index: OnceLock::new(),
        }
    }

    /// Check whether a full path exists anywhere in this listing tree.
    ///
    /// The lookup runs against a snapshot index built on first use; the
    /// build happens at most once per instance even when several threads
    /// call `contains` concurrently, and the index is never refreshed
    /// afterwards.
    pub fn contains(&self, path: &str) -> bool {
        self.index().contains(path)
    }

    fn index(&self) -> &HashSet<String> {
        self.index.get_or_init(|| {
            let mut paths = HashSet::new();
            self.collect_paths(&mut paths);
            paths
        })
    }

    /// Post-order walk: sub-listings contribute their own index and
    /// directory path, every entry contributes its full path, and the
    /// listing contributes its own directory path. Directory entries are
    /// indexed even without a matching sub-listing so that shallow
    /// listings still report their immediate children as present.
    fn collect_paths(&self, paths: &mut HashSet<String>) {
        for sub in &self.subdirs {
            paths.extend(sub.index().iter().cloned());
            paths.insert(sub.dir.clone());
        }
        for entry in &self.files {
            paths.insert(format!("{}/{}", self.dir, entry.name));
        }
        paths.insert(self.dir.clone());
    }
}
