use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{CoreError, IgnoreMatcher, TreeEntry};

/// Everything a walk produced: the filtered tree plus the non-fatal problems
/// met on the way (already logged as warnings).
#[derive(Debug, Default)]
pub struct WalkReport {
    pub entries: Vec<TreeEntry>,
    pub errors: Vec<CoreError>,
}

/// Recursively lists a project directory through an [`IgnoreMatcher`].
///
/// Siblings are ordered directories first, then by case-sensitive name.
/// Symlinks are followed; a directory that is already on the current path
/// (a symlink cycle) is listed but not descended into.
pub struct DirectoryWalker<'a> {
    matcher: &'a IgnoreMatcher,
    remove_empty_directories: bool,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(matcher: &'a IgnoreMatcher) -> Self {
        Self {
            matcher,
            remove_empty_directories: true,
        }
    }

    /// Whether directories left without any entries after filtering are dropped.
    pub fn remove_empty_directories(mut self, remove: bool) -> Self {
        self.remove_empty_directories = remove;
        self
    }

    /// Walks the matcher's root directory.
    ///
    /// Only a failure on the root itself is returned as an error. Unreadable
    /// subdirectories degrade to empty and are logged.
    pub fn walk(&self) -> Result<Vec<TreeEntry>, CoreError> {
        self.walk_report().map(|report| report.entries)
    }

    pub fn walk_report(&self) -> Result<WalkReport, CoreError> {
        self.walk_subtree(self.matcher.root())
    }

    /// Walks `dir`, a directory located under the matcher's root. Relative
    /// paths in the result stay relative to the root.
    pub fn walk_subtree(&self, dir: &Path) -> Result<WalkReport, CoreError> {
        let metadata = fs::metadata(dir).map_err(|e| CoreError::Stat(e, dir.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(CoreError::NotADirectory(dir.to_path_buf()));
        }
        let prefix = super::to_relative_path(self.matcher.root(), dir)
            .ok_or_else(|| CoreError::OutsideRoot(dir.to_path_buf()))?;

        let mut report = WalkReport::default();
        let mut ancestors = HashSet::new();
        if let Ok(canonical) = fs::canonicalize(dir) {
            ancestors.insert(canonical);
        }

        report.entries = self.list_directory(dir, &prefix, &mut ancestors, &mut report.errors)?;
        Ok(report)
    }

    fn list_directory(
        &self,
        dir: &Path,
        prefix: &str,
        ancestors: &mut HashSet<PathBuf>,
        errors: &mut Vec<CoreError>,
    ) -> Result<Vec<TreeEntry>, CoreError> {
        let read_dir = fs::read_dir(dir).map_err(|e| CoreError::Enumeration(e, dir.to_path_buf()))?;

        let mut candidates = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                    errors.push(CoreError::Enumeration(e, dir.to_path_buf()));
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let relative_path = join_relative(prefix, &name);
            let path = entry.path();

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    tracing::warn!("Could not get file type for {}: {}", relative_path, e);
                    errors.push(CoreError::Stat(e, path));
                    continue;
                }
            };

            // Only symlinks need a stat before matching; their target decides
            // whether the entry is a directory. A dangling link counts as a file.
            let target = file_type.is_symlink().then(|| fs::metadata(&path));
            let is_directory = match &target {
                Some(Ok(metadata)) => metadata.is_dir(),
                Some(Err(_)) => false,
                None => file_type.is_dir(),
            };

            if self.matcher.matches(&relative_path, is_directory) {
                continue;
            }

            let metadata = match target.unwrap_or_else(|| entry.metadata()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("Could not get info for {}: {}", relative_path, e);
                    errors.push(CoreError::Stat(e, path));
                    continue;
                }
            };

            candidates.push(TreeEntry {
                name,
                relative_path,
                is_directory,
                size_bytes: if is_directory { 0 } else { metadata.len() },
                children: Vec::new(),
            });
        }

        candidates.sort_by(compare_entries);

        let mut entries = Vec::with_capacity(candidates.len());
        for mut entry in candidates {
            if entry.is_directory {
                let path = dir.join(&entry.name);
                entry.children = self.list_children(&path, &entry.relative_path, ancestors, errors);
                if self.remove_empty_directories && entry.children.is_empty() {
                    continue;
                }
            }
            entries.push(entry);
        }

        Ok(entries)
    }

    fn list_children(
        &self,
        path: &Path,
        relative_path: &str,
        ancestors: &mut HashSet<PathBuf>,
        errors: &mut Vec<CoreError>,
    ) -> Vec<TreeEntry> {
        let canonical = fs::canonicalize(path).ok();
        if let Some(canonical) = &canonical {
            if !ancestors.insert(canonical.clone()) {
                tracing::warn!("Not descending into {}: directory cycle", relative_path);
                return Vec::new();
            }
        }

        let children = match self.list_directory(path, relative_path, ancestors, errors) {
            Ok(children) => children,
            Err(e) => {
                tracing::warn!("Could not list children for {}: {}", relative_path, e);
                errors.push(e);
                Vec::new()
            }
        };

        if let Some(canonical) = &canonical {
            ancestors.remove(canonical);
        }
        children
    }
}

/// Directories before files, then ascending case-sensitive name.
pub fn compare_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.cmp(&b.name))
}

fn join_relative(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}
