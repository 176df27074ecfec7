use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use super::{
    to_relative_path, ContentRecord, CoreError, DirectoryWalker, IgnoreMatcher, SearchEngine,
    TreeGenerator,
};
use crate::utils::file_detection::{
    base_name, classify_content, is_skipped_extension, Classification, MAX_CONTENT_SIZE,
};
use crate::utils::language::language_tag;

/// Assembles the `<file_map>` / `<file_contents>` artifact for one project root.
///
/// Every selected path goes through the same [`IgnoreMatcher`] as the walk
/// that renders the map, so the contents never show a file the map hides.
pub struct FileHandler<'a> {
    matcher: &'a IgnoreMatcher,
    remove_empty_directories: bool,
}

impl<'a> FileHandler<'a> {
    pub fn new(matcher: &'a IgnoreMatcher) -> Self {
        Self {
            matcher,
            remove_empty_directories: true,
        }
    }

    pub fn remove_empty_directories(mut self, remove: bool) -> Self {
        self.remove_empty_directories = remove;
        self
    }

    fn walker(&self) -> DirectoryWalker<'a> {
        DirectoryWalker::new(self.matcher).remove_empty_directories(self.remove_empty_directories)
    }

    /// Builds the artifact for `selected` (absolute, or relative to the root).
    ///
    /// Never gives up halfway: unreadable entries become inline error blocks
    /// and the first problem met is returned next to the artifact.
    pub fn generate_concatenated_content(
        &self,
        selected: &[PathBuf],
    ) -> (String, Option<CoreError>) {
        let assembly = self.assemble(selected);
        (assembly.artifact, assembly.error)
    }

    /// Like [`FileHandler::generate_concatenated_content`], also reporting how
    /// many `File:` blocks were written.
    pub fn assemble(&self, selected: &[PathBuf]) -> Assembly {
        let selection = self.validate_selection(selected);
        let mut out = Assembly::default();

        out.artifact.push_str("<file_map>\n");
        match self.walker().walk_report() {
            Ok(report) => {
                out.artifact.push_str(&TreeGenerator::generate_tree(&report.entries));
                for error in report.errors {
                    out.record_error(error);
                }
            }
            Err(e) => {
                tracing::warn!("Could not build file map: {}", e);
                out.record_error(e);
            }
        }
        out.artifact.push_str("</file_map>\n\n");

        out.artifact.push_str("<file_contents>\n");
        let mut emitted = HashSet::new();
        for (relative_path, path) in &selection {
            self.add_selected(path, relative_path, &mut emitted, &mut out);
        }
        out.artifact.push_str("</file_contents>\n");

        tracing::info!(
            "Generated context for {} selected paths ({} blocks, {} bytes)",
            selection.len(),
            out.files,
            out.artifact.len()
        );
        out
    }

    /// Reads one [`ContentRecord`] per root-relative path.
    ///
    /// Paths the matcher excludes are dropped. A file that cannot be read
    /// yields a record carrying the error message instead of content.
    pub fn read_file_contents(&self, relative_paths: &[String]) -> Vec<ContentRecord> {
        let root = self.matcher.root();
        let mut records = Vec::with_capacity(relative_paths.len());

        for requested in relative_paths {
            let path = root.join(requested);
            let Some(relative_path) = to_relative_path(root, &path) else {
                tracing::warn!("Ignoring path outside the project root: {}", requested);
                continue;
            };
            let is_directory = path.is_dir();
            if self.matcher.matches(&relative_path, is_directory) {
                tracing::warn!("Ignoring requested path that should be hidden: {}", relative_path);
                continue;
            }

            let record = Self::read_content(&path, &relative_path).unwrap_or_else(|e| {
                ContentRecord {
                    error: Some(format!("Error reading {}: {}", relative_path, error_detail(&e))),
                    relative_path: relative_path.clone(),
                    content: String::new(),
                    is_binary: false,
                }
            });
            records.push(record);
        }

        records
    }

    /// Reads and classifies one file. Skipped extensions and oversized files
    /// are decided from their name and metadata without reading the bytes.
    pub fn read_content(path: &Path, relative_path: &str) -> Result<ContentRecord, CoreError> {
        let file_name = base_name(relative_path);
        let placeholder = |classification: Classification| ContentRecord {
            relative_path: relative_path.to_string(),
            is_binary: classification.is_binary(),
            content: classification.into_content(file_name),
            error: None,
        };

        if is_skipped_extension(file_name) {
            return Ok(placeholder(Classification::Skipped));
        }

        let metadata = fs::metadata(path).map_err(|e| CoreError::Stat(e, path.to_path_buf()))?;
        if metadata.len() >= MAX_CONTENT_SIZE {
            return Ok(placeholder(Classification::TooLarge(metadata.len())));
        }

        let bytes = fs::read(path).map_err(|e| CoreError::Read(e, path.to_path_buf()))?;
        Ok(classify_content(relative_path, &bytes))
    }

    /// Drops selected paths outside the root or excluded by the matcher.
    /// Keyed by root-relative path, which also fixes the output order.
    fn validate_selection(&self, selected: &[PathBuf]) -> BTreeMap<String, PathBuf> {
        let root = self.matcher.root();
        let mut selection = BTreeMap::new();

        for path in selected {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            };
            let Some(relative_path) = to_relative_path(root, &path) else {
                tracing::warn!("{}", CoreError::OutsideRoot(path));
                continue;
            };

            let is_directory = match fs::metadata(&path) {
                Ok(metadata) => metadata.is_dir(),
                Err(e) => {
                    // Kept, so the failure shows up as an error block later on.
                    tracing::warn!("Stat failed for selected path {}: {}", relative_path, e);
                    false
                }
            };

            if self.matcher.matches(&relative_path, is_directory) {
                tracing::warn!("Ignoring selected path that should be hidden: {}", relative_path);
                continue;
            }
            selection.insert(relative_path, path);
        }

        selection
    }

    fn add_selected(
        &self,
        path: &Path,
        relative_path: &str,
        emitted: &mut HashSet<String>,
        out: &mut Assembly,
    ) {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                if emitted.insert(relative_path.to_string()) {
                    out.push_block(relative_path, "", &format!("Error reading file content: {e}"));
                }
                out.record_error(CoreError::Stat(e, path.to_path_buf()));
                return;
            }
        };

        if !metadata.is_dir() {
            self.add_file(path, relative_path, emitted, out);
            return;
        }

        match self.walker().walk_subtree(path) {
            Ok(report) => {
                for error in report.errors {
                    out.record_error(error);
                }
                let root = self.matcher.root();
                for file in SearchEngine::files(&report.entries) {
                    let file_path = root.join(&file.relative_path);
                    self.add_file(&file_path, &file.relative_path, emitted, out);
                }
            }
            Err(e) => {
                out.push_block(
                    &format!("{relative_path}/"),
                    "",
                    &format!("Error reading directory content: {}", error_detail(&e)),
                );
                out.record_error(e);
            }
        }
    }

    fn add_file(
        &self,
        path: &Path,
        relative_path: &str,
        emitted: &mut HashSet<String>,
        out: &mut Assembly,
    ) {
        if !emitted.insert(relative_path.to_string()) {
            return;
        }

        // The artifact marks deny-listed types as binary; only records say "skipped".
        let file_name = base_name(relative_path);
        if is_skipped_extension(file_name) {
            out.push_block(relative_path, "", &Classification::Binary.into_content(file_name));
            return;
        }

        match Self::read_content(path, relative_path) {
            Ok(record) => {
                let language = if record.is_binary {
                    ""
                } else {
                    language_tag(relative_path)
                };
                out.push_block(relative_path, language, &record.content);
            }
            Err(e) => {
                tracing::warn!("Error reading file for content {}: {}", relative_path, e);
                out.push_block(
                    relative_path,
                    "",
                    &format!("Error reading file content: {}", error_detail(&e)),
                );
                out.record_error(e);
            }
        }
    }
}

/// An assembled artifact with the number of blocks in it and the first error met.
#[derive(Debug, Default)]
pub struct Assembly {
    pub artifact: String,
    /// `File:` blocks written to `<file_contents>`, error blocks included.
    pub files: usize,
    pub error: Option<CoreError>,
}

impl Assembly {
    fn push_block(&mut self, relative_path: &str, language: &str, body: &str) {
        self.artifact
            .push_str(&format!("File: {relative_path}\n```{language}\n{body}\n```\n\n"));
        self.files += 1;
    }

    fn record_error(&mut self, error: CoreError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

/// The underlying OS message, without the path the artifact already shows.
fn error_detail(error: &CoreError) -> String {
    match error {
        CoreError::Stat(e, _) | CoreError::Read(e, _) | CoreError::Enumeration(e, _) => {
            e.to_string()
        }
        other => other.to_string(),
    }
}
