//! The host-facing facade over the core: one object that owns the
//! configuration and the platform collaborators.

pub mod clipboard;
pub mod file_dialog;
pub mod stats;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{AppConfig, BuiltinPatterns};
use crate::core::{
    Assembly, ContentRecord, CoreError, DirectoryWalker, FileHandler, IgnoreMatcher, TreeEntry,
};
use clipboard::{ClipboardError, ClipboardService, SystemClipboard};
use file_dialog::{DialogService, NativeDialogService};

pub use stats::ContextStats;

const SELECT_DIRECTORY_TITLE: &str = "Select Project Directory";

/// Entry point for hosts (the CLI, or any UI shell).
///
/// Every call compiles a fresh [`IgnoreMatcher`] for the given root, so edits
/// to the project's ignore file are picked up without restarting.
pub struct Sift {
    config: AppConfig,
    builtins: BuiltinPatterns,
    dialog: Arc<dyn DialogService>,
    clipboard: Arc<dyn ClipboardService>,
}

impl Sift {
    pub fn new(
        config: AppConfig,
        dialog: Arc<dyn DialogService>,
        clipboard: Arc<dyn ClipboardService>,
    ) -> Self {
        let builtins = BuiltinPatterns::from_config(&config);
        Self {
            config,
            builtins,
            dialog,
            clipboard,
        }
    }

    /// Uses the native dialog and the system clipboard.
    pub fn with_system_services(config: AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(NativeDialogService),
            Arc::new(SystemClipboard),
        )
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Asks the user for a project directory. `None` when cancelled.
    pub fn select_directory(&self) -> Option<PathBuf> {
        let picked = self.dialog.pick_directory(SELECT_DIRECTORY_TITLE);
        match &picked {
            Some(path) => tracing::info!("Selected directory {:?}", path),
            None => tracing::debug!("Directory selection cancelled"),
        }
        picked
    }

    /// Walks `root` and returns its visible entries.
    pub fn list_directory(&self, root: &Path) -> Result<Vec<TreeEntry>, CoreError> {
        let matcher = self.matcher(root)?;
        DirectoryWalker::new(&matcher)
            .remove_empty_directories(self.config.remove_empty_directories)
            .walk()
    }

    /// Reads the given root-relative files, one record each.
    pub fn get_file_contents(&self, root: &Path, relative_paths: &[String]) -> Vec<ContentRecord> {
        match self.matcher(root) {
            Ok(matcher) => self.file_handler(&matcher).read_file_contents(relative_paths),
            Err(e) => {
                let message = e.to_string();
                relative_paths
                    .iter()
                    .map(|relative_path| ContentRecord {
                        relative_path: relative_path.clone(),
                        content: String::new(),
                        is_binary: false,
                        error: Some(format!("Error reading {}: {}", relative_path, message)),
                    })
                    .collect()
            }
        }
    }

    /// Assembles the artifact for `selected` under `root`.
    ///
    /// The artifact is empty only when the ignore rules themselves cannot be
    /// compiled; any other failure is reported next to a complete artifact.
    pub fn generate_context(
        &self,
        root: &Path,
        selected: &[PathBuf],
    ) -> (String, Option<CoreError>) {
        let assembly = self.assemble_context(root, selected);
        (assembly.artifact, assembly.error)
    }

    /// [`Sift::generate_context`] plus the number of blocks written.
    pub fn assemble_context(&self, root: &Path, selected: &[PathBuf]) -> Assembly {
        match self.matcher(root) {
            Ok(matcher) => self.file_handler(&matcher).assemble(selected),
            Err(e) => {
                tracing::error!("Cannot assemble context for {:?}: {}", root, e);
                Assembly {
                    error: Some(e),
                    ..Assembly::default()
                }
            }
        }
    }

    pub fn copy_to_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard.copy_text(text)
    }

    fn matcher(&self, root: &Path) -> Result<IgnoreMatcher, CoreError> {
        if !root.is_dir() {
            return Err(CoreError::NotADirectory(root.to_path_buf()));
        }
        IgnoreMatcher::compile(root, &self.builtins)
    }

    fn file_handler<'a>(&self, matcher: &'a IgnoreMatcher) -> FileHandler<'a> {
        FileHandler::new(matcher).remove_empty_directories(self.config.remove_empty_directories)
    }
}
