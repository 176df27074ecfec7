pub mod error;
pub mod file_handler;
pub mod ignore;
pub mod scanner;
pub mod search;
pub mod tree_generator;

use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// One file or directory of a filtered project tree.
///
/// Built fresh by every walk and never mutated afterwards. A directory owns
/// its children outright; `children` is empty for files and for directories
/// whose every entry was filtered out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeEntry {
    pub name: String,
    /// Root-relative, forward-slash separated.
    pub relative_path: String,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeEntry>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl TreeEntry {
    /// Visits this entry and all of its descendants depth-first, in tree order.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a TreeEntry)) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }
}

/// The content of one file as it should appear in an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub relative_path: String,
    /// Literal text, or a bracketed placeholder when `is_binary` is set.
    pub content: String,
    pub is_binary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Expresses `path` relative to `root` with forward slashes.
///
/// Returns `None` when `path` is not located under `root`, including paths
/// that climb back out through `..`. The root itself maps to the empty string.
pub fn to_relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(segments.join("/"))
}

pub use error::CoreError;
pub use file_handler::{Assembly, FileHandler};
pub use ignore::IgnoreMatcher;
pub use scanner::DirectoryWalker;
pub use search::SearchEngine;
pub use tree_generator::TreeGenerator;
