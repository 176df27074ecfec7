//! Selection helpers over a walked tree: extension presets and largest files.

use super::TreeEntry;

/// A named group of extensions that can be selected in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Lower-case extensions with a leading dot, or bare lower-case file names.
    pub extensions: &'static [&'static str],
}

pub const FILTER_PRESETS: &[FilterPreset] = &[
    FilterPreset {
        id: "frontend",
        name: "Frontend",
        description: "HTML, CSS, JS, TS, React, ...",
        extensions: &[
            ".html", ".css", ".js", ".jsx", ".ts", ".tsx", ".vue", ".svelte", ".scss", ".sass",
            ".less",
        ],
    },
    FilterPreset {
        id: "backend",
        name: "Backend",
        description: "Go, Python, Java, C#, ...",
        extensions: &[
            ".go", ".py", ".java", ".cs", ".php", ".rb", ".rs", ".cpp", ".c", ".h",
        ],
    },
    FilterPreset {
        id: "config",
        name: "Configuration",
        description: "JSON, YAML, XML, ENV, ...",
        extensions: &[
            ".json", ".yaml", ".yml", ".xml", ".toml", ".ini", ".env", ".config",
        ],
    },
    FilterPreset {
        id: "docs",
        name: "Documentation",
        description: "README, docs, ...",
        extensions: &[".md", ".txt", ".rst", ".adoc"],
    },
    FilterPreset {
        id: "build",
        name: "Build tooling",
        description: "Dockerfile, Makefile, ...",
        extensions: &[".dockerfile", "dockerfile", "makefile", ".mk"],
    },
];

/// A utility struct for searching walked trees.
///
/// This struct is stateless and provides methods as associated functions.
pub struct SearchEngine;

impl SearchEngine {
    /// Looks a preset up by its id.
    pub fn preset(id: &str) -> Option<&'static FilterPreset> {
        FILTER_PRESETS.iter().find(|preset| preset.id == id)
    }

    /// All files of `tree`, depth-first in tree order.
    pub fn files(tree: &[TreeEntry]) -> Vec<&TreeEntry> {
        let mut files = Vec::new();
        for entry in tree {
            entry.visit(&mut |e| {
                if !e.is_directory {
                    files.push(e);
                }
            });
        }
        files
    }

    /// Root-relative paths of the files whose extension (or bare file name)
    /// is listed in `extensions`, in tree order.
    ///
    /// Entries in `extensions` are compared case-insensitively; a leading dot
    /// marks an extension, anything else is a whole file name.
    pub fn select_by_extensions(tree: &[TreeEntry], extensions: &[&str]) -> Vec<String> {
        let wanted: Vec<String> = extensions.iter().map(|e| e.to_lowercase()).collect();
        Self::files(tree)
            .into_iter()
            .filter(|file| Self::matches_extension(&file.name, &wanted))
            .map(|file| file.relative_path.clone())
            .collect()
    }

    /// The `limit` largest files, biggest first. Ties are ordered by path.
    pub fn files_by_size(tree: &[TreeEntry], limit: usize) -> Vec<&TreeEntry> {
        let mut files = Self::files(tree);
        files.sort_by(|a, b| {
            b.size_bytes
                .cmp(&a.size_bytes)
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });
        files.truncate(limit);
        files
    }

    fn matches_extension(file_name: &str, wanted: &[String]) -> bool {
        let name = file_name.to_lowercase();
        let extension = name
            .rfind('.')
            .filter(|&idx| idx > 0)
            .map(|idx| &name[idx..]);

        wanted.iter().any(|w| {
            if w.starts_with('.') {
                extension == Some(w.as_str())
            } else {
                name == *w
            }
        })
    }
}
