pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Patterns that are always excluded, whatever the project's ignore file says.
pub const DEFAULT_BUILTIN_PATTERNS: &[&str] = &[
    // Dot-entries: .git, .DS_Store, .vscode, .gitignore itself, ...
    ".*",
    // Dependency and build output directories; files with these names stay visible
    "node_modules/",
    "vendor/",
    "dist/",
    "build/",
    "coverage/",
    "__pycache__/",
    ".vitepress/cache/",
    ".vitepress/dist/",
    // Generated assets
    "*.pyc",
    "*.pyo",
    "*.min.js",
    "*.min.css",
    "*.log",
    "*.pid",
    "*.swp",
    "*.swo",
    "*~",
    "Thumbs.db",
    "*.woff",
    "*.woff2",
    "*.ttf",
    "*.otf",
    "*.eot",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub builtin_ignore_patterns: Vec<String>,
    pub ignore_file_name: String,
    pub remove_empty_directories: bool,
    pub last_directory: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            builtin_ignore_patterns: DEFAULT_BUILTIN_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            ignore_file_name: ".gitignore".to_string(),
            remove_empty_directories: true,
            last_directory: None,
        }
    }
}

/// The built-in deny-list in its immutable form.
///
/// Built once at start-up and passed by reference into every ignore
/// compilation. Cloning shares the same list.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinPatterns {
    patterns: Arc<[String]>,
    ignore_file_name: Arc<str>,
}

impl BuiltinPatterns {
    pub fn from_config(config: &AppConfig) -> Self {
        let patterns: Vec<String> = config
            .builtin_ignore_patterns
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty() && !p.starts_with('#'))
            .collect();
        Self {
            patterns: patterns.into(),
            ignore_file_name: config.ignore_file_name.as_str().into(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Name of the project-local ignore-pattern file looked up at each root.
    pub fn ignore_file_name(&self) -> &str {
        &self.ignore_file_name
    }
}

impl Default for BuiltinPatterns {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
