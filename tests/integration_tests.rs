//! Integration tests for sift: whole-artifact scenarios run against real
//! directory trees through the public `Sift` facade.

use sift::app::clipboard::{ClipboardError, ClipboardService};
use sift::app::file_dialog::DialogService;
use sift::app::{ContextStats, Sift};
use sift::config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Contains the test infrastructure.
mod helpers {
    use super::*;
    use std::fs;

    /// Never shows a dialog; the tests always pass a root explicitly.
    pub struct NoDialog;

    impl DialogService for NoDialog {
        fn pick_directory(&self, _title: &str) -> Option<PathBuf> {
            None
        }
    }

    pub struct NoClipboard;

    impl ClipboardService for NoClipboard {
        fn copy_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::NoClipboardFound)
        }
    }

    /// `TestHarness` sets up an isolated project directory for each test case.
    pub struct TestHarness {
        pub sift: Sift,
        pub root_path: PathBuf,
        _temp_dir: TempDir,
    }

    impl TestHarness {
        /// Creates a new harness with the default built-in patterns.
        pub fn new() -> Self {
            Self::with_config(AppConfig::default())
        }

        pub fn with_config(config: AppConfig) -> Self {
            let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
            let root_path = temp_dir.path().to_path_buf();
            Self {
                sift: Sift::new(config, Arc::new(NoDialog), Arc::new(NoClipboard)),
                root_path,
                _temp_dir: temp_dir,
            }
        }

        /// Creates a file inside the temporary test directory.
        pub fn create_file(&self, path: &str, content: &[u8]) {
            let file_path = self.root_path.join(path);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).expect("Failed to create parent dir");
            }
            fs::write(file_path, content).expect("Failed to write file");
        }

        pub fn create_dir(&self, path: &str) {
            fs::create_dir_all(self.root_path.join(path)).expect("Failed to create dir");
        }

        pub fn generate(&self, selected: &[&str]) -> String {
            let selected: Vec<PathBuf> = selected.iter().map(PathBuf::from).collect();
            let (artifact, error) = self.sift.generate_context(&self.root_path, &selected);
            assert!(error.is_none(), "unexpected assembly error: {:?}", error);
            artifact
        }
    }

    /// The text between the `<file_map>` tags.
    pub fn file_map(artifact: &str) -> &str {
        let start = artifact.find("<file_map>\n").expect("no file map") + "<file_map>\n".len();
        let end = artifact.find("</file_map>").expect("no file map end");
        &artifact[start..end]
    }

    /// The text between the `<file_contents>` tags.
    pub fn file_contents(artifact: &str) -> &str {
        let start = artifact.find("<file_contents>\n").expect("no contents")
            + "<file_contents>\n".len();
        let end = artifact.find("</file_contents>").expect("no contents end");
        &artifact[start..end]
    }
}

use helpers::{file_contents, file_map, TestHarness};

#[test]
fn test_defaults_hide_vcs_and_dependency_directories() {
    let harness = TestHarness::new();
    harness.create_file("src/main.go", b"package main\nfunc main(){}");
    harness.create_file(".git/config", b"[core]\n");
    harness.create_file("node_modules/pkg/index.js", b"module.exports = 1;");

    let artifact = harness.generate(&["."]);

    assert_eq!(file_map(&artifact), "└── src\n    └── main.go\n");
    assert_eq!(
        file_contents(&artifact),
        "File: src/main.go\n```go\npackage main\nfunc main(){}\n```\n\n"
    );
    let assembly = harness
        .sift
        .assemble_context(&harness.root_path, &[PathBuf::from(".")]);
    assert_eq!(ContextStats::from_assembly(&assembly).files, 1);
}

#[test]
fn test_directory_selection_expands_text_and_image() {
    let harness = TestHarness::new();
    harness.create_file("docs/a.md", b"# Title\n\nSome text.");
    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
    png.resize(50 * 1024, 0);
    harness.create_file("docs/logo.png", &png);
    harness.create_file("src/lib.rs", b"pub fn f() {}");

    let artifact = harness.generate(&["docs"]);

    // The map shows everything visible, not only the selection.
    assert_eq!(
        file_map(&artifact),
        "├── docs\n│   ├── a.md\n│   └── logo.png\n└── src\n    └── lib.rs\n"
    );
    assert_eq!(
        file_contents(&artifact),
        "File: docs/a.md\n```markdown\n# Title\n\nSome text.\n```\n\n\
         File: docs/logo.png\n```\n\
         [Binary File: logo.png - Content not included]\n```\n\n"
    );
}

#[test]
fn test_hidden_selection_is_dropped_silently() {
    let harness = TestHarness::new();
    harness.create_file(".DS_Store", b"\x00\x00\x00\x01Bud1");
    harness.create_file("README.md", b"hello");

    let artifact = harness.generate(&[".DS_Store", "README.md"]);

    assert!(!artifact.contains(".DS_Store"));
    assert_eq!(
        file_contents(&artifact),
        "File: README.md\n```markdown\nhello\n```\n\n"
    );
}

#[test]
fn test_project_ignore_file_applies_to_map_and_contents() {
    let harness = TestHarness::new();
    harness.create_file(".gitignore", b"secrets/\n*.tmp\n");
    harness.create_file("secrets/key.txt", b"hunter2");
    harness.create_file("scratch.tmp", b"tmp");
    harness.create_file("main.py", b"print('hi')");

    let artifact = harness.generate(&["secrets/key.txt", "scratch.tmp", "main.py"]);

    assert_eq!(file_map(&artifact), "└── main.py\n");
    assert_eq!(
        file_contents(&artifact),
        "File: main.py\n```python\nprint('hi')\n```\n\n"
    );
}

#[test]
fn test_assembly_is_idempotent() {
    let harness = TestHarness::new();
    harness.create_file("b/z.rs", b"fn z() {}");
    harness.create_file("b/a.rs", b"fn a() {}");
    harness.create_file("a.txt", b"text");
    harness.create_file("c/d/e.json", b"{}");

    let first = harness.generate(&["."]);
    let second = harness.generate(&["."]);
    assert_eq!(first, second);

    let tree_one = harness.sift.list_directory(&harness.root_path).unwrap();
    let tree_two = harness.sift.list_directory(&harness.root_path).unwrap();
    assert_eq!(tree_one, tree_two);
}

#[test]
fn test_empty_directories_follow_config() {
    let harness = TestHarness::new();
    harness.create_dir("empty");
    harness.create_file("only_ignored/debug.log", b"log");
    harness.create_file("main.rs", b"fn main() {}");

    assert_eq!(file_map(&harness.generate(&[])), "└── main.rs\n");

    let keeping = TestHarness::with_config(AppConfig {
        remove_empty_directories: false,
        ..AppConfig::default()
    });
    keeping.create_dir("empty");
    keeping.create_file("main.rs", b"fn main() {}");
    assert_eq!(
        file_map(&keeping.generate(&[])),
        "├── empty\n└── main.rs\n"
    );
}

#[test]
fn test_large_file_gets_placeholder() {
    let harness = TestHarness::new();
    harness.create_file("big.txt", &vec![b'a'; 1024 * 1024]);

    let artifact = harness.generate(&["big.txt"]);

    assert_eq!(
        file_contents(&artifact),
        "File: big.txt\n```\n[Large File: big.txt - File too large (1.0 MB) for AI analysis]\n```\n\n"
    );
}

#[test]
fn test_missing_selection_reports_first_error_but_keeps_artifact() {
    let harness = TestHarness::new();
    harness.create_file("keep.rs", b"fn keep() {}");

    let (artifact, error) = harness.sift.generate_context(
        &harness.root_path,
        &[PathBuf::from("gone.rs"), PathBuf::from("keep.rs")],
    );

    assert!(error.is_some());
    assert!(file_contents(&artifact).contains("File: keep.rs\n```rust\nfn keep() {}\n```\n\n"));
}

#[test]
fn test_dependency_names_only_hide_directories() {
    let harness = TestHarness::new();
    harness.create_file("build", b"#!/bin/sh\nmake");
    harness.create_file("dist/app.js", b"app();");
    harness.create_file("main.rs", b"fn main() {}");

    let artifact = harness.generate(&["build", "dist/app.js"]);

    assert_eq!(file_map(&artifact), "├── build\n└── main.rs\n");
    assert_eq!(
        file_contents(&artifact),
        "File: build\n```\n#!/bin/sh\nmake\n```\n\n"
    );
}

#[test]
fn test_selection_cannot_climb_out_of_the_root() {
    let outer = tempfile::tempdir().unwrap();
    std::fs::write(outer.path().join("secret.txt"), "TOP SECRET").unwrap();
    let root = outer.path().join("project");
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
    let sift = Sift::new(
        AppConfig {
            builtin_ignore_patterns: vec!["node_modules/".to_string()],
            ..AppConfig::default()
        },
        Arc::new(helpers::NoDialog),
        Arc::new(helpers::NoClipboard),
    );

    let (artifact, error) =
        sift.generate_context(&root, &[root.join("src/../../secret.txt")]);

    assert!(error.is_none());
    assert!(!artifact.contains("TOP SECRET"));
    assert_eq!(file_contents(&artifact), "");
}

#[test]
fn test_copy_failure_is_reported() {
    let harness = TestHarness::new();
    assert!(matches!(
        harness.sift.copy_to_clipboard("text"),
        Err(ClipboardError::NoClipboardFound)
    ));
}
