//! Compiles the built-in deny-list and a project's ignore file into one predicate.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

use super::error::CoreError;
use crate::config::BuiltinPatterns;

/// A compiled, immutable exclusion predicate for one traversal root.
///
/// Built-in patterns and project patterns live in separate matchers, so a
/// negation (`!name`) in the project file can never re-admit a built-in match.
#[derive(Debug)]
pub struct IgnoreMatcher {
    root: PathBuf,
    builtin: Gitignore,
    project: Option<Gitignore>,
    warning: Option<CoreError>,
}

impl IgnoreMatcher {
    /// Compiles the matcher for `root`.
    ///
    /// Fails only when the built-in list itself is invalid. A missing project
    /// ignore file is not an error; a malformed one is dropped as a whole and
    /// reported through [`IgnoreMatcher::warning`].
    pub fn compile(root: &Path, builtins: &BuiltinPatterns) -> Result<Self, CoreError> {
        let builtin = build_builtin(root, builtins)?;

        let ignore_file = root.join(builtins.ignore_file_name());
        let (project, warning) = if ignore_file.is_file() {
            match build_project(root, &ignore_file) {
                Ok(gitignore) => {
                    tracing::debug!(
                        "Loaded {} project ignore patterns from {:?}",
                        gitignore.num_ignores() + gitignore.num_whitelists(),
                        ignore_file
                    );
                    (Some(gitignore), None)
                }
                Err(e) => {
                    tracing::warn!("Ignoring project patterns, using built-ins only: {}", e);
                    (None, Some(e))
                }
            }
        } else {
            (None, None)
        };

        Ok(Self {
            root: root.to_path_buf(),
            builtin,
            project,
            warning,
        })
    }

    /// Returns true iff the entry at `relative_path` must be excluded.
    ///
    /// `relative_path` is root-relative with forward slashes. An entry is also
    /// excluded when any of its ancestors is, so a path below a filtered
    /// directory can never slip through.
    pub fn matches(&self, relative_path: &str, is_directory: bool) -> bool {
        let relative_path = relative_path.trim_matches('/');
        if relative_path.is_empty() {
            return false;
        }
        let path = Path::new(relative_path);

        if self
            .builtin
            .matched_path_or_any_parents(path, is_directory)
            .is_ignore()
        {
            return true;
        }

        self.project.as_ref().is_some_and(|project| {
            project
                .matched_path_or_any_parents(path, is_directory)
                .is_ignore()
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The problem that made the project ignore file unusable, if any.
    pub fn warning(&self) -> Option<&CoreError> {
        self.warning.as_ref()
    }

    pub fn has_project_patterns(&self) -> bool {
        self.project.is_some()
    }
}

fn build_builtin(root: &Path, builtins: &BuiltinPatterns) -> Result<Gitignore, CoreError> {
    let pattern_error = |message: String| CoreError::Pattern {
        path: PathBuf::from("<built-in>"),
        message,
    };

    let mut builder = GitignoreBuilder::new(root);
    for pattern in builtins.patterns() {
        builder
            .add_line(None, pattern)
            .map_err(|e| pattern_error(e.to_string()))?;
    }
    builder.build().map_err(|e| pattern_error(e.to_string()))
}

fn build_project(root: &Path, ignore_file: &Path) -> Result<Gitignore, CoreError> {
    let pattern_error = |message: String| CoreError::Pattern {
        path: ignore_file.to_path_buf(),
        message,
    };

    let mut builder = GitignoreBuilder::new(root);
    if let Some(err) = builder.add(ignore_file) {
        return Err(pattern_error(err.to_string()));
    }
    builder.build().map_err(|e| pattern_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::fs;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    fn compile_with_gitignore(contents: Option<&str>) -> (tempfile::TempDir, IgnoreMatcher) {
        let dir = tempdir().unwrap();
        if let Some(contents) = contents {
            fs::write(dir.path().join(".gitignore"), contents).unwrap();
        }
        let matcher = IgnoreMatcher::compile(dir.path(), &BuiltinPatterns::default()).unwrap();
        (dir, matcher)
    }

    #[test]
    fn test_builtins_apply_without_ignore_file() {
        let (_dir, matcher) = compile_with_gitignore(None);

        assert!(matcher.matches(".git", true));
        assert!(matcher.matches(".DS_Store", false));
        assert!(matcher.matches("node_modules", true));
        assert!(matcher.matches("web/node_modules", true));
        assert!(matcher.matches("app.min.js", false));
        assert!(matcher.matches("logs/server.log", false));
        assert!(matcher.matches(".vitepress/cache", true));
        assert!(matcher.matches("build", true));
        assert!(matcher.matches("pkg/vendor/lib.go", false));

        // Dependency and build names only hide directories.
        assert!(!matcher.matches("build", false));
        assert!(!matcher.matches("scripts/dist", false));

        assert!(!matcher.matches("src", true));
        assert!(!matcher.matches("src/main.go", false));
        assert!(!matcher.has_project_patterns());
        assert!(matcher.warning().is_none());
    }

    #[test]
    fn test_descendants_of_ignored_directory_are_ignored() {
        let (_dir, matcher) = compile_with_gitignore(Some("generated/\n"));

        assert!(matcher.matches("node_modules/pkg/index.js", false));
        assert!(matcher.matches(".git/config", false));
        assert!(matcher.matches("generated/deep/file.rs", false));
        assert!(matcher.matches("src/generated/file.rs", false));
    }

    #[test]
    fn test_project_patterns_follow_gitignore_grammar() {
        let (_dir, matcher) =
            compile_with_gitignore(Some("# comment\n*.tmp\n/secret.txt\nout/\ndocs/*.pdf\n"));

        assert!(matcher.matches("a.tmp", false));
        assert!(matcher.matches("nested/b.tmp", false));

        // Anchored to the root.
        assert!(matcher.matches("secret.txt", false));
        assert!(!matcher.matches("nested/secret.txt", false));

        // Directory-only marker.
        assert!(matcher.matches("out", true));
        assert!(!matcher.matches("out", false));

        assert!(matcher.matches("docs/manual.pdf", false));
        assert!(!matcher.matches("manual.pdf", false));
        assert!(matcher.has_project_patterns());
    }

    #[test]
    fn test_project_negation_cannot_override_builtins() {
        let (_dir, matcher) = compile_with_gitignore(Some("!node_modules\n!.env\n"));

        assert!(matcher.matches("node_modules", true));
        assert!(matcher.matches(".env", false));
    }

    #[test]
    fn test_same_name_evaluated_with_ancestor_context() {
        let (_dir, matcher) = compile_with_gitignore(Some("/build-output/cache\n"));

        assert!(matcher.matches("build-output/cache", true));
        assert!(!matcher.matches("src/cache", true));
    }

    #[test]
    #[traced_test]
    fn test_malformed_ignore_file_degrades_to_builtins() {
        let (_dir, matcher) = compile_with_gitignore(Some("*.tmp\nbroken[\n"));

        assert!(matcher.warning().is_some());
        assert!(!matcher.has_project_patterns());
        // Valid lines from the broken file are dropped too.
        assert!(!matcher.matches("scratch.tmp", false));
        // Built-ins still apply.
        assert!(matcher.matches(".git", true));
        assert!(logs_contain("Ignoring project patterns"));
    }

    #[test]
    fn test_invalid_builtin_pattern_is_a_compile_error() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            builtin_ignore_patterns: vec!["ok".to_string(), "bad[".to_string()],
            ..Default::default()
        };

        let result = IgnoreMatcher::compile(dir.path(), &BuiltinPatterns::from_config(&config));

        assert!(matches!(result, Err(CoreError::Pattern { .. })));
    }

    #[test]
    fn test_custom_ignore_file_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".siftignore"), "fixtures/\n").unwrap();
        let config = AppConfig {
            ignore_file_name: ".siftignore".to_string(),
            ..Default::default()
        };

        let matcher =
            IgnoreMatcher::compile(dir.path(), &BuiltinPatterns::from_config(&config)).unwrap();

        assert!(matcher.matches("fixtures", true));
    }

    #[test]
    fn test_root_itself_is_never_matched() {
        let (_dir, matcher) = compile_with_gitignore(Some("*\n"));
        assert!(!matcher.matches("", true));
    }

    #[test]
    fn test_matcher_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IgnoreMatcher>();
    }
}
