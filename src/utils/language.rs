//! Maps file names to the language tag used on a fenced content block.

/// Returns the fence tag for `relative_path`, or `""` when unknown.
pub fn language_tag(relative_path: &str) -> &'static str {
    let base = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let lower = base.to_lowercase();

    if lower.ends_with(".d.ts") {
        return "typescript";
    }

    let Some((_, ext)) = lower.rsplit_once('.').filter(|(stem, _)| !stem.is_empty()) else {
        return match lower.as_str() {
            "dockerfile" => "dockerfile",
            "makefile" => "makefile",
            "gemfile" | "rakefile" => "ruby",
            "procfile" => "shell",
            _ => "",
        };
    };

    match ext {
        "go" => "go",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" | "mts" | "cts" => "typescript",
        "jsx" => "jsx",
        "vue" => "vue",
        "svelte" => "svelte",
        "py" | "pyw" => "python",
        "java" => "java",
        "c" => "c",
        "cpp" | "cxx" | "cc" | "hpp" | "hxx" | "h" => "cpp",
        "cs" => "csharp",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "rs" => "rust",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" | "sass" => "scss",
        "less" => "less",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "md" | "markdown" => "markdown",
        "sh" | "bash" | "zsh" => "bash",
        "ps1" => "powershell",
        "sql" => "sql",
        "xml" => "xml",
        "toml" => "toml",
        "lua" => "lua",
        "pl" | "pm" => "perl",
        "r" => "r",
        "dart" => "dart",
        "ex" | "exs" => "elixir",
        "erl" | "hrl" => "erlang",
        "hs" => "haskell",
        "scala" => "scala",
        "clj" | "cljs" | "cljc" | "edn" => "clojure",
        "dockerfile" => "dockerfile",
        "mod" if lower == "go.mod" => "go.mod",
        "sum" if lower == "go.sum" => "go.sum",
        "tf" | "tfvars" => "terraform",
        "hcl" => "hcl",
        "gradle" => "groovy",
        "env" => "env",
        "conf" | "cfg" | "ini" => "ini",
        "log" => "log",
        "lock" if lower == "gemfile.lock" => "ruby",
        "lock" if lower == "composer.lock" => "json",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_extensions() {
        assert_eq!(language_tag("src/main.go"), "go");
        assert_eq!(language_tag("src/lib.rs"), "rust");
        assert_eq!(language_tag("web/App.TSX"), "typescript");
        assert_eq!(language_tag("docs/a.md"), "markdown");
        assert_eq!(language_tag("scripts/run.zsh"), "bash");
        assert_eq!(language_tag("include/vec.h"), "cpp");
    }

    #[test]
    fn test_special_file_names() {
        assert_eq!(language_tag("Dockerfile"), "dockerfile");
        assert_eq!(language_tag("build/Makefile"), "makefile");
        assert_eq!(language_tag("Gemfile"), "ruby");
        assert_eq!(language_tag("types/index.d.ts"), "typescript");
        assert_eq!(language_tag("go.mod"), "go.mod");
        assert_eq!(language_tag("go.sum"), "go.sum");
        assert_eq!(language_tag("Gemfile.lock"), "ruby");
        assert_eq!(language_tag("composer.lock"), "json");
    }

    #[test]
    fn test_unknown_falls_back_to_no_tag() {
        assert_eq!(language_tag("LICENSE"), "");
        assert_eq!(language_tag("yarn.lock"), "");
        assert_eq!(language_tag("Cargo.lock"), "");
        assert_eq!(language_tag("other.mod"), "");
        assert_eq!(language_tag("data.unknownext"), "");
        // Dot-files have no extension.
        assert_eq!(language_tag(".bashrc"), "");
    }
}
