//! Renders walked entries as the box-drawing tree used in `<file_map>`.

use super::TreeEntry;

/// Stateless renderer for [`TreeEntry`] forests.
pub struct TreeGenerator;

impl TreeGenerator {
    /// Renders the entries of a walked tree, one line per entry.
    ///
    /// The root itself is not printed; its entries start at column zero. The
    /// input order is kept, so the output is as deterministic as the walk.
    pub fn generate_tree(entries: &[TreeEntry]) -> String {
        let mut result = String::new();
        Self::render_children(entries, &mut result, "");
        result
    }

    fn render_children(entries: &[TreeEntry], result: &mut String, prefix: &str) {
        for (i, entry) in entries.iter().enumerate() {
            let is_last = i == entries.len() - 1;
            let connector = if is_last { "└── " } else { "├── " };

            result.push_str(&format!("{prefix}{connector}{}\n", entry.name));

            if !entry.children.is_empty() {
                let new_prefix = if is_last {
                    format!("{prefix}    ")
                } else {
                    format!("{prefix}│   ")
                };
                Self::render_children(&entry.children, result, &new_prefix);
            }
        }
    }
}
