use serde::Serialize;

use crate::core::Assembly;

/// Summary figures for an assembled artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextStats {
    /// Number of `File:` blocks written to `<file_contents>`.
    pub files: usize,
    pub bytes: usize,
    pub lines: usize,
    /// Approximate `cl100k_base` token count; `None` when the encoder is unavailable.
    pub tokens: Option<usize>,
}

impl ContextStats {
    /// `files` is the block count reported by the assembler; the artifact
    /// text alone cannot tell headers from file content that looks like one.
    pub fn new(artifact: &str, files: usize) -> Self {
        Self {
            files,
            bytes: artifact.len(),
            lines: artifact.lines().count(),
            tokens: count_tokens(artifact),
        }
    }

    pub fn from_assembly(assembly: &Assembly) -> Self {
        Self::new(&assembly.artifact, assembly.files)
    }
}

fn count_tokens(text: &str) -> Option<usize> {
    match tiktoken_rs::cl100k_base() {
        Ok(bpe) => Some(bpe.encode_with_special_tokens(text).len()),
        Err(e) => {
            tracing::warn!("Token encoder unavailable: {}", e);
            None
        }
    }
}
