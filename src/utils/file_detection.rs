//! Decides whether a file's bytes belong in an artifact as text.
//!
//! Detection is best-effort: a text file with an unusual encoding can end up
//! reported as binary, and that is accepted.

use std::path::Path;

use crate::core::ContentRecord;

/// Files at or above this size are never embedded.
pub const MAX_CONTENT_SIZE: u64 = 1024 * 1024;

/// How many leading bytes the sniffing and printability checks look at.
const SNIFF_LEN: usize = 512;

/// Share of non-printable bytes above which a sample counts as binary.
const NON_PRINTABLE_THRESHOLD: f64 = 0.1;

/// Extensions classified without looking at the bytes.
const SKIPPED_EXTENSIONS: &[&str] = &[
    // Fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // Images
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "icns", "tiff", "tif",
    // Audio
    "mp3", "wav", "flac", "aac", "ogg", "m4a", "wma",
    // Video
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "swf",
    // Archives
    "zip", "rar", "7z", "tar", "gz", "bz2", "xz", "jar",
    // Executables, libraries, bytecode
    "exe", "dll", "so", "dylib", "app", "deb", "rpm", "dmg", "msi", "wasm", "obj", "o", "a",
    "lib", "class", "pyc",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp",
    // Databases
    "db", "sqlite", "sqlite3", "mdb",
    // Raw data and disk images
    "bin", "dat", "dump", "img", "iso",
    // Caches and temporaries
    "cache", "tmp", "temp", "log", "pid",
];

/// MIME families accepted as text when the sniffer recognizes them.
const TEXT_MIME_MARKERS: &[&str] = &[
    "javascript",
    "ecmascript",
    "json",
    "xml",
    "yaml",
    "toml",
    "x-sh",
    "x-shellscript",
    "x-python",
    "x-perl",
    "x-ruby",
];

/// MIME families rejected outright when the sniffer recognizes them.
const BINARY_MIME_PREFIXES: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "font/",
    "application/x-font",
    "application/zip",
    "application/gzip",
    "application/x-tar",
    "application/x-7z-compressed",
    "application/x-rar",
    "application/x-bzip",
    "application/x-xz",
    "application/java-archive",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument",
    "application/vnd.ms-",
    "application/vnd.oasis.opendocument",
    "application/x-executable",
    "application/x-sharedlib",
    "application/x-mach-binary",
    "application/x-msdownload",
    "application/vnd.microsoft.portable-executable",
    "application/x-sqlite3",
    "application/wasm",
];

/// The outcome of classifying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Safe to embed; holds the decoded text.
    Text(String),
    /// The extension marks a file type that is of no use in a prompt.
    Skipped,
    /// At or above [`MAX_CONTENT_SIZE`]; holds the size in bytes.
    TooLarge(u64),
    /// The bytes look binary.
    Binary,
}

impl Classification {
    pub fn is_binary(&self) -> bool {
        !matches!(self, Classification::Text(_))
    }

    /// The text to embed: the file's text, or a placeholder naming the file and the reason.
    pub fn into_content(self, file_name: &str) -> String {
        match self {
            Classification::Text(text) => text,
            Classification::Skipped => {
                format!("[Skipped File: {file_name} - File type not useful for AI analysis]")
            }
            Classification::TooLarge(size) => format!(
                "[Large File: {file_name} - File too large ({}) for AI analysis]",
                format_file_size(size)
            ),
            Classification::Binary => format!("[Binary File: {file_name} - Content not included]"),
        }
    }
}

/// Whether the extension alone marks `file_name` as not worth embedding.
pub fn is_skipped_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SKIPPED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Classifies `bytes` read from a file called `file_name`.
///
/// The checks run in order and the first one that decides wins: extension
/// deny-list, size ceiling, MIME sniffing, printability.
pub fn classify(bytes: &[u8], file_name: &str) -> Classification {
    if is_skipped_extension(file_name) {
        return Classification::Skipped;
    }

    let size = bytes.len() as u64;
    if size >= MAX_CONTENT_SIZE {
        return Classification::TooLarge(size);
    }

    if looks_binary(bytes) {
        Classification::Binary
    } else {
        Classification::Text(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Classifies `bytes` and wraps the result as a [`ContentRecord`].
pub fn classify_content(relative_path: &str, bytes: &[u8]) -> ContentRecord {
    let file_name = base_name(relative_path);
    let classification = classify(bytes, file_name);
    let is_binary = classification.is_binary();
    ContentRecord {
        relative_path: relative_path.to_string(),
        content: classification.into_content(file_name),
        is_binary,
        error: None,
    }
}

/// Final segment of a forward-slash separated path.
pub fn base_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let sample = &bytes[..bytes.len().min(SNIFF_LEN)];

    let mime = tree_magic_mini::from_u8(sample);
    if is_text_mime(mime) {
        return false;
    }
    if is_binary_mime(mime) {
        tracing::debug!("Sniffed binary type {}", mime);
        return true;
    }

    // octet-stream and anything else inconclusive
    exceeds_non_printable_threshold(sample)
}

fn is_text_mime(mime: &str) -> bool {
    mime.starts_with("text/") || TEXT_MIME_MARKERS.iter().any(|marker| mime.contains(marker))
}

fn is_binary_mime(mime: &str) -> bool {
    BINARY_MIME_PREFIXES
        .iter()
        .any(|prefix| mime.starts_with(prefix))
}

/// True when more than 10% of `sample` are control bytes other than `\n`, `\r`, `\t`.
pub fn exceeds_non_printable_threshold(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    let non_printable = sample
        .iter()
        .filter(|&&b| (b < 32 && !matches!(b, b'\n' | b'\r' | b'\t')) || b == 127)
        .count();
    non_printable as f64 / sample.len() as f64 > NON_PRINTABLE_THRESHOLD
}

/// Formats a byte count with 1024-based units and one decimal, e.g. `2.3 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}
