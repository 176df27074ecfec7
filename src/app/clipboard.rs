//! Copies text to the system clipboard through whichever clipboard command is available.

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Clipboard command {0} failed: {1}")]
    CommandFailed(String, String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Copies text to a clipboard. Implemented by the system clipboard and by test doubles.
pub trait ClipboardService: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard commands known to work on the supported platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipboardProvider {
    MacOS,
    Wayland,
    Xclip,
    Xsel,
    Windows,
}

impl ClipboardProvider {
    fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::MacOS => ("pbcopy", &[]),
            Self::Wayland => ("wl-copy", &[]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Windows => ("clip.exe", &[]),
        }
    }

    /// Candidates in order of preference for the current environment.
    fn candidates() -> Vec<Self> {
        if cfg!(target_os = "macos") {
            return vec![Self::MacOS];
        }
        if cfg!(windows) {
            return vec![Self::Windows];
        }

        let mut candidates = Vec::new();
        if env::var_os("WAYLAND_DISPLAY").is_some() {
            candidates.push(Self::Wayland);
        }
        candidates.extend([Self::Xclip, Self::Xsel]);
        // WSL exposes the Windows clipboard.
        candidates.push(Self::Windows);
        candidates
    }
}

/// The production clipboard: pipes the text into the first clipboard command that works.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardService for SystemClipboard {
    fn copy_text(&self, text: &str) -> Result<(), ClipboardError> {
        for provider in ClipboardProvider::candidates() {
            let (cmd, args) = provider.command();
            match execute_clipboard_command(cmd, args, text) {
                Ok(()) => {
                    tracing::debug!("Copied {} bytes to clipboard via {}", text.len(), cmd);
                    return Ok(());
                }
                Err(ClipboardError::Io(e)) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ClipboardError::NoClipboardFound)
    }
}

fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if output.status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(
            cmd.to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}
