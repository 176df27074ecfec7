use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sift::app::{ContextStats, Sift};
use sift::config::{self, AppConfig};
use sift::core::SearchEngine;
use sift::utils::file_detection::format_file_size;

/// Used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Assembles a project's files into a single LLM-ready context document.
#[derive(Parser, Debug)]
#[command(name = "sift", version, about)]
struct Cli {
    /// Project root. Opens a directory picker when omitted.
    root: Option<PathBuf>,

    /// File or directory to include, absolute or relative to the root. Repeatable.
    #[arg(short, long = "select", value_name = "PATH")]
    select: Vec<PathBuf>,

    /// Select every file matching an extension preset (frontend, backend, config, docs, build).
    #[arg(short, long, value_name = "ID", conflicts_with = "select")]
    preset: Option<String>,

    /// Copy the artifact to the clipboard instead of printing it.
    #[arg(short, long)]
    copy: bool,

    /// Print the walked tree as JSON and exit.
    #[arg(long, conflicts_with_all = ["copy", "largest"])]
    json: bool,

    /// Print the N largest visible files and exit.
    #[arg(long, value_name = "N", conflicts_with = "copy")]
    largest: Option<usize>,

    /// Use this config file instead of the per-user one.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the effective config to FILE and exit.
    #[arg(long, value_name = "FILE")]
    write_config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut app_config = match &cli.config {
        Some(path) => config::settings::import_config(path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Using default configuration: {:#}", e);
            AppConfig::default()
        }),
    };

    if let Some(path) = &cli.write_config {
        return config::settings::export_config(&app_config, path);
    }

    let root = match cli.root.clone() {
        Some(root) => root,
        None => match Sift::with_system_services(app_config.clone()).select_directory() {
            Some(root) => root,
            None => return Ok(()),
        },
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Cannot open project root {:?}", root))?;

    if cli.config.is_none() && app_config.last_directory.as_ref() != Some(&root) {
        app_config.last_directory = Some(root.clone());
        if let Err(e) = config::settings::save_config(&app_config, None) {
            tracing::warn!("Could not remember last directory: {:#}", e);
        }
    }

    let sift = Sift::with_system_services(app_config);
    let mut stdout = io::stdout().lock();

    if cli.json {
        let tree = sift.list_directory(&root)?;
        serde_json::to_writer_pretty(&mut stdout, &tree)?;
        writeln!(stdout)?;
        return Ok(());
    }

    if let Some(limit) = cli.largest {
        let tree = sift.list_directory(&root)?;
        for file in SearchEngine::files_by_size(&tree, limit) {
            writeln!(
                stdout,
                "{:>10}  {}",
                format_file_size(file.size_bytes),
                file.relative_path
            )?;
        }
        return Ok(());
    }

    let selected = selection(&sift, &root, &cli)?;
    let assembly = sift.assemble_context(&root, &selected);
    if let Some(e) = &assembly.error {
        tracing::warn!("Context assembled with errors: {}", e);
    }
    let artifact = assembly.artifact.as_str();

    let stats = ContextStats::from_assembly(&assembly);
    tracing::info!(
        "{} files, {} lines, {} bytes, ~{} tokens",
        stats.files,
        stats.lines,
        stats.bytes,
        stats
            .tokens
            .map_or_else(|| "?".to_string(), |t| t.to_string())
    );

    if cli.copy {
        sift.copy_to_clipboard(artifact)?;
        eprintln!(
            "Copied {} files ({}) to the clipboard",
            stats.files,
            format_file_size(stats.bytes as u64)
        );
    } else {
        stdout.write_all(artifact.as_bytes())?;
    }
    Ok(())
}

/// Explicit `--select` paths, the files of a preset, or the whole root.
fn selection(sift: &Sift, root: &Path, cli: &Cli) -> Result<Vec<PathBuf>> {
    if let Some(id) = &cli.preset {
        let preset = SearchEngine::preset(id)
            .with_context(|| format!("Unknown preset {:?}", id))?;
        let tree = sift.list_directory(root)?;
        return Ok(SearchEngine::select_by_extensions(&tree, preset.extensions)
            .into_iter()
            .map(PathBuf::from)
            .collect());
    }
    if cli.select.is_empty() {
        return Ok(vec![root.to_path_buf()]);
    }
    Ok(cli.select.clone())
}
