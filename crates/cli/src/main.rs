mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Headless caption timing editor.
#[derive(Debug, Parser)]
#[command(name = "subsync", version, about)]
struct Cli {
    /// Editor settings JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the saved editing session. Edits are saved there,
    /// and edit commands without an input file continue from it.
    #[arg(long, global = true, value_name = "DIR")]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Parses a caption file and reports what was read.
    Check { input: PathBuf },
    /// Rewrites a caption file with sequential numbering.
    Normalize {
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Appends an empty caption.
    Add {
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Deletes the caption at a zero-based index.
    Delete {
        input: Option<PathBuf>,
        #[arg(long)]
        index: usize,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merges the caption at a zero-based index with the next one.
    Merge {
        input: Option<PathBuf>,
        #[arg(long)]
        index: usize,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Splits a caption at a playback position in seconds.
    Split {
        input: Option<PathBuf>,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        at: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sets a caption start to a playback position in seconds.
    SetStart {
        input: Option<PathBuf>,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        at: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sets a caption end to a playback position in seconds.
    SetEnd {
        input: Option<PathBuf>,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        at: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Prints the caption active at a playback position in seconds.
    Active {
        input: PathBuf,
        #[arg(long)]
        at: f64,
    },
    /// Removes the saved session from the session directory.
    ClearSession,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => engine::EditorSettings::load(path)?,
        None => engine::EditorSettings::default(),
    };

    commands::run(cli.command, settings, cli.session.as_deref())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
