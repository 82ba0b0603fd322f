//! treecopy - recursive copy with glob filtering.
//!
//! Usage:
//!   treecopy SOURCE DEST                    Copy a file or directory tree
//!   treecopy SOURCE DEST -m '*.txt'         Copy only matching paths
//!   treecopy SOURCE DEST -m b -m '!c'       Later patterns win, `!` excludes
//!   treecopy SOURCE DEST --overwrite        Merge into an existing destination
//!   treecopy SOURCE DEST --async            Run on the tokio runtime

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use humansize::{DECIMAL, format_size};
use tracing_subscriber::EnvFilter;

use treecopy_ops::{CopyContext, CopyOptions, CopySummary};

#[derive(Parser)]
#[command(
    name = "treecopy",
    version,
    about = "Copy files and directory trees",
    long_about = "treecopy reproduces a file or directory tree at a new location, \
                  keeping permission bits on POSIX systems.\n\n\
                  Patterns given with --matching are globs: `*.txt` matches at any \
                  depth, `./a/*.txt` is anchored to the source root, and `!pattern` \
                  excludes. The last matching pattern decides."
)]
struct Cli {
    /// File or directory to copy
    source: PathBuf,

    /// Where the copy should land
    destination: PathBuf,

    /// Overwrite files and merge into directories that already exist
    #[arg(short, long)]
    overwrite: bool,

    /// Glob pattern selecting what to copy (repeatable)
    #[arg(short, long = "matching", value_name = "PATTERN")]
    matching: Vec<String>,

    /// Use the non-blocking engine
    #[arg(long = "async")]
    use_async: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = CopyOptions::new()
        .with_overwrite(cli.overwrite)
        .with_matching(cli.matching);
    let ctx = CopyContext::current()?;

    let result = if cli.use_async {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(ctx.copy_async(&cli.source, &cli.destination, &options))
    } else {
        ctx.copy(&cli.source, &cli.destination, &options)
    };

    let summary = result.map_err(|err| eyre!("[{}] {err}", err.code()))?;
    print_summary(&summary);

    Ok(())
}

/// Install a fmt subscriber; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "treecopy_core=debug,treecopy_ops=debug",
        _ => "treecopy_core=trace,treecopy_ops=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &CopySummary) {
    println!(
        "{} ({} files, {} directories, {})",
        summary.summary(),
        summary.files_copied,
        summary.directories_created,
        format_size(summary.bytes_copied, DECIMAL)
    );
}
