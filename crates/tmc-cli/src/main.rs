use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tmc_cli::{run_main, TmcOptions};

#[derive(Parser, Debug)]
#[command(
    name = "tmc",
    about = "tmc: migrate QA automation suites through a framework-agnostic IR",
    version
)]
pub struct Cli {
    /// Project configuration file (JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: PathBuf,

    /// Individual canonical-AST files to process (repeatable)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        num_args = 1..,
        action = clap::ArgAction::Append,
        conflicts_with = "dirs"
    )]
    files: Vec<String>,

    /// Directories to scan recursively for *.ast.json (repeatable)
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        num_args = 1..,
        action = clap::ArgAction::Append,
        conflicts_with = "files"
    )]
    dirs: Vec<String>,

    /// Output directory for the IR bundle
    #[arg(short = 'o', long = "out", value_name = "DIR", default_value = "ir-out")]
    out: PathBuf,

    /// Print the built bundle to stdout instead of writing files
    #[arg(long, default_value_t = false)]
    emit_ir: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let opts = TmcOptions {
        config: cli.config,
        files: cli.files,
        dirs: cli.dirs,
        out: cli.out,
        emit_ir: cli.emit_ir,
    };

    match run_main(&opts)? {
        Some(bundle) => {
            eprintln!(
                "migrated {} tests, {} suites, {} targets ({} warnings)",
                bundle.tests.len(),
                bundle.suites.len(),
                bundle.targets.len(),
                bundle.diagnostics.warning_count()
            );
        }
        None => eprintln!("no input files found"),
    }
    Ok(())
}
