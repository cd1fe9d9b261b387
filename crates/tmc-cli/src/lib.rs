//! tmc command-line interface.

pub mod discovery;
pub mod pipeline;

use std::path::PathBuf;

use tmc_error::Result;
use tmc_ir::IrBundle;

pub use pipeline::{load_config, process_project};

/// Options for running tmc.
#[derive(Debug, Clone)]
pub struct TmcOptions {
    /// Project configuration file (JSON).
    pub config: PathBuf,
    /// Individual canonical-AST files to process.
    pub files: Vec<String>,
    /// Directories to scan recursively for `*.ast.json`.
    pub dirs: Vec<String>,
    /// Output directory for the IR bundle.
    pub out: PathBuf,
    /// Print the bundle to stdout instead of writing files.
    pub emit_ir: bool,
}

/// Main entry point.
pub fn run_main(opts: &TmcOptions) -> Result<Option<IrBundle>> {
    let config = load_config(&opts.config)?;
    let files = discovery::discover_files(opts, &config)?;
    if files.is_empty() {
        return Ok(None);
    }
    process_project(&config, opts, &files).map(Some)
}
