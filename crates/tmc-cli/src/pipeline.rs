//! Core processing pipeline: load trees → extract → build IR → write.
//!
//! Per-file extraction is pure, so files fan out across the rayon pool
//! and join before the single-threaded IR assembly. Either the full,
//! validated bundle is written or the invocation fails wholesale; no
//! partial IR ever reaches disk.

use std::fs;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use tmc_ast::AstTree;
use tmc_error::{Error, Result};
use tmc_extract::{FileExtraction, FileExtractor};
use tmc_ir::{to_canonical_json, write_bundle, IrBuilder, IrBundle, ProjectConfig};

use crate::TmcOptions;

/// Load and decode the project configuration.
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    let raw = fs::read_to_string(path)
        .map_err(|err| Error::from(err).with_context("path", path.display().to_string()))?;
    serde_json::from_str(&raw).map_err(|err| {
        Error::config_invalid("could not decode project configuration")
            .with_operation("cli::load_config")
            .with_context("path", path.display().to_string())
            .set_source(err)
    })
}

/// Process one project's worth of canonical-AST files.
pub fn process_project(
    config: &ProjectConfig,
    opts: &TmcOptions,
    files: &[String],
) -> Result<IrBundle> {
    // 1. Load and validate trees
    let load_start = Instant::now();
    info!("Loading {} canonical trees", files.len());
    let trees = files
        .iter()
        .map(|file| {
            let raw = fs::read_to_string(file)
                .map_err(|err| Error::from(err).with_context("path", file.clone()))?;
            AstTree::from_json(&raw)
        })
        .collect::<Result<Vec<AstTree>>>()?;
    info!("Tree loading: {:.2}s", load_start.elapsed().as_secs_f64());

    // 2. Per-file extraction (parallel; stages are pure per tree)
    let extract_start = Instant::now();
    let extractions: Vec<FileExtraction> = trees
        .par_iter()
        .map(|tree| FileExtractor::new().extract(tree))
        .collect();
    info!("Extraction: {:.2}s", extract_start.elapsed().as_secs_f64());

    // 3. IR assembly and linking (single-threaded, owns the final maps)
    let build_start = Instant::now();
    let bundle = IrBuilder::new(config).build(extractions)?;
    info!("IR build: {:.2}s", build_start.elapsed().as_secs_f64());

    for diagnostic in bundle.diagnostics.iter() {
        info!(
            code = %diagnostic.code,
            file = %diagnostic.file,
            "warning: {}",
            diagnostic.message
        );
    }

    // 4. Output
    if opts.emit_ir {
        println!("{}", to_canonical_json(&bundle)?);
    } else {
        let write_start = Instant::now();
        write_bundle(&opts.out, &bundle)?;
        info!("Write: {:.2}s", write_start.elapsed().as_secs_f64());
    }

    Ok(bundle)
}
