//! Input discovery: canonical-AST files to feed the pipeline.

use std::path::Path;

use ignore::WalkBuilder;
use tracing::debug;

use tmc_error::{Error, Result};
use tmc_ir::ProjectConfig;

use crate::TmcOptions;

/// Extension the upstream parser gives serialized canonical trees.
const AST_SUFFIX: &str = ".ast.json";

/// Collect the input files, in sorted order for determinism.
///
/// Explicit `--file` inputs win; otherwise `--dir` trees are walked;
/// otherwise the configuration's `sourceFiles` list is used.
pub fn discover_files(opts: &TmcOptions, config: &ProjectConfig) -> Result<Vec<String>> {
    let mut files = if !opts.files.is_empty() {
        for file in &opts.files {
            if !Path::new(file).is_file() {
                return Err(Error::file_not_found(file.clone()).with_operation("cli::discover"));
            }
        }
        opts.files.clone()
    } else if !opts.dirs.is_empty() {
        let mut found = Vec::new();
        for dir in &opts.dirs {
            walk_dir(dir, &mut found)?;
        }
        found
    } else {
        config.source_files.clone()
    };

    files.sort();
    files.dedup();
    debug!(count = files.len(), "discovered input files");
    Ok(files)
}

fn walk_dir(dir: &str, found: &mut Vec<String>) -> Result<()> {
    if !Path::new(dir).is_dir() {
        return Err(Error::file_not_found(dir.to_string()).with_operation("cli::discover"));
    }
    for entry in WalkBuilder::new(dir).build() {
        let entry = entry.map_err(|err| {
            Error::unexpected(format!("walking '{dir}' failed"))
                .with_operation("cli::discover")
                .set_source(err)
        })?;
        let path = entry.path();
        if path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(AST_SUFFIX))
        {
            found.push(path.display().to_string());
        }
    }
    Ok(())
}
