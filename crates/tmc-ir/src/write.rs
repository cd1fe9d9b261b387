//! IR writer.
//!
//! Serializes a fully built, fully validated bundle to the on-disk
//! layout. Keys are sorted (documents pass through `serde_json::Value`,
//! whose object map orders keys) and every file ends with a newline, so
//! two writes of the same bundle are byte-identical. The writer is never
//! handed a partial bundle; failures upstream abort before any file is
//! created.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use tmc_error::{Error, Result};

use crate::doc::IrBundle;

/// Render one document to canonical JSON: sorted keys, pretty-printed,
/// trailing newline.
pub fn to_canonical_json<T: Serialize>(doc: &T) -> Result<String> {
    let value = serde_json::to_value(doc).map_err(|err| {
        Error::serialization_failed("could not serialize IR document")
            .with_operation("ir::write")
            .set_source(err)
    })?;
    let mut rendered = serde_json::to_string_pretty(&value).map_err(|err| {
        Error::serialization_failed("could not render IR document")
            .with_operation("ir::write")
            .set_source(err)
    })?;
    rendered.push('\n');
    Ok(rendered)
}

/// Write the bundle under `out_dir`:
///
/// ```text
/// <out>/project.json
/// <out>/environment.json
/// <out>/targets.json
/// <out>/suites/<suiteId>.json
/// <out>/tests/<testId>.json
/// <out>/data/<dataSetId>.json
/// ```
pub fn write_bundle(out_dir: &Path, bundle: &IrBundle) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    write_doc(&out_dir.join("project.json"), &bundle.project)?;
    write_doc(&out_dir.join("environment.json"), &bundle.environment)?;
    write_doc(&out_dir.join("targets.json"), &bundle.targets)?;

    let suites_dir = out_dir.join("suites");
    fs::create_dir_all(&suites_dir)?;
    for suite in &bundle.suites {
        write_doc(&suites_dir.join(format!("{}.json", suite.suite_id)), suite)?;
    }

    let tests_dir = out_dir.join("tests");
    fs::create_dir_all(&tests_dir)?;
    for test in &bundle.tests {
        write_doc(&tests_dir.join(format!("{}.json", test.test_id)), test)?;
    }

    let data_dir = out_dir.join("data");
    fs::create_dir_all(&data_dir)?;
    for data_set in &bundle.data_sets {
        write_doc(
            &data_dir.join(format!("{}.json", data_set.data_set_id)),
            data_set,
        )?;
    }

    info!(
        out = %out_dir.display(),
        suites = bundle.suites.len(),
        tests = bundle.tests.len(),
        "IR bundle written"
    );
    Ok(())
}

fn write_doc<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    let rendered = to_canonical_json(doc)?;
    fs::write(path, rendered)
        .map_err(|err| Error::from(err).with_context("path", path.display().to_string()))
}
