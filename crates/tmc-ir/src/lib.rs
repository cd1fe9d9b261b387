//! Typed IR for tmc.
//!
//! The raw records the extraction layer produces are untyped and carry
//! symbolic target names. This crate types them: the JSON-serializable
//! IR documents (project, environment, targets, data, suites, tests),
//! the deterministic id scheme, and the builder that performs the second
//! resolution pass so every `step.targetId` points into the central
//! target list. Construction order is load-bearing: targets are
//! normalized and the name-to-id map built *before* any test document
//! exists.
//!
//! Documents are built once, validated, and never mutated afterwards;
//! the writer only ever sees a fully validated bundle.

pub mod build;
pub mod config;
pub mod doc;
pub mod id;
pub mod validate;
pub mod write;

pub use build::IrBuilder;
pub use config::{DataSetConfig, EnvironmentConfig, ProjectConfig, RetryPolicy, Timeouts};
pub use doc::{
    AssertionIr, DataBinding, DataSource, EnvironmentIr, InputBinding, IrBundle, ProjectIr,
    SelectorStrategy, SourceKind, StepIr, StepTarget, SuiteIr, TargetContext, TargetIr,
    TargetSemantic, TestDataIr, TestIr, IR_VERSION,
};
pub use id::{assert_id, data_set_id, step_id, suite_id, target_id, test_id};
pub use validate::{IrValidator, SchemaValidator};
pub use write::{to_canonical_json, write_bundle};

pub use tmc_error::{Error, ErrorKind, Result};
