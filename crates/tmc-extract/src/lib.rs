//! Extraction layer for tmc.
//!
//! Walks one canonical tree and produces the raw, untyped records the IR
//! builder consumes: UI targets harvested from locator fields, page-object
//! metadata, and test records whose steps carry *unresolved* symbolic
//! target names (`target_name_id`). Classification of method invocations
//! into actions, assertions, and skipped framework utilities happens
//! here; turning names into stable ids happens later, in the IR build.
//!
//! All extraction is pure per tree: given the same `AstTree`, the same
//! records come out, so the batch orchestrator can fan files out across
//! threads and join before IR assembly.

pub mod diag;
pub mod locators;
pub mod mapper;
pub mod orchestrator;
pub mod pages;
pub mod record;

pub use diag::{Diagnostic, Diagnostics, Severity};
pub use locators::extract_targets;
pub use mapper::{
    ActionMapper, AssertionMapper, StepMapper, ASSERTION_METHODS, FRAMEWORK_QUALIFIERS,
    SUPPORTED_ACTIONS, UTILITY_METHODS,
};
pub use orchestrator::FileExtractor;
pub use pages::extract_page_objects;
pub use record::{
    DataSourceKind, FileExtraction, PageObjectInfo, RawDataSource, RawStep, RawStepKind,
    RawSuite, RawTarget, RawTest,
};
