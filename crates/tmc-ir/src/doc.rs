//! The IR documents.
//!
//! Typed, JSON-serializable records with camelCase field names. Each
//! document is built once by the [`crate::build::IrBuilder`], validated,
//! and then treated as immutable: the bundle hands out references only.
//! Serialization goes through `serde_json`'s sorted-key object map, so
//! the same bundle always renders to the same bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tmc_extract::{DataSourceKind, Diagnostics};
use tmc_symbol::LocatorStrategy;

use crate::config::{RetryPolicy, Timeouts};

/// IR format version stamped into every project document.
pub const IR_VERSION: &str = "1.0";

/// Project-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIr {
    pub ir_version: String,
    pub project_name: String,
    pub source_framework: String,
    pub target_framework: String,
    pub architecture_pattern: String,
    pub supports_parallel: bool,
    pub created_on: String,
}

/// Execution environment shared by every test in the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentIr {
    pub base_urls: BTreeMap<String, String>,
    pub execution_mode: String,
    pub browsers: Vec<String>,
    pub timeouts: Timeouts,
    pub retry_policy: RetryPolicy,
}

/// One way of selecting a target, scored for stability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorStrategy {
    pub strategy: LocatorStrategy,
    pub value: String,
    pub stability_score: f64,
}

/// Where a target lives in the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

/// What a target means, as far as the source reveals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSemantic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

/// One UI target with its stable id and selector strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetIr {
    pub target_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub context: TargetContext,
    pub semantic: TargetSemantic,
    pub selector_strategies: Vec<SelectorStrategy>,
    pub preferred_strategy: LocatorStrategy,
}

/// One data set tests can iterate over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDataIr {
    pub data_set_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub records: Vec<BTreeMap<String, Value>>,
}

/// One suite grouping tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteIr {
    pub suite_id: String,
    pub description: String,
    pub tests: Vec<String>,
}

/// URL/selector detail accompanying a resolved step target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

/// Where a step's input value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBinding {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub masked: bool,
}

/// One action step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepIr {
    pub step_id: String,
    pub action: String,
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<StepTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputBinding>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
}

/// Where an assertion operand's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Ui,
    Data,
    Constant,
    Expression,
}

impl From<DataSourceKind> for SourceKind {
    fn from(kind: DataSourceKind) -> Self {
        match kind {
            DataSourceKind::Ui => SourceKind::Ui,
            DataSourceKind::Data => SourceKind::Data,
            DataSourceKind::Constant => SourceKind::Constant,
            DataSourceKind::Expression => SourceKind::Expression,
        }
    }
}

/// One assertion operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked: Option<bool>,
}

/// One assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionIr {
    pub assert_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub actual: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<DataSource>,
}

/// Binding of a test to the data set it iterates over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBinding {
    pub data_set_id: String,
    pub iteration_strategy: String,
}

/// One migrated test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestIr {
    pub test_id: String,
    pub suite_id: String,
    pub priority: String,
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_binding: Option<DataBinding>,
    pub steps: Vec<StepIr>,
    pub assertions: Vec<AssertionIr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// The full, validated output of one pipeline invocation.
///
/// Targets are sorted by `(page, name)`; suites by id. Warnings
/// accumulated during extraction and linking ride along for callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrBundle {
    pub project: ProjectIr,
    pub environment: EnvironmentIr,
    pub targets: Vec<TargetIr>,
    pub suites: Vec<SuiteIr>,
    pub tests: Vec<TestIr>,
    pub data_sets: Vec<TestDataIr>,
    pub diagnostics: Diagnostics,
}

impl IrBundle {
    /// Look up a target by id.
    pub fn target(&self, target_id: &str) -> Option<&TargetIr> {
        self.targets.iter().find(|t| t.target_id == target_id)
    }

    /// Look up a suite by id.
    pub fn suite(&self, suite_id: &str) -> Option<&SuiteIr> {
        self.suites.iter().find(|s| s.suite_id == suite_id)
    }

    /// Look up a test by id.
    pub fn test(&self, test_id: &str) -> Option<&TestIr> {
        self.tests.iter().find(|t| t.test_id == test_id)
    }
}
