//! Raw records: the producer side of the extraction boundary.
//!
//! Everything here is untyped with respect to the IR: steps carry the
//! *symbolic* name of their target (`target_name_id`, a field name like
//! `emailInput`), not an IR id. Records live only for the duration of one
//! pipeline invocation; the IR builder consumes them and performs the
//! name-to-id resolution pass.

use std::collections::BTreeMap;

use serde_json::Value;
use strum_macros::Display;

use crate::diag::Diagnostics;
use tmc_symbol::LocatorStrategy;

/// Whether a raw step is an action or an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RawStepKind {
    Action,
    Assertion,
}

/// Where an assertion argument's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DataSourceKind {
    Ui,
    Data,
    Constant,
    Expression,
}

/// An unresolved assertion argument.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataSource {
    pub kind: DataSourceKind,
    /// Symbolic target name for `ui` sources.
    pub target_name_id: Option<String>,
    pub target_node_id: Option<String>,
    /// Data field name for `data` sources.
    pub field: Option<String>,
    /// Literal value for `constant` sources, rendered text for
    /// `expression` sources.
    pub value: Option<Value>,
}

impl RawDataSource {
    pub fn ui(target_name_id: Option<String>, target_node_id: Option<String>) -> Self {
        Self {
            kind: DataSourceKind::Ui,
            target_name_id,
            target_node_id,
            field: None,
            value: None,
        }
    }

    pub fn data(field: impl Into<String>) -> Self {
        Self {
            kind: DataSourceKind::Data,
            target_name_id: None,
            target_node_id: None,
            field: Some(field.into()),
            value: None,
        }
    }

    pub fn constant(value: Value) -> Self {
        Self {
            kind: DataSourceKind::Constant,
            target_name_id: None,
            target_node_id: None,
            field: None,
            value: Some(value),
        }
    }

    pub fn expression(text: impl Into<String>) -> Self {
        Self {
            kind: DataSourceKind::Expression,
            target_name_id: None,
            target_node_id: None,
            field: None,
            value: Some(Value::String(text.into())),
        }
    }
}

/// One raw step: an action or assertion with an unresolved target.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStep {
    pub kind: RawStepKind,
    pub name: String,
    pub target_name_id: Option<String>,
    pub target_node_id: Option<String>,
    /// Positional argument literals under `value`, `value2`, ...
    pub parameters: BTreeMap<String, Value>,
    /// Assertion arguments; `None` on action steps.
    pub actual: Option<RawDataSource>,
    pub expected: Option<RawDataSource>,
}

impl RawStep {
    pub fn action(name: impl Into<String>) -> Self {
        Self {
            kind: RawStepKind::Action,
            name: name.into(),
            target_name_id: None,
            target_node_id: None,
            parameters: BTreeMap::new(),
            actual: None,
            expected: None,
        }
    }

    pub fn assertion(name: impl Into<String>) -> Self {
        Self {
            kind: RawStepKind::Assertion,
            name: name.into(),
            target_name_id: None,
            target_node_id: None,
            parameters: BTreeMap::new(),
            actual: None,
            expected: None,
        }
    }
}

/// One harvested UI target: a locator field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTarget {
    /// Symbolic name (the declarator name, e.g. `emailInput`).
    pub name: String,
    pub strategy: LocatorStrategy,
    /// Argument of the `By.*` constructor, stripped of quotes.
    pub locator_value: String,
    /// Node id of the locator expression.
    pub node_id: String,
    /// Enclosing class, when the field sits inside one.
    pub page: Option<String>,
}

/// One discovered test method and its steps, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTest {
    pub name: String,
    /// Declaring class; resolves to the owning suite at IR build time.
    pub suite_hint: Option<String>,
    pub steps: Vec<RawStep>,
    pub tags: Vec<String>,
    pub file_path: String,
}

/// One discovered suite (a class declaring test methods).
#[derive(Debug, Clone, PartialEq)]
pub struct RawSuite {
    pub name: String,
    pub description: Option<String>,
    pub tests: Vec<String>,
}

/// Page-object metadata the action mapper consults.
#[derive(Debug, Clone, PartialEq)]
pub struct PageObjectInfo {
    pub name: String,
    pub methods: Vec<String>,
}

/// Everything extracted from one file.
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    pub file_path: String,
    pub targets: Vec<RawTarget>,
    pub page_objects: Vec<PageObjectInfo>,
    pub suites: Vec<RawSuite>,
    pub tests: Vec<RawTest>,
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_constructors() {
        let action = RawStep::action("click");
        assert_eq!(action.kind, RawStepKind::Action);
        assert_eq!(action.kind.to_string(), "action");
        assert!(action.parameters.is_empty());

        let assertion = RawStep::assertion("assertEquals");
        assert_eq!(assertion.kind, RawStepKind::Assertion);
        assert_eq!(assertion.kind.to_string(), "assertion");
    }

    #[test]
    fn test_data_source_constructors() {
        let ui = RawDataSource::ui(Some("welcomeMessage".to_string()), None);
        assert_eq!(ui.kind, DataSourceKind::Ui);
        assert_eq!(ui.target_name_id.as_deref(), Some("welcomeMessage"));

        let data = RawDataSource::data("expectedMessage");
        assert_eq!(data.kind, DataSourceKind::Data);
        assert_eq!(data.field.as_deref(), Some("expectedMessage"));

        let constant = RawDataSource::constant(Value::from(42));
        assert_eq!(constant.value, Some(Value::from(42)));
    }
}
