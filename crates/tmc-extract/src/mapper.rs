//! Action and assertion mappers.
//!
//! Each mapper is a predicate plus a mapping function over one
//! `MethodInvocation`; the orchestrator dispatches every invocation to
//! the first mapper that matches. Invocations nobody claims are skipped.
//!
//! The action mapper implements the classification rules over the
//! Selenium primitive set, the always-skipped framework utilities, and
//! the framework qualifiers that are never page objects. The assertion
//! mapper detects test-framework assertions and classifies their
//! arguments into data sources.

use std::collections::BTreeMap;

use serde_json::Value;

use tmc_ast::{AstNode, NodeKind};
use tmc_symbol::{DeclKind, SymbolTable};

use crate::diag::Diagnostics;
use crate::record::{RawDataSource, RawStep};

/// Selenium primitive actions that emit a step under their own name.
pub const SUPPORTED_ACTIONS: &[&str] = &[
    "click",
    "sendKeys",
    "submit",
    "clear",
    "doubleClick",
    "contextClick",
    "getText",
    "waitForVisible",
    "navigate",
];

/// Framework plumbing that never emits a step.
pub const UTILITY_METHODS: &[&str] = &[
    "findElement",
    "findElements",
    "manage",
    "timeouts",
    "implicitlyWait",
    "until",
    "presenceOfElementLocated",
    "visibilityOfElementLocated",
    "elementToBeClickable",
    "get",
];

/// Qualifiers that are part of the framework, not page objects. The
/// empty qualifier stands for unqualified calls.
pub const FRAMEWORK_QUALIFIERS: &[&str] =
    &["Duration", "ExpectedConditions", "By", "driver", "wait", "System", ""];

/// Test-framework assertion members.
pub const ASSERTION_METHODS: &[&str] = &[
    "assertEquals",
    "assertNotEquals",
    "assertTrue",
    "assertFalse",
    "assertNull",
    "assertNotNull",
];

/// A (predicate, mapper) pair the orchestrator dispatches invocations to.
pub trait StepMapper {
    /// Short name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this mapper wants the invocation.
    fn matches(&self, invocation: &AstNode) -> bool;

    /// Map a matched invocation into a raw step. The enclosing statement
    /// is handed over for target resolution; `None` means the invocation
    /// turned out to be noise after all.
    fn map(
        &self,
        invocation: &AstNode,
        statement: &AstNode,
        table: &SymbolTable<'_>,
        file_path: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<RawStep>;
}

/// How the action mapper classifies one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionClass {
    Skip,
    Primitive,
    PageObjectCall,
}

fn classify_action(invocation: &AstNode) -> ActionClass {
    let Some(member) = invocation.member() else {
        return ActionClass::Skip;
    };
    if UTILITY_METHODS.contains(&member) {
        return ActionClass::Skip;
    }
    if SUPPORTED_ACTIONS.contains(&member) {
        return ActionClass::Primitive;
    }
    let qualifier = invocation.qualifier().unwrap_or("");
    if !qualifier.is_empty() && !FRAMEWORK_QUALIFIERS.contains(&qualifier) {
        return ActionClass::PageObjectCall;
    }
    ActionClass::Skip
}

/// Maps Selenium primitives and page-object calls to action steps.
pub struct ActionMapper;

impl StepMapper for ActionMapper {
    fn name(&self) -> &'static str {
        "action"
    }

    fn matches(&self, invocation: &AstNode) -> bool {
        classify_action(invocation) != ActionClass::Skip
    }

    fn map(
        &self,
        invocation: &AstNode,
        statement: &AstNode,
        table: &SymbolTable<'_>,
        file_path: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<RawStep> {
        let class = classify_action(invocation);
        if class == ActionClass::Skip {
            return None;
        }
        let member = invocation.member()?;
        let mut step = RawStep::action(member);

        let known_page_object = match class {
            ActionClass::PageObjectCall => {
                let qualifier = invocation.qualifier().unwrap_or("");
                let known = table.is_page_object_qualifier(qualifier);
                if !known {
                    diagnostics.warn(
                        "unresolved_page_object",
                        format!("'{}' is neither a framework qualifier nor a page object", qualifier),
                        file_path,
                        Some(invocation.id.clone()),
                    );
                }
                known
            }
            _ => false,
        };

        match table.resolve_step_target(statement) {
            Some(resolved) => {
                step.target_name_id = resolved.target_name;
                step.target_node_id = resolved.target_node_id;
            }
            None if known_page_object => {
                diagnostics.warn(
                    "no_inferable_target",
                    format!("page-object method '{}' has no inferable target", member),
                    file_path,
                    Some(invocation.id.clone()),
                );
            }
            None => {}
        }

        step.parameters = extract_parameters(invocation);
        Some(step)
    }
}

/// Positional argument literals under `value`, `value2`, ...
///
/// Chained invocations among the children are receivers, not arguments,
/// and are skipped. Non-literal expression arguments render as their
/// source text or `"<expr>"`.
fn extract_parameters(invocation: &AstNode) -> BTreeMap<String, Value> {
    let mut parameters = BTreeMap::new();
    let mut index = 0usize;
    for child in &invocation.children {
        let value = match child.kind {
            NodeKind::Literal => match child.literal_value() {
                Some(v) => v,
                None => continue,
            },
            NodeKind::MemberReference
            | NodeKind::BinaryOperation
            | NodeKind::Assignment
            | NodeKind::This => Value::String(render_expression(child)),
            _ => continue,
        };
        index += 1;
        let key = if index == 1 {
            "value".to_string()
        } else {
            format!("value{index}")
        };
        parameters.insert(key, value);
    }
    parameters
}

fn render_expression(node: &AstNode) -> String {
    node.text()
        .map(str::to_string)
        .or_else(|| node.member().map(str::to_string))
        .or_else(|| node.name.clone())
        .unwrap_or_else(|| "<expr>".to_string())
}

/// Maps test-framework assertions to assertion steps with classified
/// `actual`/`expected` data sources.
pub struct AssertionMapper;

impl StepMapper for AssertionMapper {
    fn name(&self) -> &'static str {
        "assertion"
    }

    fn matches(&self, invocation: &AstNode) -> bool {
        invocation
            .member()
            .is_some_and(|member| ASSERTION_METHODS.contains(&member))
    }

    fn map(
        &self,
        invocation: &AstNode,
        _statement: &AstNode,
        table: &SymbolTable<'_>,
        _file_path: &str,
        _diagnostics: &mut Diagnostics,
    ) -> Option<RawStep> {
        let member = invocation.member()?;
        let args: Vec<&AstNode> = invocation
            .children
            .iter()
            .filter(|child| is_expression(child))
            .collect();

        let mut step = RawStep::assertion(member);
        step.actual = args.first().map(|arg| classify_source(arg, table));
        step.expected = args.get(1).map(|arg| classify_source(arg, table));

        // The step-level target is the first UI source, when there is one.
        for source in [step.actual.as_ref(), step.expected.as_ref()].into_iter().flatten() {
            if source.kind == crate::record::DataSourceKind::Ui {
                step.target_name_id = source.target_name_id.clone();
                step.target_node_id = source.target_node_id.clone();
                break;
            }
        }

        Some(step)
    }
}

fn is_expression(node: &AstNode) -> bool {
    matches!(
        node.kind,
        NodeKind::Literal
            | NodeKind::MemberReference
            | NodeKind::MethodInvocation
            | NodeKind::BinaryOperation
            | NodeKind::This
    )
}

/// Classify one assertion argument into a data source.
///
/// Literals are constants; anything the symbol table binds to a target
/// is a UI read; references to method parameters are data-driven fields;
/// the rest is an opaque expression.
fn classify_source(arg: &AstNode, table: &SymbolTable<'_>) -> RawDataSource {
    if arg.kind == NodeKind::Literal {
        return RawDataSource::constant(arg.literal_value().unwrap_or(Value::Null));
    }
    if let Some(resolved) = table.resolve_step_target(arg) {
        return RawDataSource::ui(resolved.target_name, resolved.target_node_id);
    }
    if arg.kind == NodeKind::MemberReference {
        if let Some(name) = arg.member().or(arg.name.as_deref()) {
            if table
                .declaration(name)
                .is_some_and(|decl| decl.kind == DeclKind::Parameter)
            {
                return RawDataSource::data(name);
            }
        }
    }
    RawDataSource::expression(render_expression(arg))
}
