//! Locator extractor: harvest UI targets from a tree.
//!
//! Every field or variable declarator initialized with a qualified
//! `By.<strategy>(...)` invocation becomes one raw target, carrying the
//! detected strategy, the unquoted argument literal, the enclosing class
//! as its page context, and the declarator name as its symbolic name.
//! Unknown strategies are skipped with a warning.

use tmc_ast::{AstNode, AstVisitor, NodeKind};
use tmc_symbol::{LocatorStrategy, SymbolTable};

use crate::diag::Diagnostics;
use crate::record::RawTarget;

/// Harvest raw targets from the table's tree, in source order.
pub fn extract_targets(table: &SymbolTable<'_>, diagnostics: &mut Diagnostics) -> Vec<RawTarget> {
    let tree = table.tree();
    let mut harvester = TargetHarvester {
        file_path: &tree.file_path,
        class_stack: Vec::new(),
        targets: Vec::new(),
        diagnostics,
    };
    harvester.visit_node(&tree.root);
    harvester.targets
}

/// Visitor that collects locator declarators, tracking the innermost
/// enclosing class for page context.
struct TargetHarvester<'a> {
    file_path: &'a str,
    class_stack: Vec<String>,
    targets: Vec<RawTarget>,
    diagnostics: &'a mut Diagnostics,
}

impl TargetHarvester<'_> {
    /// Emit a raw target for a declarator whose initializer is a `By.*`
    /// invocation.
    fn harvest(&mut self, node: &AstNode) {
        if !is_declarator(node) {
            return;
        }
        let Some(name) = &node.name else {
            return;
        };
        let Some(init) = node
            .children
            .iter()
            .find(|child| child.kind == NodeKind::MethodInvocation)
        else {
            return;
        };
        if init.qualifier() != Some("By") {
            return;
        }

        let Some(member) = init.member() else {
            return;
        };
        let Some(strategy) = LocatorStrategy::from_by_member(member) else {
            self.diagnostics.warn(
                "unknown_strategy",
                format!("locator '{}' uses unsupported strategy By.{}", name, member),
                self.file_path,
                Some(init.id.clone()),
            );
            return;
        };

        let locator_value = init
            .children
            .iter()
            .find_map(|child| child.literal_value())
            .map(render_value)
            .unwrap_or_default();

        self.targets.push(RawTarget {
            name: name.clone(),
            strategy,
            locator_value,
            node_id: init.id.clone(),
            page: self.class_stack.last().cloned(),
        });
    }
}

impl AstVisitor for TargetHarvester<'_> {
    fn visit_class(&mut self, node: &AstNode) {
        let named = node.name.is_some();
        if let Some(name) = &node.name {
            self.class_stack.push(name.clone());
        }
        self.visit_children(node);
        if named {
            self.class_stack.pop();
        }
    }

    fn visit_field(&mut self, node: &AstNode) {
        self.harvest(node);
        self.visit_children(node);
    }

    fn visit_other(&mut self, node: &AstNode) {
        self.harvest(node);
        self.visit_children(node);
    }
}

fn is_declarator(node: &AstNode) -> bool {
    matches!(
        node.kind,
        NodeKind::Field | NodeKind::Variable | NodeKind::VariableDeclarator
    )
}

fn render_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
