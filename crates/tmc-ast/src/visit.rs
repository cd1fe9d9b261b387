//! Visitor pattern over the canonical tree.
//!
//! Dispatch is by node kind; every default method delegates to
//! [`AstVisitor::visit_children`], so implementors override only the
//! kinds they care about. Traversal is depth-first in child order, which
//! matches the pre-order contract the extraction layer relies on.

use crate::node::{AstNode, NodeKind};

/// Generic visitor over one canonical tree.
///
/// Override the node-specific methods to collect declarations, harvest
/// locators, or classify statements; call `visit_children` to continue
/// below a handled node, or skip it to prune the subtree.
pub trait AstVisitor {
    /// Visit all children of a node in source order.
    fn visit_children(&mut self, node: &AstNode) {
        for child in &node.children {
            self.visit_node(child);
        }
    }

    fn visit_class(&mut self, node: &AstNode) {
        self.visit_children(node);
    }

    fn visit_method(&mut self, node: &AstNode) {
        self.visit_children(node);
    }

    fn visit_field(&mut self, node: &AstNode) {
        self.visit_children(node);
    }

    fn visit_statement(&mut self, node: &AstNode) {
        self.visit_children(node);
    }

    fn visit_invocation(&mut self, node: &AstNode) {
        self.visit_children(node);
    }

    fn visit_other(&mut self, node: &AstNode) {
        self.visit_children(node);
    }

    /// Dispatch on the node kind.
    fn visit_node(&mut self, node: &AstNode) {
        match node.kind {
            NodeKind::ClassDeclaration => self.visit_class(node),
            NodeKind::MethodDeclaration | NodeKind::ConstructorDeclaration => {
                self.visit_method(node)
            }
            NodeKind::FieldDeclaration | NodeKind::Field => self.visit_field(node),
            NodeKind::StatementExpression => self.visit_statement(node),
            NodeKind::MethodInvocation => self.visit_invocation(node),
            _ => self.visit_other(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct KindCounter {
        classes: usize,
        invocations: usize,
        order: Vec<String>,
    }

    impl AstVisitor for KindCounter {
        fn visit_class(&mut self, node: &AstNode) {
            self.classes += 1;
            self.order.push(node.id.clone());
            self.visit_children(node);
        }

        fn visit_invocation(&mut self, node: &AstNode) {
            self.invocations += 1;
            self.order.push(node.id.clone());
            self.visit_children(node);
        }
    }

    #[test]
    fn test_dispatch_and_order() {
        let tree = AstNode::new("c1", NodeKind::ClassDeclaration)
            .unwrap()
            .with_child(
                AstNode::new("m1", NodeKind::MethodDeclaration)
                    .unwrap()
                    .with_child(AstNode::new("i1", NodeKind::MethodInvocation).unwrap())
                    .unwrap()
                    .with_child(AstNode::new("i2", NodeKind::MethodInvocation).unwrap())
                    .unwrap(),
            )
            .unwrap();

        let mut counter = KindCounter {
            classes: 0,
            invocations: 0,
            order: Vec::new(),
        };
        counter.visit_node(&tree);

        assert_eq!(counter.classes, 1);
        assert_eq!(counter.invocations, 2);
        assert_eq!(counter.order, vec!["c1", "i1", "i2"]);
    }
}
