//! AST node types and per-node accessors.
//!
//! Every node carries a stable string id, a kind drawn from the canonical
//! set, an optional name, a non-owning `parent_id`, owned children, an
//! optional source location, and a free-form attribute bag for
//! language-specific metadata (`member`, `qualifier`, `operator`,
//! `modifiers`, `text`, ...). Parents are never modeled as owning
//! references; `parent_id` is maintained by [`AstNode::attach`].

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{Display, EnumString};

use tmc_error::{Error, Result};

/// Enumeration of canonical AST node kinds.
///
/// The canonical set covers the Java/Selenium constructs the extraction
/// layer understands, plus the derived lowercase tags (`field`,
/// `variable`, `parameter`) that parser adapters emit for uniform
/// declaration matching. Kinds outside the set are preserved as-is in
/// [`NodeKind::Other`]; the extractors treat them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Display)]
pub enum NodeKind {
    CompilationUnit,
    PackageDeclaration,
    Import,
    ClassDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    FieldDeclaration,
    FormalParameter,
    VariableDeclarator,
    LocalVariableDeclaration,
    BlockStatement,
    IfStatement,
    ReturnStatement,
    StatementExpression,
    Assignment,
    BinaryOperation,
    MethodInvocation,
    MemberReference,
    ReferenceType,
    BasicType,
    Literal,
    This,
    /// Derived declaration tag for class fields.
    #[strum(serialize = "field")]
    Field,
    /// Derived declaration tag for local variables.
    #[strum(serialize = "variable")]
    Variable,
    /// Derived declaration tag for formal parameters.
    #[strum(serialize = "parameter")]
    Parameter,
    /// Any kind outside the canonical set, preserved verbatim.
    #[strum(default)]
    Other(String),
}

impl NodeKind {
    /// The raw kind tag as it appears in the interchange form.
    pub fn as_tag(&self) -> String {
        self.to_string()
    }

    /// Whether this kind carries a non-empty tag.
    ///
    /// Only `Other("")` can violate this; the canonical variants always
    /// render non-empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, NodeKind::Other(tag) if tag.is_empty())
    }

    /// Whether this kind is one of the derived declaration tags.
    pub fn is_declaration_tag(&self) -> bool {
        matches!(
            self,
            NodeKind::Field | NodeKind::Variable | NodeKind::Parameter
        )
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse::<NodeKind>().map_err(D::Error::custom)
    }
}

/// Line/column position of a node in its source file (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

/// A node in the canonical tree.
///
/// Children are owned; the parent link is the non-owning `parent_id`
/// string, kept consistent by [`AstNode::attach`]. The attribute bag
/// holds language-specific metadata as JSON values so literal arguments
/// keep their types through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, serde_json::Value>,
}

impl AstNode {
    /// Create a node, validating that the id and kind tag are non-empty.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::structural("node id must be non-empty").with_operation("ast::new"));
        }
        if kind.is_empty() {
            return Err(Error::structural("node type must be non-empty")
                .with_operation("ast::new")
                .with_context("node_id", id));
        }
        Ok(Self {
            id,
            kind,
            name: None,
            parent_id: None,
            children: Vec::new(),
            location: None,
            attrs: BTreeMap::new(),
        })
    }

    /// Set the node name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a string attribute (builder style).
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Set an attribute to an arbitrary JSON value (builder style).
    pub fn with_attr_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Set the source location (builder style).
    pub fn with_location(mut self, line: u32, column: u32) -> Self {
        self.location = Some(SourceLocation { line, column });
        self
    }

    /// Attach a child, setting its `parent_id` to this node's id.
    ///
    /// Fails with a Structural error if the child carries this node's own
    /// id (invariant 1: no node is its own child).
    pub fn attach(&mut self, mut child: AstNode) -> Result<()> {
        if child.id == self.id {
            return Err(Error::structural("node cannot be attached to itself")
                .with_operation("ast::attach")
                .with_context("node_id", self.id.clone()));
        }
        child.parent_id = Some(self.id.clone());
        self.children.push(child);
        Ok(())
    }

    /// Attach a child, returning self (builder style).
    pub fn with_child(mut self, child: AstNode) -> Result<Self> {
        self.attach(child)?;
        Ok(self)
    }

    /// Look up a string attribute.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(|v| v.as_str())
    }

    /// The invocation qualifier (`loginPage` in `loginPage.enterEmail(..)`).
    pub fn qualifier(&self) -> Option<&str> {
        self.attr_str("qualifier")
    }

    /// The invoked or referenced member name.
    pub fn member(&self) -> Option<&str> {
        self.attr_str("member")
    }

    /// The rendered source text, when the parser supplied it.
    pub fn text(&self) -> Option<&str> {
        self.attr_str("text")
    }

    /// Typed value of a `Literal` node.
    ///
    /// String values are stripped of one layer of surrounding double
    /// quotes (parsers hand over the raw token, e.g. `"#email"`); values
    /// that already arrived as JSON numbers or booleans pass through, and
    /// numeric-looking strings are promoted to numbers.
    pub fn literal_value(&self) -> Option<serde_json::Value> {
        if self.kind != NodeKind::Literal {
            return None;
        }
        let raw = self.attrs.get("value")?;
        match raw {
            serde_json::Value::String(s) => {
                let stripped = strip_quotes(s);
                if stripped.len() != s.len() {
                    return Some(serde_json::Value::String(stripped.to_string()));
                }
                if let Ok(n) = stripped.parse::<i64>() {
                    return Some(serde_json::Value::from(n));
                }
                if let Ok(f) = stripped.parse::<f64>() {
                    return Some(serde_json::Value::from(f));
                }
                match stripped {
                    "true" => Some(serde_json::Value::Bool(true)),
                    "false" => Some(serde_json::Value::Bool(false)),
                    _ => Some(serde_json::Value::String(stripped.to_string())),
                }
            }
            other => Some(other.clone()),
        }
    }

    /// Depth-first pre-order traversal of this node and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// First descendant (pre-order, excluding self) matching a predicate.
    pub fn find_descendant<'a>(
        &'a self,
        pred: impl Fn(&AstNode) -> bool,
    ) -> Option<&'a AstNode> {
        self.walk().skip(1).find(|n| pred(n))
    }
}

/// Strip one layer of surrounding double quotes, if present.
pub fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}

/// Pre-order iterator over a subtree.
///
/// Children are pushed in reverse so the leftmost child is visited first;
/// step emission order downstream depends on this.
pub struct Walk<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_round_trips_canonical_tags() {
        assert_eq!(
            "ClassDeclaration".parse::<NodeKind>().unwrap(),
            NodeKind::ClassDeclaration
        );
        assert_eq!(NodeKind::MethodInvocation.to_string(), "MethodInvocation");
        assert_eq!("field".parse::<NodeKind>().unwrap(), NodeKind::Field);
        assert_eq!(NodeKind::Parameter.to_string(), "parameter");
    }

    #[test]
    fn test_kind_preserves_unknown_tags() {
        let kind = "LambdaExpression".parse::<NodeKind>().unwrap();
        assert_eq!(kind, NodeKind::Other("LambdaExpression".to_string()));
        assert_eq!(kind.to_string(), "LambdaExpression");
    }

    #[test]
    fn test_new_rejects_empty_id_and_kind() {
        assert!(AstNode::new("", NodeKind::Literal).is_err());
        assert!(AstNode::new("n1", NodeKind::Other(String::new())).is_err());
    }

    #[test]
    fn test_attach_sets_parent_id() {
        let mut parent = AstNode::new("n1", NodeKind::ClassDeclaration).unwrap();
        let child = AstNode::new("n2", NodeKind::FieldDeclaration).unwrap();
        parent.attach(child).unwrap();

        assert_eq!(parent.children[0].parent_id.as_deref(), Some("n1"));
    }

    #[test]
    fn test_attach_rejects_self_cycle() {
        let mut node = AstNode::new("n1", NodeKind::BlockStatement).unwrap();
        let twin = AstNode::new("n1", NodeKind::BlockStatement).unwrap();
        assert!(node.attach(twin).is_err());
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = AstNode::new("a", NodeKind::BlockStatement)
            .unwrap()
            .with_child(
                AstNode::new("b", NodeKind::StatementExpression)
                    .unwrap()
                    .with_child(AstNode::new("c", NodeKind::Literal).unwrap())
                    .unwrap(),
            )
            .unwrap()
            .with_child(AstNode::new("d", NodeKind::StatementExpression).unwrap())
            .unwrap();

        let order: Vec<&str> = tree.walk().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_literal_value_strips_quotes() {
        let lit = AstNode::new("n1", NodeKind::Literal)
            .unwrap()
            .with_attr("value", "\"#email\"");
        assert_eq!(
            lit.literal_value(),
            Some(serde_json::Value::String("#email".to_string()))
        );
    }

    #[test]
    fn test_literal_value_promotes_numbers() {
        let lit = AstNode::new("n1", NodeKind::Literal)
            .unwrap()
            .with_attr("value", "42");
        assert_eq!(lit.literal_value(), Some(serde_json::Value::from(42)));

        let quoted = AstNode::new("n2", NodeKind::Literal)
            .unwrap()
            .with_attr("value", "\"42\"");
        assert_eq!(
            quoted.literal_value(),
            Some(serde_json::Value::String("42".to_string()))
        );
    }

    #[test]
    fn test_literal_value_requires_literal_kind() {
        let node = AstNode::new("n1", NodeKind::MemberReference)
            .unwrap()
            .with_attr("value", "x");
        assert_eq!(node.literal_value(), None);
    }

    #[test]
    fn test_node_serde_round_trip() {
        let node = AstNode::new("n1", NodeKind::MethodInvocation)
            .unwrap()
            .with_attr("qualifier", "By")
            .with_attr("member", "cssSelector")
            .with_location(3, 9);

        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"MethodInvocation\""));
        let back: AstNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
