//! Tree wrapper and structural validation.
//!
//! An [`AstTree`] wraps one root node together with the source language
//! and file path. Construction (and deserialization via
//! [`AstTree::from_json`]) walks the whole tree and enforces the
//! structural invariants: unique ids, parent linkage, no self-cycles, and
//! non-empty kind tags. A tree that made it past construction is safe for
//! every downstream pass to traverse without re-checking.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use tmc_error::{Error, Result};

use crate::node::AstNode;

/// A validated canonical tree for one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstTree {
    pub language: String,
    pub file_path: String,
    pub root: AstNode,
}

impl AstTree {
    /// Wrap a root node, validating the structural invariants.
    pub fn new(
        root: AstNode,
        language: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Result<Self> {
        let tree = Self {
            language: language.into(),
            file_path: file_path.into(),
            root,
        };
        tree.validate()?;
        Ok(tree)
    }

    /// Decode a tree from its JSON interchange form and validate it.
    ///
    /// This is the boundary with the upstream parser: trees arrive as
    /// serialized documents and nothing downstream runs until the
    /// structural invariants hold.
    pub fn from_json(json: &str) -> Result<Self> {
        let tree: AstTree = serde_json::from_str(json).map_err(|err| {
            Error::parse_failed("failed to decode AST tree")
                .with_operation("ast::from_json")
                .set_source(err)
        })?;
        tree.validate()?;
        debug!(
            file = %tree.file_path,
            nodes = tree.root.walk().count(),
            "decoded canonical tree"
        );
        Ok(tree)
    }

    /// Serialize this tree to its deterministic interchange form.
    ///
    /// Keys are emitted sorted; serializing the same tree twice yields
    /// byte-identical output.
    pub fn to_json(&self) -> Result<String> {
        let value = serde_json::to_value(self).map_err(|err| {
            Error::serialization_failed("failed to encode AST tree")
                .with_operation("ast::to_json")
                .set_source(err)
        })?;
        serde_json::to_string_pretty(&value).map_err(|err| {
            Error::serialization_failed("failed to render AST tree")
                .with_operation("ast::to_json")
                .set_source(err)
        })
    }

    /// Check invariants 1-4: no self-cycles, parent linkage, unique ids,
    /// non-empty kind tags. The file path must also be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.file_path.is_empty() {
            return Err(Error::structural("tree file_path must be non-empty")
                .with_operation("ast::validate"));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&AstNode, Option<&str>)> = vec![(&self.root, None)];

        while let Some((node, parent_id)) = stack.pop() {
            if node.id.is_empty() {
                return Err(Error::structural("node id must be non-empty")
                    .with_operation("ast::validate")
                    .with_context("file", self.file_path.clone()));
            }
            if node.kind.is_empty() {
                return Err(Error::structural("node type must be non-empty")
                    .with_operation("ast::validate")
                    .with_context("node_id", node.id.clone()));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(Error::structural("node id appears more than once")
                    .with_operation("ast::validate")
                    .with_context("node_id", node.id.clone()));
            }
            if node.parent_id.as_deref() != parent_id {
                return Err(Error::structural("parent_id does not match owning node")
                    .with_operation("ast::validate")
                    .with_context("node_id", node.id.clone())
                    .with_context("expected", parent_id.unwrap_or("<none>").to_string()));
            }
            for child in &node.children {
                if child.id == node.id {
                    return Err(Error::structural("node is its own child")
                        .with_operation("ast::validate")
                        .with_context("node_id", node.id.clone()));
                }
                stack.push((child, Some(node.id.as_str())));
            }
        }

        Ok(())
    }

    /// Build an id -> node lookup over the whole tree.
    ///
    /// Borrow-only; per-pass consumers (the symbol table) build and own
    /// their copy for the duration of one pipeline invocation.
    pub fn index(&self) -> HashMap<&str, &AstNode> {
        self.root.walk().map(|n| (n.id.as_str(), n)).collect()
    }

    /// Look up a node by id (linear; use [`AstTree::index`] in passes).
    pub fn node(&self, id: &str) -> Option<&AstNode> {
        self.root.walk().find(|n| n.id == id)
    }
}
