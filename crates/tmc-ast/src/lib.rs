//! Canonical AST model for tmc.
//!
//! Upstream, language-specific parsers hand tmc one canonical tree per
//! source file. This crate owns that contract: the node/tree types, the
//! structural invariants enforced at construction time, pre-order
//! traversal, and the serialized interchange form. No semantic logic
//! lives here; the symbol table and the extractors build on top.

pub mod node;
pub mod tree;
pub mod visit;

pub use node::{AstNode, NodeKind, SourceLocation};
pub use tree::AstTree;
pub use visit::AstVisitor;

pub use tmc_error::{Error, ErrorKind, Result};
