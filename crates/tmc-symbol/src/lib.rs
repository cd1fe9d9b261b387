//! Per-tree symbol table for tmc.
//!
//! Answers the question the extraction layer keeps asking: *what UI
//! target does this AST node reference?* The table is built in three
//! passes over one canonical tree (declarations, class structure, method
//! inference) and then serves lookups through
//! [`SymbolTable::resolve_step_target`]. Missing information never
//! raises; resolution returns `None` and lets the extractor emit a step
//! with a null target.

pub mod decl;
pub mod infer;
pub mod locator;
pub mod table;

pub use decl::{ClassInfo, DeclKind, Declaration, MethodBinding};
pub use infer::infer_target_candidates;
pub use locator::{LocatorStrategy, by_strategy};
pub use table::{ResolvedTarget, SymbolTable};
