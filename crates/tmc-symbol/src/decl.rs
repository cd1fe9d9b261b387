//! Symbol-table entry types.
//!
//! Entries borrow the tree they were collected from; the table lives
//! exactly as long as one pipeline invocation over that tree.

use std::collections::BTreeMap;

use tmc_ast::AstNode;

/// What kind of declaration introduced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Field,
    Variable,
    Parameter,
}

/// One recorded declaration: a name, the declarator node, and the
/// initializer node immediately under it (typically a `MethodInvocation`
/// like `By.cssSelector("#email")`, or a `Literal`).
#[derive(Debug, Clone)]
pub struct Declaration<'t> {
    pub name: String,
    pub kind: DeclKind,
    pub declarator: &'t AstNode,
    pub initializer: Option<&'t AstNode>,
    /// Declared type name, when the parser supplied one (`LoginPage` in
    /// `LoginPage loginPage = ...`). Used to tie instance qualifiers back
    /// to page-object classes.
    pub declared_type: Option<String>,
}

/// A page-object method bound to the target it manipulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBinding {
    /// Symbolic name of the bound field (`emailInput`).
    pub target_name: String,
    /// Node id of the field's initializer, when the field has one.
    pub target_node_id: Option<String>,
}

/// Structure of one class declaration.
#[derive(Debug, Clone)]
pub struct ClassInfo<'t> {
    pub name: String,
    pub node: &'t AstNode,
    /// Field name -> declarator node, in name order.
    pub fields: BTreeMap<String, &'t AstNode>,
    /// Field names whose initializer is a `By.*` invocation.
    pub locator_fields: Vec<String>,
    /// Declared method names, in source order.
    pub methods: Vec<String>,
    /// Method name -> inferred target binding (page objects only).
    pub method_bindings: BTreeMap<String, MethodBinding>,
}

impl<'t> ClassInfo<'t> {
    /// A class is a page object when at least one field is initialized
    /// with a `By.*` locator.
    pub fn is_page_object(&self) -> bool {
        !self.locator_fields.is_empty()
    }
}
