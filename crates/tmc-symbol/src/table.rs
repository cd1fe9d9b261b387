//! Symbol table construction and step-target resolution.
//!
//! Built in three passes over one tree:
//!
//! 1. **Declarations** - every `field`/`variable`/`parameter` (derived
//!    tags or the canonical `FieldDeclaration`/`VariableDeclarator`/
//!    `FormalParameter` shapes) is recorded as name -> (declarator,
//!    initializer).
//! 2. **Class structure** - per `ClassDeclaration`: field set, locator
//!    fields, declared methods. A class with a `By.*`-initialized field
//!    is a page object.
//! 3. **Method inference** - page-object methods are bound to the target
//!    they manipulate, first by scanning the body for references to
//!    locator fields, then by name-pattern inference checked against the
//!    declared fields.
//!
//! Resolution never errors: anything the table cannot answer comes back
//! as `None` and surfaces downstream as a step with a null target.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use tmc_ast::{AstNode, AstTree, NodeKind};

use crate::decl::{ClassInfo, DeclKind, Declaration, MethodBinding};
use crate::infer::infer_target_candidates;
use crate::locator::by_strategy;

/// Result of resolving a statement to the UI target it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Symbolic name of the target (`emailInput`), when one owns it.
    pub target_name: Option<String>,
    /// Node id of the locator expression that defines the target.
    pub target_node_id: Option<String>,
}

/// Per-tree symbol table.
pub struct SymbolTable<'t> {
    tree: &'t AstTree,
    nodes: HashMap<&'t str, &'t AstNode>,
    declarations: HashMap<String, Declaration<'t>>,
    classes: BTreeMap<String, ClassInfo<'t>>,
}

impl<'t> SymbolTable<'t> {
    /// Run all three passes over a tree.
    pub fn build(tree: &'t AstTree) -> Self {
        let mut table = Self {
            tree,
            nodes: tree.index(),
            declarations: HashMap::new(),
            classes: BTreeMap::new(),
        };
        table.collect_declarations();
        table.collect_classes();
        table.infer_method_bindings();
        debug!(
            file = %tree.file_path,
            declarations = table.declarations.len(),
            classes = table.classes.len(),
            "symbol table built"
        );
        table
    }

    /// The tree this table was built over.
    pub fn tree(&self) -> &'t AstTree {
        self.tree
    }

    /// Look up any node by id.
    pub fn node(&self, id: &str) -> Option<&'t AstNode> {
        self.nodes.get(id).copied()
    }

    /// Look up a recorded declaration by name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration<'t>> {
        self.declarations.get(name)
    }

    /// Look up a class by name.
    pub fn class(&self, name: &str) -> Option<&ClassInfo<'t>> {
        self.classes.get(name)
    }

    /// All classes, in name order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo<'t>> {
        self.classes.values()
    }

    /// All page-object classes, in name order.
    pub fn page_objects(&self) -> impl Iterator<Item = &ClassInfo<'t>> {
        self.classes.values().filter(|c| c.is_page_object())
    }

    /// Whether an invocation qualifier refers to a page-object instance
    /// or class.
    pub fn is_page_object_qualifier(&self, qualifier: &str) -> bool {
        self.page_object_for_qualifier(qualifier).is_some()
    }

    /// Resolve a statement (typically a `StatementExpression` wrapping a
    /// `MethodInvocation`) to the UI target it references.
    ///
    /// Priority: page-object method binding, then a `MemberReference`
    /// whose declaration is `By.*`-initialized, then a bare `By.*`
    /// invocation. Returns `None` when nothing matches.
    pub fn resolve_step_target(&self, stmt: &AstNode) -> Option<ResolvedTarget> {
        // 1. Page-object method call.
        if let Some(invocation) = first_invocation(stmt) {
            if let (Some(qualifier), Some(member)) = (invocation.qualifier(), invocation.member()) {
                if let Some(class) = self.page_object_for_qualifier(qualifier) {
                    if let Some(binding) = class.method_bindings.get(member) {
                        return Some(ResolvedTarget {
                            target_name: Some(binding.target_name.clone()),
                            target_node_id: binding.target_node_id.clone(),
                        });
                    }
                }
            }
        }

        // 2. Member reference to a locator-initialized declaration.
        for node in stmt.walk() {
            if node.kind != NodeKind::MemberReference {
                continue;
            }
            let Some(name) = referenced_name(node) else {
                continue;
            };
            let Some(decl) = self.declarations.get(name) else {
                continue;
            };
            let Some(init) = decl.initializer else {
                continue;
            };
            if by_strategy(init).is_some() {
                return Some(ResolvedTarget {
                    target_name: Some(name.to_string()),
                    target_node_id: Some(init.id.clone()),
                });
            }
        }

        // 3. A By.* invocation used inline.
        for node in stmt.walk() {
            if by_strategy(node).is_none() {
                continue;
            }
            let owner = self
                .declarations
                .values()
                .find(|decl| decl.initializer.is_some_and(|init| init.id == node.id));
            return Some(ResolvedTarget {
                target_name: owner.map(|decl| decl.name.clone()),
                target_node_id: Some(node.id.clone()),
            });
        }

        None
    }

    /// Map an invocation qualifier to the page-object class it denotes.
    ///
    /// A qualifier resolves through its recorded declaration's declared
    /// type, through a class of the same name, or through the
    /// conventional instance naming (`loginPage` -> `LoginPage`).
    pub fn page_object_for_qualifier(&self, qualifier: &str) -> Option<&ClassInfo<'t>> {
        if qualifier.is_empty() {
            return None;
        }
        if let Some(decl) = self.declarations.get(qualifier) {
            if let Some(ty) = &decl.declared_type {
                if let Some(class) = self.classes.get(ty) {
                    if class.is_page_object() {
                        return Some(class);
                    }
                }
            }
        }
        if let Some(class) = self.classes.get(qualifier) {
            if class.is_page_object() {
                return Some(class);
            }
        }
        self.classes
            .get(&upper_first(qualifier))
            .filter(|class| class.is_page_object())
    }

    // ---------------------------------------------------------------
    // Pass 1: declarations
    // ---------------------------------------------------------------

    fn collect_declarations(&mut self) {
        let mut decls = HashMap::new();
        collect_declarations_rec(&self.tree.root, None, &mut decls);
        self.declarations = decls;
    }

    // ---------------------------------------------------------------
    // Pass 2: class structure
    // ---------------------------------------------------------------

    fn collect_classes(&mut self) {
        let mut classes = BTreeMap::new();
        for node in self.tree.root.walk() {
            if node.kind != NodeKind::ClassDeclaration {
                continue;
            }
            let Some(class_name) = node.name.clone() else {
                continue;
            };

            let mut fields: BTreeMap<String, &AstNode> = BTreeMap::new();
            let mut locator_fields = Vec::new();
            let mut methods = Vec::new();

            for_each_in_class(node, &mut |member, parent| match member.kind {
                NodeKind::MethodDeclaration => {
                    if let Some(name) = &member.name {
                        methods.push(name.clone());
                    }
                }
                _ => {
                    if let Some((DeclKind::Field, name)) = classify_declaration(member, parent) {
                        if initializer_of(member).is_some_and(|init| by_strategy(init).is_some()) {
                            locator_fields.push(name.clone());
                        }
                        fields.insert(name, member);
                    }
                }
            });

            classes.insert(
                class_name.clone(),
                ClassInfo {
                    name: class_name,
                    node,
                    fields,
                    locator_fields,
                    methods,
                    method_bindings: BTreeMap::new(),
                },
            );
        }
        self.classes = classes;
    }

    // ---------------------------------------------------------------
    // Pass 3: method-target inference
    // ---------------------------------------------------------------

    fn infer_method_bindings(&mut self) {
        let mut bindings: Vec<(String, String, MethodBinding)> = Vec::new();

        for class in self.classes.values().filter(|c| c.is_page_object()) {
            for_each_in_class(class.node, &mut |member, _| {
                if member.kind != NodeKind::MethodDeclaration {
                    return;
                }
                let Some(method_name) = &member.name else {
                    return;
                };
                if let Some(binding) = bind_method(class, member, method_name) {
                    bindings.push((class.name.clone(), method_name.clone(), binding));
                }
            });
        }

        for (class_name, method_name, binding) in bindings {
            if let Some(class) = self.classes.get_mut(&class_name) {
                class.method_bindings.insert(method_name, binding);
            }
        }
    }
}

/// Infer the target a page-object method manipulates.
///
/// (a) a `MemberReference` in the body to one of the class's locator
/// fields wins; (b) otherwise the name-pattern candidates are checked
/// against the declared fields and the first that exists wins.
fn bind_method<'t>(
    class: &ClassInfo<'t>,
    method: &'t AstNode,
    method_name: &str,
) -> Option<MethodBinding> {
    for node in method.walk().skip(1) {
        if node.kind != NodeKind::MemberReference {
            continue;
        }
        let Some(name) = referenced_name(node) else {
            continue;
        };
        if class.locator_fields.iter().any(|f| f == name) {
            return Some(MethodBinding {
                target_name: name.to_string(),
                target_node_id: class
                    .fields
                    .get(name)
                    .copied()
                    .and_then(initializer_of)
                    .map(|init| init.id.clone()),
            });
        }
    }

    for candidate in infer_target_candidates(method_name) {
        if let Some(declarator) = class.fields.get(&candidate).copied() {
            return Some(MethodBinding {
                target_name: candidate,
                target_node_id: initializer_of(declarator).map(|init| init.id.clone()),
            });
        }
    }

    None
}

fn collect_declarations_rec<'t>(
    node: &'t AstNode,
    parent: Option<&'t AstNode>,
    decls: &mut HashMap<String, Declaration<'t>>,
) {
    if let Some((kind, name)) = classify_declaration(node, parent) {
        decls.insert(
            name.clone(),
            Declaration {
                name,
                kind,
                declarator: node,
                initializer: initializer_of(node),
                declared_type: declared_type_of(node, parent),
            },
        );
    }
    for child in &node.children {
        collect_declarations_rec(child, Some(node), decls);
    }
}

/// Classify a node as a declaration, using the derived tags when present
/// and the canonical Java shapes otherwise.
fn classify_declaration<'t>(
    node: &'t AstNode,
    parent: Option<&'t AstNode>,
) -> Option<(DeclKind, String)> {
    let name = node.name.clone()?;
    let kind = match node.kind {
        NodeKind::Field => DeclKind::Field,
        NodeKind::Variable => DeclKind::Variable,
        NodeKind::Parameter | NodeKind::FormalParameter => DeclKind::Parameter,
        NodeKind::VariableDeclarator => match parent.map(|p| &p.kind) {
            Some(NodeKind::FieldDeclaration) => DeclKind::Field,
            _ => DeclKind::Variable,
        },
        _ => return None,
    };
    Some((kind, name))
}

/// The initializer immediately under a declarator, if present.
fn initializer_of(declarator: &AstNode) -> Option<&AstNode> {
    declarator
        .children
        .iter()
        .find(|child| matches!(child.kind, NodeKind::MethodInvocation | NodeKind::Literal))
}

/// Declared type name for a declarator, from its own attributes, the
/// enclosing declaration's attributes, or a `ReferenceType` sibling.
fn declared_type_of(node: &AstNode, parent: Option<&AstNode>) -> Option<String> {
    if let Some(ty) = node.attr_str("type") {
        return Some(ty.to_string());
    }
    let parent = parent?;
    if let Some(ty) = parent.attr_str("type") {
        return Some(ty.to_string());
    }
    parent
        .children
        .iter()
        .find(|child| child.kind == NodeKind::ReferenceType)
        .and_then(|child| child.name.clone())
}

/// The name a `MemberReference` refers to.
fn referenced_name(node: &AstNode) -> Option<&str> {
    node.member().or(node.name.as_deref())
}

/// First `MethodInvocation` in pre-order, including the node itself.
fn first_invocation(stmt: &AstNode) -> Option<&AstNode> {
    stmt.walk().find(|n| n.kind == NodeKind::MethodInvocation)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Visit every node of a class body with its parent, without descending
/// into nested class declarations.
fn for_each_in_class<'t>(class: &'t AstNode, f: &mut impl FnMut(&'t AstNode, Option<&'t AstNode>)) {
    fn rec<'t>(node: &'t AstNode, f: &mut impl FnMut(&'t AstNode, Option<&'t AstNode>)) {
        for child in &node.children {
            if child.kind == NodeKind::ClassDeclaration {
                continue;
            }
            f(child, Some(node));
            rec(child, f);
        }
    }
    rec(class, f);
}
